use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::booking::BookingStatus;

const MISSING: &str = "N/A";

/// A booking joined with its customer and car, as listed in the verification console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingReportRow {
    pub id: i64,
    pub user_id: uuid::Uuid,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub car_name: Option<String>,
    pub car_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: i64,
    pub status: BookingStatus,
    pub payment_proof_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Status filter plus an inclusive created-at date window.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl BookingFilter {
    pub fn matches(&self, row: &BookingReportRow) -> bool {
        if let Some(status) = self.status {
            if row.status != status {
                return false;
            }
        }

        // The date window only applies when both ends are set.
        if let (Some(from), Some(to)) = (self.from, self.to) {
            let created = row.created_at.date_naive();
            if created < from || created > to {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, rows: Vec<BookingReportRow>) -> Vec<BookingReportRow> {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Admin dashboard totals
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_cars: i64,
    pub total_bookings: i64,
    pub pending_bookings: i64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    pub fn exporter(&self) -> Box<dyn ReportExporter + Send + Sync> {
        match self {
            ReportFormat::Csv => Box::new(CsvExporter),
            ReportFormat::Json => Box::new(JsonExporter),
        }
    }
}

/// A rendered report ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait ReportExporter {
    /// Render `rows` as a report dated `generated_on`
    fn export(&self, rows: &[BookingReportRow], generated_on: NaiveDate) -> Result<ExportedReport, ReportError>;
}

const HEADERS: [&str; 10] = [
    "Booking ID",
    "Customer Name",
    "Phone",
    "Car Name",
    "Car Type",
    "Start Date",
    "End Date",
    "Total Price",
    "Status",
    "Booked At",
];

fn report_fields(row: &BookingReportRow) -> [String; 10] {
    let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
    [
        row.id.to_string(),
        or_missing(&row.customer_name),
        or_missing(&row.customer_phone),
        or_missing(&row.car_name),
        or_missing(&row.car_type),
        row.start_date.format("%d/%m/%Y").to_string(),
        row.end_date.format("%d/%m/%Y").to_string(),
        row.total_price.to_string(),
        row.status.to_string(),
        row.created_at.format("%d/%m/%Y %H:%M").to_string(),
    ]
}

fn file_name(generated_on: NaiveDate, ext: &str) -> String {
    format!("booking-report-{}.{}", generated_on.format("%Y-%m-%d"), ext)
}

pub struct CsvExporter;

impl CsvExporter {
    fn escape(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn line<S: AsRef<str>>(fields: &[S]) -> String {
        let mut line = fields
            .iter()
            .map(|f| Self::escape(f.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        line.push_str("\r\n");
        line
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, rows: &[BookingReportRow], generated_on: NaiveDate) -> Result<ExportedReport, ReportError> {
        let mut body = Self::line(&HEADERS[..]);
        for row in rows {
            body.push_str(&Self::line(&report_fields(row)[..]));
        }

        Ok(ExportedReport {
            file_name: file_name(generated_on, "csv"),
            content_type: "text/csv; charset=utf-8",
            body,
        })
    }
}

pub struct JsonExporter;

impl ReportExporter for JsonExporter {
    fn export(&self, rows: &[BookingReportRow], generated_on: NaiveDate) -> Result<ExportedReport, ReportError> {
        let records: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let fields = report_fields(row);
                let record: serde_json::Map<String, serde_json::Value> = HEADERS
                    .iter()
                    .zip(fields)
                    .map(|(h, v)| (h.to_string(), json!(v)))
                    .collect();
                serde_json::Value::Object(record)
            })
            .collect();

        let body = serde_json::to_string_pretty(&json!({
            "generated_on": generated_on,
            "count": rows.len(),
            "bookings": records,
        }))?;

        Ok(ExportedReport {
            file_name: file_name(generated_on, "json"),
            content_type: "application/json",
            body,
        })
    }
}
