use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate};
use jsonwebtoken::{encode, EncodingKey, Header};
use rentcar_api::middleware::Claims;
use rentcar_api::{app, AppState};
use rentcar_core::car::CarInput;
use rentcar_core::repository::{CarRepository, ProfileRepository};
use rentcar_core::Role;
use rentcar_shared::DomainEvent;
use rentcar_store::app_config::{AuthConfig, BusinessRules, StorageConfig};
use rentcar_store::{LocalDocumentStore, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-secret";
const BASE_URL: &str = "http://localhost:8080/uploads";

struct TestApp {
    router: Router,
    state: AppState,
    store: Arc<MemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let root = std::env::temp_dir().join(format!("rentcar-api-{}", Uuid::new_v4()));
        let storage = StorageConfig {
            root: root.to_string_lossy().into_owned(),
            public_base_url: BASE_URL.to_string(),
            max_upload_bytes: 1024,
        };
        let documents = Arc::new(LocalDocumentStore::new(&root, BASE_URL, 1024));
        let state = AppState::in_memory(
            store.clone(),
            documents,
            AuthConfig { jwt_secret: SECRET.to_string(), audience: None },
            BusinessRules::default(),
            storage,
        );
        Self { router: app(state.clone()), state, store }
    }

    fn today(&self) -> NaiveDate {
        self.state.today()
    }

    async fn actor(&self, role: Role) -> (Uuid, String) {
        let id = Uuid::new_v4();
        self.store.ensure_profile(id).await.unwrap();
        if role != Role::User {
            self.store.update_role(id, role).await.unwrap();
        }
        (id, token(id))
    }

    async fn car(&self, name: &str, price_per_day: i64, available: bool) -> i64 {
        let input = CarInput {
            name: name.to_string(),
            car_type: "MPV".to_string(),
            price_per_day,
            fuel_type: "Bensin".to_string(),
            seats: 7,
            transmission: "Manual".to_string(),
            engine_cc: Some(1300),
            description: None,
            image_url: None,
            is_available: available,
        };
        self.store.create_car(&input).await.unwrap().id
    }

    async fn call(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(request("GET", uri, token, Body::empty())).await
    }

    async fn send_json(&self, method: &str, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut req = request(method, uri, token, Body::from(body.to_string()));
        req.headers_mut()
            .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        self.call(req).await
    }

    async fn book(&self, token: &str, car_id: i64) -> (StatusCode, Value) {
        self.book_with_proof(token, car_id, "http://localhost:8080/uploads/payment-proofs/1_a.jpg")
            .await
    }

    async fn book_with_proof(&self, token: &str, car_id: i64, proof: &str) -> (StatusCode, Value) {
        let start = self.today() + Duration::days(1);
        self.send_json(
            "POST",
            "/v1/bookings",
            Some(token),
            json!({
                "car_id": car_id,
                "start_date": start,
                "end_date": start + Duration::days(2),
                "payment_proof_url": proof,
            }),
        )
        .await
    }
}

fn token(sub: Uuid) -> String {
    let claims = Claims {
        sub,
        email: Some("customer@example.com".to_string()),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(body).unwrap()
}

#[tokio::test]
async fn test_public_catalog_hides_unavailable_cars() {
    let app = TestApp::new();
    app.car("Xenia", 300_000, true).await;
    app.car("Avanza", 350_000, true).await;
    let hidden = app.car("Innova", 600_000, false).await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/v1/cars", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Avanza", "Xenia"]);

    let (status, _) = app.get(&format!("/v1/cars/{}", hidden), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote_counts_both_ends() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let start = app.today() + Duration::days(3);

    let (status, body) = app
        .send_json(
            "POST",
            &format!("/v1/cars/{}/quote", car),
            None,
            json!({ "start_date": start, "end_date": start + Duration::days(2) }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 3);
    assert_eq!(body["total_price"], 1_050_000);
    assert_eq!(body["currency"], "IDR");

    let yesterday = app.today() - Duration::days(1);
    let (status, body) = app
        .send_json(
            "POST",
            &format!("/v1/cars/{}/quote", car),
            None,
            json!({ "start_date": yesterday, "end_date": start }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid booking range"));
}

#[tokio::test]
async fn test_quote_rejects_price_past_i64() {
    let app = TestApp::new();
    let car = app.car("Alphard", i64::MAX / 2, true).await;
    let start = app.today() + Duration::days(1);

    let (status, body) = app
        .send_json(
            "POST",
            &format!("/v1/cars/{}/quote", car),
            None,
            json!({ "start_date": start, "end_date": start + Duration::days(2) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("exceeds the maximum price"));
}

#[tokio::test]
async fn test_authentication_required() {
    let app = TestApp::new();

    let (status, _) = app.get("/v1/bookings", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/v1/profile", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_submit_and_list_own_bookings() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let (user, user_token) = app.actor(Role::User).await;
    let (_, other_token) = app.actor(Role::User).await;
    let mut events = app.state.events.subscribe();

    let (status, body) = app.book(&user_token, car).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending_verification");
    assert_eq!(body["total_price"], 1_050_000);
    assert_eq!(body["user_id"], user.to_string());

    match events.try_recv().unwrap() {
        DomainEvent::BookingSubmitted { car_id, total_price, .. } => {
            assert_eq!(car_id, car);
            assert_eq!(total_price, 1_050_000);
        }
        other => panic!("unexpected event {:?}", other),
    }

    let (_, mine) = app.get("/v1/bookings", Some(&user_token)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    let (_, theirs) = app.get("/v1/bookings", Some(&other_token)).await;
    assert!(theirs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_rejects_same_day_and_missing_proof() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let (_, token) = app.actor(Role::User).await;
    let today = app.today();

    let (status, _) = app
        .send_json(
            "POST",
            "/v1/bookings",
            Some(&token),
            json!({ "car_id": car, "start_date": today, "end_date": today, "payment_proof_url": "http://localhost:8080/uploads/payment-proofs/p.jpg" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send_json(
            "POST",
            "/v1/bookings",
            Some(&token),
            json!({ "car_id": car, "start_date": today, "end_date": today + Duration::days(1), "payment_proof_url": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.book(&token, 404).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_requires_proof_from_document_store() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let (_, token) = app.actor(Role::User).await;

    for proof in [
        "https://elsewhere.example/payment-proofs/p.jpg",
        "http://localhost:8080/uploads/ktp/p.jpg",
        "http://localhost:8080/uploads/payment-proofs/",
    ] {
        let (status, body) = app.book_with_proof(&token, car, proof).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", proof);
        assert!(body["error"].as_str().unwrap().contains("uploaded document"));
    }

    let (_, mine) = app.get("/v1/bookings", Some(&token)).await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_user_is_kept_out_of_admin_area() {
    let app = TestApp::new();
    let (_, token) = app.actor(Role::User).await;

    for uri in ["/v1/admin/stats", "/v1/admin/bookings", "/v1/admin/users", "/v1/admin/cars"] {
        let (status, body) = app.get(uri, Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["error"], "Permission denied: view-admin-area");
    }
}

#[tokio::test]
async fn test_review_follows_state_machine() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let (_, user_token) = app.actor(Role::User).await;
    let (_, admin_token) = app.actor(Role::Admin).await;
    let (_, sub_admin_token) = app.actor(Role::SubAdmin).await;

    let (_, first) = app.book(&user_token, car).await;
    let (_, second) = app.book(&user_token, car).await;
    let approve = format!("/v1/admin/bookings/{}/approve", first["id"]);

    let (status, _) = app.send_json("POST", &approve, Some(&user_token), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send_json("POST", &approve, Some(&admin_token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    // Confirmed bookings cannot be rejected
    let (status, body) = app
        .send_json("POST", &format!("/v1/admin/bookings/{}/reject", first["id"]), Some(&admin_token), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Invalid status transition from confirmed to cancelled");

    let (status, body) = app
        .send_json("POST", &format!("/v1/admin/bookings/{}/reject", second["id"]), Some(&sub_admin_token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, _) = app
        .send_json("POST", "/v1/admin/bookings/999/approve", Some(&admin_token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = app.get("/v1/admin/stats", Some(&sub_admin_token)).await;
    assert_eq!(stats["total_bookings"], 2);
    assert_eq!(stats["pending_bookings"], 0);
    assert_eq!(stats["total_cars"], 1);
    assert_eq!(stats["total_users"], 3);
}

#[tokio::test]
async fn test_verification_list_filters_by_status() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let (_, user_token) = app.actor(Role::User).await;
    let (_, admin_token) = app.actor(Role::Admin).await;

    let (_, booking) = app.book(&user_token, car).await;
    app.book(&user_token, car).await;
    app.send_json(
        "POST",
        &format!("/v1/admin/bookings/{}/approve", booking["id"]),
        Some(&admin_token),
        json!({}),
    )
    .await;

    let (status, rows) = app.get("/v1/admin/bookings?status=confirmed", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["car_name"], "Avanza");

    let (_, all) = app.get("/v1/admin/bookings", Some(&admin_token)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_export_csv_download() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let (_, user_token) = app.actor(Role::User).await;
    let (_, sub_admin_token) = app.actor(Role::SubAdmin).await;
    app.book(&user_token, car).await;

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/v1/admin/bookings/export?format=csv", Some(&sub_admin_token), Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains(&format!("booking-report-{}.csv", app.today().format("%Y-%m-%d"))));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Booking ID,Customer Name"));
    assert!(lines[1].contains(",N/A,N/A,Avanza,MPV,"));
}

#[tokio::test]
async fn test_export_json_download() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let (_, user_token) = app.actor(Role::User).await;
    let (_, admin_token) = app.actor(Role::Admin).await;
    app.book(&user_token, car).await;
    app.book(&user_token, car).await;

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/v1/admin/bookings/export?format=json", Some(&admin_token), Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains(&format!("booking-report-{}.json", app.today().format("%Y-%m-%d"))));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["count"], 2);
    assert_eq!(report["bookings"].as_array().unwrap().len(), 2);
    assert_eq!(report["bookings"][0]["Car Name"], "Avanza");
}

#[tokio::test]
async fn test_admin_event_stream() {
    let app = TestApp::new();
    let (_, user_token) = app.actor(Role::User).await;
    let (_, sub_admin_token) = app.actor(Role::SubAdmin).await;

    let (status, _) = app.get("/v1/admin/events", Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only the head is read; the body stays open until the client leaves
    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/v1/admin/events", Some(&sub_admin_token), Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
}

#[tokio::test]
async fn test_car_management_permissions() {
    let app = TestApp::new();
    let (_, admin_token) = app.actor(Role::Admin).await;
    let (_, sub_admin_token) = app.actor(Role::SubAdmin).await;
    let car = json!({
        "name": "Honda Brio", "car_type": "Hatchback", "price_per_day": 300000,
        "fuel_type": "Bensin", "seats": 5, "transmission": "Automatic",
        "engine_cc": 1200, "description": null, "image_url": null
    });

    let (status, _) = app.send_json("POST", "/v1/admin/cars", Some(&sub_admin_token), car.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app.send_json("POST", "/v1/admin/cars", Some(&admin_token), car.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_available"], true);

    let mut invalid = car.clone();
    invalid["price_per_day"] = json!(0);
    let (status, _) = app.send_json("POST", "/v1/admin/cars", Some(&admin_token), invalid).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = app.get("/v1/admin/cars", Some(&sub_admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let uri = format!("/v1/admin/cars/{}", created["id"]);
    let (status, _) = app.call(request("DELETE", &uri, Some(&sub_admin_token), Body::empty())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.call(request("DELETE", &uri, Some(&admin_token), Body::empty())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.call(request("DELETE", &uri, Some(&admin_token), Body::empty())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_changes() {
    let app = TestApp::new();
    let (admin, admin_token) = app.actor(Role::Admin).await;
    let (user, _) = app.actor(Role::User).await;
    let (_, sub_admin_token) = app.actor(Role::SubAdmin).await;

    let (status, _) = app
        .send_json("PUT", &format!("/v1/admin/users/{}/role", admin), Some(&admin_token), json!({ "role": "user" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send_json("PUT", &format!("/v1/admin/users/{}/role", user), Some(&sub_admin_token), json!({ "role": "admin" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send_json("PUT", &format!("/v1/admin/users/{}/role", user), Some(&admin_token), json!({ "role": "sub_admin" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "sub_admin");

    let (status, _) = app
        .send_json("PUT", &format!("/v1/admin/users/{}/role", user), Some(&admin_token), json!({ "role": "owner" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, listing) = app.get("/v1/admin/users", Some(&admin_token)).await;
    assert_eq!(listing["counts"], json!({ "admin": 1, "sub_admin": 2, "user": 0 }));
}

#[tokio::test]
async fn test_profile_update_cannot_touch_role() {
    let app = TestApp::new();
    let (_, token) = app.actor(Role::User).await;

    let (status, body) = app
        .send_json(
            "PUT",
            "/v1/profile",
            Some(&token),
            json!({ "full_name": "Budi Santoso", "phone_number": "+628123456789", "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Budi Santoso");
    assert_eq!(body["phone_number"], "+628123456789");
    assert_eq!(body["role"], "user");

    let (status, _) = app
        .send_json("PUT", "/v1/profile", Some(&token), json!({ "ktp_number": "31-74" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blog_publishing() {
    let app = TestApp::new();
    let (admin, admin_token) = app.actor(Role::Admin).await;
    let (_, sub_admin_token) = app.actor(Role::SubAdmin).await;
    let post = json!({ "title": "Tips Mudik", "content": "<p>Cek ban sebelum berangkat</p>" });

    let (status, _) = app.send_json("POST", "/v1/admin/blog", Some(&sub_admin_token), post.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app.send_json("POST", "/v1/admin/blog", Some(&admin_token), post).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["author_id"], admin.to_string());

    let (status, listed) = app.get("/v1/blog", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["title"], "Tips Mudik");

    let (status, _) = app
        .send_json(
            "PUT",
            &format!("/v1/admin/blog/{}", created["id"]),
            Some(&admin_token),
            json!({ "title": "", "content": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn multipart(file_name: &str, bytes: &[u8]) -> (String, Body) {
    let boundary = "rentcar-boundary";
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
        b = boundary,
        f = file_name
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), Body::from(body))
}

#[tokio::test]
async fn test_document_upload() {
    let app = TestApp::new();
    let (_, user_token) = app.actor(Role::User).await;

    let (content_type, body) = multipart("bukti.png", b"png-bytes");
    let mut req = request("POST", "/v1/documents/payment-proof", Some(&user_token), body);
    req.headers_mut().insert(header::CONTENT_TYPE, content_type.parse().unwrap());
    let (status, response) = app.call(req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(response["url"].as_str().unwrap().starts_with("http://localhost:8080/uploads/payment-proofs/"));

    // Car images are for the catalog editors only
    let (content_type, body) = multipart("car.jpg", b"jpg-bytes");
    let mut req = request("POST", "/v1/documents/car-image", Some(&user_token), body);
    req.headers_mut().insert(header::CONTENT_TYPE, content_type.parse().unwrap());
    let (status, _) = app.call(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (content_type, body) = multipart("script.exe", b"MZ");
    let mut req = request("POST", "/v1/documents/identity-card", Some(&user_token), body);
    req.headers_mut().insert(header::CONTENT_TYPE, content_type.parse().unwrap());
    let (status, _) = app.call(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_uploaded_document_is_served_and_bookable() {
    let app = TestApp::new();
    let car = app.car("Avanza", 350_000, true).await;
    let (_, user_token) = app.actor(Role::User).await;

    let (content_type, body) = multipart("bukti.png", b"png-bytes");
    let mut req = request("POST", "/v1/documents/payment-proof", Some(&user_token), body);
    req.headers_mut().insert(header::CONTENT_TYPE, content_type.parse().unwrap());
    let (status, uploaded) = app.call(req).await;
    assert_eq!(status, StatusCode::CREATED);
    let url = uploaded["url"].as_str().unwrap();

    let path = url.strip_prefix("http://localhost:8080").unwrap();
    let response = app
        .router
        .clone()
        .oneshot(request("GET", path, None, Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"png-bytes");

    let (status, _) = app.get("/uploads/payment-proofs/missing.png", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, booking) = app.book_with_proof(&user_token, car, url).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["payment_proof_url"], url);
}
