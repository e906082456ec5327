use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPost {
    pub id: i64,
    pub author_id: Uuid,
    pub title: String,
    /// Rich-text HTML from the admin editor
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostInput {
    pub title: String,
    pub content: String,
}

impl BlogPostInput {
    pub fn validate(&self) -> CoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::ValidationError("title is required".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(CoreError::ValidationError("content is required".to_string()));
        }
        Ok(())
    }
}
