use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Difficulty;

/// A top-level learning unit composed of ordered lessons.
///
/// `category_id` is an opaque reference owned by the external category
/// subsystem; this core never dereferences it. Unpublished content is
/// invisible to enrollment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Content {
    pub id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub estimated_minutes: i64,
    pub thumbnail_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
