use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An ordered sub-unit of a [`Content`](crate::entities::Content).
///
/// For a fixed `content_id`, the set of `order_index` values is always exactly
/// `{0, 1, ..., n-1}`. The index is mutated only by the lesson sequencer in
/// `prx-db`; deleting a lesson renumbers its siblings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Lesson {
    pub id: String,
    pub content_id: String,
    pub title: String,
    pub body: String,
    pub order_index: i64,
    pub estimated_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
}
