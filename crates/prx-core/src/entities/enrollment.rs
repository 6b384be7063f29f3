use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EnrollmentStatus;

/// A learner's registration in, and progress through, a content item.
///
/// One row per `(learner_id, content_id)` pair, created idempotently on first
/// enroll. Invariant: `status == Completed` ⇔ `progress_percentage == 100` ⇔
/// `completed_at` is set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Enrollment {
    pub id: String,
    pub learner_id: String,
    pub content_id: String,
    pub status: EnrollmentStatus,
    pub progress_percentage: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A durable fact that a learner finished a specific lesson.
///
/// At most one row per `(learner_id, lesson_id)` pair; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LessonCompletion {
    pub id: String,
    pub learner_id: String,
    pub lesson_id: String,
    pub completed_at: DateTime<Utc>,
}

/// Result of marking a lesson complete, handed back to the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompletionReceipt {
    pub lesson_id: String,
    pub progress_percentage: i64,
    pub is_complete: bool,
}
