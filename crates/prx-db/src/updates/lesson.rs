//! Lesson update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LessonUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Target position among siblings. Triggers the move algorithm when it
    /// differs from the lesson's current index. Must lie in `[0, n-1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<Option<i64>>,
}

pub struct LessonUpdateBuilder(LessonUpdate);

impl LessonUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(LessonUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.0.body = Some(body.into());
        self
    }

    #[must_use]
    pub const fn order_index(mut self, order_index: i64) -> Self {
        self.0.order_index = Some(order_index);
        self
    }

    #[must_use]
    pub const fn estimated_minutes(mut self, estimated_minutes: Option<i64>) -> Self {
        self.0.estimated_minutes = Some(estimated_minutes);
        self
    }

    #[must_use]
    pub fn build(self) -> LessonUpdate {
        self.0
    }
}
