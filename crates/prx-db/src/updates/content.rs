//! Content update builder.

use prx_core::enums::Difficulty;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
}

pub struct ContentUpdateBuilder(ContentUpdate);

impl ContentUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ContentUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.0.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub const fn estimated_minutes(mut self, estimated_minutes: i64) -> Self {
        self.0.estimated_minutes = Some(estimated_minutes);
        self
    }

    #[must_use]
    pub fn thumbnail_url(mut self, thumbnail_url: Option<String>) -> Self {
        self.0.thumbnail_url = Some(thumbnail_url);
        self
    }

    #[must_use]
    pub const fn published(mut self, published: bool) -> Self {
        self.0.published = Some(published);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Option<String>) -> Self {
        self.0.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn build(self) -> ContentUpdate {
        self.0
    }
}
