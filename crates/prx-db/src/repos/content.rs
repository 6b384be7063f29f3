//! Content repository — the rows lessons and enrollments hang off.
//!
//! Full admin CRUD (forms, listing filters, category juggling) belongs to the
//! HTTP layer; this repo carries only what the sequencer and the enrollment
//! ledger need: create, point read, partial update, delete.

use chrono::Utc;

use prx_core::entities::Content;
use prx_core::enums::Difficulty;
use prx_core::ids::PREFIX_CONTENT;
use prx_core::progress::slugify;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::PraxisService;
use crate::updates::content::ContentUpdate;

const SELECT_COLS: &str = "id, category_id, title, slug, description, difficulty, \
                           estimated_minutes, thumbnail_url, published, created_at, updated_at";

/// Fields for creating a content item.
#[derive(Debug, Clone, Default)]
pub struct NewContent {
    pub category_id: Option<String>,
    pub title: String,
    /// Derived from `title` via `slugify` when absent.
    pub slug: Option<String>,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub estimated_minutes: i64,
    pub thumbnail_url: Option<String>,
    pub published: bool,
}

fn row_to_content(row: &libsql::Row) -> Result<Content, DatabaseError> {
    Ok(Content {
        id: row.get(0)?,
        category_id: get_opt_string(row, 1)?,
        title: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        difficulty: parse_enum(&row.get::<String>(5)?)?,
        estimated_minutes: row.get(6)?,
        thumbnail_url: get_opt_string(row, 7)?,
        published: row.get::<i64>(8)? != 0,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

impl PraxisService {
    /// Create a content item.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails (including a duplicate slug).
    pub async fn create_content(&self, new: NewContent) -> Result<Content, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CONTENT).await?;
        let slug = new.slug.unwrap_or_else(|| slugify(&new.title));
        let difficulty = new.difficulty.unwrap_or(Difficulty::Beginner);

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO contents ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                libsql::params![
                    id.as_str(),
                    new.category_id.as_deref(),
                    new.title.as_str(),
                    slug.as_str(),
                    new.description.as_str(),
                    difficulty.as_str(),
                    new.estimated_minutes,
                    new.thumbnail_url.as_deref(),
                    i64::from(new.published),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Content {
            id,
            category_id: new.category_id,
            title: new.title,
            slug,
            description: new.description,
            difficulty,
            estimated_minutes: new.estimated_minutes,
            thumbnail_url: new.thumbnail_url,
            published: new.published,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a content item by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no such content exists.
    pub async fn get_content(&self, id: &str) -> Result<Content, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM contents WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "content",
            id: id.to_string(),
        })?;
        row_to_content(&row)
    }

    /// Partially update a content item. Only `Some` fields change.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no such content exists.
    pub async fn update_content(
        &self,
        content_id: &str,
        update: ContentUpdate,
    ) -> Result<Content, DatabaseError> {
        // Existence check up front so an empty update still 404s correctly.
        let existing = self.get_content(content_id).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.clone().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().into());
            idx += 1;
        }
        if let Some(difficulty) = update.difficulty {
            sets.push(format!("difficulty = ?{idx}"));
            params.push(difficulty.as_str().into());
            idx += 1;
        }
        if let Some(estimated_minutes) = update.estimated_minutes {
            sets.push(format!("estimated_minutes = ?{idx}"));
            params.push(estimated_minutes.into());
            idx += 1;
        }
        if let Some(ref thumbnail_url) = update.thumbnail_url {
            sets.push(format!("thumbnail_url = ?{idx}"));
            params.push(thumbnail_url.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(published) = update.published {
            sets.push(format!("published = ?{idx}"));
            params.push(i64::from(published).into());
            idx += 1;
        }
        if let Some(ref category_id) = update.category_id {
            sets.push(format!("category_id = ?{idx}"));
            params.push(category_id.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        if sets.is_empty() {
            return Ok(existing);
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(content_id.into());
        let sql = format!("UPDATE contents SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_content(content_id).await
    }

    /// Delete a content item. Lessons and enrollments cascade through the
    /// foreign keys.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no such content exists.
    pub async fn delete_content(&self, content_id: &str) -> Result<(), DatabaseError> {
        // Existence check so the caller gets NotFound instead of a silent no-op.
        self.get_content(content_id).await?;
        self.db()
            .conn()
            .execute("DELETE FROM contents WHERE id = ?1", [content_id])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use crate::updates::content::ContentUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_content_roundtrip() {
        let svc = test_service().await;

        let content = svc
            .create_content(NewContent {
                title: "Intro to Rust".to_string(),
                description: "Ownership and borrowing".to_string(),
                difficulty: Some(Difficulty::Beginner),
                estimated_minutes: 90,
                published: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(content.id.starts_with("cnt-"));
        assert_eq!(content.slug, "intro-to-rust");
        assert!(content.published);

        let fetched = svc.get_content(&content.id).await.unwrap();
        assert_eq!(fetched, content);
    }

    #[tokio::test]
    async fn explicit_slug_wins_over_derived() {
        let svc = test_service().await;

        let content = svc
            .create_content(NewContent {
                title: "Intro to Rust".to_string(),
                slug: Some("rust-101".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(content.slug, "rust-101");
    }

    #[tokio::test]
    async fn duplicate_slug_rejected() {
        let svc = test_service().await;

        svc.create_content(NewContent {
            title: "Same".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        let result = svc
            .create_content(NewContent {
                title: "Same".to_string(),
                ..Default::default()
            })
            .await;
        assert!(result.is_err(), "duplicate slug should be rejected");
    }

    #[tokio::test]
    async fn update_content_partial() {
        let svc = test_service().await;

        let content = svc
            .create_content(NewContent {
                title: "Draft".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!content.published);

        let update = ContentUpdateBuilder::new()
            .published(true)
            .difficulty(Difficulty::Advanced)
            .build();
        let updated = svc.update_content(&content.id, update).await.unwrap();

        assert!(updated.published);
        assert_eq!(updated.difficulty, Difficulty::Advanced);
        assert_eq!(updated.title, "Draft");
    }

    #[tokio::test]
    async fn get_missing_content_is_not_found() {
        let svc = test_service().await;
        let result = svc.get_content("cnt-missing").await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "content", .. })
        ));
    }

    #[tokio::test]
    async fn delete_content_removes_row() {
        let svc = test_service().await;

        let content = svc
            .create_content(NewContent {
                title: "Ephemeral".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        svc.delete_content(&content.id).await.unwrap();
        let result = svc.get_content(&content.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
