//! Lesson repository — the sequencer keeping `order_index` contiguous.
//!
//! Invariant: for a fixed content item with `n` lessons, the stored
//! `order_index` values are exactly `{0, 1, ..., n-1}`. Insert, move, and
//! delete each run inside one transaction so a failure mid-shift rolls the
//! whole operation back and the sequence never ends up with a duplicate or
//! a gap. Operations on different content items are independent.

use chrono::Utc;

use prx_core::entities::Lesson;
use prx_core::ids::PREFIX_LESSON;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_i64, parse_datetime};
use crate::service::PraxisService;
use crate::updates::lesson::LessonUpdate;

const SELECT_COLS: &str = "id, content_id, title, body, order_index, estimated_minutes, created_at";

/// Fields for creating a lesson.
#[derive(Debug, Clone, Default)]
pub struct NewLesson {
    pub title: String,
    pub body: String,
    /// Position among siblings. Omitted: append after the current last lesson.
    /// Explicit: must lie in `[0, n]`; a value `< n` opens a hole by shifting
    /// the lessons at and after it up by one.
    pub order_index: Option<i64>,
    pub estimated_minutes: Option<i64>,
}

fn row_to_lesson(row: &libsql::Row) -> Result<Lesson, DatabaseError> {
    Ok(Lesson {
        id: row.get(0)?,
        content_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        order_index: row.get(4)?,
        estimated_minutes: get_opt_i64(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// Fetch a lesson inside the given connection/transaction, or `NotFound`.
async fn fetch_lesson(conn: &libsql::Connection, id: &str) -> Result<Lesson, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM lessons WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
        entity: "lesson",
        id: id.to_string(),
    })?;
    row_to_lesson(&row)
}

/// `1 + max(order_index)` over the content's lessons, or 0 if none exist.
/// Under the contiguity invariant this equals the lesson count.
async fn next_order_index(
    conn: &libsql::Connection,
    content_id: &str,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT COALESCE(MAX(order_index), -1) + 1 FROM lessons WHERE content_id = ?1",
            [content_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

impl PraxisService {
    /// Create a lesson for a content item.
    ///
    /// Without an explicit index the lesson is appended at the end (no
    /// siblings move). An explicit index equal to the lesson count also
    /// appends; anything smaller shifts the trailing siblings up by one
    /// first, so the sequence stays contiguous either way.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::NotFound` if the content does not exist.
    /// - `DatabaseError::InvalidArgument` if an explicit index is outside `[0, n]`.
    pub async fn create_lesson(
        &self,
        content_id: &str,
        new: NewLesson,
    ) -> Result<Lesson, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_LESSON).await?;

        let tx = self.db().conn().transaction().await?;

        {
            let mut rows = tx
                .query("SELECT id FROM contents WHERE id = ?1", [content_id])
                .await?;
            if rows.next().await?.is_none() {
                return Err(DatabaseError::NotFound {
                    entity: "content",
                    id: content_id.to_string(),
                });
            }
        }

        let next_index = next_order_index(&tx, content_id).await?;
        let order_index = match new.order_index {
            None => next_index,
            Some(idx) => {
                if idx < 0 || idx > next_index {
                    return Err(DatabaseError::InvalidArgument(format!(
                        "order index {idx} outside [0, {next_index}]"
                    )));
                }
                if idx < next_index {
                    tx.execute(
                        "UPDATE lessons SET order_index = order_index + 1 \
                         WHERE content_id = ?1 AND order_index >= ?2",
                        libsql::params![content_id, idx],
                    )
                    .await?;
                }
                idx
            }
        };

        tx.execute(
            &format!(
                "INSERT INTO lessons ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            libsql::params![
                id.as_str(),
                content_id,
                new.title.as_str(),
                new.body.as_str(),
                order_index,
                new.estimated_minutes,
                now.to_rfc3339()
            ],
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(lesson = id.as_str(), content = content_id, index = order_index, "created lesson");

        Ok(Lesson {
            id,
            content_id: content_id.to_string(),
            title: new.title,
            body: new.body,
            order_index,
            estimated_minutes: new.estimated_minutes,
            created_at: now,
        })
    }

    /// Get a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no such lesson exists.
    pub async fn get_lesson(&self, id: &str) -> Result<Lesson, DatabaseError> {
        fetch_lesson(self.db().conn(), id).await
    }

    /// Lessons of a content item, ordered by `order_index`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_lessons(&self, content_id: &str) -> Result<Vec<Lesson>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM lessons \
                     WHERE content_id = ?1 ORDER BY order_index"
                ),
                [content_id],
            )
            .await?;

        let mut lessons = Vec::new();
        while let Some(row) = rows.next().await? {
            lessons.push(row_to_lesson(&row)?);
        }
        Ok(lessons)
    }

    /// Partially update a lesson. Only `Some` fields change.
    ///
    /// A present `order_index` that differs from the current one triggers the
    /// move algorithm: the siblings between the two positions shift by one
    /// toward the vacated slot, every index outside that window stays put,
    /// and the moved lesson lands on the target. Shift and placement commit
    /// together.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::NotFound` if the lesson does not exist.
    /// - `DatabaseError::InvalidArgument` if the target index is outside `[0, n-1]`.
    pub async fn update_lesson(
        &self,
        lesson_id: &str,
        update: LessonUpdate,
    ) -> Result<Lesson, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let existing = fetch_lesson(&tx, lesson_id).await?;

        if let Some(new_index) = update.order_index {
            let old_index = existing.order_index;
            if new_index != old_index {
                let count = next_order_index(&tx, &existing.content_id).await?;
                if new_index < 0 || new_index >= count {
                    return Err(DatabaseError::InvalidArgument(format!(
                        "order index {new_index} outside [0, {}]",
                        count - 1
                    )));
                }
                if new_index > old_index {
                    // Moving down: pull the window (old, new] up by one.
                    tx.execute(
                        "UPDATE lessons SET order_index = order_index - 1 \
                         WHERE content_id = ?1 AND order_index > ?2 AND order_index <= ?3",
                        libsql::params![existing.content_id.as_str(), old_index, new_index],
                    )
                    .await?;
                } else {
                    // Moving up: push the window [new, old) down by one.
                    tx.execute(
                        "UPDATE lessons SET order_index = order_index + 1 \
                         WHERE content_id = ?1 AND order_index >= ?2 AND order_index < ?3",
                        libsql::params![existing.content_id.as_str(), new_index, old_index],
                    )
                    .await?;
                }
                tracing::debug!(
                    lesson = lesson_id,
                    from = old_index,
                    to = new_index,
                    "moved lesson"
                );
            }
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.clone().into());
            idx += 1;
        }
        if let Some(ref body) = update.body {
            sets.push(format!("body = ?{idx}"));
            params.push(body.clone().into());
            idx += 1;
        }
        if let Some(order_index) = update.order_index {
            sets.push(format!("order_index = ?{idx}"));
            params.push(order_index.into());
            idx += 1;
        }
        if let Some(estimated_minutes) = update.estimated_minutes {
            sets.push(format!("estimated_minutes = ?{idx}"));
            params.push(estimated_minutes.map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        if sets.is_empty() {
            return Ok(existing);
        }

        params.push(lesson_id.into());
        let sql = format!("UPDATE lessons SET {} WHERE id = ?{idx}", sets.join(", "));
        tx.execute(&sql, libsql::params_from_iter(params)).await?;

        let updated = fetch_lesson(&tx, lesson_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a lesson and renumber its trailing siblings down by one.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the lesson does not exist.
    pub async fn delete_lesson(&self, lesson_id: &str) -> Result<(), DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let existing = fetch_lesson(&tx, lesson_id).await?;

        tx.execute("DELETE FROM lessons WHERE id = ?1", [lesson_id])
            .await?;
        tx.execute(
            "UPDATE lessons SET order_index = order_index - 1 \
             WHERE content_id = ?1 AND order_index > ?2",
            libsql::params![existing.content_id.as_str(), existing.order_index],
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(
            lesson = lesson_id,
            content = existing.content_id.as_str(),
            index = existing.order_index,
            "deleted lesson"
        );
        Ok(())
    }
}
