//! Enrollment repository — the ledger keeping progress consistent with
//! completion facts.
//!
//! Enrollment and completion are both idempotent: repeating either request
//! converges on the same stored state instead of erroring. Completing a
//! lesson re-derives the enrollment's percentage from the durable completion
//! facts inside the same transaction, so two racing completions for one
//! learner cannot persist a stale percentage.

use chrono::Utc;

use prx_core::entities::{CompletionReceipt, Enrollment};
use prx_core::enums::EnrollmentStatus;
use prx_core::ids::{PREFIX_COMPLETION, PREFIX_ENROLLMENT};
use prx_core::progress::progress;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::PraxisService;

const SELECT_COLS: &str =
    "id, learner_id, content_id, status, progress_percentage, started_at, completed_at";

fn row_to_enrollment(row: &libsql::Row) -> Result<Enrollment, DatabaseError> {
    Ok(Enrollment {
        id: row.get(0)?,
        learner_id: row.get(1)?,
        content_id: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        progress_percentage: row.get(4)?,
        started_at: parse_datetime(&row.get::<String>(5)?)?,
        completed_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
    })
}

/// Fetch the enrollment for a learner/content pair, if any.
async fn fetch_enrollment(
    conn: &libsql::Connection,
    learner_id: &str,
    content_id: &str,
) -> Result<Option<Enrollment>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM enrollments \
                 WHERE learner_id = ?1 AND content_id = ?2"
            ),
            [learner_id, content_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_enrollment(&row)?)),
        None => Ok(None),
    }
}

/// Count a scalar inside the given connection/transaction.
async fn count_scalar(
    conn: &libsql::Connection,
    sql: &str,
    params: impl libsql::params::IntoParams,
) -> Result<i64, DatabaseError> {
    let mut rows = conn.query(sql, params).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

impl PraxisService {
    /// Enroll a learner in a published content item.
    ///
    /// Idempotent: if an enrollment already exists for the pair, it is
    /// returned unchanged with `false`. A fresh enrollment starts at
    /// `in_progress` / 0% and is returned with `true`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the content does not exist or is
    /// not published.
    pub async fn enroll(
        &self,
        learner_id: &str,
        content_id: &str,
    ) -> Result<(Enrollment, bool), DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ENROLLMENT).await?;

        let tx = self.db().conn().transaction().await?;

        // Unpublished content is indistinguishable from absent content here.
        let published = {
            let mut rows = tx
                .query("SELECT published FROM contents WHERE id = ?1", [content_id])
                .await?;
            match rows.next().await? {
                Some(row) => row.get::<i64>(0)? != 0,
                None => false,
            }
        };
        if !published {
            return Err(DatabaseError::NotFound {
                entity: "content",
                id: content_id.to_string(),
            });
        }

        if let Some(existing) = fetch_enrollment(&tx, learner_id, content_id).await? {
            tx.commit().await?;
            return Ok((existing, false));
        }

        tx.execute(
            &format!(
                "INSERT INTO enrollments ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, 'in_progress', 0, ?4, NULL)"
            ),
            libsql::params![id.as_str(), learner_id, content_id, now.to_rfc3339()],
        )
        .await?;
        tx.commit().await?;
        tracing::debug!(learner = learner_id, content = content_id, "enrolled");

        Ok((
            Enrollment {
                id,
                learner_id: learner_id.to_string(),
                content_id: content_id.to_string(),
                status: EnrollmentStatus::InProgress,
                progress_percentage: 0,
                started_at: now,
                completed_at: None,
            },
            true,
        ))
    }

    /// Mark a lesson complete for a learner and recompute their enrollment.
    ///
    /// One transaction covers the whole sequence: resolve the lesson, require
    /// an enrollment in its content, record the completion fact (`ON CONFLICT
    /// DO NOTHING` — repeats are a no-op), recount, and write the derived
    /// percentage/status back. `completed_at` is set once, on the transition
    /// to 100%, and never reverts.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::NotFound` if the lesson does not exist.
    /// - `DatabaseError::Forbidden` if the learner is not enrolled in the
    ///   lesson's content; no completion row is written in that case.
    pub async fn complete_lesson(
        &self,
        learner_id: &str,
        lesson_id: &str,
    ) -> Result<CompletionReceipt, DatabaseError> {
        let now = Utc::now();
        let completion_id = self.db().generate_id(PREFIX_COMPLETION).await?;

        let tx = self.db().conn().transaction().await?;

        let content_id = {
            let mut rows = tx
                .query("SELECT content_id FROM lessons WHERE id = ?1", [lesson_id])
                .await?;
            match rows.next().await? {
                Some(row) => row.get::<String>(0)?,
                None => {
                    return Err(DatabaseError::NotFound {
                        entity: "lesson",
                        id: lesson_id.to_string(),
                    });
                }
            }
        };

        let Some(enrollment) = fetch_enrollment(&tx, learner_id, &content_id).await? else {
            return Err(DatabaseError::Forbidden(format!(
                "learner {learner_id} is not enrolled in content {content_id}"
            )));
        };

        tx.execute(
            "INSERT INTO lesson_completions (id, learner_id, lesson_id, completed_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (learner_id, lesson_id) DO NOTHING",
            libsql::params![
                completion_id.as_str(),
                learner_id,
                lesson_id,
                now.to_rfc3339()
            ],
        )
        .await?;

        let total = count_scalar(
            &tx,
            "SELECT COUNT(*) FROM lessons WHERE content_id = ?1",
            [content_id.as_str()],
        )
        .await?;
        let completed = count_scalar(
            &tx,
            "SELECT COUNT(*) FROM lesson_completions c \
             JOIN lessons l ON l.id = c.lesson_id \
             WHERE c.learner_id = ?1 AND l.content_id = ?2",
            [learner_id, content_id.as_str()],
        )
        .await?;

        let (percentage, is_complete) = progress(completed, total);
        let status = if is_complete {
            EnrollmentStatus::Completed
        } else {
            EnrollmentStatus::InProgress
        };
        // Set once on the transition to complete; an earlier value sticks.
        let completed_at = if is_complete {
            Some(enrollment.completed_at.unwrap_or(now))
        } else {
            enrollment.completed_at
        };

        tx.execute(
            "UPDATE enrollments SET progress_percentage = ?1, status = ?2, completed_at = ?3 \
             WHERE id = ?4",
            libsql::params![
                percentage,
                status.as_str(),
                completed_at.map(|dt| dt.to_rfc3339()),
                enrollment.id.as_str()
            ],
        )
        .await?;

        tx.commit().await?;
        if is_complete && enrollment.status != EnrollmentStatus::Completed {
            tracing::debug!(learner = learner_id, content = content_id.as_str(), "content completed");
        }

        Ok(CompletionReceipt {
            lesson_id: lesson_id.to_string(),
            progress_percentage: percentage,
            is_complete,
        })
    }

    /// Get the enrollment for a learner/content pair.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the learner is not enrolled.
    pub async fn get_enrollment(
        &self,
        learner_id: &str,
        content_id: &str,
    ) -> Result<Enrollment, DatabaseError> {
        fetch_enrollment(self.db().conn(), learner_id, content_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "enrollment",
                id: format!("{learner_id}/{content_id}"),
            })
    }

    /// All enrollments of a learner, most recently started first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_enrollments(
        &self,
        learner_id: &str,
    ) -> Result<Vec<Enrollment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM enrollments \
                     WHERE learner_id = ?1 ORDER BY started_at DESC"
                ),
                [learner_id],
            )
            .await?;

        let mut enrollments = Vec::new();
        while let Some(row) = rows.next().await? {
            enrollments.push(row_to_enrollment(&row)?);
        }
        Ok(enrollments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::content::NewContent;
    use crate::test_support::helpers::{published_content, seed_lessons, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn enroll_creates_single_row() {
        let svc = test_service().await;
        let content = published_content(&svc, "Rust Basics").await;

        let (enrollment, created) = svc.enroll("usr_1", &content.id).await.unwrap();
        assert!(created);
        assert!(enrollment.id.starts_with("enr-"));
        assert_eq!(enrollment.status, EnrollmentStatus::InProgress);
        assert_eq!(enrollment.progress_percentage, 0);
        assert_eq!(enrollment.completed_at, None);
    }

    #[tokio::test]
    async fn enroll_is_idempotent() {
        let svc = test_service().await;
        let content = published_content(&svc, "Rust Basics").await;

        let (first, created_first) = svc.enroll("usr_1", &content.id).await.unwrap();
        let (second, created_second) = svc.enroll("usr_1", &content.id).await.unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first, second);

        let all = svc.list_enrollments("usr_1").await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn enroll_unpublished_content_is_not_found() {
        let svc = test_service().await;
        let draft = svc
            .create_content(NewContent {
                title: "Draft".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let result = svc.enroll("usr_1", &draft.id).await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "content", .. })
        ));
    }

    #[tokio::test]
    async fn enroll_missing_content_is_not_found() {
        let svc = test_service().await;
        let result = svc.enroll("usr_1", "cnt-missing").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn complete_lesson_without_enrollment_is_forbidden() {
        let svc = test_service().await;
        let content = published_content(&svc, "Rust Basics").await;
        let lessons = seed_lessons(&svc, &content.id, 2).await;

        let result = svc.complete_lesson("usr_1", &lessons[0].id).await;
        assert!(matches!(result, Err(DatabaseError::Forbidden(_))));

        // No completion fact may be written on the forbidden path.
        let count = count_scalar(
            svc.db().conn(),
            "SELECT COUNT(*) FROM lesson_completions",
            (),
        )
        .await
        .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn complete_missing_lesson_is_not_found() {
        let svc = test_service().await;
        let result = svc.complete_lesson("usr_1", "lsn-missing").await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "lesson", .. })
        ));
    }

    #[tokio::test]
    async fn progress_walks_to_completion() {
        let svc = test_service().await;
        let content = published_content(&svc, "Rust Basics").await;
        let lessons = seed_lessons(&svc, &content.id, 3).await;
        svc.enroll("usr_1", &content.id).await.unwrap();

        let first = svc.complete_lesson("usr_1", &lessons[0].id).await.unwrap();
        assert_eq!(first.progress_percentage, 33);
        assert!(!first.is_complete);

        let second = svc.complete_lesson("usr_1", &lessons[1].id).await.unwrap();
        assert_eq!(second.progress_percentage, 67);
        assert!(!second.is_complete);

        // Still in progress: completed_at must stay empty.
        let mid = svc.get_enrollment("usr_1", &content.id).await.unwrap();
        assert_eq!(mid.status, EnrollmentStatus::InProgress);
        assert_eq!(mid.completed_at, None);

        let last = svc.complete_lesson("usr_1", &lessons[2].id).await.unwrap();
        assert_eq!(last.progress_percentage, 100);
        assert!(last.is_complete);

        let done = svc.get_enrollment("usr_1", &content.id).await.unwrap();
        assert_eq!(done.status, EnrollmentStatus::Completed);
        assert_eq!(done.progress_percentage, 100);
        assert!(done.completed_at.is_some());
    }

    #[tokio::test]
    async fn completion_is_idempotent() {
        let svc = test_service().await;
        let content = published_content(&svc, "Rust Basics").await;
        let lessons = seed_lessons(&svc, &content.id, 2).await;
        svc.enroll("usr_1", &content.id).await.unwrap();

        let first = svc.complete_lesson("usr_1", &lessons[0].id).await.unwrap();
        let repeat = svc.complete_lesson("usr_1", &lessons[0].id).await.unwrap();

        assert_eq!(first.progress_percentage, 50);
        assert_eq!(repeat.progress_percentage, 50);

        let count = count_scalar(
            svc.db().conn(),
            "SELECT COUNT(*) FROM lesson_completions WHERE learner_id = 'usr_1'",
            (),
        )
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn recompleting_finished_content_preserves_completed_at() {
        let svc = test_service().await;
        let content = published_content(&svc, "Rust Basics").await;
        let lessons = seed_lessons(&svc, &content.id, 1).await;
        svc.enroll("usr_1", &content.id).await.unwrap();

        svc.complete_lesson("usr_1", &lessons[0].id).await.unwrap();
        let first = svc.get_enrollment("usr_1", &content.id).await.unwrap();

        let receipt = svc.complete_lesson("usr_1", &lessons[0].id).await.unwrap();
        assert!(receipt.is_complete);

        let second = svc.get_enrollment("usr_1", &content.id).await.unwrap();
        assert_eq!(first.completed_at, second.completed_at);
        assert_eq!(second.status, EnrollmentStatus::Completed);
    }

    #[tokio::test]
    async fn learners_progress_independently() {
        let svc = test_service().await;
        let content = published_content(&svc, "Rust Basics").await;
        let lessons = seed_lessons(&svc, &content.id, 2).await;
        svc.enroll("usr_1", &content.id).await.unwrap();
        svc.enroll("usr_2", &content.id).await.unwrap();

        svc.complete_lesson("usr_1", &lessons[0].id).await.unwrap();

        let first = svc.get_enrollment("usr_1", &content.id).await.unwrap();
        let second = svc.get_enrollment("usr_2", &content.id).await.unwrap();
        assert_eq!(first.progress_percentage, 50);
        assert_eq!(second.progress_percentage, 0);
    }

    #[tokio::test]
    async fn list_enrollments_returns_all_for_learner() {
        let svc = test_service().await;
        let a = published_content(&svc, "Course A").await;
        let b = published_content(&svc, "Course B").await;

        svc.enroll("usr_1", &a.id).await.unwrap();
        svc.enroll("usr_1", &b.id).await.unwrap();
        svc.enroll("usr_2", &a.id).await.unwrap();

        let all = svc.list_enrollments("usr_1").await.unwrap();
        assert_eq!(all.len(), 2);
        let ids: Vec<&str> = all.iter().map(|e| e.content_id.as_str()).collect();
        assert!(ids.contains(&a.id.as_str()));
        assert!(ids.contains(&b.id.as_str()));
    }
}
