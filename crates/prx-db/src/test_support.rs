//! Shared test utilities for prx-db tests.

#[cfg(test)]
pub(crate) mod helpers {
    use prx_core::entities::{Content, Lesson};

    use crate::repos::content::NewContent;
    use crate::repos::lesson::NewLesson;
    use crate::service::PraxisService;

    /// Create an in-memory service (migrations run on open).
    pub async fn test_service() -> PraxisService {
        PraxisService::new_local(":memory:").await.unwrap()
    }

    /// Create a published content item with the given title (slug derives
    /// from it, so titles must be unique within one test).
    pub async fn published_content(svc: &PraxisService, title: &str) -> Content {
        svc.create_content(NewContent {
            title: title.to_string(),
            description: "test content".to_string(),
            published: true,
            ..Default::default()
        })
        .await
        .unwrap()
    }

    /// Append `count` lessons titled `L0..L{count-1}`, returned in order.
    pub async fn seed_lessons(svc: &PraxisService, content_id: &str, count: usize) -> Vec<Lesson> {
        let mut lessons = Vec::with_capacity(count);
        for i in 0..count {
            let lesson = svc
                .create_lesson(
                    content_id,
                    NewLesson {
                        title: format!("L{i}"),
                        body: format!("body of lesson {i}"),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            lessons.push(lesson);
        }
        lessons
    }

    /// Lesson titles ordered by `order_index`.
    pub async fn titles_in_order(svc: &PraxisService, content_id: &str) -> Vec<String> {
        svc.list_lessons(content_id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect()
    }

    /// Assert the content's lesson indices are exactly `0..n-1` in order.
    pub async fn assert_contiguous(svc: &PraxisService, content_id: &str) {
        let lessons = svc.list_lessons(content_id).await.unwrap();
        let indices: Vec<i64> = lessons.iter().map(|l| l.order_index).collect();
        let expected: Vec<i64> = (0..lessons.len() as i64).collect();
        assert_eq!(
            indices, expected,
            "lesson order indices must be a gap-free 0-based sequence"
        );
    }
}
