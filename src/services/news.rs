use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::errors::AppError;
use crate::models::NewsPost;

/// Fields of a news post that can change after creation.
#[derive(Debug, Clone, Default)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub highlight: Option<bool>,
}

/// Announcement posts shown on the public site. Session-scoped: seeded
/// with the standing announcement, newest first.
pub struct NewsService {
    clock: Arc<dyn Clock>,
    posts: Vec<NewsPost>,
}

impl NewsService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let seed = NewsPost {
            id: Uuid::new_v4().to_string(),
            title: "New Hair Treatment Available".to_string(),
            content: "Introducing our latest deep-conditioning hair treatment. \
                      Book your appointment today!"
                .to_string(),
            highlight: true,
            created_at: clock.now(),
        };
        Self {
            clock,
            posts: vec![seed],
        }
    }

    pub fn list(&self) -> &[NewsPost] {
        &self.posts
    }

    pub fn create(&mut self, title: &str, content: &str, highlight: bool) -> Result<NewsPost, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::validation("a news post needs a title"));
        }
        let post = NewsPost {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            highlight,
            created_at: self.clock.now(),
        };
        info!(id = %post.id, "news post created");
        self.posts.insert(0, post.clone());
        Ok(post)
    }

    pub fn update(&mut self, id: &str, patch: NewsPatch) -> Result<&NewsPost, AppError> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("news post {id}")))?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(highlight) = patch.highlight {
            post.highlight = highlight;
        }
        Ok(post)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != id);
        if self.posts.len() == before {
            return Err(AppError::not_found(format!("news post {id}")));
        }
        info!(id = %id, "news post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDateTime;

    fn service() -> NewsService {
        let now = NaiveDateTime::parse_from_str("2025-03-10 12:00", "%Y-%m-%d %H:%M").unwrap();
        NewsService::new(Arc::new(FixedClock(now)))
    }

    #[test]
    fn starts_with_the_standing_announcement() {
        let news = service();
        assert_eq!(news.list().len(), 1);
        assert!(news.list()[0].highlight);
    }

    #[test]
    fn create_prepends_the_new_post() {
        let mut news = service();
        let post = news.create("Spring hours", "Open late on Fridays.", false).unwrap();
        assert_eq!(news.list()[0].id, post.id);
        assert_eq!(news.list().len(), 2);

        assert!(matches!(
            news.create("  ", "body", false),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn update_patches_only_provided_fields() {
        let mut news = service();
        let id = news.list()[0].id.clone();
        let updated = news
            .update(
                &id,
                NewsPatch {
                    highlight: Some(false),
                    ..NewsPatch::default()
                },
            )
            .unwrap();
        assert!(!updated.highlight);
        assert_eq!(updated.title, "New Hair Treatment Available");
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut news = service();
        assert!(matches!(
            news.update("missing", NewsPatch::default()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(news.delete("missing"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn delete_removes_the_post() {
        let mut news = service();
        let id = news.list()[0].id.clone();
        news.delete(&id).unwrap();
        assert!(news.list().is_empty());
    }
}
