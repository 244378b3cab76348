//! Blog content: public reads and the admin manager

use chrono::Utc;
use serde_json::json;
use std::rc::Rc;

use super::error::ContentResult;
use super::types::{BlogPost, BlogPostDraft};
use crate::backend::{
    fetch_all, fetch_optional, to_row, upload_image, ContentStore, Direction, ImageFolder,
    ImageStore, Query, Table,
};

fn newest_first() -> Query {
    Query::from(Table::BlogPosts).order_by("created_at", Direction::Descending)
}

// ============================================
// Public reads
// ============================================

/// Published posts as visitors see them
#[derive(Clone)]
pub struct BlogService {
    store: Rc<dyn ContentStore>,
}

impl BlogService {
    pub fn new(store: Rc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Every published post, newest first
    pub async fn published_posts(&self) -> ContentResult<Vec<BlogPost>> {
        let query = newest_first().eq("published", true);
        Ok(fetch_all(self.store.as_ref(), &query).await?)
    }

    /// The `n` newest published posts
    pub async fn latest(&self, n: usize) -> ContentResult<Vec<BlogPost>> {
        let query = newest_first().eq("published", true).limit(n);
        Ok(fetch_all(self.store.as_ref(), &query).await?)
    }

    /// A single published post
    ///
    /// Missing and unpublished posts both come back as `None`. An empty id
    /// is answered without a backend call.
    pub async fn published_post(&self, id: &str) -> ContentResult<Option<BlogPost>> {
        if id.is_empty() {
            return Ok(None);
        }
        let query = Query::from(Table::BlogPosts)
            .eq("id", id)
            .eq("published", true);
        Ok(fetch_optional(self.store.as_ref(), &query).await?)
    }
}

/// Distinct categories in the order they first appear
///
/// The blog listing shows these after an `"all"` chip.
pub fn categories(posts: &[BlogPost]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for post in posts {
        if !seen.iter().any(|c| c == &post.category) {
            seen.push(post.category.clone());
        }
    }
    seen
}

/// Category selection on the blog listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parse a chip value; `"all"` selects everything
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Named(name) => name,
        }
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => &post.category == name,
        }
    }

    /// Posts passing the filter, in their original order
    pub fn apply<'a>(&self, posts: &'a [BlogPost]) -> Vec<&'a BlogPost> {
        posts.iter().filter(|p| self.matches(p)).collect()
    }
}

// ============================================
// Admin
// ============================================

/// Blog post management for the admin dashboard
#[derive(Clone)]
pub struct BlogManager {
    store: Rc<dyn ContentStore>,
    images: Rc<dyn ImageStore>,
}

impl BlogManager {
    pub fn new(store: Rc<dyn ContentStore>, images: Rc<dyn ImageStore>) -> Self {
        Self { store, images }
    }

    /// Every post, drafts included, newest first
    pub async fn list(&self) -> ContentResult<Vec<BlogPost>> {
        Ok(fetch_all(self.store.as_ref(), &newest_first()).await?)
    }

    pub async fn create(&self, draft: &BlogPostDraft) -> ContentResult<()> {
        draft.validate()?;
        let row = to_row(draft)?;
        self.store.insert(Table::BlogPosts, row).await?;
        tracing::info!(slug = %draft.slug, published = draft.published, "Created blog post");
        Ok(())
    }

    /// Overwrite the editable fields of post `id` and stamp `updated_at`
    pub async fn update(&self, id: &str, draft: &BlogPostDraft) -> ContentResult<()> {
        draft.validate()?;
        let mut row = to_row(draft)?;
        row["updated_at"] = json!(Utc::now().to_rfc3339());
        self.store.update(Table::BlogPosts, id, row).await?;
        tracing::info!(id = %id, "Updated blog post");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> ContentResult<()> {
        self.store.delete(Table::BlogPosts, id).await?;
        tracing::info!(id = %id, "Deleted blog post");
        Ok(())
    }

    /// Flip the published flag of `post`; returns the new value
    pub async fn toggle_published(&self, post: &BlogPost) -> ContentResult<bool> {
        self.set_published(&post.id, !post.published).await?;
        Ok(!post.published)
    }

    pub async fn set_published(&self, id: &str, published: bool) -> ContentResult<()> {
        self.store
            .update(Table::BlogPosts, id, json!({ "published": published }))
            .await?;
        tracing::info!(id = %id, published, "Changed publication state");
        Ok(())
    }

    /// Upload a cover image under `blog/`; returns its public URL
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ContentResult<String> {
        Ok(upload_image(
            self.images.as_ref(),
            ImageFolder::Blog,
            file_name,
            bytes,
            content_type,
        )
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryImages, MemoryStore};
    use crate::content::ContentError;

    fn draft(title: &str, category: &str, published: bool) -> BlogPostDraft {
        BlogPostDraft {
            title: title.to_string(),
            slug: crate::content::slugify(title),
            excerpt: format!("About {}", title),
            content: "Body".to_string(),
            category: category.to_string(),
            published,
            ..Default::default()
        }
    }

    fn setup() -> (Rc<MemoryStore>, Rc<MemoryImages>, BlogManager, BlogService) {
        let store = Rc::new(MemoryStore::new());
        let images = Rc::new(MemoryImages::new());
        let manager = BlogManager::new(store.clone(), images.clone());
        let service = BlogService::new(store.clone());
        (store, images, manager, service)
    }

    async fn seed(manager: &BlogManager) {
        manager.create(&draft("First", "Research", true)).await.unwrap();
        manager.create(&draft("Second", "Draft", false)).await.unwrap();
        manager.create(&draft("Third", "Industry", true)).await.unwrap();
        manager.create(&draft("Fourth", "Research", true)).await.unwrap();
    }

    #[tokio::test]
    async fn test_public_reads_only_see_published() {
        let (_store, _images, manager, service) = setup();
        seed(&manager).await;

        let titles: Vec<String> = service
            .published_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles.len(), 3);
        assert!(!titles.contains(&"Second".to_string()));

        let latest = service.latest(2).await.unwrap();
        assert_eq!(latest.len(), 2);

        let all = manager.list().await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_published_post_lookup() {
        let (_store, _images, manager, service) = setup();
        seed(&manager).await;
        let all = manager.list().await.unwrap();
        let hidden = all.iter().find(|p| !p.published).unwrap();
        let visible = all.iter().find(|p| p.published).unwrap();

        assert_eq!(service.published_post(&hidden.id).await.unwrap(), None);
        assert_eq!(
            service.published_post(&visible.id).await.unwrap().map(|p| p.id),
            Some(visible.id.clone())
        );
        assert_eq!(service.published_post("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_id_skips_backend() {
        let (store, _images, _manager, service) = setup();
        store.set_unavailable(true);
        assert_eq!(service.published_post("").await.unwrap(), None);
        assert!(service.published_post("x").await.is_err());
    }

    #[tokio::test]
    async fn test_categories_and_filter() {
        let (_store, _images, manager, service) = setup();
        seed(&manager).await;
        let posts = service.published_posts().await.unwrap();

        let cats = categories(&posts);
        assert_eq!(cats.len(), 2);
        assert!(cats.contains(&"Research".to_string()));
        assert!(cats.contains(&"Industry".to_string()));

        let research = CategoryFilter::parse("Research");
        assert_eq!(research.apply(&posts).len(), 2);
        assert_eq!(CategoryFilter::parse("all").apply(&posts).len(), 3);
        assert_eq!(CategoryFilter::default(), CategoryFilter::All);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let post = |category: &str| BlogPost {
            id: category.to_string(),
            title: String::new(),
            slug: String::new(),
            excerpt: String::new(),
            content: String::new(),
            category: category.to_string(),
            read_time: String::new(),
            image_url: None,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let posts = vec![post("B"), post("A"), post("B"), post("C")];
        assert_eq!(categories(&posts), vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_update_toggle_delete() {
        let (store, _images, manager, _service) = setup();
        manager.create(&draft("Original", "News", false)).await.unwrap();
        let post = manager.list().await.unwrap().remove(0);

        let mut edit = BlogPostDraft::from(&post);
        edit.title = "Renamed".into();
        manager.update(&post.id, &edit).await.unwrap();
        let updated = manager.list().await.unwrap().remove(0);
        assert_eq!(updated.title, "Renamed");
        assert!(updated.updated_at >= post.updated_at);

        assert!(manager.toggle_published(&updated).await.unwrap());
        assert!(manager.list().await.unwrap()[0].published);

        manager.delete(&post.id).await.unwrap();
        assert!(store.rows(Table::BlogPosts).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let (store, _images, manager, _service) = setup();
        let mut bad = draft("Title", "News", true);
        bad.excerpt.clear();

        let err = manager.create(&bad).await.unwrap_err();
        assert!(matches!(err, ContentError::Validation { field: "excerpt", .. }));
        assert!(store.rows(Table::BlogPosts).is_empty());
    }

    #[tokio::test]
    async fn test_upload_image_into_blog_folder() {
        let (_store, images, manager, _service) = setup();
        let url = manager
            .upload_image("Cover.PNG", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        let uploads = images.uploads();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].path.starts_with("blog/"));
        assert!(uploads[0].path.ends_with(".png"));
        assert!(url.ends_with(&uploads[0].path));
    }
}
