//! Admin dashboard overview: sidebar sections and headline counts

use futures_util::future::try_join4;
use serde::Serialize;

use super::error::ContentResult;
use crate::backend::{ContentStore, Query, Table};

/// Sections of the admin dashboard sidebar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardSection {
    #[default]
    Overview,
    Blog,
    Executives,
    Messages,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 4] = [
        DashboardSection::Overview,
        DashboardSection::Blog,
        DashboardSection::Executives,
        DashboardSection::Messages,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DashboardSection::Overview => "overview",
            DashboardSection::Blog => "blog",
            DashboardSection::Executives => "executives",
            DashboardSection::Messages => "messages",
        }
    }

    /// Sidebar and header label
    pub fn label(&self) -> &'static str {
        match self {
            DashboardSection::Overview => "Overview",
            DashboardSection::Blog => "Blog Posts",
            DashboardSection::Executives => "Executives",
            DashboardSection::Messages => "Messages",
        }
    }
}

/// Headline numbers on the overview section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_posts: u64,
    pub published_posts: u64,
    pub executives: u64,
    pub unread_messages: u64,
}

impl DashboardStats {
    /// Run the four counts concurrently
    pub async fn load(store: &dyn ContentStore) -> ContentResult<Self> {
        let total = Query::from(Table::BlogPosts);
        let published = Query::from(Table::BlogPosts).eq("published", true);
        let executives = Query::from(Table::Executives);
        let unread = Query::from(Table::ContactMessages).eq("read", false);

        let (total_posts, published_posts, executives, unread_messages) = try_join4(
            store.count(&total),
            store.count(&published),
            store.count(&executives),
            store.count(&unread),
        )
        .await?;

        Ok(Self {
            total_posts,
            published_posts,
            executives,
            unread_messages,
        })
    }

    /// Unpublished posts
    pub fn drafts(&self) -> u64 {
        self.total_posts.saturating_sub(self.published_posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_counts() {
        let store = MemoryStore::new();
        for published in [true, false, true] {
            store
                .insert(Table::BlogPosts, json!({ "title": "t", "published": published }))
                .await
                .unwrap();
        }
        store.insert(Table::Executives, json!({ "name": "Ada" })).await.unwrap();
        store
            .insert(Table::ContactMessages, json!({ "name": "x", "read": true }))
            .await
            .unwrap();
        store.insert(Table::ContactMessages, json!({ "name": "y" })).await.unwrap();

        let stats = DashboardStats::load(&store).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_posts: 3,
                published_posts: 2,
                executives: 1,
                unread_messages: 1,
            }
        );
        assert_eq!(stats.drafts(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(DashboardStats::load(&store).await.is_err());
    }

    #[test]
    fn test_section_labels() {
        let labels: Vec<&str> = DashboardSection::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Overview", "Blog Posts", "Executives", "Messages"]);
        assert_eq!(DashboardSection::default(), DashboardSection::Overview);
    }
}
