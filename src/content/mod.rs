//! Site Content
//!
//! Typed services over the content store for the public pages and the
//! admin dashboard.
//!
//! ## Architecture
//!
//! - **types**: records, form drafts and their validation
//! - **blog**: published-post reads, category filtering, post management
//! - **team**: executive profiles
//! - **inbox**: contact form submissions and the admin inbox
//! - **overview**: dashboard sections and headline counts
//! - **error**: `ContentError`

pub mod blog;
pub mod error;
pub mod inbox;
pub mod overview;
pub mod team;
pub mod types;

pub use blog::{categories, BlogManager, BlogService, CategoryFilter};
pub use error::{ContentError, ContentResult};
pub use inbox::{Inbox, MessageCounts, MessageFilter};
pub use overview::{DashboardSection, DashboardStats};
pub use team::{next_order_index, TeamManager};
pub use types::{
    slugify, BlogPost, BlogPostDraft, ContactMessage, Executive, ExecutiveDraft,
    NewContactMessage, DEFAULT_READ_TIME,
};
