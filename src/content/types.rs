//! Content records and the drafts the admin forms edit
//!
//! - `BlogPost` / `BlogPostDraft`: articles shown on the blog pages
//! - `Executive` / `ExecutiveDraft`: leadership profiles for the About section
//! - `ContactMessage` / `NewContactMessage`: visitor messages from the contact form

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::error::{ContentError, ContentResult};

/// Read time a new post starts with
pub const DEFAULT_READ_TIME: &str = "5 min read";

// ============================================
// Blog posts
// ============================================

/// A row of `blog_posts`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// Body text; paragraphs separated by newlines
    pub content: String,
    pub category: String,
    pub read_time: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Body split into non-empty paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.lines().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// Editable fields of a blog post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPostDraft {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub read_time: String,
    #[serde(serialize_with = "blank_as_null")]
    pub image_url: Option<String>,
    pub published: bool,
}

impl Default for BlogPostDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            excerpt: String::new(),
            content: String::new(),
            category: String::new(),
            read_time: DEFAULT_READ_TIME.to_string(),
            image_url: None,
            published: false,
        }
    }
}

impl BlogPostDraft {
    /// Check that every required field is filled in
    pub fn validate(&self) -> ContentResult<()> {
        require("title", &self.title)?;
        require("slug", &self.slug)?;
        require("excerpt", &self.excerpt)?;
        require("content", &self.content)?;
        require("category", &self.category)?;
        require("read_time", &self.read_time)?;
        Ok(())
    }
}

impl From<&BlogPost> for BlogPostDraft {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            read_time: post.read_time.clone(),
            image_url: post.image_url.clone(),
            published: post.published,
        }
    }
}

static NON_ALNUM: OnceLock<Regex> = OnceLock::new();

/// URL slug suggested for a title, e.g. "Hello, World!" -> "hello-world"
pub fn slugify(title: &str) -> String {
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"));
    let lower = title.to_lowercase();
    re.replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

// ============================================
// Executives
// ============================================

/// A row of `executives`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Executive {
    pub id: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

/// Editable fields of an executive profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutiveDraft {
    pub name: String,
    pub title: String,
    pub bio: String,
    #[serde(serialize_with = "blank_as_null")]
    pub image_url: Option<String>,
    pub order_index: i32,
}

impl ExecutiveDraft {
    pub fn validate(&self) -> ContentResult<()> {
        require("name", &self.name)?;
        require("title", &self.title)?;
        require("bio", &self.bio)?;
        Ok(())
    }
}

impl From<&Executive> for ExecutiveDraft {
    fn from(executive: &Executive) -> Self {
        Self {
            name: executive.name.clone(),
            title: executive.title.clone(),
            bio: executive.bio.clone(),
            image_url: executive.image_url.clone(),
            order_index: executive.order_index,
        }
    }
}

// ============================================
// Contact messages
// ============================================

/// A row of `contact_messages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// What a visitor submits through the contact form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl NewContactMessage {
    pub fn validate(&self) -> ContentResult<()> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ContentError::Validation {
                field: "email",
                reason: "must be an email address".to_string(),
            });
        }
        require("message", &self.message)?;
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> ContentResult<()> {
    if value.trim().is_empty() {
        Err(ContentError::required(field))
    } else {
        Ok(())
    }
}

// Form inputs leave an empty string when no image was chosen
fn blank_as_null<S: serde::Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => serializer.serialize_some(url),
        _ => serializer.serialize_none(),
    }
}
