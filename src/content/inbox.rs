//! Contact messages: public submission and the admin inbox

use serde::Serialize;
use serde_json::json;
use std::rc::Rc;

use super::error::ContentResult;
use super::types::{ContactMessage, NewContactMessage};
use crate::backend::{fetch_all, to_row, ContentStore, Direction, Query, Table};

/// Inbox tab selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl MessageFilter {
    pub const ALL: [MessageFilter; 3] = [MessageFilter::All, MessageFilter::Unread, MessageFilter::Read];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFilter::All => "all",
            MessageFilter::Unread => "unread",
            MessageFilter::Read => "read",
        }
    }

    pub fn matches(&self, message: &ContactMessage) -> bool {
        match self {
            MessageFilter::All => true,
            MessageFilter::Unread => !message.read,
            MessageFilter::Read => message.read,
        }
    }

    pub fn apply<'a>(&self, messages: &'a [ContactMessage]) -> Vec<&'a ContactMessage> {
        messages.iter().filter(|m| self.matches(m)).collect()
    }
}

impl std::str::FromStr for MessageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(MessageFilter::All),
            "unread" => Ok(MessageFilter::Unread),
            "read" => Ok(MessageFilter::Read),
            other => Err(format!("Unknown message filter: {}", other)),
        }
    }
}

/// Badge counts for the inbox tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageCounts {
    pub all: usize,
    pub unread: usize,
    pub read: usize,
}

impl MessageCounts {
    pub fn of(messages: &[ContactMessage]) -> Self {
        let unread = messages.iter().filter(|m| !m.read).count();
        Self {
            all: messages.len(),
            unread,
            read: messages.len() - unread,
        }
    }

    pub fn get(&self, filter: MessageFilter) -> usize {
        match filter {
            MessageFilter::All => self.all,
            MessageFilter::Unread => self.unread,
            MessageFilter::Read => self.read,
        }
    }
}

/// Reads and writes `contact_messages`
#[derive(Clone)]
pub struct Inbox {
    store: Rc<dyn ContentStore>,
}

impl Inbox {
    pub fn new(store: Rc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Store a visitor's message after validating it
    pub async fn submit(&self, message: &NewContactMessage) -> ContentResult<()> {
        message.validate()?;
        self.store
            .insert(Table::ContactMessages, to_row(message)?)
            .await?;
        tracing::info!("Contact message received");
        Ok(())
    }

    /// Every message, newest first
    pub async fn list(&self) -> ContentResult<Vec<ContactMessage>> {
        let query = Query::from(Table::ContactMessages).order_by("created_at", Direction::Descending);
        Ok(fetch_all(self.store.as_ref(), &query).await?)
    }

    /// Flip the read flag of `message`; returns the new value
    pub async fn toggle_read(&self, message: &ContactMessage) -> ContentResult<bool> {
        self.set_read(&message.id, !message.read).await?;
        Ok(!message.read)
    }

    pub async fn set_read(&self, id: &str, read: bool) -> ContentResult<()> {
        self.store
            .update(Table::ContactMessages, id, json!({ "read": read }))
            .await?;
        tracing::debug!(id = %id, read, "Marked message");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> ContentResult<()> {
        self.store.delete(Table::ContactMessages, id).await?;
        tracing::info!(id = %id, "Deleted message");
        Ok(())
    }
}
