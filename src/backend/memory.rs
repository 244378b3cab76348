//! In-Process Backend
//!
//! Collaborators with the same contracts as the hosted backend, kept in
//! memory. Used by the test suites and for working on the site without a
//! backend project.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::auth::{AuthError, AuthEvent, AuthService, Session, User};
use super::error::{BackendError, BackendResult};
use super::storage::ImageStore;
use super::store::{ContentStore, Direction, Query, Table};
use crate::notify::{Listeners, Subscription};

// ============================================
// Content
// ============================================

/// Rows held in memory, with the collection defaults the hosted schema applies
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<HashMap<Table, Vec<Value>>>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the service were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Snapshot of a collection in insertion order
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables.borrow().get(&table).cloned().unwrap_or_default()
    }

    fn check_available(&self) -> BackendResult<()> {
        if self.unavailable.get() {
            Err(BackendError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn matching(&self, query: &Query) -> Vec<Value> {
        let tables = self.tables.borrow();
        let rows = match tables.get(&query.table) {
            Some(rows) => rows,
            None => return Vec::new(),
        };

        rows.iter()
            .filter(|row| {
                query.filters.iter().all(|filter| {
                    row.get(&filter.column).unwrap_or(&Value::Null) == &filter.value
                })
            })
            .cloned()
            .collect()
    }
}

fn apply_defaults(table: Table, row: &mut Map<String, Value>) {
    let now = Utc::now().to_rfc3339();

    let mut defaults = vec![
        ("id", json!(uuid::Uuid::new_v4().to_string())),
        ("created_at", json!(now)),
    ];
    match table {
        Table::BlogPosts => defaults.extend([
            ("updated_at", json!(now)),
            ("read_time", json!("5 min read")),
            ("image_url", Value::Null),
            ("published", json!(false)),
        ]),
        Table::Executives => defaults.extend([
            ("image_url", Value::Null),
            ("order_index", json!(0)),
        ]),
        Table::ContactMessages => defaults.push(("read", json!(false))),
    }

    for (column, value) in defaults {
        row.entry(column.to_string()).or_insert(value);
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        // Nulls sort last, as in Postgres ascending order
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait(?Send)]
impl ContentStore for MemoryStore {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>> {
        self.check_available()?;
        let mut rows = self.matching(query);

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn count(&self, query: &Query) -> BackendResult<u64> {
        self.check_available()?;
        Ok(self.matching(query).len() as u64)
    }

    async fn insert(&self, table: Table, row: Value) -> BackendResult<()> {
        self.check_available()?;
        let mut row = match row {
            Value::Object(map) => map,
            other => {
                return Err(BackendError::Api {
                    status: 400,
                    message: format!("expected an object row, got {}", other),
                })
            }
        };

        apply_defaults(table, &mut row);
        self.tables
            .borrow_mut()
            .entry(table)
            .or_default()
            .push(Value::Object(row));
        Ok(())
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> BackendResult<()> {
        self.check_available()?;
        let patch = match patch {
            Value::Object(map) => map,
            other => {
                return Err(BackendError::Api {
                    status: 400,
                    message: format!("expected an object patch, got {}", other),
                })
            }
        };

        let mut tables = self.tables.borrow_mut();
        let target = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| row.get("id") == Some(&json!(id))));

        // Matching zero rows is not an error, as with the REST API
        if let Some(Value::Object(row)) = target {
            for (column, value) in patch {
                row.insert(column, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> BackendResult<()> {
        self.check_available()?;
        if let Some(rows) = self.tables.borrow_mut().get_mut(&table) {
            rows.retain(|row| row.get("id") != Some(&json!(id)));
        }
        Ok(())
    }
}

// ============================================
// Auth
// ============================================

/// How [`MemoryAuth::current_session`] behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLookup {
    /// Answer from the held session
    Normal,
    /// Fail as if the service were down
    Fail,
    /// Never answer
    Hang,
}

/// Password accounts and a single held session
pub struct MemoryAuth {
    accounts: RefCell<HashMap<String, String>>,
    current: RefCell<Option<Session>>,
    listeners: Listeners<AuthEvent>,
    lookup: Cell<SessionLookup>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self {
            accounts: RefCell::new(HashMap::new()),
            current: RefCell::new(None),
            listeners: Listeners::new(),
            lookup: Cell::new(SessionLookup::Normal),
        }
    }

    /// Builder form of [`add_account`](Self::add_account)
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.add_account(email, password);
        self
    }

    pub fn add_account(&self, email: &str, password: &str) {
        self.accounts
            .borrow_mut()
            .insert(email.to_string(), password.to_string());
    }

    /// Start out holding a session for `email`, as if restored from storage
    pub fn with_session(self, email: &str) -> Self {
        *self.current.borrow_mut() = Some(issue_session(email));
        self
    }

    pub fn set_lookup(&self, lookup: SessionLookup) {
        self.lookup.set(lookup);
    }

    /// Drop the held session as if it expired on the server
    pub fn expire(&self) {
        if self.current.borrow_mut().take().is_some() {
            self.listeners.notify(&AuthEvent::SignedOut);
        }
    }

    /// Currently held session
    pub fn session(&self) -> Option<Session> {
        self.current.borrow().clone()
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

fn issue_session(email: &str) -> Session {
    Session {
        access_token: uuid::Uuid::new_v4().to_string(),
        refresh_token: uuid::Uuid::new_v4().to_string(),
        expires_at: Utc::now() + Duration::hours(1),
        user: User {
            id: format!("user-{}", email),
            email: Some(email.to_string()),
        },
    }
}

#[async_trait(?Send)]
impl AuthService for MemoryAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        match self.lookup.get() {
            SessionLookup::Normal => Ok(self.current.borrow().clone()),
            SessionLookup::Fail => Err(AuthError::Backend(BackendError::Unavailable)),
            SessionLookup::Hang => futures_util::future::pending().await,
        }
    }

    fn subscribe(&self, listener: Box<dyn Fn(&AuthEvent)>) -> Subscription {
        self.listeners.subscribe(move |event: &AuthEvent| listener(event))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let valid = self.accounts.borrow().get(email).map(String::as_str) == Some(password);
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let session = issue_session(email);
        *self.current.borrow_mut() = Some(session.clone());
        self.listeners.notify(&AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.current.borrow_mut() = None;
        self.listeners.notify(&AuthEvent::SignedOut);
        Ok(())
    }
}

// ============================================
// Images
// ============================================

/// Upload record kept by [`MemoryImages`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub path: String,
    pub size: usize,
    pub content_type: String,
}

/// Image store that remembers what was uploaded
#[derive(Debug, Default)]
pub struct MemoryImages {
    uploads: RefCell<Vec<StoredImage>>,
}

impl MemoryImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<StoredImage> {
        self.uploads.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ImageStore for MemoryImages {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> BackendResult<()> {
        self.uploads.borrow_mut().push(StoredImage {
            path: path.to_string(),
            size: bytes.len(),
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://images/{}", path)
    }
}
