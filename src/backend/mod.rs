//! Backend Collaborators
//!
//! The hosted data/auth/storage service the site depends on, specified at
//! its boundary.
//!
//! ## Architecture
//!
//! - **BackendClient**: shared HTTP transport (anon key + session bearer)
//! - **AuthService**: session lookup, sign-in/out and change notifications
//! - **ContentStore**: filtered, ordered selects and row writes on named collections
//! - **ImageStore**: pass-through image uploads to a public bucket
//! - **memory**: in-process implementations of all three contracts

mod auth;
mod client;
mod error;
pub mod memory;
mod rest;
mod storage;
mod store;

pub use auth::{
    AuthError, AuthEvent, AuthService, MemoryPersistence, Session, SessionPersistence,
    SleepFuture, SupabaseAuth, User, REFRESH_MARGIN_SECS,
};
pub use client::BackendClient;
pub use error::{BackendError, BackendResult};
pub use rest::{parse_content_range, query_string, RestStore};
pub use storage::{object_path, upload_image, BucketStore, ImageFolder, ImageStore};
pub use store::{fetch_all, fetch_optional, to_row, ContentStore, Direction, Filter, Order, Query, Table};

use std::rc::Rc;

use crate::config::BackendConfig;

/// The three collaborators wired to one backend project
#[derive(Clone)]
pub struct Backend {
    pub auth: Rc<dyn AuthService>,
    pub store: Rc<dyn ContentStore>,
    pub images: Rc<dyn ImageStore>,
}

impl Backend {
    /// Connect to the hosted project described by `config`
    pub fn connect(
        config: &BackendConfig,
        persistence: Box<dyn SessionPersistence>,
    ) -> BackendResult<Self> {
        let client = BackendClient::new(config)?;
        tracing::info!(url = %client.base_url(), "Using hosted backend");

        Ok(Self {
            auth: Rc::new(SupabaseAuth::new(client.clone(), persistence)),
            store: Rc::new(RestStore::new(client.clone())),
            images: Rc::new(BucketStore::new(client, config.storage_bucket.clone())),
        })
    }

    /// In-process backend with no accounts and empty collections
    pub fn in_memory() -> Self {
        Self {
            auth: Rc::new(memory::MemoryAuth::new()),
            store: Rc::new(memory::MemoryStore::new()),
            images: Rc::new(memory::MemoryImages::new()),
        }
    }
}
