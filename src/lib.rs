//! # Implexa
//!
//! Core of the Implexa website: a public marketing site with a blog and a
//! password-protected admin panel, backed by a hosted auth/content/storage
//! service.
//!
//! ## Modules
//!
//! - [`navigation`]: observable current path over a history environment
//! - [`session`]: administrator session gate
//! - [`view`]: view resolution policy and the controller that applies it
//! - [`backend`]: auth, content store and image storage collaborators
//! - [`content`]: blog, executives, messages and dashboard services
//! - [`config`]: TOML + environment configuration
//! - `server`, `telemetry`: the native site host (feature `server`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use implexa::{Backend, MemoryHistory, PathRouter, SessionGate, ViewController};
//! use std::rc::Rc;
//!
//! # async fn run() {
//! let backend = Backend::in_memory();
//! let router = PathRouter::new(Rc::new(MemoryHistory::new("/admin")));
//! let gate = SessionGate::new(backend.auth.clone());
//! let controller = ViewController::new(router, gate);
//!
//! // Bound the initial session lookup by any deadline future
//! controller.initialize(futures_util::future::pending()).await;
//! println!("showing {:?} at {}", controller.view(), controller.path());
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod content;
pub mod navigation;
pub mod notify;
pub mod session;
pub mod view;

#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "server")]
pub mod telemetry;

pub use backend::{AuthService, Backend, BackendError, ContentStore, ImageStore, Session};
pub use config::{Config, ConfigError, SiteConfig};
pub use content::{ContentError, ContentResult};
pub use navigation::{History, MemoryHistory, PathRouter, Route};
pub use notify::{Listeners, Subscription};
pub use session::{GateError, InitOutcome, SessionGate, SessionState};
pub use view::{resolve, Resolution, View, ViewController};
