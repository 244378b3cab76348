//! Navigation
//!
//! Client-side routing for the site.
//!
//! ## Architecture
//!
//! - **Route**: fixed route table, matched in a documented priority order
//! - **History**: environment boundary (browser history or in-memory stack)
//! - **PathRouter**: observable current path, updated on push, replace and pop

mod history;
mod route;
mod router;

pub use history::{History, MemoryHistory};
pub use route::{
    post_path, Route, ADMIN_DASHBOARD_PATH, ADMIN_LOGIN_PATH, BLOG_PATH, HOME_PATH, POST_PREFIX,
};
pub use router::PathRouter;
