//! Views
//!
//! Decides which top-level screen is shown for the current path and session.
//!
//! ## Architecture
//!
//! - **resolve**: pure policy from (path, session) to view plus optional rewrite
//! - **ViewController**: applies the policy whenever the router or gate changes

mod controller;
mod resolve;

pub use controller::ViewController;
pub use resolve::{resolve, Resolution, View};
