//! UI Components
//!
//! Reusable building blocks shared by the pages.

mod link;
mod loading;
mod nav;
mod toast;

pub use link::Link;
pub use loading::{FullPageLoading, InlineLoading, Loading};
pub use nav::{SiteFooter, SiteHeader};
pub use toast::Toast;
