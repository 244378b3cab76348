//! Page Components

mod admin;
mod blog;
mod home;

pub use admin::{AdminDashboard, AdminLogin};
pub use blog::{BlogListing, BlogPostPage};
pub use home::Home;
