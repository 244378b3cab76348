//! Route Table
//!
//! Maps a location path to one of the site's fixed routes.

use serde::Serialize;
use std::fmt;

/// Public admin entry point (login form)
pub const ADMIN_LOGIN_PATH: &str = "/admin";
/// Protected admin dashboard
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
/// Blog listing
pub const BLOG_PATH: &str = "/blog";
/// Prefix of a post detail path; the remainder is the post id
pub const POST_PREFIX: &str = "/post/";
/// Marketing home page
pub const HOME_PATH: &str = "/";

/// A route the site knows how to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    AdminLogin,
    AdminDashboard,
    BlogListing,
    /// Post detail; the id is passed through exactly as it appeared in the path
    BlogPost(String),
}

impl Route {
    /// Match a path against the route table.
    ///
    /// Patterns are tried in this order, first match wins:
    ///
    /// 1. `/admin` (exact)
    /// 2. `/admin/dashboard` (exact)
    /// 3. `/blog` (exact)
    /// 4. `/post/<id>` (prefix; `<id>` is everything after the prefix, possibly empty)
    /// 5. anything else is the home page
    pub fn parse(path: &str) -> Self {
        if path == ADMIN_LOGIN_PATH {
            Route::AdminLogin
        } else if path == ADMIN_DASHBOARD_PATH {
            Route::AdminDashboard
        } else if path == BLOG_PATH {
            Route::BlogListing
        } else if let Some(id) = path.strip_prefix(POST_PREFIX) {
            Route::BlogPost(id.to_string())
        } else {
            Route::Home
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::AdminLogin => ADMIN_LOGIN_PATH.to_string(),
            Route::AdminDashboard => ADMIN_DASHBOARD_PATH.to_string(),
            Route::BlogListing => BLOG_PATH.to_string(),
            Route::BlogPost(id) => post_path(id),
        }
    }

    /// Whether the session gate has a say over this route
    pub fn is_admin(&self) -> bool {
        matches!(self, Route::AdminLogin | Route::AdminDashboard)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Path of the detail page for a post
pub fn post_path(id: &str) -> String {
    format!("{}{}", POST_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_routes() {
        assert_eq!(Route::parse("/admin"), Route::AdminLogin);
        assert_eq!(Route::parse("/admin/dashboard"), Route::AdminDashboard);
        assert_eq!(Route::parse("/blog"), Route::BlogListing);
        assert_eq!(Route::parse("/"), Route::Home);
    }

    #[test]
    fn test_post_id_extraction() {
        assert_eq!(Route::parse("/post/abc123"), Route::BlogPost("abc123".into()));
        assert_eq!(Route::parse("/post/"), Route::BlogPost(String::new()));
        // No validation of the remainder
        assert_eq!(Route::parse("/post/a/b?c"), Route::BlogPost("a/b?c".into()));
    }

    #[test]
    fn test_near_misses_fall_back_to_home() {
        for path in ["", "/admin/", "/Admin", "/admin/dashboard/", "/blog/", "/blogs", "/post", "/posts/1", "/about"] {
            assert_eq!(Route::parse(path), Route::Home, "path {:?}", path);
        }
    }

    #[test]
    fn test_path_round_trip() {
        for route in [
            Route::Home,
            Route::AdminLogin,
            Route::AdminDashboard,
            Route::BlogListing,
            Route::BlogPost("xyz".into()),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_admin_routes() {
        assert!(Route::AdminLogin.is_admin());
        assert!(Route::AdminDashboard.is_admin());
        assert!(!Route::BlogListing.is_admin());
        assert!(!Route::BlogPost("1".into()).is_admin());
    }
}
