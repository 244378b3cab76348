//! View Resolution Policy
//!
//! Pure mapping from (path, session state) to the screen to render and an
//! optional URL rewrite.

use serde::Serialize;

use crate::navigation::{Route, ADMIN_DASHBOARD_PATH, ADMIN_LOGIN_PATH};
use crate::session::SessionState;

/// Top-level screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "post_id", rename_all = "snake_case")]
pub enum View {
    /// Session not yet known; render nothing that depends on it
    Loading,
    Home,
    AdminLogin,
    AdminDashboard,
    BlogListing,
    BlogPost(String),
}

impl View {
    /// Short name for logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            View::Loading => "loading",
            View::Home => "home",
            View::AdminLogin => "admin-login",
            View::AdminDashboard => "admin-dashboard",
            View::BlogListing => "blog-listing",
            View::BlogPost(_) => "blog-post",
        }
    }
}

/// Outcome of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub view: View,
    /// Path the location must be rewritten to, when it disagrees with the session
    pub rewrite: Option<&'static str>,
}

impl Resolution {
    fn render(view: View) -> Self {
        Self { view, rewrite: None }
    }

    fn redirect(view: View, to: &'static str) -> Self {
        Self {
            view,
            rewrite: Some(to),
        }
    }
}

/// Decide what to render for `path` given the session state
///
/// | path               | session       | view           | rewrite            |
/// |--------------------|---------------|----------------|--------------------|
/// | any                | loading       | Loading        | -                  |
/// | `/admin`           | authenticated | AdminDashboard | `/admin/dashboard` |
/// | `/admin`           | anonymous     | AdminLogin     | -                  |
/// | `/admin/dashboard` | anonymous     | AdminLogin     | `/admin`           |
/// | `/admin/dashboard` | authenticated | AdminDashboard | -                  |
/// | `/blog`            | any           | BlogListing    | -                  |
/// | `/post/<id>`       | any           | BlogPost(id)   | -                  |
/// | other              | any           | Home           | -                  |
pub fn resolve(path: &str, session: &SessionState) -> Resolution {
    if session.is_loading() {
        return Resolution::render(View::Loading);
    }
    let authenticated = session.is_authenticated();

    match Route::parse(path) {
        Route::AdminLogin if authenticated => {
            Resolution::redirect(View::AdminDashboard, ADMIN_DASHBOARD_PATH)
        }
        Route::AdminLogin => Resolution::render(View::AdminLogin),
        Route::AdminDashboard if authenticated => Resolution::render(View::AdminDashboard),
        Route::AdminDashboard => Resolution::redirect(View::AdminLogin, ADMIN_LOGIN_PATH),
        Route::BlogListing => Resolution::render(View::BlogListing),
        Route::BlogPost(id) => Resolution::render(View::BlogPost(id)),
        Route::Home => Resolution::render(View::Home),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Session, User};
    use chrono::Utc;

    fn authenticated() -> SessionState {
        SessionState::Authenticated(Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now(),
            user: User {
                id: "u1".into(),
                email: Some("admin@implexa.org".into()),
            },
        })
    }

    #[test]
    fn test_loading_masks_every_path() {
        for path in ["/", "/admin", "/admin/dashboard", "/blog", "/post/1", "/elsewhere"] {
            let resolution = resolve(path, &SessionState::Loading);
            assert_eq!(resolution.view, View::Loading, "path {}", path);
            assert_eq!(resolution.rewrite, None);
        }
    }

    #[test]
    fn test_admin_paths() {
        let r = resolve("/admin", &authenticated());
        assert_eq!(r.view, View::AdminDashboard);
        assert_eq!(r.rewrite, Some("/admin/dashboard"));

        let r = resolve("/admin", &SessionState::Anonymous);
        assert_eq!(r.view, View::AdminLogin);
        assert_eq!(r.rewrite, None);

        let r = resolve("/admin/dashboard", &SessionState::Anonymous);
        assert_eq!(r.view, View::AdminLogin);
        assert_eq!(r.rewrite, Some("/admin"));

        let r = resolve("/admin/dashboard", &authenticated());
        assert_eq!(r.view, View::AdminDashboard);
        assert_eq!(r.rewrite, None);
    }

    #[test]
    fn test_public_paths_ignore_session() {
        for session in [SessionState::Anonymous, authenticated()] {
            assert_eq!(resolve("/blog", &session), Resolution::render(View::BlogListing));
            assert_eq!(
                resolve("/post/abc123", &session),
                Resolution::render(View::BlogPost("abc123".into()))
            );
            assert_eq!(resolve("/", &session), Resolution::render(View::Home));
        }
    }

    #[test]
    fn test_unknown_paths_render_home() {
        for path in ["", "/about", "/admin/", "/admin/settings", "/blog/2024", "/post", "/#contact"] {
            for session in [SessionState::Anonymous, authenticated()] {
                assert_eq!(resolve(path, &session), Resolution::render(View::Home), "path {}", path);
            }
        }
    }

    #[test]
    fn test_rewrite_target_is_stable() {
        // Resolving at the rewrite target asks for no further rewrite
        for session in [SessionState::Anonymous, authenticated()] {
            for path in ["/admin", "/admin/dashboard"] {
                if let Some(target) = resolve(path, &session).rewrite {
                    assert_eq!(resolve(target, &session).rewrite, None);
                }
            }
        }
    }

    #[test]
    fn test_empty_post_id_passes_through() {
        assert_eq!(
            resolve("/post/", &SessionState::Anonymous).view,
            View::BlogPost(String::new())
        );
    }
}
