//! End-to-end navigation over the in-memory backend: path router, session
//! gate and view controller wired together the way the browser app wires them.

use futures_util::future;
use std::cell::RefCell;
use std::rc::Rc;

use implexa::backend::memory::{MemoryAuth, SessionLookup};
use implexa::navigation::{History, MemoryHistory, PathRouter};
use implexa::session::{InitOutcome, SessionGate, SessionState};
use implexa::view::{resolve, View, ViewController};

const EMAIL: &str = "admin@implexa.org";
const PASSWORD: &str = "s3cret-pass";

struct Site {
    history: Rc<MemoryHistory>,
    auth: Rc<MemoryAuth>,
    controller: ViewController,
}

fn open(path: &str, auth: MemoryAuth) -> Site {
    let history = Rc::new(MemoryHistory::new(path));
    let auth = Rc::new(auth);
    let router = PathRouter::new(history.clone());
    let gate = SessionGate::new(auth.clone());
    let controller = ViewController::new(router, gate);
    Site {
        history,
        auth,
        controller,
    }
}

#[tokio::test]
async fn test_unknown_paths_show_home() {
    let site = open("/careers", MemoryAuth::new());
    site.controller.initialize(future::pending()).await;

    assert_eq!(site.controller.view(), View::Home);
    assert_eq!(site.history.location(), "/careers");
    assert_eq!(site.history.replace_count(), 0);
}

#[tokio::test]
async fn test_signed_in_admin_lands_on_dashboard() {
    let site = open("/admin", MemoryAuth::new().with_session(EMAIL));

    let views = Rc::new(RefCell::new(Vec::new()));
    let views_clone = Rc::clone(&views);
    let _sub = site
        .controller
        .subscribe(move |v| views_clone.borrow_mut().push(v.clone()));

    site.controller.initialize(future::pending()).await;

    assert_eq!(site.controller.view(), View::AdminDashboard);
    assert_eq!(site.history.location(), "/admin/dashboard");
    assert_eq!(site.history.replace_count(), 1);
    assert_eq!(*views.borrow(), vec![View::AdminDashboard]);
}

#[tokio::test]
async fn test_dashboard_deep_link_without_session() {
    let site = open("/admin/dashboard", MemoryAuth::new());
    site.controller.initialize(future::pending()).await;

    assert_eq!(site.controller.view(), View::AdminLogin);
    assert_eq!(site.history.location(), "/admin");
    assert_eq!(site.history.replace_count(), 1);
    assert_eq!(site.history.len(), 1);
}

#[tokio::test]
async fn test_nothing_renders_before_session_is_known() {
    let site = open("/admin/dashboard", MemoryAuth::new());
    site.auth.set_lookup(SessionLookup::Hang);

    assert_eq!(site.controller.view(), View::Loading);
    for path in ["/", "/blog", "/post/1", "/admin"] {
        site.controller.navigate(path);
        assert_eq!(site.controller.view(), View::Loading, "path {}", path);
    }
    assert_eq!(site.history.replace_count(), 0);

    // The deadline ends the wait; the visitor continues signed out
    let outcome = site.controller.initialize(future::ready(())).await;
    assert_eq!(outcome, InitOutcome::FellBack);
    assert_eq!(site.controller.view(), View::AdminLogin);
}

#[tokio::test]
async fn test_public_post_for_anonymous_visitor() {
    let site = open("/post/abc123", MemoryAuth::new());
    site.controller.initialize(future::pending()).await;

    assert_eq!(site.controller.view(), View::BlogPost("abc123".into()));
    assert_eq!(site.history.replace_count(), 0);
}

#[tokio::test]
async fn test_sign_in_then_sign_out() {
    let site = open("/admin", MemoryAuth::new().with_account(EMAIL, PASSWORD));
    site.controller.initialize(future::pending()).await;
    assert_eq!(site.controller.view(), View::AdminLogin);

    let err = site.controller.sign_in(EMAIL, "guess").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(site.controller.view(), View::AdminLogin);

    site.controller.sign_in(EMAIL, PASSWORD).await.unwrap();
    assert!(site.controller.session().is_authenticated());
    assert_eq!(site.controller.view(), View::AdminDashboard);
    assert_eq!(site.history.location(), "/admin/dashboard");

    site.controller.sign_out().await.unwrap();
    assert_eq!(site.controller.session(), SessionState::Anonymous);
    assert_eq!(site.history.location(), "/admin");
    assert_eq!(site.controller.view(), View::AdminLogin);
}

#[tokio::test]
async fn test_browsing_public_pages_keeps_admin_session() {
    let site = open("/", MemoryAuth::new().with_session(EMAIL));
    site.controller.initialize(future::pending()).await;

    site.controller.navigate("/blog");
    assert_eq!(site.controller.view(), View::BlogListing);
    site.controller.navigate("/admin");
    assert_eq!(site.controller.view(), View::AdminDashboard);
    assert_eq!(site.history.location(), "/admin/dashboard");

    // Back returns to the listing, not to the rewritten entry
    site.history.back();
    assert_eq!(site.controller.view(), View::BlogListing);
    assert!(site.controller.session().is_authenticated());
}

#[test]
fn test_rewrites_settle_in_one_step() {
    let signed_in = {
        let auth = MemoryAuth::new().with_session(EMAIL);
        SessionState::Authenticated(auth.session().unwrap())
    };

    for state in [SessionState::Anonymous, signed_in] {
        for path in ["/", "/admin", "/admin/dashboard", "/blog", "/post/x", "/nope"] {
            let first = resolve(path, &state);
            if let Some(target) = first.rewrite {
                let second = resolve(target, &state);
                assert_eq!(second.rewrite, None, "{} -> {}", path, target);
                assert_eq!(second.view, first.view);
            }
        }
    }
}
