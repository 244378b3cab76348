//! Path Router
//!
//! Owns the current path. Back/forward navigation reported by the history
//! environment and programmatic navigation both go through the same update
//! path, so subscribers see one notification per change either way.

use std::cell::RefCell;
use std::rc::Rc;

use super::history::History;
use super::route::Route;
use crate::notify::{Listeners, Subscription};

/// Observable current path, kept in sync with a [`History`]
#[derive(Clone)]
pub struct PathRouter {
    inner: Rc<RouterInner>,
}

struct RouterInner {
    history: Rc<dyn History>,
    path: RefCell<String>,
    listeners: Listeners<String>,
    pop_subscription: RefCell<Option<Subscription>>,
}

impl RouterInner {
    fn apply(&self, path: String) {
        *self.path.borrow_mut() = path.clone();
        tracing::debug!(path = %path, "Path changed");
        self.listeners.notify(&path);
    }
}

impl PathRouter {
    /// Create a router starting at the environment's current location
    pub fn new(history: Rc<dyn History>) -> Self {
        let initial = history.location();
        let inner = Rc::new(RouterInner {
            history,
            path: RefCell::new(initial),
            listeners: Listeners::new(),
            pop_subscription: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let subscription = inner.history.on_pop(Box::new(move |path| {
            if let Some(inner) = weak.upgrade() {
                inner.apply(path);
            }
        }));
        *inner.pop_subscription.borrow_mut() = Some(subscription);

        Self { inner }
    }

    /// Current path
    pub fn path(&self) -> String {
        self.inner.path.borrow().clone()
    }

    /// Route matched by the current path
    pub fn route(&self) -> Route {
        Route::parse(&self.inner.path.borrow())
    }

    /// Push a new history entry and notify subscribers
    pub fn navigate(&self, path: &str) {
        self.inner.history.push(path);
        self.inner.apply(path.to_string());
    }

    /// Rewrite the current history entry and notify subscribers
    pub fn replace(&self, path: &str) {
        self.inner.history.replace(path);
        self.inner.apply(path.to_string());
    }

    /// Observe path changes
    pub fn subscribe(&self, listener: impl Fn(&String) + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::MemoryHistory;

    fn recorder(router: &PathRouter) -> (Rc<RefCell<Vec<String>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let sub = router.subscribe(move |p| seen_clone.borrow_mut().push(p.clone()));
        (seen, sub)
    }

    #[test]
    fn test_initializes_from_location() {
        let history = Rc::new(MemoryHistory::new("/post/42"));
        let router = PathRouter::new(history);

        assert_eq!(router.path(), "/post/42");
        assert_eq!(router.route(), Route::BlogPost("42".into()));
    }

    #[test]
    fn test_navigate_pushes_and_notifies() {
        let history = Rc::new(MemoryHistory::new("/"));
        let router = PathRouter::new(history.clone());
        let (seen, _sub) = recorder(&router);

        router.navigate("/blog");

        assert_eq!(history.len(), 2);
        assert_eq!(history.location(), "/blog");
        assert_eq!(router.path(), "/blog");
        assert_eq!(*seen.borrow(), vec!["/blog".to_string()]);
    }

    #[test]
    fn test_back_forward_updates_path() {
        let history = Rc::new(MemoryHistory::new("/"));
        let router = PathRouter::new(history.clone());
        router.navigate("/blog");
        router.navigate("/post/7");
        let (seen, _sub) = recorder(&router);

        history.back();
        assert_eq!(router.path(), "/blog");
        history.back();
        assert_eq!(router.path(), "/");
        history.forward();
        assert_eq!(router.route(), Route::BlogListing);

        assert_eq!(*seen.borrow(), vec!["/blog", "/", "/blog"]);
    }

    #[test]
    fn test_replace_does_not_grow_history() {
        let history = Rc::new(MemoryHistory::new("/admin"));
        let router = PathRouter::new(history.clone());

        router.replace("/admin/dashboard");

        assert_eq!(history.len(), 1);
        assert_eq!(router.route(), Route::AdminDashboard);
    }

    #[test]
    fn test_pop_listener_released_with_router() {
        let history = Rc::new(MemoryHistory::new("/"));
        history.push("/blog");
        let router = PathRouter::new(history.clone());
        drop(router);

        // Nothing left to notify; must not panic
        history.back();
        assert_eq!(history.location(), "/");
    }
}
