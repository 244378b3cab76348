//! View Controller
//!
//! Composes the path router and the session gate. Whenever either changes
//! the current view is recomputed; when the view policy asks for a rewrite
//! the router's current entry is replaced and the resulting path
//! notification recomputes the view again.

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use super::resolve::{resolve, View};
use crate::navigation::{PathRouter, ADMIN_LOGIN_PATH};
use crate::notify::{Listeners, Subscription};
use crate::session::{GateError, InitOutcome, SessionGate, SessionState};

/// Observable current view
#[derive(Clone)]
pub struct ViewController {
    inner: Rc<ControllerInner>,
}

struct ControllerInner {
    router: PathRouter,
    gate: SessionGate,
    view: RefCell<View>,
    listeners: Listeners<View>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl ControllerInner {
    fn refresh(&self) {
        let path = self.router.path();
        let resolution = resolve(&path, &self.gate.state());

        if let Some(target) = resolution.rewrite {
            if target != path {
                tracing::debug!(from = %path, to = %target, "Rewriting location");
                // The router notification re-enters refresh at the target
                self.router.replace(target);
                return;
            }
        }

        let changed = {
            let mut view = self.view.borrow_mut();
            if *view == resolution.view {
                false
            } else {
                *view = resolution.view.clone();
                true
            }
        };

        if changed {
            tracing::debug!(view = resolution.view.name(), path = %path, "View changed");
            self.listeners.notify(&resolution.view);
        }
    }
}

impl ViewController {
    /// Wire a controller to `router` and `gate` and compute the first view
    pub fn new(router: PathRouter, gate: SessionGate) -> Self {
        let inner = Rc::new(ControllerInner {
            router,
            gate,
            view: RefCell::new(View::Loading),
            listeners: Listeners::new(),
            subscriptions: RefCell::new(Vec::new()),
        });

        let weak: Weak<ControllerInner> = Rc::downgrade(&inner);
        let on_path = inner.router.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        });

        let weak: Weak<ControllerInner> = Rc::downgrade(&inner);
        let on_session = inner.gate.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        });

        inner.subscriptions.borrow_mut().extend([on_path, on_session]);
        inner.refresh();

        Self { inner }
    }

    /// Run the gate's initial session lookup, bounded by `deadline`
    pub async fn initialize<D>(&self, deadline: D) -> InitOutcome
    where
        D: Future<Output = ()>,
    {
        self.inner.gate.initialize(deadline).await
    }

    /// Current view
    pub fn view(&self) -> View {
        self.inner.view.borrow().clone()
    }

    /// Current path
    pub fn path(&self) -> String {
        self.inner.router.path()
    }

    /// Current session state
    pub fn session(&self) -> SessionState {
        self.inner.gate.state()
    }

    /// Recompute the view from the current path and session
    pub fn refresh(&self) {
        self.inner.refresh();
    }

    /// Navigate to `path`, pushing a history entry
    pub fn navigate(&self, path: &str) {
        self.inner.router.navigate(path);
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), GateError> {
        self.inner.gate.sign_in(email, password).await
    }

    /// Sign out and return to the login screen
    ///
    /// The location moves to `/admin` even when the remote sign-out fails.
    pub async fn sign_out(&self) -> Result<(), GateError> {
        let result = self.inner.gate.sign_out().await;
        if self.inner.router.path() != ADMIN_LOGIN_PATH {
            self.inner.router.navigate(ADMIN_LOGIN_PATH);
        }
        result
    }

    /// Observe view changes
    pub fn subscribe(&self, listener: impl Fn(&View) + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    pub fn router(&self) -> &PathRouter {
        &self.inner.router
    }

    pub fn gate(&self) -> &SessionGate {
        &self.inner.gate
    }
}
