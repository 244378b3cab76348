//! Application State
//!
//! The core view controller and backend, mirrored into Leptos signals.

use leptos::*;
use std::rc::Rc;

use implexa::content::{BlogManager, BlogService, Inbox, TeamManager};
use implexa::{Backend, SessionState, View, ViewController};

/// Shared state provided to every component
#[derive(Clone)]
pub struct AppContext {
    pub controller: ViewController,
    pub backend: Backend,
    /// Latest view reported by the controller
    pub view: RwSignal<View>,
    /// Latest session state reported by the gate
    pub session: RwSignal<SessionState>,
    pub error: RwSignal<Option<String>>,
    pub success: RwSignal<Option<String>>,
}

impl AppContext {
    /// Mirror `controller` into signals for the lifetime of the current owner
    pub fn new(controller: ViewController, backend: Backend) -> Self {
        let view = create_rw_signal(controller.view());
        let session = create_rw_signal(controller.session());

        let view_sub = controller.subscribe(move |v| view.set(v.clone()));
        let session_sub = controller.gate().subscribe(move |s| session.set(s.clone()));
        on_cleanup(move || {
            drop(view_sub);
            drop(session_sub);
        });

        Self {
            controller,
            backend,
            view,
            session,
            error: create_rw_signal(None),
            success: create_rw_signal(None),
        }
    }

    /// Go to `path` inside the site
    pub fn navigate(&self, path: &str) {
        self.controller.navigate(path);
    }

    pub fn blog(&self) -> BlogService {
        BlogService::new(Rc::clone(&self.backend.store))
    }

    pub fn blog_manager(&self) -> BlogManager {
        BlogManager::new(Rc::clone(&self.backend.store), Rc::clone(&self.backend.images))
    }

    pub fn team(&self) -> TeamManager {
        TeamManager::new(Rc::clone(&self.backend.store), Rc::clone(&self.backend.images))
    }

    pub fn inbox(&self) -> Inbox {
        Inbox::new(Rc::clone(&self.backend.store))
    }

    /// Signed-in administrator's email, if any
    pub fn admin_email(&self) -> Option<String> {
        self.session
            .get()
            .session()
            .and_then(|s| s.user.email.clone())
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}

/// The context provided by `App`
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext not found")
}
