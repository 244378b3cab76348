//! Browser Environment
//!
//! `window.history` as the router's history, `localStorage` as the place an
//! admin session survives reloads, plus fetch and file helpers.

use gloo_net::http::Request;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use implexa::backend::{Session, SessionPersistence};
use implexa::config::SiteConfig;
use implexa::navigation::History;
use implexa::notify::Subscription;

const SESSION_KEY: &str = "implexa.session";
const SITE_CONFIG_URL: &str = "/api/v1/site-config";

fn window() -> web_sys::Window {
    web_sys::window().expect("no global window")
}

// ============================================
// History
// ============================================

/// The browser's session history
pub struct BrowserHistory {
    window: web_sys::Window,
}

impl BrowserHistory {
    pub fn new() -> Self {
        Self { window: window() }
    }
}

fn pathname(window: &web_sys::Window) -> String {
    window
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string())
}

impl History for BrowserHistory {
    fn location(&self) -> String {
        pathname(&self.window)
    }

    fn push(&self, path: &str) {
        let pushed = self
            .window
            .history()
            .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(e) = pushed {
            web_sys::console::error_2(&"pushState failed".into(), &e);
        }
    }

    fn replace(&self, path: &str) {
        let replaced = self
            .window
            .history()
            .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(e) = replaced {
            web_sys::console::error_2(&"replaceState failed".into(), &e);
        }
    }

    fn on_pop(&self, callback: Box<dyn Fn(String)>) -> Subscription {
        let window = self.window.clone();
        let handler = Closure::<dyn Fn(web_sys::Event)>::new(move |_: web_sys::Event| {
            callback(pathname(&window));
        });

        let target = self.window.clone();
        if let Err(e) =
            target.add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
        {
            web_sys::console::error_2(&"popstate listener not installed".into(), &e);
            return Subscription::empty();
        }

        // The closure lives inside the subscription until it is removed again
        Subscription::new(move || {
            let _ = target
                .remove_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref());
        })
    }
}

// ============================================
// Session persistence
// ============================================

/// Keeps the admin session in `localStorage`
pub struct LocalStoragePersistence {
    key: &'static str,
}

impl LocalStoragePersistence {
    pub fn new() -> Self {
        Self { key: SESSION_KEY }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        window().local_storage().ok().flatten()
    }
}

impl SessionPersistence for LocalStoragePersistence {
    fn load(&self) -> Option<Session> {
        let raw = self.storage()?.get_item(self.key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                web_sys::console::warn_1(&format!("Discarding stored session: {}", e).into());
                None
            }
        }
    }

    fn save(&self, session: &Session) {
        let Some(storage) = self.storage() else {
            return;
        };
        match serde_json::to_string(session) {
            Ok(raw) => {
                if storage.set_item(self.key, &raw).is_err() {
                    web_sys::console::error_1(&"Failed to store session".into());
                }
            }
            Err(e) => web_sys::console::error_1(&format!("Failed to encode session: {}", e).into()),
        }
    }

    fn clear(&self) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(self.key);
        }
    }
}

// ============================================
// Fetch and files
// ============================================

/// Runtime settings published by the site host
pub async fn fetch_site_config() -> Result<SiteConfig, String> {
    let response = Request::get(SITE_CONFIG_URL)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("Site config unavailable: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Invalid site config: {}", e))
}

/// A file picked in an `<input type="file">`
pub struct PickedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Read the first file selected by the input that fired `ev`
pub async fn read_picked_file(ev: &web_sys::Event) -> Option<PickedFile> {
    let input: web_sys::HtmlInputElement = ev.target()?.dyn_into().ok()?;
    let file = input.files()?.get(0)?;

    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .ok()?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Some(PickedFile {
        name: file.name(),
        content_type: file.type_(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use implexa::backend::User;
    use implexa::PathRouter;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn settle_until(done: impl Fn() -> bool) {
        for _ in 0..50 {
            if done() {
                return;
            }
            TimeoutFuture::new(20).await;
        }
    }

    #[wasm_bindgen_test]
    fn test_push_and_replace_move_location() {
        let history = Rc::new(BrowserHistory::new());
        history.push("/blog");
        assert_eq!(history.location(), "/blog");

        history.replace("/blog/post/abc");
        assert_eq!(history.location(), "/blog/post/abc");

        let router = PathRouter::new(history.clone());
        router.navigate("/admin");
        assert_eq!(history.location(), "/admin");
        assert_eq!(router.path(), "/admin");
    }

    #[wasm_bindgen_test]
    async fn test_back_is_reported_until_unsubscribed() {
        let history = BrowserHistory::new();
        history.push("/blog");
        history.push("/admin");

        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let seen_clone = Rc::clone(&seen);
        let sub = history.on_pop(Box::new(move |path| seen_clone.borrow_mut().push(path)));

        window().history().unwrap().back().unwrap();
        settle_until(|| !seen.borrow().is_empty()).await;
        assert_eq!(*seen.borrow(), vec!["/blog".to_string()]);

        drop(sub);
        window().history().unwrap().back().unwrap();
        TimeoutFuture::new(200).await;
        assert_eq!(seen.borrow().len(), 1);
    }

    #[wasm_bindgen_test]
    fn test_session_survives_in_local_storage() {
        let store = LocalStoragePersistence::new();
        store.clear();
        assert!(store.load().is_none());

        let session = Session {
            access_token: "jwt".into(),
            refresh_token: "refresh".into(),
            expires_at: chrono::Utc::now(),
            user: User {
                id: "u1".into(),
                email: Some("admin@implexa.org".into()),
            },
        };
        store.save(&session);
        assert_eq!(LocalStoragePersistence::new().load(), Some(session));

        store.clear();
        assert!(store.load().is_none());
    }

    #[wasm_bindgen_test]
    fn test_unreadable_stored_session_is_ignored() {
        let storage = window().local_storage().unwrap().unwrap();
        storage.set_item(SESSION_KEY, "not a session").unwrap();

        assert!(LocalStoragePersistence::new().load().is_none());
        storage.remove_item(SESSION_KEY).unwrap();
    }
}
