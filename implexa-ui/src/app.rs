//! App Root Component
//!
//! Connects to the backend, wires router, session gate and view controller
//! together and renders whichever view the controller reports.

use leptos::*;
use std::rc::Rc;
use std::time::Duration;

use implexa::backend::SleepFuture;
use implexa::config::SessionConfig;
use implexa::{Backend, InitOutcome, PathRouter, SessionGate, View, ViewController};

use crate::browser::{self, BrowserHistory, LocalStoragePersistence};
use crate::components::{FullPageLoading, Toast};
use crate::pages::{AdminDashboard, AdminLogin, BlogListing, BlogPostPage, Home};
use crate::state::AppContext;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let (context, set_context) = create_signal(None::<AppContext>);

    let owner = Owner::current();
    spawn_local(async move {
        let (backend, timeout_ms) = connect().await;

        let router = PathRouter::new(Rc::new(BrowserHistory::new()));
        let gate = SessionGate::new(Rc::clone(&backend.auth));
        keep_sessions_alive(&gate);
        let controller = ViewController::new(router, gate);

        let build = move || AppContext::new(controller, backend);
        let ctx = match owner {
            Some(owner) => with_owner(owner, build),
            None => build(),
        };
        set_context.set(Some(ctx.clone()));

        let timeout = u32::try_from(timeout_ms).unwrap_or(u32::MAX);
        let deadline = gloo_timers::future::TimeoutFuture::new(timeout);
        if ctx.controller.initialize(deadline).await == InitOutcome::FellBack {
            web_sys::console::warn_1(
                &format!("Session lookup gave up after {}ms; continuing signed out", timeout_ms)
                    .into(),
            );
        }
    });

    view! {
        {move || match context.get() {
            Some(ctx) => view! { <Site ctx=ctx /> }.into_view(),
            None => view! { <FullPageLoading /> }.into_view(),
        }}
    }
}

/// Refresh every session the gate picks up until it ends
fn keep_sessions_alive(gate: &SessionGate) {
    let keeper = gate.clone();
    gate.subscribe(move |state| {
        if state.is_authenticated() {
            let gate = keeper.clone();
            spawn_local(async move { gate.keep_alive(&browser_sleep).await });
        }
    })
    .forget();
}

fn browser_sleep(delay: Duration) -> SleepFuture {
    // setTimeout fires at once for delays past i32::MAX
    let ms = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX).min(i32::MAX as u32);
    Box::pin(gloo_timers::future::TimeoutFuture::new(ms))
}

/// Backend named by the site host, or an empty in-memory one when the host
/// publishes no configuration
async fn connect() -> (Backend, u64) {
    let fallback_timeout = SessionConfig::default().resolve_timeout_ms;

    let site = match browser::fetch_site_config().await {
        Ok(site) => site,
        Err(e) => {
            web_sys::console::warn_1(&format!("{}; using in-memory backend", e).into());
            return (Backend::in_memory(), fallback_timeout);
        }
    };

    match Backend::connect(&site.backend(), Box::new(LocalStoragePersistence::new())) {
        Ok(backend) => (backend, site.session_resolve_timeout_ms),
        Err(e) => {
            web_sys::console::error_1(&format!("Backend unavailable: {}", e).into());
            (Backend::in_memory(), fallback_timeout)
        }
    }
}

/// Everything below the root once the backend is known
#[component]
fn Site(ctx: AppContext) -> impl IntoView {
    provide_context(ctx.clone());

    let view = ctx.view;
    view! {
        <div class="min-h-screen flex flex-col">
            {move || match view.get() {
                View::Loading => view! { <FullPageLoading /> }.into_view(),
                View::Home => view! { <Home /> }.into_view(),
                View::BlogListing => view! { <BlogListing /> }.into_view(),
                View::BlogPost(id) => view! { <BlogPostPage id=id /> }.into_view(),
                View::AdminLogin => view! { <AdminLogin /> }.into_view(),
                View::AdminDashboard => view! { <AdminDashboard /> }.into_view(),
            }}

            <Toast />
        </div>
    }
}
