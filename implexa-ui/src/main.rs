//! Implexa Website
//!
//! Public marketing site, blog and admin panel built with Leptos (WASM).
//!
//! # Architecture
//!
//! Client-side rendered. Which screen shows is decided by the core
//! `ViewController` from the current path and the admin session; this crate
//! adapts the browser (history, local storage, fetch) to the core's
//! collaborator traits and renders whatever view the controller reports.

use leptos::*;

mod app;
mod browser;
mod components;
mod pages;
mod state;

fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
