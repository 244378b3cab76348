//! In-site links
//!
//! Anchors that move the path router instead of reloading the page. Plain
//! clicks navigate in place; modified clicks (new tab, new window) are left
//! to the browser.

use leptos::*;

use crate::state::use_app;

#[component]
pub fn Link(
    #[prop(into)]
    href: String,
    #[prop(optional, into)]
    class: String,
    children: Children,
) -> impl IntoView {
    let ctx = use_app();
    let target = href.clone();

    let on_click = move |ev: ev::MouseEvent| {
        if ev.button() != 0 || ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.alt_key() {
            return;
        }
        ev.prevent_default();
        ctx.navigate(&target);
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
