//! Loading Component
//!
//! Loading spinners.

use leptos::*;

/// Shown while the admin session is still being resolved
#[component]
pub fn FullPageLoading() -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-white">
            <div class="loading-spinner w-12 h-12" />
        </div>
    }
}

/// Section loading spinner
#[component]
pub fn Loading(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 text-gray-500">
            <div class="loading-spinner w-8 h-8" />
            {label.map(|l| view! { <p class="mt-4 text-sm">{l}</p> })}
        </div>
    }
}

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}
