//! Admin Panel
//!
//! ## Architecture
//!
//! - **login**: email/password form over the session gate
//! - **dashboard**: sidebar shell switching between the sections below
//! - **overview**: headline counts
//! - **posts**, **team**, **messages**: managers for each collection

mod dashboard;
mod login;
mod messages;
mod overview;
mod posts;
mod team;

pub use dashboard::AdminDashboard;
pub use login::AdminLogin;

use leptos::*;

/// Labelled form control
#[component]
fn Field(label: &'static str, children: Children) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm font-medium text-gray-700 mb-1">{label}</span>
            {children()}
        </label>
    }
}

const INPUT_CLASS: &str =
    "w-full px-3 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-[#6EBF78] focus:outline-none";

/// Ask the browser to confirm a destructive action
fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
