//! Toast Notification Component
//!
//! Success and error messages; either disappears on its own or when clicked.

use leptos::*;

use crate::state::use_app;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let ctx = use_app();
    let (success, error) = (ctx.success, ctx.error);

    view! {
        <div class="fixed bottom-6 right-4 z-50 space-y-2">
            {move || {
                success.get().map(|msg| view! {
                    <ToastMessage message=msg variant=ToastVariant::Success slot=success />
                })
            }}

            {move || {
                error.get().map(|msg| view! {
                    <ToastMessage message=msg variant=ToastVariant::Error slot=error />
                })
            }}
        </div>
    }
}

#[derive(Clone, Copy)]
enum ToastVariant {
    Success,
    Error,
}

#[component]
fn ToastMessage(
    #[prop(into)]
    message: String,
    variant: ToastVariant,
    slot: RwSignal<Option<String>>,
) -> impl IntoView {
    let (icon, bg_class) = match variant {
        ToastVariant::Success => ("✓", "bg-[#4A9D5F]"),
        ToastVariant::Error => ("✕", "bg-red-600"),
    };

    view! {
        <div
            class=format!(
                "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg cursor-pointer",
                bg_class
            )
            on:click=move |_| slot.set(None)
        >
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{message}</span>
        </div>
    }
}
