//! Admin sign-in form

use leptos::*;

use implexa::navigation::HOME_PATH;

use crate::components::{InlineLoading, Link};
use crate::state::use_app;

use super::{Field, INPUT_CLASS};

#[component]
pub fn AdminLogin() -> impl IntoView {
    let ctx = use_app();
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (signing_in, set_signing_in) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        set_signing_in.set(true);

        let ctx = ctx.clone();
        spawn_local(async move {
            // Success swaps this page for the dashboard
            if let Err(e) = ctx.controller.sign_in(&email.get_untracked(), &password.get_untracked()).await {
                set_error.set(Some(e.to_string()));
                set_password.set(String::new());
                set_signing_in.set(false);
            }
        });
    };

    view! {
        <main class="min-h-screen flex items-center justify-center bg-gray-50 px-4">
            <div class="w-full max-w-md">
                <div class="text-center mb-8">
                    <h1 class="text-3xl font-bold">"Admin Login"</h1>
                    <p class="text-gray-600 mt-2">"Sign in to manage the Implexa site"</p>
                </div>

                <form on:submit=on_submit class="bg-white rounded-2xl shadow-sm border border-gray-100 p-8 space-y-6">
                    {move || error.get().map(|msg| view! {
                        <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded-lg text-sm">
                            {msg}
                        </div>
                    })}

                    <Field label="Email">
                        <input
                            type="email"
                            required
                            autocomplete="username"
                            class=INPUT_CLASS
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                    </Field>
                    <Field label="Password">
                        <input
                            type="password"
                            required
                            autocomplete="current-password"
                            class=INPUT_CLASS
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </Field>

                    <button
                        type="submit"
                        class="w-full py-3 bg-[#6EBF78] hover:bg-[#5DAF68] disabled:opacity-50 text-white font-semibold rounded-lg"
                        disabled=move || signing_in.get()
                    >
                        {move || if signing_in.get() {
                            view! { <InlineLoading /> }.into_view()
                        } else {
                            "Sign In".into_view()
                        }}
                    </button>
                </form>

                <div class="text-center mt-6">
                    <Link href=HOME_PATH class="text-sm text-gray-600 hover:text-[#4A9D5F]">"← Back to website"</Link>
                </div>
            </div>
        </main>
    }
}
