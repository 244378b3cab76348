//! Dashboard shell: sidebar, header and the selected section

use leptos::*;

use implexa::content::DashboardSection;
use implexa::navigation::HOME_PATH;

use crate::components::Link;
use crate::state::use_app;

use super::messages::Messages;
use super::overview::Overview;
use super::posts::PostsManager;
use super::team::TeamEditor;

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let ctx = use_app();
    let section = create_rw_signal(DashboardSection::Overview);
    let (signing_out, set_signing_out) = create_signal(false);

    let admin_email = {
        let ctx = ctx.clone();
        move || ctx.admin_email().unwrap_or_default()
    };

    let on_sign_out = move |_| {
        set_signing_out.set(true);
        let ctx = ctx.clone();
        // Sign-out leaves the dashboard on every outcome
        spawn_local(async move {
            if let Err(e) = ctx.controller.sign_out().await {
                ctx.show_error(&format!("Sign out failed: {}", e));
            }
        });
    };

    view! {
        <div class="min-h-screen flex bg-gray-50">
            <aside class="w-64 bg-white border-r border-gray-200 flex flex-col">
                <div class="h-16 flex items-center px-6 border-b border-gray-200">
                    <span class="text-lg font-bold">"IMPLEXA Admin"</span>
                </div>
                <nav class="flex-1 p-4 space-y-1">
                    {DashboardSection::ALL
                        .iter()
                        .copied()
                        .map(|s| {
                            let class = move || {
                                if section.get() == s {
                                    "w-full text-left px-4 py-2 rounded-lg bg-[#6EBF78]/15 text-[#4A9D5F] font-semibold"
                                } else {
                                    "w-full text-left px-4 py-2 rounded-lg text-gray-700 hover:bg-gray-100"
                                }
                            };
                            view! {
                                <button class=class on:click=move |_| section.set(s)>
                                    {s.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </nav>
                <div class="p-4 border-t border-gray-200 space-y-2">
                    <Link href=HOME_PATH class="block px-4 py-2 text-sm text-gray-600 hover:text-[#4A9D5F]">
                        "View website"
                    </Link>
                    <button
                        class="w-full px-4 py-2 text-sm text-left text-red-600 hover:bg-red-50 rounded-lg disabled:opacity-50"
                        disabled=move || signing_out.get()
                        on:click=on_sign_out
                    >
                        "Sign Out"
                    </button>
                </div>
            </aside>

            <div class="flex-1 flex flex-col">
                <header class="h-16 bg-white border-b border-gray-200 flex items-center justify-between px-8">
                    <h1 class="text-xl font-semibold">{move || section.get().label()}</h1>
                    <span class="text-sm text-gray-500">{admin_email}</span>
                </header>
                <main class="flex-1 p-8">
                    {move || match section.get() {
                        DashboardSection::Overview => view! { <Overview section=section /> }.into_view(),
                        DashboardSection::Blog => view! { <PostsManager /> }.into_view(),
                        DashboardSection::Executives => view! { <TeamEditor /> }.into_view(),
                        DashboardSection::Messages => view! { <Messages /> }.into_view(),
                    }}
                </main>
            </div>
        </div>
    }
}
