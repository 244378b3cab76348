//! Overview section: headline counts with shortcuts into the managers

use leptos::*;

use implexa::content::{DashboardSection, DashboardStats};

use crate::components::Loading;
use crate::state::use_app;

#[component]
pub fn Overview(section: RwSignal<DashboardSection>) -> impl IntoView {
    let ctx = use_app();
    let (stats, set_stats) = create_signal(None::<DashboardStats>);

    let store = ctx.backend.store.clone();
    spawn_local(async move {
        match DashboardStats::load(store.as_ref()).await {
            Ok(loaded) => set_stats.set(Some(loaded)),
            Err(e) => {
                ctx.show_error(&format!("Failed to load statistics: {}", e));
                set_stats.set(Some(DashboardStats::default()));
            }
        }
    });

    view! {
        {move || match stats.get() {
            None => view! { <Loading /> }.into_view(),
            Some(stats) => view! {
                <div class="grid sm:grid-cols-2 lg:grid-cols-4 gap-6">
                    <StatCard
                        label="Total Posts"
                        value=stats.total_posts
                        detail=format!("{} drafts", stats.drafts())
                        on_open=move || section.set(DashboardSection::Blog)
                    />
                    <StatCard
                        label="Published"
                        value=stats.published_posts
                        detail="Visible on the blog".to_string()
                        on_open=move || section.set(DashboardSection::Blog)
                    />
                    <StatCard
                        label="Executives"
                        value=stats.executives
                        detail="On the About section".to_string()
                        on_open=move || section.set(DashboardSection::Executives)
                    />
                    <StatCard
                        label="Unread Messages"
                        value=stats.unread_messages
                        detail="From the contact form".to_string()
                        on_open=move || section.set(DashboardSection::Messages)
                    />
                </div>
            }
            .into_view(),
        }}
    }
}

#[component]
fn StatCard(
    label: &'static str,
    value: u64,
    detail: String,
    on_open: impl Fn() + 'static,
) -> impl IntoView {
    view! {
        <button
            class="bg-white rounded-xl p-6 border border-gray-200 text-left hover:shadow-md transition-shadow"
            on:click=move |_| on_open()
        >
            <p class="text-sm text-gray-500">{label}</p>
            <p class="text-3xl font-bold mt-2">{value}</p>
            <p class="text-xs text-gray-400 mt-2">{detail}</p>
        </button>
    }
}
