//! Contact form inbox

use leptos::*;

use implexa::content::{ContactMessage, MessageCounts, MessageFilter};

use crate::components::Loading;
use crate::state::use_app;

use super::confirm;

#[component]
pub fn Messages() -> impl IntoView {
    let ctx = use_app();
    let inbox = store_value(ctx.inbox());
    let app = store_value(ctx);
    let messages = create_rw_signal(None::<Vec<ContactMessage>>);
    let filter = create_rw_signal(MessageFilter::All);

    let reload = move || {
        spawn_local(async move {
            match inbox.get_value().list().await {
                Ok(list) => messages.set(Some(list)),
                Err(e) => {
                    app.get_value().show_error(&format!("Failed to load messages: {}", e));
                    messages.set(Some(Vec::new()));
                }
            }
        });
    };
    reload();

    let toggle_read = move |message: ContactMessage| {
        spawn_local(async move {
            match inbox.get_value().toggle_read(&message).await {
                Ok(_) => reload(),
                Err(e) => app.get_value().show_error(&e.to_string()),
            }
        });
    };

    let remove = move |message: ContactMessage| {
        if !confirm(&format!("Delete the message from {}?", message.name)) {
            return;
        }
        spawn_local(async move {
            match inbox.get_value().delete(&message.id).await {
                Ok(()) => {
                    app.get_value().show_success("Message deleted");
                    reload();
                }
                Err(e) => app.get_value().show_error(&e.to_string()),
            }
        });
    };

    let counts = move || messages.with(|m| MessageCounts::of(m.as_deref().unwrap_or_default()));

    view! {
        <div>
            <div class="flex gap-2 mb-6">
                {MessageFilter::ALL
                    .iter()
                    .copied()
                    .map(|tab| {
                        let class = move || {
                            if filter.get() == tab {
                                "px-4 py-2 rounded-lg text-sm font-medium bg-[#6EBF78] text-white capitalize"
                            } else {
                                "px-4 py-2 rounded-lg text-sm font-medium bg-white border border-gray-200 text-gray-700 capitalize"
                            }
                        };
                        view! {
                            <button class=class on:click=move |_| filter.set(tab)>
                                {tab.as_str()} " (" {move || counts().get(tab)} ")"
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            {move || {
                let Some(all) = messages.get() else {
                    return view! { <Loading /> }.into_view();
                };
                let shown: Vec<ContactMessage> = filter.get().apply(&all).into_iter().cloned().collect();
                if shown.is_empty() {
                    return view! { <p class="text-center text-gray-500 py-12">"No messages."</p> }.into_view();
                }

                shown
                    .into_iter()
                    .map(|message| {
                        let (for_toggle, for_delete) = (message.clone(), message.clone());
                        let card_class = if message.read {
                            "bg-white rounded-xl border border-gray-200 p-6 mb-4"
                        } else {
                            "bg-white rounded-xl border-l-4 border-[#6EBF78] border-y border-r border-gray-200 p-6 mb-4"
                        };
                        view! {
                            <div class=card_class>
                                <div class="flex items-start justify-between mb-3">
                                    <div>
                                        <p class="font-semibold">{message.name.clone()}</p>
                                        <a href=format!("mailto:{}", message.email) class="text-sm text-[#4A9D5F]">
                                            {message.email.clone()}
                                        </a>
                                    </div>
                                    <span class="text-xs text-gray-400">
                                        {message.created_at.format("%Y-%m-%d %H:%M").to_string()}
                                    </span>
                                </div>
                                <p class="text-gray-700 whitespace-pre-line mb-4">{message.message.clone()}</p>
                                <div class="flex gap-4">
                                    <button class="text-sm text-gray-700" on:click=move |_| toggle_read(for_toggle.clone())>
                                        {if message.read { "Mark as unread" } else { "Mark as read" }}
                                    </button>
                                    <button class="text-sm text-red-600" on:click=move |_| remove(for_delete.clone())>
                                        "Delete"
                                    </button>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
