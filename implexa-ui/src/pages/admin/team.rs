//! Executives manager

use leptos::*;

use implexa::content::{next_order_index, Executive, ExecutiveDraft};

use crate::browser::read_picked_file;
use crate::components::{InlineLoading, Loading};
use crate::state::use_app;

use super::{confirm, Field, INPUT_CLASS};

#[component]
pub fn TeamEditor() -> impl IntoView {
    let ctx = use_app();
    let team = store_value(ctx.team());
    let app = store_value(ctx);
    let executives = create_rw_signal(None::<Vec<Executive>>);
    // None: form closed; Some(None): new profile; Some(Some(id)): editing
    let editing = create_rw_signal(None::<Option<String>>);
    let draft = create_rw_signal(ExecutiveDraft::default());
    let (saving, set_saving) = create_signal(false);
    let (uploading, set_uploading) = create_signal(false);

    let reload = move || {
        spawn_local(async move {
            match team.get_value().list().await {
                Ok(list) => executives.set(Some(list)),
                Err(e) => {
                    app.get_value().show_error(&format!("Failed to load executives: {}", e));
                    executives.set(Some(Vec::new()));
                }
            }
        });
    };
    reload();

    let open_new = move |_| {
        let order_index = executives.with(|list| next_order_index(list.as_deref().unwrap_or_default()));
        draft.set(ExecutiveDraft {
            order_index,
            ..ExecutiveDraft::default()
        });
        editing.set(Some(None));
    };
    let open_existing = move |executive: Executive| {
        draft.set(ExecutiveDraft::from(&executive));
        editing.set(Some(Some(executive.id)));
    };
    let close = move || editing.set(None);

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(target) = editing.get_untracked() else {
            return;
        };
        let submitted = draft.get_untracked();

        set_saving.set(true);
        spawn_local(async move {
            let team = team.get_value();
            let result = match &target {
                None => team.create(&submitted).await,
                Some(id) => team.update(id, &submitted).await,
            };
            match result {
                Ok(()) => {
                    app.get_value().show_success(&format!("Saved {}", submitted.name));
                    close();
                    reload();
                }
                Err(e) => app.get_value().show_error(&e.to_string()),
            }
            set_saving.set(false);
        });
    };

    let remove = move |executive: Executive| {
        if !confirm(&format!("Remove {} from the team?", executive.name)) {
            return;
        }
        spawn_local(async move {
            match team.get_value().delete(&executive.id).await {
                Ok(()) => {
                    app.get_value().show_success("Executive removed");
                    reload();
                }
                Err(e) => app.get_value().show_error(&e.to_string()),
            }
        });
    };

    let on_image = move |ev: web_sys::Event| {
        set_uploading.set(true);
        spawn_local(async move {
            if let Some(file) = read_picked_file(&ev).await {
                let uploaded = team
                    .get_value()
                    .upload_image(&file.name, file.bytes, &file.content_type)
                    .await;
                match uploaded {
                    Ok(url) => draft.update(|d| d.image_url = Some(url)),
                    Err(e) => app.get_value().show_error(&format!("Upload failed: {}", e)),
                }
            }
            set_uploading.set(false);
        });
    };

    let editor = move || {
        editing.get().map(|target| {
            let heading = if target.is_none() { "New Executive" } else { "Edit Executive" };
            view! {
                <form on:submit=on_save class="bg-white rounded-xl border border-gray-200 p-6 mb-8 space-y-4">
                    <h2 class="text-lg font-semibold">{heading}</h2>
                    <div class="grid md:grid-cols-3 gap-4">
                        <Field label="Name">
                            <input
                                type="text"
                                class=INPUT_CLASS
                                prop:value=move || draft.with(|d| d.name.clone())
                                on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                            />
                        </Field>
                        <Field label="Title">
                            <input
                                type="text"
                                class=INPUT_CLASS
                                prop:value=move || draft.with(|d| d.title.clone())
                                on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                            />
                        </Field>
                        <Field label="Display order">
                            <input
                                type="number"
                                class=INPUT_CLASS
                                prop:value=move || draft.with(|d| d.order_index.to_string())
                                on:input=move |ev| {
                                    if let Ok(index) = event_target_value(&ev).parse() {
                                        draft.update(|d| d.order_index = index);
                                    }
                                }
                            />
                        </Field>
                    </div>
                    <Field label="Bio">
                        <textarea
                            rows=4
                            class=INPUT_CLASS
                            prop:value=move || draft.with(|d| d.bio.clone())
                            on:input=move |ev| draft.update(|d| d.bio = event_target_value(&ev))
                        />
                    </Field>
                    <Field label="Portrait">
                        <div class="flex items-center gap-4">
                            <input type="file" accept="image/*" on:change=on_image />
                            {move || uploading.get().then(|| view! { <InlineLoading /> })}
                            {move || draft.with(|d| d.image_url.clone()).map(|url| view! {
                                <img src=url class="h-16 w-16 rounded-full object-cover" />
                            })}
                        </div>
                    </Field>
                    <div class="flex gap-3">
                        <button
                            type="submit"
                            class="px-6 py-2 bg-[#6EBF78] hover:bg-[#5DAF68] disabled:opacity-50 text-white font-semibold rounded-lg"
                            disabled=move || saving.get()
                        >
                            "Save"
                        </button>
                        <button type="button" class="px-6 py-2 bg-gray-100 rounded-lg" on:click=move |_| close()>
                            "Cancel"
                        </button>
                    </div>
                </form>
            }
        })
    };

    view! {
        <div>
            <div class="flex justify-end mb-6">
                <button
                    class="px-4 py-2 bg-[#6EBF78] hover:bg-[#5DAF68] text-white font-semibold rounded-lg"
                    on:click=open_new
                >
                    "+ Add Executive"
                </button>
            </div>

            {editor}

            {move || match executives.get() {
                None => view! { <Loading /> }.into_view(),
                Some(list) if list.is_empty() => view! {
                    <p class="text-center text-gray-500 py-12">
                        "No executives yet. The About section shows the founder until one is added."
                    </p>
                }
                .into_view(),
                Some(list) => view! {
                    <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-6">
                        {list
                            .into_iter()
                            .map(|executive| {
                                let (for_edit, for_delete) = (executive.clone(), executive.clone());
                                view! {
                                    <div class="bg-white rounded-xl border border-gray-200 p-6">
                                        {executive.image_url.clone().map(|url| view! {
                                            <img src=url class="w-20 h-20 rounded-full object-cover mb-4" />
                                        })}
                                        <p class="text-xs text-gray-400">{format!("#{}", executive.order_index)}</p>
                                        <h3 class="font-bold">{executive.name}</h3>
                                        <p class="text-sm text-[#4A9D5F] mb-2">{executive.title}</p>
                                        <p class="text-sm text-gray-600 line-clamp-3">{executive.bio}</p>
                                        <div class="flex gap-4 mt-4">
                                            <button class="text-sm text-gray-700" on:click=move |_| open_existing(for_edit.clone())>
                                                "Edit"
                                            </button>
                                            <button class="text-sm text-red-600" on:click=move |_| remove(for_delete.clone())>
                                                "Delete"
                                            </button>
                                        </div>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_view(),
            }}
        </div>
    }
}
