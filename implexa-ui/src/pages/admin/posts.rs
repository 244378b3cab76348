//! Blog post manager

use leptos::*;

use implexa::content::{slugify, BlogPost, BlogPostDraft};

use crate::browser::read_picked_file;
use crate::components::{InlineLoading, Loading};
use crate::state::use_app;

use super::{confirm, Field, INPUT_CLASS};

/// What the editor form is working on
#[derive(Clone, PartialEq)]
enum Editing {
    New,
    Existing(String),
}

#[component]
pub fn PostsManager() -> impl IntoView {
    let ctx = use_app();
    let manager = store_value(ctx.blog_manager());
    let posts = create_rw_signal(None::<Vec<BlogPost>>);
    let editing = create_rw_signal(None::<Editing>);
    let draft = create_rw_signal(BlogPostDraft::default());
    let (saving, set_saving) = create_signal(false);
    let (uploading, set_uploading) = create_signal(false);
    let app = store_value(ctx);

    let reload = move || {
        spawn_local(async move {
            match manager.get_value().list().await {
                Ok(list) => posts.set(Some(list)),
                Err(e) => {
                    app.get_value().show_error(&format!("Failed to load posts: {}", e));
                    posts.set(Some(Vec::new()));
                }
            }
        });
    };
    reload();

    let open_new = move |_| {
        draft.set(BlogPostDraft::default());
        editing.set(Some(Editing::New));
    };
    let open_existing = move |post: BlogPost| {
        draft.set(BlogPostDraft::from(&post));
        editing.set(Some(Editing::Existing(post.id)));
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
            let manager = manager.get_value();
            let result = match &target {
                Editing::New => manager.create(&submitted).await,
                Editing::Existing(id) => manager.update(id, &submitted).await,
            };
            match result {
                Ok(()) => {
                    let verb = if target == Editing::New { "created" } else { "updated" };
                    app.get_value().show_success(&format!("Post {}", verb));
                    close();
                    reload();
                }
                Err(e) => app.get_value().show_error(&e.to_string()),
            }
            set_saving.set(false);
        });
    };

    let toggle = move |post: BlogPost| {
        spawn_local(async move {
            match manager.get_value().toggle_published(&post).await {
                Ok(published) => {
                    let state = if published { "published" } else { "moved to drafts" };
                    app.get_value().show_success(&format!("\"{}\" {}", post.title, state));
                    reload();
                }
                Err(e) => app.get_value().show_error(&e.to_string()),
            }
        });
    };

    let remove = move |post: BlogPost| {
        if !confirm(&format!("Delete \"{}\"?", post.title)) {
            return;
        }
        spawn_local(async move {
            match manager.get_value().delete(&post.id).await {
                Ok(()) => {
                    app.get_value().show_success("Post deleted");
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
                let uploaded = manager
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
            let heading = if target == Editing::New { "New Post" } else { "Edit Post" };
            view! {
                <form on:submit=on_save class="bg-white rounded-xl border border-gray-200 p-6 mb-8 space-y-4">
                    <h2 class="text-lg font-semibold">{heading}</h2>
                    <div class="grid md:grid-cols-2 gap-4">
                        <Field label="Title">
                            <input
                                type="text"
                                class=INPUT_CLASS
                                prop:value=move || draft.with(|d| d.title.clone())
                                on:input=move |ev| {
                                    let title = event_target_value(&ev);
                                    draft.update(|d| {
                                        if d.slug.is_empty() || d.slug == slugify(&d.title) {
                                            d.slug = slugify(&title);
                                        }
                                        d.title = title;
                                    });
                                }
                            />
                        </Field>
                        <Field label="Slug">
                            <input
                                type="text"
                                class=INPUT_CLASS
                                prop:value=move || draft.with(|d| d.slug.clone())
                                on:input=move |ev| draft.update(|d| d.slug = event_target_value(&ev))
                            />
                        </Field>
                        <Field label="Category">
                            <input
                                type="text"
                                class=INPUT_CLASS
                                prop:value=move || draft.with(|d| d.category.clone())
                                on:input=move |ev| draft.update(|d| d.category = event_target_value(&ev))
                            />
                        </Field>
                        <Field label="Read time">
                            <input
                                type="text"
                                class=INPUT_CLASS
                                prop:value=move || draft.with(|d| d.read_time.clone())
                                on:input=move |ev| draft.update(|d| d.read_time = event_target_value(&ev))
                            />
                        </Field>
                    </div>
                    <Field label="Excerpt">
                        <textarea
                            rows=2
                            class=INPUT_CLASS
                            prop:value=move || draft.with(|d| d.excerpt.clone())
                            on:input=move |ev| draft.update(|d| d.excerpt = event_target_value(&ev))
                        />
                    </Field>
                    <Field label="Content">
                        <textarea
                            rows=10
                            class=INPUT_CLASS
                            prop:value=move || draft.with(|d| d.content.clone())
                            on:input=move |ev| draft.update(|d| d.content = event_target_value(&ev))
                        />
                    </Field>
                    <Field label="Cover image">
                        <div class="flex items-center gap-4">
                            <input type="file" accept="image/*" on:change=on_image />
                            {move || uploading.get().then(|| view! { <InlineLoading /> })}
                            {move || draft.with(|d| d.image_url.clone()).map(|url| view! {
                                <img src=url class="h-16 rounded object-cover" />
                            })}
                        </div>
                    </Field>
                    <label class="flex items-center gap-2">
                        <input
                            type="checkbox"
                            prop:checked=move || draft.with(|d| d.published)
                            on:change=move |ev| draft.update(|d| d.published = event_target_checked(&ev))
                        />
                        <span class="text-sm">"Published"</span>
                    </label>
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
                    "+ New Post"
                </button>
            </div>

            {editor}

            {move || match posts.get() {
                None => view! { <Loading /> }.into_view(),
                Some(list) if list.is_empty() => view! {
                    <p class="text-center text-gray-500 py-12">"No posts yet."</p>
                }
                .into_view(),
                Some(list) => view! {
                    <div class="bg-white rounded-xl border border-gray-200 divide-y divide-gray-100">
                        {list
                            .into_iter()
                            .map(|post| {
                                let badge = if post.published {
                                    ("Published", "bg-green-100 text-green-700")
                                } else {
                                    ("Draft", "bg-gray-100 text-gray-600")
                                };
                                let (for_edit, for_toggle, for_delete) = (post.clone(), post.clone(), post.clone());
                                view! {
                                    <div class="flex items-center justify-between p-4">
                                        <div>
                                            <p class="font-medium">{post.title}</p>
                                            <p class="text-xs text-gray-500">
                                                {post.category} " · " {post.created_at.format("%Y-%m-%d").to_string()}
                                            </p>
                                        </div>
                                        <div class="flex items-center gap-3">
                                            <span class=format!("text-xs px-2 py-1 rounded-full {}", badge.1)>{badge.0}</span>
                                            <button class="text-sm text-[#4A9D5F]" on:click=move |_| toggle(for_toggle.clone())>
                                                {if post.published { "Unpublish" } else { "Publish" }}
                                            </button>
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
