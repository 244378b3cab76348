//! Blog Pages
//!
//! Listing of published posts with category chips, and the post detail page.

use leptos::*;

use implexa::content::{categories, BlogPost, CategoryFilter};
use implexa::navigation::BLOG_PATH;

use crate::components::{Link, Loading, SiteFooter, SiteHeader};
use crate::pages::home::PostCard;
use crate::state::use_app;

#[component]
pub fn BlogListing() -> impl IntoView {
    let ctx = use_app();
    let (posts, set_posts) = create_signal(None::<Vec<BlogPost>>);
    let (filter, set_filter) = create_signal(CategoryFilter::All);

    let blog = ctx.blog();
    spawn_local(async move {
        match blog.published_posts().await {
            Ok(list) => set_posts.set(Some(list)),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to load posts: {}", e).into());
                set_posts.set(Some(Vec::new()));
            }
        }
    });

    let chips = move || {
        let names = posts.with(|p| p.as_deref().map(categories).unwrap_or_default());
        std::iter::once(CategoryFilter::All)
            .chain(names.into_iter().map(CategoryFilter::Named))
            .map(|chip| {
                let label = chip.label().to_string();
                let selected = chip.clone();
                let class = move || {
                    if filter.get() == selected {
                        "px-4 py-2 rounded-full text-sm font-medium bg-[#6EBF78] text-white capitalize"
                    } else {
                        "px-4 py-2 rounded-full text-sm font-medium bg-gray-100 text-gray-700 hover:bg-gray-200 capitalize"
                    }
                };
                view! {
                    <button class=class on:click=move |_| set_filter.set(chip.clone())>
                        {label}
                    </button>
                }
            })
            .collect_view()
    };

    view! {
        <SiteHeader on_home=false />
        <main class="flex-1 pt-28 pb-20">
            <div class="container mx-auto px-4 lg:px-8">
                <div class="text-center max-w-3xl mx-auto mb-12">
                    <h1 class="text-4xl lg:text-5xl font-bold mb-6">"News & Insights"</h1>
                    <p class="text-lg text-gray-600">
                        "Research findings, field notes and thought leadership from the Implexa team."
                    </p>
                </div>

                <div class="flex flex-wrap justify-center gap-3 mb-12">{chips}</div>

                {move || {
                    posts.with(|loaded| match loaded {
                        None => view! { <Loading /> }.into_view(),
                        Some(list) => {
                            let shown: Vec<BlogPost> =
                                filter.with(|f| f.apply(list).into_iter().cloned().collect());
                            if shown.is_empty() {
                                view! {
                                    <p class="text-center text-gray-500 py-12">"No posts in this category yet."</p>
                                }
                                .into_view()
                            } else {
                                view! {
                                    <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-8">
                                        {shown.into_iter().map(|post| view! { <PostCard post=post /> }).collect_view()}
                                    </div>
                                }
                                .into_view()
                            }
                        }
                    })
                }}
            </div>
        </main>
        <SiteFooter on_home=false />
    }
}

/// Post detail; missing and unpublished posts show the not-found state
#[component]
pub fn BlogPostPage(id: String) -> impl IntoView {
    let ctx = use_app();
    let (post, set_post) = create_signal(None::<Option<BlogPost>>);

    let blog = ctx.blog();
    spawn_local(async move {
        match blog.published_post(&id).await {
            Ok(found) => set_post.set(Some(found)),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to load post {}: {}", id, e).into());
                set_post.set(Some(None));
            }
        }
    });

    view! {
        <SiteHeader on_home=false />
        <main class="flex-1 pt-28 pb-20">
            <div class="container mx-auto px-4 lg:px-8 max-w-3xl">
                <Link href=BLOG_PATH class="inline-block mb-8 text-[#4A9D5F] font-medium">
                    "← Back to Blog"
                </Link>

                {move || match post.get() {
                    None => view! { <Loading /> }.into_view(),
                    Some(None) => view! { <PostNotFound /> }.into_view(),
                    Some(Some(post)) => view! { <PostBody post=post /> }.into_view(),
                }}
            </div>
        </main>
        <SiteFooter on_home=false />
    }
}

#[component]
fn PostBody(post: BlogPost) -> impl IntoView {
    let date = post.created_at.format("%B %-d, %Y").to_string();
    let paragraphs: Vec<String> = post.paragraphs().map(str::to_string).collect();

    view! {
        <article>
            <span class="px-3 py-1 rounded-full bg-[#6EBF78]/15 text-[#4A9D5F] text-sm font-semibold">
                {post.category.clone()}
            </span>
            <h1 class="text-4xl font-bold mt-6 mb-4">{post.title.clone()}</h1>
            <div class="flex gap-4 text-sm text-gray-500 mb-8">
                <span>{date}</span>
                <span>{post.read_time.clone()}</span>
            </div>
            {post.image_url.clone().map(|url| view! {
                <img src=url alt=post.title.clone() class="w-full rounded-2xl mb-8 object-cover" />
            })}
            <div class="space-y-6 text-lg text-gray-700 leading-relaxed">
                {paragraphs.into_iter().map(|p| view! { <p>{p}</p> }).collect_view()}
            </div>
        </article>
    }
}

#[component]
fn PostNotFound() -> impl IntoView {
    view! {
        <div class="text-center py-20">
            <h1 class="text-3xl font-bold mb-4">"Post not found"</h1>
            <p class="text-gray-600 mb-8">"This article doesn't exist or hasn't been published."</p>
            <Link href=BLOG_PATH class="px-6 py-3 bg-[#6EBF78] hover:bg-[#5DAF68] text-white font-semibold rounded-lg">
                "Browse all posts"
            </Link>
        </div>
    }
}
