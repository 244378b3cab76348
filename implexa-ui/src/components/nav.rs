//! Site header and footer

use leptos::*;

use crate::components::Link;

/// Sections of the home page, in page order
pub const SECTIONS: [(&str, &str); 7] = [
    ("Home", "home"),
    ("About", "about"),
    ("Solutions", "solutions"),
    ("R&D Lab", "lab"),
    ("Projects", "projects"),
    ("News", "news"),
    ("Contact", "contact"),
];

/// Href for a home-page section; off the home page the link goes back home first
fn section_href(anchor: &str, on_home: bool) -> String {
    if on_home {
        format!("#{}", anchor)
    } else {
        format!("/#{}", anchor)
    }
}

#[component]
pub fn SiteHeader(#[prop(default = true)] on_home: bool) -> impl IntoView {
    let (menu_open, set_menu_open) = create_signal(false);

    let links = move || {
        SECTIONS
            .iter()
            .map(|(label, anchor)| {
                view! {
                    <a
                        href=section_href(anchor, on_home)
                        class="text-gray-700 hover:text-[#4A9D5F] font-medium transition-colors"
                        on:click=move |_| set_menu_open.set(false)
                    >
                        {*label}
                    </a>
                }
            })
            .collect_view()
    };

    view! {
        <header class="fixed top-0 left-0 right-0 z-40 bg-white/90 backdrop-blur border-b border-gray-100">
            <nav class="container mx-auto px-4 lg:px-8 h-16 flex items-center justify-between">
                <Link href="/" class="flex items-center gap-2">
                    <span class="text-xl font-bold tracking-wide text-gray-900">"IMPLEXA"</span>
                </Link>

                <div class="hidden lg:flex items-center gap-8">
                    {links}
                    <Link href="/blog" class="text-gray-700 hover:text-[#4A9D5F] font-medium">
                        "Blog"
                    </Link>
                </div>

                <button
                    class="lg:hidden p-2 text-gray-700"
                    aria-label="Toggle menu"
                    on:click=move |_| set_menu_open.update(|open| *open = !*open)
                >
                    {move || if menu_open.get() { "✕" } else { "☰" }}
                </button>
            </nav>

            {move || {
                menu_open.get().then(|| view! {
                    <div class="lg:hidden flex flex-col gap-4 px-4 py-4 bg-white border-t border-gray-100">
                        {links}
                        <Link href="/blog" class="text-gray-700 font-medium">"Blog"</Link>
                    </div>
                })
            }}
        </header>
    }
}

#[component]
pub fn SiteFooter(#[prop(default = true)] on_home: bool) -> impl IntoView {
    let year = chrono::Utc::now().format("%Y").to_string();

    view! {
        <footer class="bg-gray-50 border-t border-gray-200 mt-auto">
            <div class="container mx-auto px-4 lg:px-8 py-12 grid md:grid-cols-3 gap-8">
                <div>
                    <span class="text-xl font-bold tracking-wide">"IMPLEXA"</span>
                    <p class="text-gray-600 mt-4 leading-relaxed">
                        "Transforming healthcare delivery through innovative, evidence-based \
                         solutions that bridge research and real-world implementation."
                    </p>
                    <a href="mailto:info@implexa.org" class="inline-block mt-4 text-[#4A9D5F]">
                        "info@implexa.org"
                    </a>
                </div>

                <div>
                    <h4 class="font-semibold mb-4">"Quick Links"</h4>
                    <ul class="space-y-2">
                        {SECTIONS
                            .iter()
                            .skip(1)
                            .map(|(label, anchor)| view! {
                                <li>
                                    <a href=section_href(anchor, on_home) class="text-gray-600 hover:text-[#4A9D5F]">
                                        {*label}
                                    </a>
                                </li>
                            })
                            .collect_view()}
                    </ul>
                </div>

                <div>
                    <h4 class="font-semibold mb-4">"Insights"</h4>
                    <Link href="/blog" class="text-gray-600 hover:text-[#4A9D5F]">"Read the blog"</Link>
                </div>
            </div>

            <div class="border-t border-gray-200 py-6 text-center text-sm text-gray-500">
                {format!("© {} Implexa. All rights reserved.", year)}
            </div>
        </footer>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_href_leaves_home_page_when_needed() {
        assert_eq!(section_href("about", true), "#about");
        assert_eq!(section_href("about", false), "/#about");
    }
}
