//! Home Page
//!
//! The marketing site: hero, solutions, lab, projects, about with the
//! executive team, latest news and the contact form.

use leptos::*;

use implexa::content::{BlogPost, Executive, NewContactMessage};
use implexa::navigation::post_path;

use crate::components::{InlineLoading, Link, Loading, SiteFooter, SiteHeader};
use crate::state::use_app;

/// Number of posts in the news section
const NEWS_COUNT: usize = 3;

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <SiteHeader />
        <main class="flex-1">
            <Hero />
            <About />
            <Solutions />
            <Lab />
            <Projects />
            <News />
            <Contact />
        </main>
        <SiteFooter />
    }
}

#[component]
fn Hero() -> impl IntoView {
    view! {
        <section id="home" class="min-h-screen flex items-center justify-center pt-20">
            <div class="container mx-auto px-4 lg:px-8 text-center max-w-4xl">
                <h1 class="text-4xl md:text-5xl lg:text-6xl font-bold text-gray-900 mb-6">
                    "Innovating Health."
                    <br />
                    <span class="text-[#4A9D5F]">"Transforming Outcomes."</span>
                </h1>
                <p class="text-xl lg:text-2xl text-gray-600 mb-12">
                    "Insight. Innovation. Implementation."
                </p>
                <div class="flex flex-col sm:flex-row gap-4 justify-center">
                    <a href="#solutions" class="px-8 py-4 bg-[#6EBF78] hover:bg-[#5DAF68] text-white font-semibold rounded-lg">
                        "Explore Our Solutions"
                    </a>
                    <a href="#contact" class="px-8 py-4 bg-gray-100 hover:bg-gray-200 text-gray-900 font-semibold rounded-lg border border-gray-300">
                        "Partner With Us"
                    </a>
                </div>
            </div>
        </section>
    }
}

// ============================================
// About and team
// ============================================

const VALUES: [(&str, &str); 3] = [
    (
        "Mission",
        "To transform healthcare delivery through innovative, evidence-based solutions that bridge research and real-world implementation.",
    ),
    (
        "Vision",
        "A future where cutting-edge health innovations are accessible, scalable, and deliver measurable improvements in patient outcomes.",
    ),
    (
        "Values",
        "Innovation, integrity, collaboration, and a relentless commitment to improving health outcomes for all.",
    ),
];

#[component]
fn About() -> impl IntoView {
    let ctx = use_app();
    let (executives, set_executives) = create_signal(None::<Vec<Executive>>);

    let team = ctx.team();
    spawn_local(async move {
        match team.list().await {
            Ok(list) => set_executives.set(Some(list)),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to load team: {}", e).into());
                set_executives.set(Some(Vec::new()));
            }
        }
    });

    view! {
        <section id="about" class="py-20 bg-gray-50">
            <div class="container mx-auto px-4 lg:px-8">
                <div class="text-center max-w-3xl mx-auto mb-16">
                    <h2 class="text-3xl lg:text-4xl font-bold mb-6">"About Implexa"</h2>
                    <p class="text-lg text-gray-600 leading-relaxed">
                        "Implexa is a health innovation company committed to turning research into \
                         real-world, scalable healthcare solutions. We combine digital, scientific, \
                         and hardware innovation to transform outcomes."
                    </p>
                </div>

                <div class="grid md:grid-cols-3 gap-8 mb-16">
                    {VALUES
                        .iter()
                        .map(|(title, description)| view! {
                            <div class="bg-white rounded-2xl p-8 shadow-sm border border-gray-100">
                                <h3 class="text-xl font-bold mb-3">{*title}</h3>
                                <p class="text-gray-600 leading-relaxed">{*description}</p>
                            </div>
                        })
                        .collect_view()}
                </div>

                {move || match executives.get() {
                    None => view! { <Loading label="Loading team..." /> }.into_view(),
                    Some(list) if list.is_empty() => view! { <FounderCard /> }.into_view(),
                    Some(list) => view! {
                        <div class="grid sm:grid-cols-2 lg:grid-cols-3 gap-8">
                            {list.into_iter().map(|e| view! { <ExecutiveCard executive=e /> }).collect_view()}
                        </div>
                    }
                    .into_view(),
                }}
            </div>
        </section>
    }
}

/// Shown while no executives have been entered
#[component]
fn FounderCard() -> impl IntoView {
    view! {
        <div class="bg-white border border-[#6EBF78]/30 rounded-2xl p-8 lg:p-12 shadow-sm">
            <h3 class="text-2xl font-bold mb-2">"Dr. Nurudeen S. Adana"</h3>
            <p class="text-[#6EBF78] font-semibold mb-4">"Founder & CEO"</p>
            <p class="text-gray-700 leading-relaxed">
                "Dr. Adana is a physician-innovator with a passion for leveraging technology and \
                 research to solve critical healthcare challenges. With expertise spanning clinical \
                 practice, digital health, and health systems strengthening, he leads Implexa's \
                 mission to create impactful, scalable solutions that improve health outcomes \
                 across diverse populations."
            </p>
        </div>
    }
}

#[component]
fn ExecutiveCard(executive: Executive) -> impl IntoView {
    let initials: String = executive
        .name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .collect();

    view! {
        <div class="bg-white rounded-2xl p-6 shadow-sm border border-gray-100 text-center">
            {match executive.image_url.clone() {
                Some(url) => view! {
                    <img src=url alt=executive.name.clone() class="w-32 h-32 mx-auto rounded-full object-cover mb-4" />
                }
                .into_view(),
                None => view! {
                    <div class="w-32 h-32 mx-auto rounded-full bg-[#6EBF78]/20 flex items-center justify-center text-3xl font-bold text-[#4A9D5F] mb-4">
                        {initials}
                    </div>
                }
                .into_view(),
            }}
            <h3 class="text-xl font-bold">{executive.name}</h3>
            <p class="text-[#4A9D5F] font-medium mb-3">{executive.title}</p>
            <p class="text-gray-600 text-sm leading-relaxed">{executive.bio}</p>
        </div>
    }
}

// ============================================
// Solutions, lab and projects
// ============================================

struct Solution {
    title: &'static str,
    subtitle: &'static str,
    description: &'static str,
    features: [&'static str; 4],
    status: &'static str,
    available: bool,
}

const SOLUTIONS: [Solution; 3] = [
    Solution {
        title: "Virtual Patient Assessment System",
        subtitle: "VPA",
        description: "An intelligent digital platform for conducting comprehensive patient assessments remotely, enabling healthcare providers to deliver quality care beyond traditional clinical settings.",
        features: [
            "Remote patient triage and evaluation",
            "Clinical decision support",
            "Real-time data capture and analysis",
            "Integration with electronic health records",
        ],
        status: "Demo Coming Soon",
        available: false,
    },
    Solution {
        title: "RI-DATACAP",
        subtitle: "Routine Immunization Data Capture",
        description: "A comprehensive data management solution designed to streamline immunization program monitoring and improve vaccine coverage tracking across multiple health system levels.",
        features: [
            "Community Health Extension Workers (CHEWs)",
            "Local Immunization Officers (LIOs)",
            "LGA/TWG/State health teams",
            "Real-time reporting and analytics",
        ],
        status: "Request Early Access",
        available: true,
    },
    Solution {
        title: "Future Innovations",
        subtitle: "Coming Soon",
        description: "We are continuously developing new solutions that address emerging healthcare challenges. Stay tuned for groundbreaking innovations in diagnostics, treatment optimization, and health system strengthening.",
        features: [
            "AI-powered diagnostic tools",
            "Supply chain optimization",
            "Patient engagement platforms",
            "Healthcare analytics dashboards",
        ],
        status: "In Development",
        available: false,
    },
];

#[component]
fn Solutions() -> impl IntoView {
    view! {
        <section id="solutions" class="py-20">
            <div class="container mx-auto px-4 lg:px-8">
                <SectionHeading
                    title="Our Solutions"
                    blurb="Transforming healthcare delivery through innovative digital solutions that bridge the gap between research and real-world application."
                />
                <div class="grid lg:grid-cols-3 gap-8">
                    {SOLUTIONS
                        .iter()
                        .map(|s| {
                            let button_class = if s.available {
                                "w-full py-3 rounded-lg font-semibold bg-[#6EBF78] hover:bg-[#5DAF68] text-white"
                            } else {
                                "w-full py-3 rounded-lg font-semibold bg-gray-100 text-gray-500 cursor-not-allowed"
                            };
                            view! {
                                <div class="bg-white rounded-2xl p-8 shadow-sm border border-gray-100 flex flex-col">
                                    <h3 class="text-2xl font-bold">{s.title}</h3>
                                    <p class="text-[#4A9D5F] font-medium mb-4">{s.subtitle}</p>
                                    <p class="text-gray-600 mb-6 leading-relaxed">{s.description}</p>
                                    <ul class="space-y-2 mb-8 flex-1">
                                        {s.features.iter().map(|f| view! { <li class="text-gray-700">"• " {*f}</li> }).collect_view()}
                                    </ul>
                                    <a href="#contact" class=button_class aria-disabled=(!s.available).to_string()>
                                        {s.status}
                                    </a>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </section>
    }
}

const PROTOTYPES: [(&str, &str, &str); 3] = [
    ("AI Clinical Advisor", "Machine learning models for diagnostic support and treatment recommendations", "Alpha Testing"),
    ("Mobile Health Hub", "Offline-capable mobile platform for resource-limited settings", "Prototype"),
    ("Smart Vaccine Tracker", "IoT-enabled cold chain monitoring and inventory management", "Development"),
];

#[component]
fn Lab() -> impl IntoView {
    view! {
        <section id="lab" class="py-20 bg-gray-50">
            <div class="container mx-auto px-4 lg:px-8">
                <SectionHeading
                    title="R&D Lab"
                    blurb="Where groundbreaking research meets practical implementation. Our lab transforms cutting-edge ideas into scalable healthcare solutions."
                />
                <div class="grid md:grid-cols-3 gap-6 mb-12">
                    {PROTOTYPES
                        .iter()
                        .map(|(title, description, stage)| view! {
                            <div class="bg-white rounded-xl p-6 border border-gray-100">
                                <span class="text-xs font-semibold uppercase text-[#4A9D5F]">{*stage}</span>
                                <h3 class="text-lg font-bold mt-2 mb-2">{*title}</h3>
                                <p class="text-gray-600 text-sm">{*description}</p>
                            </div>
                        })
                        .collect_view()}
                </div>
                <div class="text-center">
                    <a href="#contact" class="px-8 py-4 bg-[#6EBF78] hover:bg-[#5DAF68] text-white font-semibold rounded-lg">
                        "Partner With Our Lab"
                    </a>
                </div>
            </div>
        </section>
    }
}

struct Project {
    title: &'static str,
    location: &'static str,
    description: &'static str,
    status: &'static str,
    participants: &'static str,
    duration: &'static str,
}

const PROJECTS: [Project; 6] = [
    Project {
        title: "Community Immunization Coverage Study",
        location: "Northern Nigeria",
        description: "Pilot program assessing the effectiveness of mobile data capture tools for improving vaccination coverage tracking in hard-to-reach communities.",
        status: "Ongoing",
        participants: "500+ children",
        duration: "6 months",
    },
    Project {
        title: "Telehealth Integration Pilot",
        location: "Lagos State",
        description: "Testing virtual patient assessment tools in primary healthcare centers to expand access to quality medical consultations.",
        status: "Completed",
        participants: "12 PHC facilities",
        duration: "3 months",
    },
    Project {
        title: "Health Worker Training Platform",
        location: "Multi-state",
        description: "Digital learning platform for continuous professional development of community health workers, focusing on maternal and child health.",
        status: "In Development",
        participants: "200+ CHEWs",
        duration: "Ongoing",
    },
    Project {
        title: "Data-Driven Decision Making Initiative",
        location: "Federal Capital Territory",
        description: "Implementing real-time analytics dashboards for health managers to improve program monitoring and resource allocation.",
        status: "Planning Phase",
        participants: "8 LGA teams",
        duration: "12 months",
    },
    Project {
        title: "Mobile Health Screening Program",
        location: "Rural Communities",
        description: "Deployment of portable diagnostic tools and mobile apps for early detection of non-communicable diseases in underserved populations.",
        status: "Pilot Stage",
        participants: "1000+ residents",
        duration: "4 months",
    },
    Project {
        title: "Supply Chain Optimization Study",
        location: "North-Central Zone",
        description: "Research project examining barriers to medical supply distribution and testing IoT-based tracking solutions.",
        status: "Data Collection",
        participants: "15 facilities",
        duration: "8 months",
    },
];

fn status_class(status: &str) -> &'static str {
    match status {
        "Completed" => "bg-green-100 text-green-700",
        "Ongoing" => "bg-blue-100 text-blue-700",
        "In Development" => "bg-yellow-100 text-yellow-700",
        "Pilot Stage" => "bg-purple-100 text-purple-700",
        _ => "bg-gray-100 text-gray-600",
    }
}

#[component]
fn Projects() -> impl IntoView {
    view! {
        <section id="projects" class="py-20">
            <div class="container mx-auto px-4 lg:px-8">
                <SectionHeading
                    title="Projects"
                    blurb="Real-world implementations and research initiatives demonstrating the impact of our innovative solutions across diverse healthcare settings."
                />
                <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-6">
                    {PROJECTS
                        .iter()
                        .map(|p| view! {
                            <div class="bg-white rounded-xl p-6 border border-gray-100 shadow-sm">
                                <span class=format!("text-xs font-semibold px-3 py-1 rounded-full {}", status_class(p.status))>
                                    {p.status}
                                </span>
                                <h3 class="text-lg font-bold mt-4">{p.title}</h3>
                                <p class="text-sm text-[#4A9D5F] mb-3">{p.location}</p>
                                <p class="text-gray-600 text-sm mb-4">{p.description}</p>
                                <div class="flex justify-between text-xs text-gray-500">
                                    <span>{p.participants}</span>
                                    <span>{p.duration}</span>
                                </div>
                            </div>
                        })
                        .collect_view()}
                </div>
            </div>
        </section>
    }
}

// ============================================
// News
// ============================================

#[component]
fn News() -> impl IntoView {
    let ctx = use_app();
    let (posts, set_posts) = create_signal(None::<Vec<BlogPost>>);

    let blog = ctx.blog();
    spawn_local(async move {
        match blog.latest(NEWS_COUNT).await {
            Ok(latest) => set_posts.set(Some(latest)),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to load news: {}", e).into());
                set_posts.set(Some(Vec::new()));
            }
        }
    });

    view! {
        <section id="news" class="py-20 bg-gray-50">
            <div class="container mx-auto px-4 lg:px-8">
                <SectionHeading
                    title="News & Insights"
                    blurb="Stay informed with the latest insights, research findings, and thought leadership from the Implexa team."
                />

                {move || match posts.get() {
                    None => view! { <Loading /> }.into_view(),
                    Some(list) if list.is_empty() => view! {
                        <p class="text-center text-gray-500">"No articles published yet."</p>
                    }
                    .into_view(),
                    Some(list) => view! {
                        <div class="grid md:grid-cols-3 gap-8">
                            {list.into_iter().map(|post| view! { <PostCard post=post /> }).collect_view()}
                        </div>
                    }
                    .into_view(),
                }}

                <div class="text-center mt-12">
                    <Link href="/blog" class="px-8 py-4 bg-[#6EBF78] hover:bg-[#5DAF68] text-white font-semibold rounded-lg">
                        "View All Insights"
                    </Link>
                </div>
            </div>
        </section>
    }
}

/// Summary card linking to a post; shared with the blog listing
#[component]
pub fn PostCard(post: BlogPost) -> impl IntoView {
    let href = post_path(&post.id);
    let date = post.created_at.format("%B %-d, %Y").to_string();

    view! {
        <article class="bg-white rounded-2xl overflow-hidden shadow-sm border border-gray-100 flex flex-col">
            {post.image_url.clone().map(|url| view! {
                <img src=url alt=post.title.clone() class="w-full h-48 object-cover" />
            })}
            <div class="p-6 flex flex-col flex-1">
                <div class="flex items-center justify-between text-xs mb-3">
                    <span class="px-3 py-1 rounded-full bg-[#6EBF78]/15 text-[#4A9D5F] font-semibold">
                        {post.category.clone()}
                    </span>
                    <span class="text-gray-500">{post.read_time.clone()}</span>
                </div>
                <h3 class="text-xl font-bold mb-3">{post.title.clone()}</h3>
                <p class="text-gray-600 mb-4 flex-1">{post.excerpt.clone()}</p>
                <div class="flex items-center justify-between text-sm">
                    <span class="text-gray-500">{date}</span>
                    <Link href=href class="text-[#4A9D5F] font-semibold">"Read More →"</Link>
                </div>
            </div>
        </article>
    }
}

// ============================================
// Contact
// ============================================

const PARTNERSHIPS: [&str; 4] = [
    "Research collaborations",
    "Implementation partnerships",
    "Technology co-development",
    "Funding and investment opportunities",
];

#[component]
fn Contact() -> impl IntoView {
    let ctx = use_app();
    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (message, set_message) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);
    let (submitted, set_submitted) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let submission = NewContactMessage {
            name: name.get(),
            email: email.get(),
            message: message.get(),
        };

        set_submitting.set(true);
        let ctx = ctx.clone();
        spawn_local(async move {
            match ctx.inbox().submit(&submission).await {
                Ok(()) => {
                    set_submitted.set(true);
                    set_name.set(String::new());
                    set_email.set(String::new());
                    set_message.set(String::new());
                    gloo_timers::callback::Timeout::new(3000, move || set_submitted.set(false)).forget();
                }
                Err(e) => ctx.show_error(&format!("Message not sent: {}", e)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section id="contact" class="py-20">
            <div class="container mx-auto px-4 lg:px-8">
                <SectionHeading
                    title="Contact & Partnerships"
                    blurb="Ready to transform healthcare together? Reach out to explore partnership opportunities or learn more about our solutions."
                />

                <div class="grid lg:grid-cols-2 gap-12">
                    <div class="space-y-8">
                        <div>
                            <h3 class="text-2xl font-bold mb-4">"Get In Touch"</h3>
                            <a href="mailto:info@implexa.org" class="text-[#4A9D5F] font-medium">"info@implexa.org"</a>
                        </div>
                        <div class="bg-gray-50 rounded-2xl p-8">
                            <h3 class="text-xl font-bold mb-4">"Partnership Opportunities"</h3>
                            <p class="text-gray-600 mb-4">
                                "We're always looking to collaborate with forward-thinking organizations, research \
                                 institutions, and funding partners who share our vision of transforming healthcare delivery."
                            </p>
                            <ul class="space-y-2">
                                {PARTNERSHIPS.iter().map(|p| view! { <li class="text-gray-700">"✓ " {*p}</li> }).collect_view()}
                            </ul>
                        </div>
                    </div>

                    <form on:submit=on_submit class="bg-white rounded-2xl p-8 shadow-sm border border-gray-100 space-y-6">
                        {move || if submitted.get() {
                            view! {
                                <div class="text-center py-12">
                                    <h3 class="text-2xl font-bold text-[#4A9D5F] mb-2">"Message Sent!"</h3>
                                    <p class="text-gray-600">"We'll get back to you shortly."</p>
                                </div>
                            }
                            .into_view()
                        } else {
                            view! {
                                <label class="block">
                                    <span class="block text-sm font-medium mb-2">"Name"</span>
                                    <input
                                        type="text"
                                        required
                                        placeholder="Your name"
                                        class="w-full px-4 py-3 border border-gray-300 rounded-lg"
                                        prop:value=move || name.get()
                                        on:input=move |ev| set_name.set(event_target_value(&ev))
                                    />
                                </label>
                                <label class="block">
                                    <span class="block text-sm font-medium mb-2">"Email"</span>
                                    <input
                                        type="email"
                                        required
                                        placeholder="your.email@example.com"
                                        class="w-full px-4 py-3 border border-gray-300 rounded-lg"
                                        prop:value=move || email.get()
                                        on:input=move |ev| set_email.set(event_target_value(&ev))
                                    />
                                </label>
                                <label class="block">
                                    <span class="block text-sm font-medium mb-2">"Message"</span>
                                    <textarea
                                        required
                                        rows=5
                                        placeholder="Tell us about your project or inquiry..."
                                        class="w-full px-4 py-3 border border-gray-300 rounded-lg"
                                        prop:value=move || message.get()
                                        on:input=move |ev| set_message.set(event_target_value(&ev))
                                    />
                                </label>
                                <button
                                    type="submit"
                                    class="w-full py-4 bg-[#6EBF78] hover:bg-[#5DAF68] disabled:opacity-50 text-white font-semibold rounded-lg"
                                    disabled=move || submitting.get()
                                >
                                    {move || if submitting.get() {
                                        view! { <InlineLoading /> }.into_view()
                                    } else {
                                        "Send Message".into_view()
                                    }}
                                </button>
                            }
                            .into_view()
                        }}
                    </form>
                </div>
            </div>
        </section>
    }
}

#[component]
fn SectionHeading(title: &'static str, blurb: &'static str) -> impl IntoView {
    view! {
        <div class="text-center max-w-3xl mx-auto mb-16">
            <h2 class="text-3xl lg:text-4xl font-bold mb-6">{title}</h2>
            <p class="text-lg text-gray-600 leading-relaxed">{blurb}</p>
        </div>
    }
}
