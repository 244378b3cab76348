//! Implexa Admin CLI
//!
//! Command-line access to the admin panel operations:
//! - Sign in / out
//! - Dashboard counts
//! - Publish, unpublish and delete blog posts
//! - List executives
//! - Read and triage contact messages
//! - Check how a path resolves

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;

use implexa::backend::{Backend, Session, SessionPersistence};
use implexa::config::{generate_default_config, Config, LoggingConfig};
use implexa::content::{
    BlogManager, DashboardStats, Inbox, MessageCounts, MessageFilter, TeamManager,
};
use implexa::session::{SessionGate, SessionState};
use implexa::view::resolve;

#[derive(Parser)]
#[command(name = "implexa-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Administer the Implexa website content")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Where the signed-in session is kept
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AssumedSession {
    Loading,
    Anonymous,
    Authenticated,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which view a path resolves to
    Resolve {
        path: String,
        /// Session state to resolve against
        #[arg(short, long, value_enum, default_value_t = AssumedSession::Anonymous)]
        session: AssumedSession,
    },

    /// Sign in as an administrator
    Login {
        #[arg(short, long)]
        email: String,
        /// Password (default: IMPLEXA_ADMIN_PASSWORD, then stdin)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Dashboard overview counts
    Stats,

    /// List blog posts
    Posts {
        /// Only published posts
        #[arg(long)]
        published: bool,
    },

    /// Publish a blog post
    Publish { id: String },

    /// Move a blog post back to draft
    Unpublish { id: String },

    /// Delete a blog post
    DeletePost { id: String },

    /// List executives in display order
    Executives,

    /// List contact messages
    Messages {
        #[arg(long, default_value = "all")]
        filter: MessageFilter,
    },

    /// Mark a message as read
    MarkRead {
        id: String,
        /// Mark as unread instead
        #[arg(long)]
        unread: bool,
    },

    /// Delete a contact message
    DeleteMessage { id: String },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ============================================
// Session file
// ============================================

/// Session kept as JSON in a file between invocations
struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionPersistence for FilePersistence {
    fn load(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn save(&self, session: &Session) {
        let result = self
            .path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|_| {
                let json = serde_json::to_string_pretty(session)?;
                std::fs::write(&self.path, json)
            });
        if let Err(e) = result {
            tracing::warn!("Failed to save session to {:?}: {}", self.path, e);
        }
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove session file {:?}: {}", self.path, e);
            }
        }
    }
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("implexa").join("session.json"))
        .unwrap_or_else(|| PathBuf::from(".implexa-session.json"))
}

// ============================================
// Admin context
// ============================================

struct Admin {
    backend: Backend,
    gate: SessionGate,
    resolve_timeout: Duration,
}

impl Admin {
    fn connect(config: &Config, session_file: &Path) -> anyhow::Result<Self> {
        let persistence = Box::new(FilePersistence::new(session_file.to_path_buf()));
        let backend = Backend::connect(&config.backend, persistence)
            .context("Set [backend] url and anon_key, or IMPLEXA_BACKEND_URL / IMPLEXA_BACKEND_ANON_KEY")?;
        let gate = SessionGate::new(backend.auth.clone());

        Ok(Self {
            backend,
            gate,
            resolve_timeout: Duration::from_millis(config.session.resolve_timeout_ms),
        })
    }

    /// Restore the stored session, failing when there is none
    async fn require_session(&self) -> anyhow::Result<Session> {
        self.gate
            .initialize(tokio::time::sleep(self.resolve_timeout))
            .await;
        match self.gate.state() {
            SessionState::Authenticated(session) => Ok(session),
            _ => bail!("Not signed in; run `implexa-admin login --email <email>` first"),
        }
    }

    fn blog(&self) -> BlogManager {
        BlogManager::new(self.backend.store.clone(), self.backend.images.clone())
    }

    fn team(&self) -> TeamManager {
        TeamManager::new(self.backend.store.clone(), self.backend.images.clone())
    }

    fn inbox(&self) -> Inbox {
        Inbox::new(self.backend.store.clone())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    let logging = LoggingConfig {
        level: if cli.verbose { "debug" } else { "warn" }.to_string(),
        ..config.logging.clone()
    };
    implexa::telemetry::init_tracing(&logging)?;

    let session_file = cli.session_file.clone().unwrap_or_else(default_session_file);
    let format = cli.format;

    match cli.command {
        Commands::Resolve { path, session } => {
            let state = match session {
                AssumedSession::Loading => SessionState::Loading,
                AssumedSession::Anonymous => SessionState::Anonymous,
                AssumedSession::Authenticated => SessionState::Authenticated(placeholder_session()),
            };
            let resolution = resolve(&path, &state);

            match format {
                OutputFormat::Json => print_json(&resolution)?,
                OutputFormat::Table => {
                    println!("{:<10} {}", "Path", path);
                    println!("{:<10} {}", "View", resolution.view.name());
                    if let implexa::View::BlogPost(id) = &resolution.view {
                        println!("{:<10} {}", "Post", id);
                    }
                    println!("{:<10} {}", "Rewrite", resolution.rewrite.unwrap_or("-"));
                }
            }
        }

        Commands::Login { email, password } => {
            let admin = Admin::connect(&config, &session_file)?;
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };

            admin.gate.sign_in(&email, &password).await?;
            println!("Signed in as {}", email);
        }

        Commands::Logout => {
            let admin = Admin::connect(&config, &session_file)?;
            admin
                .gate
                .initialize(tokio::time::sleep(admin.resolve_timeout))
                .await;
            if let Err(e) = admin.gate.sign_out().await {
                eprintln!("Warning: {}", e);
            }
            println!("Signed out");
        }

        Commands::Stats => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            let stats = DashboardStats::load(admin.backend.store.as_ref()).await?;

            match format {
                OutputFormat::Json => print_json(&stats)?,
                OutputFormat::Table => {
                    println!("Implexa Dashboard");
                    println!("=================");
                    println!(
                        "Blog posts:      {} ({} published, {} drafts)",
                        stats.total_posts,
                        stats.published_posts,
                        stats.drafts()
                    );
                    println!("Executives:      {}", stats.executives);
                    println!("Unread messages: {}", stats.unread_messages);
                }
            }
        }

        Commands::Posts { published } => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            let mut posts = admin.blog().list().await?;
            if published {
                posts.retain(|p| p.published);
            }

            match format {
                OutputFormat::Json => print_json(&posts)?,
                OutputFormat::Table => {
                    if posts.is_empty() {
                        println!("No posts");
                        return Ok(());
                    }
                    println!(
                        "{:<38} {:<10} {:<16} {:<12} {}",
                        "ID", "Status", "Category", "Created", "Title"
                    );
                    println!("{}", "-".repeat(100));
                    for post in &posts {
                        println!(
                            "{:<38} {:<10} {:<16} {:<12} {}",
                            post.id,
                            if post.published { "published" } else { "draft" },
                            truncate(&post.category, 16),
                            post.created_at.format("%Y-%m-%d"),
                            post.title
                        );
                    }
                }
            }
        }

        Commands::Publish { id } => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            admin.blog().set_published(&id, true).await?;
            println!("Published {}", id);
        }

        Commands::Unpublish { id } => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            admin.blog().set_published(&id, false).await?;
            println!("Moved {} to drafts", id);
        }

        Commands::DeletePost { id } => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            admin.blog().delete(&id).await?;
            println!("Deleted post {}", id);
        }

        Commands::Executives => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            let executives = admin.team().list().await?;

            match format {
                OutputFormat::Json => print_json(&executives)?,
                OutputFormat::Table => {
                    println!("{:<6} {:<24} {:<28} {}", "Order", "Name", "Title", "ID");
                    println!("{}", "-".repeat(96));
                    for e in &executives {
                        println!(
                            "{:<6} {:<24} {:<28} {}",
                            e.order_index,
                            truncate(&e.name, 24),
                            truncate(&e.title, 28),
                            e.id
                        );
                    }
                }
            }
        }

        Commands::Messages { filter } => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            let messages = admin.inbox().list().await?;
            let counts = MessageCounts::of(&messages);
            let shown = filter.apply(&messages);

            match format {
                OutputFormat::Json => print_json(&shown)?,
                OutputFormat::Table => {
                    println!(
                        "all: {}  unread: {}  read: {}",
                        counts.all, counts.unread, counts.read
                    );
                    println!();
                    for m in shown {
                        let marker = if m.read { " " } else { "*" };
                        println!(
                            "{} {}  {} <{}>  {}",
                            marker,
                            m.created_at.format("%Y-%m-%d %H:%M"),
                            m.name,
                            m.email,
                            m.id
                        );
                        println!("    {}", truncate(&m.message, 90));
                    }
                }
            }
        }

        Commands::MarkRead { id, unread } => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            admin.inbox().set_read(&id, !unread).await?;
            println!("Marked {} as {}", id, if unread { "unread" } else { "read" });
        }

        Commands::DeleteMessage { id } => {
            let admin = Admin::connect(&config, &session_file)?;
            admin.require_session().await?;
            admin.inbox().delete(&id).await?;
            println!("Deleted message {}", id);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn read_password() -> anyhow::Result<String> {
    if let Ok(password) = std::env::var("IMPLEXA_ADMIN_PASSWORD") {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("No password given");
    }
    Ok(password)
}

fn placeholder_session() -> Session {
    Session {
        access_token: String::new(),
        refresh_token: String::new(),
        expires_at: chrono::Utc::now(),
        user: implexa::backend::User {
            id: "cli".to_string(),
            email: None,
        },
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session() -> Session {
        Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now(),
            user: implexa::backend::User {
                id: "u1".into(),
                email: Some("admin@implexa.org".into()),
            },
        }
    }

    #[test]
    fn test_file_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePersistence::new(dir.path().join("nested").join("session.json"));
        assert!(store.load().is_none());

        let saved = session();
        store.save(&saved);
        assert_eq!(store.load(), Some(saved));

        store.clear();
        assert!(store.load().is_none());
        // Clearing twice is fine
        store.clear();
    }

    #[test]
    fn test_corrupt_session_file_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(FilePersistence::new(path).load().is_none());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 10), "a longe...");
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["implexa-admin", "messages", "--filter", "unread", "-f", "json"]).unwrap();
        assert!(cli.format == OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Messages { filter: MessageFilter::Unread }));
    }
}
