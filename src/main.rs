//! # Vision Catalog CLI (`vcat`)
//!
//! The `vcat` binary is the operator interface for the catalog: database
//! initialization, login, remote sync, and CRUD over videos, categories,
//! FAQs, and images, plus CSV export/import.
//!
//! ## Usage
//!
//! ```bash
//! vcat --config ./config/vcat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vcat init` | Create the SQLite state database |
//! | `vcat status` | Show remote configuration and collection counts |
//! | `vcat login` / `vcat logout` | Open or close a role session |
//! | `vcat sync` | Fetch the catalog from the remote backend |
//! | `vcat video <add\|edit\|rm\|list>` | Manage videos |
//! | `vcat category <add\|list>` | Manage the category registry |
//! | `vcat faq <add\|edit\|rm\|list>` | Manage FAQs |
//! | `vcat image add <files>` | Upload images |
//! | `vcat export` / `vcat import` | CSV export/import of videos |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use vision_catalog::config;
use vision_catalog::migrate;
use vision_catalog::models::VideoDraft;
use vision_catalog::ops::CatalogApp;
use vision_catalog::render::ConsoleRenderer;
use vision_catalog::session::parse_role;
use vision_catalog::sync::LoadOutcome;

/// Vision Catalog — a local-first catalog manager for educational video
/// libraries, mirrored best-effort to an optional remote backend.
#[derive(Parser)]
#[command(
    name = "vcat",
    about = "Vision Catalog — a local-first catalog manager for educational video libraries",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/vcat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the state database.
    ///
    /// Creates the SQLite file and the fixed-key state table. Idempotent.
    Init,

    /// Show remote configuration, session, and collection counts.
    Status,

    /// Open a session for a role with its configured credentials.
    Login {
        /// Role to log in as: `student` or `admin`.
        #[arg(long)]
        role: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        pass: String,
    },

    /// Close the current session.
    Logout,

    /// Fetch the catalog from the remote backend.
    ///
    /// Loads at most once per run unless `--force` is given. With no
    /// remote configured, seeds the demo category registry into an empty
    /// store instead.
    Sync {
        /// Re-fetch even if already loaded.
        #[arg(long)]
        force: bool,
    },

    /// Manage videos.
    Video {
        #[command(subcommand)]
        action: VideoAction,
    },

    /// Manage the category registry.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage FAQs.
    Faq {
        #[command(subcommand)]
        action: FaqAction,
    },

    /// Manage images.
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },

    /// Export all videos as CSV.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Import videos from a CSV file (columns: id,title,link,category,thumb,created).
    Import {
        path: PathBuf,
    },

    /// Show the onboarding video; `--complete` marks onboarding done.
    Onboarding {
        #[arg(long)]
        complete: bool,
    },
}

/// Video subcommands.
#[derive(Subcommand)]
enum VideoAction {
    /// Add a video. The thumbnail is derived from the link.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        link: String,
        #[arg(long)]
        category: String,
    },
    /// Edit a video in place. Omitted fields keep their current value.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a video (asks for confirmation unless `--yes`).
    Rm {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// List all videos.
    List,
}

/// Category subcommands.
#[derive(Subcommand)]
enum CategoryAction {
    /// Register a category (also pushed to the remote registry).
    Add { name: String },
    /// List the merged category set.
    List,
}

/// FAQ subcommands.
#[derive(Subcommand)]
enum FaqAction {
    /// Add a FAQ. An empty question cancels silently.
    Add {
        #[arg(long)]
        question: String,
        #[arg(long, default_value = "")]
        answer: String,
    },
    /// Edit a FAQ in place. Omitted fields keep their current value.
    Edit {
        id: String,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },
    /// Delete a FAQ.
    Rm { id: String },
    /// List FAQs, most recent first.
    List,
}

/// Image subcommands.
#[derive(Subcommand)]
enum ImageAction {
    /// Upload a batch of image files. All-or-nothing.
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    std::io::stdout().flush().ok();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    if let Commands::Init = cli.command {
        migrate::run_migrations(&cfg).await?;
        println!("Database initialized successfully.");
        return Ok(());
    }

    let mut app = CatalogApp::open(cfg, Box::new(ConsoleRenderer)).await?;

    match cli.command {
        Commands::Init => unreachable!(),
        Commands::Status => {
            let remote = if app.has_remote() { "CONFIGURED" } else { "NOT CONFIGURED" };
            let session = match app.session() {
                Some(s) => format!("{} ({})", s.name, s.role.as_str()),
                None => "guest".to_string(),
            };
            println!("{:<12} {}", "REMOTE", remote);
            println!("{:<12} {}", "SESSION", session);
            println!("{:<12} {}", "VIDEOS", app.store().videos().len());
            println!("{:<12} {}", "CATEGORIES", app.store().all_categories().len());
            println!("{:<12} {}", "FAQS", app.store().faqs().len());
            println!("{:<12} {}", "IMAGES", app.store().images().len());
        }
        Commands::Login { role, user, pass } => {
            let role = parse_role(&role)?;
            let session = app.login(role, &user, &pass).await?;
            println!("logged in as {} ({})", session.name, session.role.as_str());

            // Students get pointed at the onboarding video once.
            if session.role == vision_catalog::models::Role::Student
                && !app.onboarding_done().await?
            {
                if let Some(video) = app.onboarding_video() {
                    println!("recommended: watch \"{}\" to get started", video.title);
                }
            }
        }
        Commands::Logout => {
            app.logout().await?;
            println!("logged out");
        }
        Commands::Sync { force } => {
            if !app.has_remote() {
                app.sync_catalog(force).await?;
                println!("no remote configured; using local catalog");
            } else {
                match app.sync_catalog(force).await? {
                    LoadOutcome::Loaded { videos } => {
                        println!("sync remote");
                        println!("  fetched: {} videos", videos);
                        println!("ok");
                    }
                    LoadOutcome::Skipped => println!("already loaded; use --force to re-fetch"),
                    LoadOutcome::AlreadyLoading => println!("a load is already in flight"),
                    // Not an error: local state is untouched and the next
                    // run may retry.
                    LoadOutcome::Failed => println!("sync failed; local catalog unchanged"),
                }
            }
        }
        Commands::Video { action } => match action {
            VideoAction::Add {
                title,
                link,
                category,
            } => {
                let video = app
                    .save_video(VideoDraft {
                        title,
                        link,
                        category,
                    })
                    .await?;
                println!("video added: {}", video.id);
            }
            VideoAction::Edit {
                id,
                title,
                link,
                category,
            } => {
                let current = app.mark_editing(&id)?;
                let video = app
                    .save_video(VideoDraft {
                        title: title.unwrap_or(current.title),
                        link: link.unwrap_or(current.link),
                        category: category.unwrap_or(current.category),
                    })
                    .await?;
                println!("video updated: {}", video.id);
            }
            VideoAction::Rm { id, yes } => {
                let title = match app.store().find_video(&id) {
                    Some(v) => v.title.clone(),
                    None => {
                        println!("video not found: {}", id);
                        return Ok(());
                    }
                };
                if !yes && !confirm(&format!("Delete \"{}\"?", title)) {
                    println!("aborted");
                    return Ok(());
                }
                if app.delete_video(&id).await? {
                    println!("video deleted: {}", id);
                }
            }
            VideoAction::List => app.render(),
        },
        Commands::Category { action } => match action {
            CategoryAction::Add { name } => {
                if app.add_category(&name).await? {
                    println!("category added: {}", name);
                } else {
                    println!("category already exists: {}", name);
                }
            }
            CategoryAction::List => {
                for cat in app.store().all_categories() {
                    println!("{}", cat);
                }
            }
        },
        Commands::Faq { action } => match action {
            FaqAction::Add { question, answer } => match app.add_faq(&question, &answer).await? {
                Some(faq) => println!("faq added: {}", faq.id),
                None => println!("empty question; nothing added"),
            },
            FaqAction::Edit {
                id,
                question,
                answer,
            } => {
                let current = match app.store().find_faq(&id) {
                    Some(f) => f.clone(),
                    None => {
                        println!("faq not found: {}", id);
                        return Ok(());
                    }
                };
                let q = question.unwrap_or(current.q);
                let a = answer.unwrap_or(current.a);
                if app.update_faq(&id, &q, &a).await? {
                    println!("faq updated: {}", id);
                }
            }
            FaqAction::Rm { id } => {
                if app.remove_faq(&id).await? {
                    println!("faq deleted: {}", id);
                } else {
                    println!("faq not found: {}", id);
                }
            }
            FaqAction::List => {
                let faqs = app.store().faqs();
                if faqs.is_empty() {
                    println!("no faqs yet");
                }
                for faq in faqs.iter().rev() {
                    println!("{}  {}", faq.id, faq.q);
                    if !faq.a.is_empty() {
                        println!("    {}", faq.a);
                    }
                }
            }
        },
        Commands::Image { action } => match action {
            ImageAction::Add { paths } => {
                let count = app.upload_images(&paths).await?;
                println!("{} image(s) uploaded", count);
            }
        },
        Commands::Export { output } => {
            let csv = app.export_csv()?;
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &csv)?;
                    eprintln!(
                        "Exported {} videos to {}",
                        app.store().videos().len(),
                        path.display()
                    );
                }
                None => println!("{}", csv),
            }
        }
        Commands::Import { path } => {
            let text = std::fs::read_to_string(&path)?;
            let count = app.import_csv(&text).await?;
            println!("imported {} video(s)", count);
        }
        Commands::Onboarding { complete } => {
            match app.onboarding_video() {
                Some(video) => println!("onboarding video: {} ({})", video.title, video.link),
                None => println!("no onboarding video in the catalog"),
            }
            if complete {
                app.complete_onboarding().await?;
                println!("onboarding marked complete");
            }
        }
    }

    Ok(())
}
