use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dictation_server::api::{self, middleware::SecurityConfig};
use dictation_server::models::{CreateChildInput, FeedbackStatus};
use dictation_server::{admin, curriculum, db};

#[derive(Parser)]
#[command(name = "dictation-server")]
#[command(about = "Backend for children's dictation practice")]
struct Cli {
    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, global = true, env = db::DB_PATH_ENV)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for HTTP API
        #[arg(short, long, default_value = "5000")]
        port: u16,
    },
    /// Load a JSON array of {grade, semester, textbook_version, unit, word}
    ImportCurriculum {
        file: PathBuf,
    },
    /// Register a child under a user
    AddChild {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        grade: i64,
        #[arg(long)]
        semester: i64,
        #[arg(long)]
        textbook_version: String,
    },
    /// Post an admin reply on a feedback entry
    ReplyFeedback {
        id: i64,
        content: String,
    },
    /// Move a feedback entry to pending, processing or resolved
    SetFeedbackStatus {
        id: i64,
        #[arg(value_parser = admin::parse_feedback_status)]
        status: FeedbackStatus,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "dictation_server=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let db = match path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(db: db::Database, host: &str, port: u16) -> anyhow::Result<()> {
    let security = SecurityConfig::from_env();
    if security.api_key.is_some() {
        tracing::info!("API key authentication enabled");
    }

    let app = api::create_router(db, security);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Dictation server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let db = open_database(cli.db)?;

    match cli.command {
        Some(Commands::Serve { host, port }) => serve(db, &host, port).await?,
        Some(Commands::ImportCurriculum { file }) => {
            let count = curriculum::import_catalog(&db, &file)?;
            println!("Imported {} curriculum items", count);
        }
        Some(Commands::AddChild {
            user_id,
            name,
            grade,
            semester,
            textbook_version,
        }) => {
            let child = admin::add_child(
                &db,
                user_id,
                CreateChildInput {
                    name,
                    grade,
                    semester,
                    textbook_version,
                },
            )?;
            println!("Created child {}", child.id);
        }
        Some(Commands::ReplyFeedback { id, content }) => {
            let reply = admin::reply_to_feedback(&db, id, &content)?;
            println!("Added reply {} to feedback {}", reply.id, id);
        }
        Some(Commands::SetFeedbackStatus { id, status }) => {
            admin::set_feedback_status(&db, id, status)?;
            println!("Feedback {} is now {}", id, status.as_str());
        }
        None => serve(db, "127.0.0.1", 5000).await?,
    }

    Ok(())
}
