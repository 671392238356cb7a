use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskmaster::{api, config::Config};

#[derive(Parser)]
#[command(name = "taskmaster")]
#[command(about = "Task and project management backend for TaskMaster Pro")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TaskMaster server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Seed file for the in-memory backend (forces mock mode)
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "taskmaster=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let (port, seed) = match cli.command {
        Some(Commands::Serve { port, seed }) => (port, seed),
        None => (3000, None),
    };

    let config = Config::from_env();
    let backend = config.build_backend(seed.as_deref())?;
    if backend.is_remote() {
        tracing::info!("using remote record service");
    } else {
        tracing::info!("using in-memory backend with seed data");
    }

    let app = api::create_router(backend);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("TaskMaster server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
