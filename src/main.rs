use anyhow::Result;
use clap::{Parser, Subcommand};
use culture_buddy::commands::{serve, show_config};

#[derive(Parser)]
#[command(name = "culture-buddy")]
#[command(about = "Company culture chatbot backend with document ingestion and retrieval")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            serve().await?;
        }
        Commands::Config => {
            show_config()?;
        }
    }

    Ok(())
}
