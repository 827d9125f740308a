mod cache;
mod news;

use clap::{Parser, Subcommand};
use goodnews_core::Language;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "goodnews-cli")]
#[command(about = "Positive news per country, from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the aggregation pipeline in-process
    Fetch {
        /// ISO 3166-1 alpha-2 country code
        #[arg(long)]
        country: String,

        /// Result language (`en` or `fr`); anything else means `en`
        #[arg(long, default_value = "en")]
        language: String,

        /// Print the articles as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Ask a running news server, using the persistent client cache
    Remote {
        #[arg(long)]
        country: String,

        #[arg(long, default_value = "en")]
        language: String,

        /// Server base URL; defaults to `GOODNEWS_SERVER_URL`
        #[arg(long)]
        server: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Inspect or wipe the persistent client cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// List known country codes
    Countries,
}

#[derive(Debug, Subcommand)]
enum CacheCommands {
    /// List cached keys with their article counts and expiry
    Show,
    /// Remove every cached entry
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = goodnews_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Fetch {
            country,
            language,
            json,
        }) => {
            news::run_fetch(&config, &country, Language::from_param(Some(&language)), json).await?;
        }
        Some(Commands::Remote {
            country,
            language,
            server,
            json,
        }) => {
            let server_url = server.as_deref().unwrap_or(&config.server_url);
            news::run_remote(
                &config,
                server_url,
                &country,
                Language::from_param(Some(&language)),
                json,
            )
            .await?;
        }
        Some(Commands::Cache { command }) => match command {
            CacheCommands::Show => cache::run_cache_show(&config),
            CacheCommands::Clear => cache::run_cache_clear(&config)?,
        },
        Some(Commands::Countries) => news::run_countries(),
        None => println!("goodnews-cli ready; run with --help for commands"),
    }

    Ok(())
}
