mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "profilehub-cli")]
#[command(about = "Query and aggregate business-profile data from the command line")]
struct Cli {
    /// OAuth bearer token for the business-profile APIs
    #[arg(long, env = "PROFILEHUB_ACCESS_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the accounts visible to the token
    Accounts,
    /// List the locations of an account (first account when omitted)
    Locations {
        /// Account resource name (e.g., accounts/123)
        #[arg(long)]
        account_id: Option<String>,
    },
    /// Resolve a location and print its merged reviews, photos and attributes
    Aggregate {
        /// Account resource name (e.g., accounts/123)
        #[arg(long)]
        account_id: Option<String>,
        /// Location id or full resource name
        #[arg(long)]
        location_id: Option<String>,
    },
    /// Search public locations by free text
    Search {
        /// Business name or address to look for
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = profilehub_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let aggregator = commands::build_aggregator(&config)?;
    let credential = profilehub_gbp::Credential::new(cli.token);

    let output = match cli.command {
        Commands::Accounts => commands::accounts(&aggregator, &credential).await?,
        Commands::Locations { account_id } => {
            commands::locations(&aggregator, &credential, account_id.as_deref()).await?
        }
        Commands::Aggregate {
            account_id,
            location_id,
        } => {
            commands::aggregate(
                &aggregator,
                &credential,
                profilehub_gbp::Hints {
                    account_id,
                    location_id,
                },
            )
            .await?
        }
        Commands::Search { query } => commands::search(&aggregator, &credential, &query).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests;
