mod client;
mod download;
mod load_ingredients;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::client::Client;

#[derive(Parser)]
#[command(name = "ladle")]
#[command(about = "Ladle CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server answers and report how many tags it has
    Ping {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Create ingredients from a JSON or CSV file (administrator token required)
    LoadIngredients {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Auth token from /api/auth/token/login
        #[arg(long, env = "LADLE_TOKEN", hide_env_values = true)]
        token: String,
        /// JSON array of {name, measurement_unit}, or a two-column CSV
        #[arg(long)]
        file: PathBuf,
    },
    /// Save the shopping list for the token's owner as CSV
    DownloadCart {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Auth token from /api/auth/token/login
        #[arg(long, env = "LADLE_TOKEN", hide_env_values = true)]
        token: String,
        /// Output path
        #[arg(long, default_value = "shopping_cart.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ping { server } => {
            let count = Client::new(&server, None).tag_count().await?;
            println!("{server} is up ({count} tags)");
        }
        Commands::LoadIngredients {
            server,
            token,
            file,
        } => {
            load_ingredients::load_ingredients(&Client::new(&server, Some(token)), &file).await?;
        }
        Commands::DownloadCart {
            server,
            token,
            output,
        } => {
            download::download_cart(&Client::new(&server, Some(token)), &output).await?;
        }
    }

    Ok(())
}
