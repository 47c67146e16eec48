use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Incident database administration")]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/incidents.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and run migrations.
    Setup {
        /// Insert the sample incidents after migrating. Skipped when the
        /// database already holds incidents, so rerunning is safe.
        #[arg(long)]
        seed: bool,
    },
    /// Print the number of stored incidents.
    Count,
}

/// Inserts the sample incidents into an empty database. Returns `None`
/// without writing when incidents are already stored.
async fn seed_if_empty(storage: &Storage) -> Result<Option<usize>> {
    let existing = storage.count_incidents().await?;
    if existing > 0 {
        info!(existing, "database already populated; skipping samples");
        return Ok(None);
    }
    Ok(Some(storage.seed_sample_incidents().await?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url)
        .await
        .with_context(|| format!("failed to open {}", cli.database_url))?;

    match cli.command {
        Command::Setup { seed } => {
            info!(database_url = %cli.database_url, "schema is up to date");
            if seed {
                match seed_if_empty(&storage).await? {
                    Some(inserted) => println!("inserted {inserted} sample incidents"),
                    None => println!("database already has incidents; skipping sample data"),
                }
            }
            let total = storage.count_incidents().await?;
            println!("database ready: {total} incidents");
        }
        Command::Count => {
            println!("{}", storage.count_incidents().await?);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
