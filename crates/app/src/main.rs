mod cli;

use std::io;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use services::{AppServices, Clock};
use ui::TerminalUi;

use cli::{Cli, normalize_sqlite_url};

#[derive(Debug)]
struct InvalidDbUrl(String);

impl std::fmt::Display for InvalidDbUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid --history-db value: {}", self.0)
    }
}

impl std::error::Error for InvalidDbUrl {}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Create the database file (and its directory) so `SQLite` can open it.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| InvalidDbUrl(db_url.to_string()))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(InvalidDbUrl(db_url.to_string()).into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let clock = Clock::system();
    let option_order = cli.option_order.into();
    let app = match cli.history_db.as_deref() {
        Some(raw) => {
            let url = normalize_sqlite_url(raw);
            prepare_sqlite_file(&url)?;
            info!(%url, "history kept in sqlite");
            AppServices::new_sqlite_history(&cli.bank, &url, clock, option_order).await?
        }
        None => {
            info!(path = %cli.history.display(), "history kept in csv");
            AppServices::new_csv(&cli.bank, &cli.history, clock, option_order).await?
        }
    };

    let mut ui = TerminalUi::new(app.quiz_loop(), io::stdin().lock(), io::stdout().lock());
    ui.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_creates_missing_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("history.db");
        let url = format!("sqlite://{}", db.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(db.exists());
        prepare_sqlite_file("sqlite::memory:").unwrap();
    }

    #[test]
    fn prepare_rejects_non_sqlite_urls() {
        assert!(prepare_sqlite_file("postgres://db").is_err());
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }
}
