use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use services::OptionOrder;

/// Science quiz in the terminal.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "quiz", version)]
pub struct Cli {
    /// Question bank CSV.
    #[arg(
        long,
        env = "QUIZ_BANK",
        default_value = "quiz_with_explanations_difficulty.csv"
    )]
    pub bank: PathBuf,

    /// CSV file that saved results are appended to.
    #[arg(long, env = "QUIZ_HISTORY", default_value = "quiz_scores.csv")]
    pub history: PathBuf,

    /// Keep saved results in SQLite instead of the CSV history file.
    #[arg(long, env = "QUIZ_HISTORY_DB")]
    pub history_db: Option<String>,

    /// When answer choices are shuffled.
    #[arg(long, env = "QUIZ_OPTION_ORDER", value_enum, default_value_t = OrderArg::Frozen)]
    pub option_order: OrderArg,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Shuffle once per question.
    Frozen,
    /// Shuffle every time the question is shown.
    PerRender,
}

impl From<OrderArg> for OptionOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Frozen => Self::Frozen,
            OrderArg::PerRender => Self::PerRender,
        }
    }
}

/// Normalise a user-supplied `SQLite` location into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path = std::path::Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "quiz",
            "--bank",
            "bank.csv",
            "--history",
            "out/scores.csv",
            "--option-order",
            "per-render",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.bank, PathBuf::from("bank.csv"));
        assert_eq!(cli.history, PathBuf::from("out/scores.csv"));
        assert_eq!(OptionOrder::from(cli.option_order), OptionOrder::PerRender);
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn unknown_option_order_is_rejected() {
        assert!(Cli::try_parse_from(["quiz", "--option-order", "sometimes"]).is_err());
    }

    #[test]
    fn sqlite_urls_become_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/q.db"), "sqlite:///tmp/q.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/q.db"), "sqlite:///tmp/q.db");
        assert!(normalize_sqlite_url("q.db").starts_with("sqlite:///"));
    }
}
