use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use dashcal_core::MonthKey;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dashcal",
    version,
    about = "Preview the dashboard calendar for one month from the terminal"
)]
pub struct PreviewCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Calendar config file (TOML). Defaults are used when omitted.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Server origin the events endpoint is resolved against.
    #[arg(long = "base-url")]
    pub base_url: String,

    /// Month to display, as YYYY-MM. Defaults to the current month.
    #[arg(long = "month", value_parser = parse_month_key)]
    pub month: Option<MonthKey>,

    /// Day to show in the detail panel, as YYYY-MM-DD. Defaults to today.
    #[arg(long = "day")]
    pub day: Option<String>,

    /// Raw Cookie header sent with the request, for endpoints behind a login.
    #[arg(long = "cookie")]
    pub cookie: Option<String>,

    /// Disable ANSI colors even on a terminal.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

fn parse_month_key(raw: &str) -> Result<MonthKey, String> {
    MonthKey::parse(raw).ok_or_else(|| format!("expected YYYY-MM, got: {raw}"))
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 2 {
        "trace"
    } else if verbose == 1 {
        "debug"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_and_day() {
        let cli = PreviewCli::parse_from([
            "dashcal",
            "-v",
            "--base-url",
            "http://localhost:8000",
            "--month",
            "2024-05",
            "--day",
            "2024-05-03",
        ]);

        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.month.map(|key| key.to_string()).as_deref(), Some("2024-05"));
        assert_eq!(cli.day.as_deref(), Some("2024-05-03"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn rejects_malformed_month() {
        let parsed = PreviewCli::try_parse_from([
            "dashcal",
            "--base-url",
            "http://localhost:8000",
            "--month",
            "May",
        ]);
        assert!(parsed.is_err());
    }
}
