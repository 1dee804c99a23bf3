//! Command line interface.

use std::path::PathBuf;

use clap::Parser;
use common::CoinbaseEnvironment;

/// Place the configured market buys on Coinbase.
#[derive(Debug, Parser)]
#[command(name = "cumulus", version, about)]
pub struct Cli {
    /// Use the production environment instead of the sandbox.
    #[arg(short, long)]
    pub production: bool,

    /// Path to the YAML config file.
    #[arg(short, long, value_name = "PATH", default_value = "config.yml")]
    pub config: PathBuf,

    /// Simulate orders without contacting the exchange.
    #[arg(long)]
    pub dry_run: bool,

    /// Re-read placed orders' status before reporting.
    #[arg(long)]
    pub refresh: bool,

    /// Write a JSON receipt of the run to this path.
    #[arg(long, value_name = "PATH")]
    pub receipt: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// `--production` wins; otherwise `CUMULUS_ENVIRONMENT`, defaulting to sandbox.
    pub fn environment(&self) -> CoinbaseEnvironment {
        if self.production {
            CoinbaseEnvironment::Production
        } else {
            CoinbaseEnvironment::from_env()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cumulus"]).unwrap();
        assert!(!cli.production);
        assert!(!cli.dry_run);
        assert_eq!(cli.config, PathBuf::from("config.yml"));
        assert!(cli.receipt.is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["cumulus", "-p", "-c", "conf/live.yml"]).unwrap();
        assert!(cli.production);
        assert_eq!(cli.environment(), CoinbaseEnvironment::Production);
        assert_eq!(cli.config, PathBuf::from("conf/live.yml"));
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "cumulus",
            "--production",
            "--dry-run",
            "--refresh",
            "--receipt",
            "out.json",
            "--json-logs",
        ])
        .unwrap();

        assert!(cli.production && cli.dry_run && cli.refresh && cli.json_logs);
        assert_eq!(cli.receipt, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["cumulus", "--prod"]).is_err());
    }
}
