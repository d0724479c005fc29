//! # vcgate CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vcgate_cli::inspect::{run_inspect, InspectArgs};
use vcgate_cli::scenario::{run_scenario_command, ScenarioArgs};

/// vcgate: verifiable credential issuance, presentation and access checks.
#[derive(Parser, Debug)]
#[command(name = "vcgate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the issuer / holder / relying-party scenario.
    Scenario(ScenarioArgs),

    /// Decode a token without verifying it.
    Inspect(InspectArgs),
}

/// `DEBUG=1` raises verbosity to debug.
fn effective_verbosity(verbose: u8, debug_env: Option<&str>) -> u8 {
    match debug_env {
        Some("1") => verbose.max(2),
        _ => verbose,
    }
}

fn filter_for(verbosity: u8) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug_env = std::env::var("DEBUG").ok();
    let verbosity = effective_verbosity(cli.verbose, debug_env.as_deref());
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(verbosity, "vcgate CLI starting");

    let result = match cli.command {
        Commands::Scenario(args) => run_scenario_command(&args),
        Commands::Inspect(args) => run_inspect(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcgate_cli::scenario::ScenarioShape;
    use vcgate_core::LocalizedName;

    #[test]
    fn cli_parse_scenario_defaults() {
        let cli = Cli::try_parse_from(["vcgate", "scenario"]).unwrap();
        if let Commands::Scenario(args) = cli.command {
            assert_eq!(args.shape, ScenarioShape::Linked);
            assert!(args.role.is_none());
            assert!(args.config.is_none());
        } else {
            panic!("expected scenario");
        }
    }

    #[test]
    fn cli_parse_scenario_inline_with_role() {
        let cli = Cli::try_parse_from([
            "vcgate",
            "scenario",
            "--shape",
            "inline",
            "--role",
            "Guest@fr",
        ])
        .unwrap();
        if let Commands::Scenario(args) = cli.command {
            assert_eq!(args.shape, ScenarioShape::Inline);
            assert_eq!(args.role, Some(LocalizedName::new("Guest", "fr")));
        } else {
            panic!("expected scenario");
        }
    }

    #[test]
    fn cli_parse_rejects_unknown_shape() {
        assert!(Cli::try_parse_from(["vcgate", "scenario", "--shape", "nested"]).is_err());
    }

    #[test]
    fn cli_parse_rejects_empty_role() {
        assert!(Cli::try_parse_from(["vcgate", "scenario", "--role", "@en"]).is_err());
    }

    #[test]
    fn cli_parse_inspect() {
        let cli = Cli::try_parse_from(["vcgate", "inspect", "a.b.c"]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect(ref args) if args.token == "a.b.c"));
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli = Cli::try_parse_from(["vcgate", "-vv", "scenario"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["vcgate", "inspect", "-v", "a.b.c"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["vcgate"]).is_err());
    }

    #[test]
    fn debug_env_raises_verbosity() {
        assert_eq!(effective_verbosity(0, None), 0);
        assert_eq!(effective_verbosity(0, Some("1")), 2);
        assert_eq!(effective_verbosity(3, Some("1")), 3);
        assert_eq!(effective_verbosity(1, Some("0")), 1);
    }
}
