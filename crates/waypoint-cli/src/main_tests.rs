// crates/waypoint-cli/src/main_tests.rs
// ============================================================================
// Module: Waypoint CLI Tests
// Description: Argument parsing tests for the command dispatcher.
// Purpose: Verify command shapes and domain selection parse correctly.
// ============================================================================

//! Unit tests for CLI argument parsing.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::PathBuf;

use clap::Parser;
use waypoint_core::Domain;

use crate::Cli;
use crate::Commands;
use crate::ConfigCommand;
use crate::DomainArg;
use crate::ServeCommand;

#[test]
fn serve_pdp_parses_with_a_config_path() {
    let cli = Cli::try_parse_from(["waypoint", "serve", "pdp", "--config", "deploy.toml"])
        .expect("parse");
    match cli.command {
        Commands::Serve {
            command: ServeCommand::Pdp(args),
        } => assert_eq!(args.config, PathBuf::from("deploy.toml")),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn serve_agent_requires_a_domain() {
    let missing = Cli::try_parse_from(["waypoint", "serve", "agent", "--config", "deploy.toml"]);
    assert!(missing.is_err());

    let cli = Cli::try_parse_from([
        "waypoint", "serve", "agent", "--config", "deploy.toml", "--domain", "lodging",
    ])
    .expect("parse");
    match cli.command {
        Commands::Serve {
            command: ServeCommand::Agent(args),
        } => assert_eq!(args.domain, DomainArg::Lodging),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn serve_gateway_rejects_unknown_domains() {
    let result = Cli::try_parse_from([
        "waypoint", "serve", "gateway", "--config", "deploy.toml", "--domain", "cruises",
    ]);
    assert!(result.is_err());
}

#[test]
fn config_check_parses() {
    let cli = Cli::try_parse_from(["waypoint", "config", "check", "--config", "deploy.toml"])
        .expect("parse");
    assert!(matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommand::Check(_),
        }
    ));
}

#[test]
fn domain_selectors_map_onto_core_domains() {
    assert_eq!(DomainArg::Flights.into_domain(), Domain::Flights);
    assert_eq!(DomainArg::Lodging.into_domain(), Domain::Lodging);
    assert_eq!(DomainArg::Vehicles.into_domain(), Domain::Vehicles);
}

#[test]
fn a_missing_config_flag_is_a_parse_error() {
    assert!(Cli::try_parse_from(["waypoint", "demo"]).is_err());
}
