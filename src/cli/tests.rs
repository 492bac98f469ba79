//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands};
use crate::runtime_config::RuntimeConfig;
use clap::Parser;

fn run(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    execute(&cli.command, &RuntimeConfig::default(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_call_command_parses() {
    let cli = Cli::try_parse_from([
        "waypost",
        "call",
        "--method",
        "post",
        "--path",
        "/book",
        "-H",
        "x-a: 1",
        "-H",
        "x-b: 2",
    ])
    .unwrap();

    match cli.command {
        Commands::Call {
            method,
            path,
            body,
            headers,
            reverse,
            metrics,
        } => {
            assert_eq!(method, "post");
            assert_eq!(path, "/book");
            assert!(body.is_none());
            assert_eq!(headers, vec!["x-a: 1", "x-b: 2"]);
            assert!(!reverse);
            assert!(!metrics);
        }
        Commands::Routes => panic!("Expected Call command"),
    }
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from(["waypost", "routes", "--log-level", "debug"]).unwrap();
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
    assert!(matches!(cli.command, Commands::Routes));
}

#[test]
fn test_call_requires_path() {
    assert!(Cli::try_parse_from(["waypost", "call"]).is_err());
}

#[test]
fn test_routes_lists_in_match_order() {
    let out = run(&["waypost", "routes"]);
    let patterns: Vec<&str> = out
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(patterns.first(), Some(&"/home"));
    assert!(out.contains("/book"));
    let book = out.lines().find(|l| l.starts_with("/book")).unwrap();
    assert!(book.contains("resource"));
    assert!(book.ends_with("GET,POST"));
}

#[test]
fn test_call_prints_response() {
    let out = run(&["waypost", "call", "--path", "/sum/3/4"]);
    assert!(out.starts_with("HTTP/1.1 200 OK"));
    assert!(out.contains("x-request-id: "));
    assert!(out.trim_end().ends_with("3 + 4 = 7"));
}

#[test]
fn test_call_not_found() {
    let out = run(&["waypost", "call", "--path", "/missing"]);
    assert!(out.starts_with("HTTP/1.1 404 Not Found"));
    assert!(out.trim_end().ends_with("Not found."));
}

#[test]
fn test_call_with_metrics() {
    let out = run(&["waypost", "call", "--path", "/home", "--metrics"]);
    assert!(out.contains("waypost_requests_total 1"));
}

#[test]
fn test_call_rejects_malformed_header() {
    let cli = Cli::try_parse_from(["waypost", "call", "--path", "/home", "-H", "nocolon"]).unwrap();
    let mut out = Vec::new();
    assert!(execute(&cli.command, &RuntimeConfig::default(), &mut out).is_err());
}
