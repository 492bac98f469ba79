//! # CLI Module
//!
//! Command-line front end of the `waypost` binary. There is no listener: each
//! command builds the demo application in-process and talks to it directly.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List the demo routes in match order with their handler kind and verbs:
//!
//! ```bash
//! waypost routes
//! ```
//!
//! ### `call`
//!
//! Dispatch one request and print status line, headers and body:
//!
//! ```bash
//! waypost call --path /sum/3/4
//! waypost call --method post --path /book --body '{"title": "Dune"}'
//! waypost call --path /environ?x=1 -H 'x-request-id: 01HZX3J8Q4B7N0W1V2C3D4E5F6'
//! waypost call --path /hello/world --reverse --metrics
//! ```
//!
//! ## Global options
//!
//! - `--config <FILE>` - TOML runtime configuration (also `WAYPOST_CONFIG`)
//! - `--log-level <LEVEL>` - override the configured log level
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use waypost::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;
mod demo;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
pub use demo::demo_app;
