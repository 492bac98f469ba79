use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use http::Method;

use super::demo::demo_app;
use crate::logging::init_logging_with_config;
use crate::runtime_config::RuntimeConfig;

/// Command-line interface for waypost
///
/// Inspects and exercises the bundled demo application without a network
/// listener.
#[derive(Parser)]
#[command(name = "waypost")]
#[command(about = "waypost CLI", long_about = None)]
pub struct Cli {
    /// Path to a TOML runtime configuration file
    #[arg(long, global = true, env = "WAYPOST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured log level (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the demo application's routes in match order
    Routes,
    /// Dispatch one request through the demo application and print the response
    Call {
        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request target, optionally with a query string
        #[arg(short, long)]
        path: String,

        /// Request body
        #[arg(short, long)]
        body: Option<String>,

        /// Request header as `name: value`; repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Reverse the response body
        #[arg(long, default_value_t = false)]
        reverse: bool,

        /// Print the metrics exposition after the response
        #[arg(long, default_value_t = false)]
        metrics: bool,
    },
}

/// Load configuration, install logging and run the parsed command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, logging cannot be
/// installed or the command fails.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let mut config = RuntimeConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    init_logging_with_config(&config.log)?;

    let stdout = std::io::stdout();
    execute(&cli.command, &config, &mut stdout.lock())
}

/// Run `command` against the demo application, writing output to `out`.
pub fn execute(command: &Commands, config: &RuntimeConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Commands::Routes => {
            let (app, _) = demo_app(config, false)?;
            for route in app.router().routes() {
                let verbs: Vec<String> = route.allowed().iter().map(|v| v.to_string()).collect();
                writeln!(
                    out,
                    "{:<32} {:<10} {}",
                    route.pattern().as_str(),
                    route.handler().kind(),
                    verbs.join(",")
                )?;
            }
            Ok(())
        }
        Commands::Call {
            method,
            path,
            body,
            headers,
            reverse,
            metrics,
        } => {
            let mut config = config.clone();
            if *metrics {
                config.middleware.metrics = true;
            }
            let (app, collector) = demo_app(&config, *reverse)?;

            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method: {method}"))?;
            let mut builder = http::Request::builder().method(method).uri(path.as_str());
            for header in headers {
                let (name, value) = header
                    .split_once(':')
                    .with_context(|| format!("Invalid header, expected `name: value`: {header}"))?;
                builder = builder.header(name.trim(), value.trim());
            }
            let req = builder
                .body(body.clone().unwrap_or_default().into_bytes())
                .context("Invalid request")?;

            let res = app.handle(req);
            writeln!(out, "{:?} {}", res.version(), res.status())?;
            for (name, value) in res.headers() {
                writeln!(out, "{name}: {}", String::from_utf8_lossy(value.as_bytes()))?;
            }
            writeln!(out)?;
            out.write_all(res.body())?;
            writeln!(out)?;

            if let Some(collector) = collector {
                writeln!(out)?;
                out.write_all(collector.render_prometheus().as_bytes())?;
            }
            Ok(())
        }
    }
}
