//! NFS export access checker
//!
//! Evaluates client addresses against a configured export host list.

use clap::{Parser, Subcommand};
use nfs_exports::{
    AccessPrivilege, NfsExports,
    config::{AppConfig, LogFormat, load_config_with_hosts},
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// NFS export access checker - evaluate clients against export host rules
#[derive(Parser, Debug)]
#[command(name = "nfs-exports")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "NFS_EXPORTS_CONFIG")]
    config: Option<String>,

    /// Export host list, overrides the configured one
    #[arg(long, env = "NFS_EXPORTS_HOSTS")]
    hosts: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NFS_EXPORTS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the privilege a client gets
    Check {
        /// Client address
        address: String,

        /// Client hostname (defaults to the address)
        hostname: Option<String>,

        /// Also show the rule that decided
        #[arg(long)]
        explain: bool,
    },

    /// List the export host groups
    List,

    /// Validate the export host list
    Validate,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    address: &'a str,
    hostname: &'a str,
    privilege: AccessPrivilege,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'a str>,
}

fn init_logging(args: &Args, config: &AppConfig) {
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration before logging, the format comes from it
    let config = load_config_with_hosts(args.config.as_deref(), args.hosts.as_deref())?;

    init_logging(&args, &config);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting nfs-exports");

    let exports = NfsExports::from_config(&config.exports)
        .inspect_err(|e| error!(error = %e, "Failed to compile export host list"))?;

    match &args.command {
        Command::Check {
            address,
            hostname,
            explain,
        } => {
            let hostname = hostname.as_deref().unwrap_or(address);
            let privilege = exports.access_privilege(address, hostname);
            let rule = explain
                .then(|| exports.resolver().find_match(address, hostname))
                .flatten()
                .map(|rule| rule.host());

            if args.json {
                let output = CheckOutput {
                    address,
                    hostname,
                    privilege,
                    rule,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match rule {
                    Some(rule) => println!("{} (matched '{}')", privilege, rule),
                    None if *explain => println!("{} (no rule matched)", privilege),
                    None => println!("{}", privilege),
                }
            }
        }
        Command::List => {
            let groups = exports.host_groups();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                for group in groups {
                    println!("{}", group);
                }
            }
        }
        Command::Validate => {
            let rules = exports.rules().len();
            if args.json {
                println!("{}", serde_json::json!({ "valid": true, "rules": rules }));
            } else {
                println!("OK: {} rule(s)", rules);
            }
        }
    }

    Ok(())
}
