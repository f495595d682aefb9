//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// zonepull - export DNS zones from an OpenXML registrar API
#[derive(Debug, Parser)]
#[command(name = "zonepull")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ZONEPULL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export all zones plus the nameserver and DNSSEC side files
    Export {
        /// Keep zone files that already exist instead of refetching
        #[arg(long)]
        skip_existing: bool,
    },
    /// List the domains in the account
    Domains,
    /// List the active DNS zones
    Zones,
    /// Print one zone's records as zone-file text
    Records {
        /// Zone name, e.g. example.com
        zone: String,
    },
}
