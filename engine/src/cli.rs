//! CLI interface for the estimator
//!
//! This module provides the command-line interface using clap's derive API.
//! Every estimation command takes its request as a JSON document, either as
//! the positional argument or on stdin.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// COCOMO II effort estimation and Monte Carlo risk analysis
///
/// Prints one JSON object per invocation on stdout. Failures print
/// `{"error": "..."}` on stderr and exit non-zero.
#[derive(Parser, Debug)]
#[command(name = "cocomo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Indent JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Basic COCOMO point estimate
    Basic {
        /// JSON request; read from stdin when omitted or "-"
        request: Option<String>,
    },

    /// COCOMO II point estimate with scale and cost drivers
    Advanced {
        /// JSON request; read from stdin when omitted or "-"
        request: Option<String>,

        /// Use the closed-form equations instead of the trained model
        #[arg(long)]
        formula: bool,
    },

    /// Monte Carlo distribution of a basic estimate
    MonteCarlo {
        /// JSON request; read from stdin when omitted or "-"
        request: Option<String>,

        /// Fixed seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Run trials on the current thread only
        #[arg(long)]
        sequential: bool,
    },

    /// List recognized scale and cost drivers
    Drivers,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
}
