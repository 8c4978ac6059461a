//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for harp-version.

use clap::{Parser, Subcommand};

/// harp-version - Harp device version tool
///
/// Parses, compares and checks the floating hardware, firmware and protocol
/// versions reported by Harp devices.
#[derive(Parser, Debug)]
#[command(name = "harp-version")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a version and print its canonical form
    Parse {
        /// Version such as 1, 1.2, 1.2.3 or 1.2.x
        #[arg(value_name = "VERSION")]
        input: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two versions in the total order
    Compare {
        /// Left-hand version
        left: String,

        /// Right-hand version
        right: String,
    },

    /// Exit successfully if two versions are compatible
    Satisfies {
        /// Left-hand version
        left: String,

        /// Right-hand version
        right: String,
    },

    /// Parse firmware metadata (name|hardware|firmware|assembly|id)
    Metadata {
        /// Metadata text, e.g. "Behavior|1.1|2.3.1|0.4|1216"
        metadata: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check firmware metadata against the configured device table
    Check {
        /// Metadata text, e.g. "Behavior|1.1|2.3.1|0.4|1216"
        metadata: String,

        /// Path to configuration file
        #[arg(short, long, env = "HARP_CONFIG")]
        config: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
