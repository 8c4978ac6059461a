//! harp-version - Harp device version tool
//!
//! Command-line front end for the `harp_version` library: parses and compares
//! device versions and checks firmware metadata against a table of supported
//! devices.

mod cli;

use clap::Parser;
use tracing::{debug, info, Level};

use harp_version::config::{self, HarpConfig};
use harp_version::error::Result;
use harp_version::logging;
use harp_version::protocol::{FirmwareMetadata, HarpVersion};

use crate::cli::{Cli, Commands, ConfigSubcommand};

/// Exit code when a compatibility check fails
const EXIT_INCOMPATIBLE: i32 = 1;

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    }
}

/// Execute the selected command and return the process exit code
fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check { metadata, config } => {
            let config = HarpConfig::load(config.as_deref())?;
            let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;
            check_metadata(&metadata, &config)
        }
        Commands::Config { subcommand } => {
            logging::init_simple(simple_level(cli.verbose, cli.quiet))?;
            handle_config_command(subcommand)
        }
        command => {
            logging::init_simple(simple_level(cli.verbose, cli.quiet))?;
            handle_value_command(command)
        }
    }
}

/// Log level for commands that don't load configuration
fn simple_level(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Handle commands that only work on version and metadata values
fn handle_value_command(command: Commands) -> Result<i32> {
    match command {
        Commands::Parse { input, json } => {
            let parsed = HarpVersion::parse(&input)?;
            debug!(input = %input, version = %parsed, "Parsed version");
            if json {
                let value = serde_json::json!({
                    "version": parsed,
                    "major": parsed.major(),
                    "minor": parsed.minor(),
                    "patch": parsed.patch(),
                    "exact": parsed.is_exact(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", parsed);
            }
            Ok(0)
        }
        Commands::Compare { left, right } => {
            let left = HarpVersion::parse(&left)?;
            let right = HarpVersion::parse(&right)?;
            let op = match left.compare(&right) {
                std::cmp::Ordering::Less => "<",
                std::cmp::Ordering::Equal => "=",
                std::cmp::Ordering::Greater => ">",
            };
            println!("{} {} {}", left, op, right);
            println!("compatible: {}", left.satisfies(&right));
            Ok(0)
        }
        Commands::Satisfies { left, right } => {
            let left = HarpVersion::parse(&left)?;
            let right = HarpVersion::parse(&right)?;
            if left.satisfies(&right) {
                println!("{} satisfies {}", left, right);
                Ok(0)
            } else {
                println!("{} does not satisfy {}", left, right);
                Ok(EXIT_INCOMPATIBLE)
            }
        }
        Commands::Metadata { metadata, json } => {
            let metadata = FirmwareMetadata::parse(&metadata)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                println!("name:     {}", metadata.name());
                println!("hardware: {}", metadata.hardware_version());
                println!("firmware: {}", metadata.firmware_version());
                println!("assembly: {}", metadata.assembly_version());
                println!("id:       {}", metadata.id());
            }
            Ok(0)
        }
        Commands::Check { .. } | Commands::Config { .. } => {
            // Handled in run()
            unreachable!()
        }
    }
}

/// Check firmware metadata against the configured device table
fn check_metadata(text: &str, config: &HarpConfig) -> Result<i32> {
    let metadata = FirmwareMetadata::parse(text)?;
    let table = config.compatibility_table();
    info!(devices = table.devices().len(), metadata = %metadata, "Checking device");

    let result = table.check(&metadata);
    println!("{}: {}", metadata.name(), result);

    Ok(if result.is_supported() { 0 } else { EXIT_INCOMPATIBLE })
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<i32> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = HarpConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let path = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", path.display());
        }
        ConfigSubcommand::Validate { config } => {
            let cfg = HarpConfig::load(config.as_deref())?;
            println!(
                "Configuration is valid ({} supported devices).",
                cfg.devices.len()
            );
        }
    }

    Ok(0)
}
