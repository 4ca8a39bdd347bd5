//! Config command implementation.
//!
//! Validates a configuration file and prints it with every default filled in.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use spreadwatch_config::{SpreadwatchConfig, Validate};

use crate::cli::OutputFormat;
use crate::output::{print_json, print_success, print_warning, Context};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file (TOML)
    #[arg(short, long, env = "SPREADWATCH_CONFIG")]
    pub config: PathBuf,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: Context) -> Result<()> {
    let config = SpreadwatchConfig::from_file(&args.config)?;

    for err in config.validate() {
        print_warning(&err.to_string());
    }
    config.validate_or_error()?;

    match ctx.format {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Table | OutputFormat::Csv => print!("{}", config.to_toml_string()?),
    }
    if ctx.format == OutputFormat::Table && !ctx.quiet {
        print_success(&format!(
            "{}: {} bonds, {} pairs",
            args.config.display(),
            config.bonds.len(),
            config.pairs.len()
        ));
    }
    Ok(())
}
