use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use devus::build::clean::clean;
use devus::build::config::{BuildConfig, CONFIG_EXTENSION};
use devus::build::driver::CompilerDriver;
use devus::error::OpError;
use std::path::Path;

#[derive(Parser)]
#[command(
    name = "buildus",
    version = "0.1.0",
    about = "A miniature incremental C/C++ build driver"
)]
struct Cli {
    /// Path to the .buildus config file, or the word `clean`
    #[arg(index = 1)]
    target: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.target == "clean" {
        return clean(&std::env::current_dir()?);
    }

    let config_path = Path::new(&cli.target);
    let has_config_extension = config_path
        .extension()
        .is_some_and(|extension| extension == CONFIG_EXTENSION);
    if !has_config_extension {
        return Err(OpError::BadArgs(format!(
            "config file must have a .{CONFIG_EXTENSION} extension"
        ))
        .into());
    }

    let config = BuildConfig::from_file(config_path)?;
    let mut driver = CompilerDriver::new(config)?;
    driver.build()
}
