//! Swagger-from-metadata - Command-line tool for generating Swagger documents.
//!
//! This binary generates a Swagger 2.0 specification from a JSON descriptor
//! snapshot of compiled service-handler types and delivers it to stdout, a
//! file, or a remote endpoint.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-metadata [OPTIONS] <DESCRIPTORS_JSON>
//! ```
//!
//! # Examples
//!
//! Generate JSON documentation:
//! ```bash
//! swagger-from-metadata descriptors.json -o swagger.json
//! ```
//!
//! Generate YAML with custom settings:
//! ```bash
//! swagger-from-metadata descriptors.json -f yaml -s settings.json
//! ```
//!
//! Deliver to a documentation endpoint:
//! ```bash
//! swagger-from-metadata descriptors.json -u https://docs.example.com/api --header X-Token=abc
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_metadata::cli;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    // First, do a quick parse just to check for verbose flag
    let args_for_verbose = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger-from-metadata starting...");

    // Now do the full parse with validation
    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    // Run the main workflow
    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
