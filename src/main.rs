//! compdb-flags - Compiler flags for code-completion engines
//!
//! Reads a JSON compilation database and prints the flags needed to
//! analyze a file. Headers borrow the flags of their companion
//! implementation file, or of a project-wide fallback source.

mod batch;
mod cli;
mod config;
mod database;
mod error;
mod export;
mod resolver;

use batch::{load_queries, resolve_all};
use clap::Parser;
use cli::Cli;
use export::{create_exporter, get_output_writer};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    // Convert to config
    let config = match cli.into_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    // Diagnostics go to stderr; stdout is reserved for the flags
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level().as_str()),
    )
    .init();

    // === Phase 1: Collect Queries ===
    let queries = match load_queries(&config, std::io::stdin().lock()) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    log::info!(
        "Resolving {} file(s) against '{}'",
        queries.len(),
        config.database_path().display()
    );

    // === Phase 2: Resolve ===
    let resolutions = match resolve_all(&queries, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    // === Phase 3: Export Results ===
    let exporter = create_exporter(&config);
    let mut writer = match get_output_writer(&config.output_filename) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error creating output: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = exporter.export(&resolutions, &mut *writer) {
        eprintln!("Error writing output: {}", e);
        return ExitCode::from(2);
    }

    if let Err(e) = writer.flush() {
        eprintln!("Error flushing output: {}", e);
        return ExitCode::from(2);
    }

    // === Phase 4: Exit Code ===
    if resolutions.is_empty() {
        log::warn!("No files to resolve");
        return ExitCode::from(1);
    }

    let unresolved = resolutions.iter().filter(|r| !r.is_resolved()).count();
    if unresolved > 0 {
        log::info!("No flags for {} of {} file(s)", unresolved, resolutions.len());
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
