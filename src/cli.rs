//! CLI argument parsing using clap

use crate::config::{Config, OutputFormat};
use crate::error::{FlagsError, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Compiler flags from a compilation database
#[derive(Parser, Debug)]
#[command(name = "compdb-flags")]
#[command(version)]
#[command(
    about = "Print compiler flags for source and header files from a compilation database",
    long_about = None
)]
pub struct Cli {
    /// Files to resolve flags for (use "-" to read filenames from stdin).
    /// One FILE prints a single JSON object (or null); several FILEs or "-"
    /// print an array, even if stdin lists one file or none
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,

    /// Project root holding the database directory and the fallback source
    #[arg(short = 'r', long = "root", value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Name of the directory under the root containing compile_commands.json
    #[arg(short = 'b', long = "build-dir", value_name = "NAME", default_value = "Build")]
    pub build_dir: String,

    /// Source used for headers without a companion, relative to the root
    #[arg(long = "fallback", value_name = "PATH", default_value = "Source/Main.cpp")]
    pub fallback: PathBuf,

    /// Extension marking header files (repeatable)
    #[arg(long = "header-ext", value_name = "EXT", default_value = "hpp")]
    pub header_ext: Vec<String>,

    /// Extension of the companion implementation file
    #[arg(long = "source-ext", value_name = "EXT", default_value = "cpp")]
    pub source_ext: String,

    /// Rewrite relative include paths to absolute ones
    #[arg(long = "absolute-paths")]
    pub absolute_paths: bool,

    /// Fail instead of printing nothing when the database is malformed
    #[arg(long = "strict")]
    pub strict: bool,

    /// Output file for results (use "-" for stdout)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT", default_value = "-")]
    pub output: String,

    /// Output in JSON format (default)
    #[arg(long = "json")]
    pub json: bool,

    /// Output shell-quoted flags
    #[arg(long = "plain")]
    pub plain: bool,

    /// Number of threads for batch queries
    #[arg(short = 'j', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments into a Config
    pub fn into_config(self) -> Result<Config> {
        // Check for conflicting output format options
        if self.json && self.plain {
            return Err(FlagsError::OutputFormatConflict);
        }

        let output_format = if self.plain {
            OutputFormat::Plain
        } else {
            OutputFormat::Json
        };

        if self.threads == Some(0) {
            return Err(FlagsError::InvalidConfig(
                "--threads must be at least 1".to_string(),
            ));
        }

        let header_extensions: Vec<String> = self
            .header_ext
            .iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
        let source_extension = self.source_ext.trim_start_matches('.').to_string();

        if source_extension.is_empty() || header_extensions.iter().any(|e| e.is_empty()) {
            return Err(FlagsError::InvalidConfig(
                "extensions must not be empty".to_string(),
            ));
        }
        if header_extensions.contains(&source_extension) {
            return Err(FlagsError::InvalidConfig(format!(
                "'{}' cannot be both a header and a source extension",
                source_extension
            )));
        }

        Ok(Config {
            root_dir: self.root,
            database_dir: self.build_dir,
            fallback_source: self.fallback,
            header_extensions,
            source_extension,
            absolute_paths: self.absolute_paths,
            strict: self.strict,
            queries: self.files,
            output_filename: self.output,
            output_format,
            num_threads: self.threads.unwrap_or_else(num_cpus::get),
            verbosity: self.verbose,
        })
    }
}
