//! Configuration types for compdb-flags

use std::path::{Path, PathBuf};

/// Name of the JSON compilation database inside the database directory
pub const DATABASE_FILENAME: &str = "compile_commands.json";

/// Output format for resolved configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `{"flags": [...], "do_cache": true}` as consumed by completion hosts
    #[default]
    Json,
    /// Shell-quoted flags, one line per query
    Plain,
}

/// Configuration options for compdb-flags
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root; the database directory and fallback source are relative to it
    pub root_dir: PathBuf,

    /// Name of the directory under `root_dir` holding the compilation database
    /// (default: "Build")
    pub database_dir: String,

    /// Implementation file used for headers without a companion, relative
    /// to `root_dir` (default: "Source/Main.cpp")
    pub fallback_source: PathBuf,

    /// Extensions (without the dot) of files that have no compile entry of their own
    pub header_extensions: Vec<String>,

    /// Extension substituted for a header extension to find the companion file
    pub source_extension: String,

    /// Make relative path-valued flags absolute against the compiler working directory
    pub absolute_paths: bool,

    /// Treat a malformed database as a hard error instead of "no flags"
    pub strict: bool,

    /// Files to resolve flags for ("-" reads the list from stdin)
    pub queries: Vec<String>,

    /// Path to output file (or "-" for stdout)
    pub output_filename: String,

    /// Output format (json or plain)
    pub output_format: OutputFormat,

    /// Number of threads for batch resolution (default: num_cpus)
    pub num_threads: usize,

    /// Log verbosity: 0 = warnings, 1 = info, 2 = debug, 3+ = trace
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            database_dir: String::from("Build"),
            fallback_source: PathBuf::from("Source").join("Main.cpp"),
            header_extensions: vec![String::from("hpp")],
            source_extension: String::from("cpp"),
            absolute_paths: false,
            strict: false,
            queries: Vec::new(),
            output_filename: String::from("-"),
            output_format: OutputFormat::Json,
            num_threads: num_cpus::get(),
            verbosity: 0,
        }
    }
}

impl Config {
    /// Directory expected to contain the compilation database
    pub fn database_path(&self) -> PathBuf {
        self.root_dir.join(&self.database_dir)
    }

    /// Absolute-or-root-relative location of the fallback implementation file
    pub fn fallback_path(&self) -> PathBuf {
        self.root_dir.join(&self.fallback_source)
    }

    /// Default log level filter for the verbosity, before `RUST_LOG` overrides
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Whether output covers a batch rather than one file named on the command line
    ///
    /// Reading the list from stdin is always a batch, whatever its length.
    pub fn is_batch(&self) -> bool {
        !matches!(self.queries.as_slice(), [single] if single != "-")
    }

    /// Whether `path` carries one of the configured header extensions
    pub fn is_header(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.header_extensions.iter().any(|h| h == ext),
            None => false,
        }
    }
}
