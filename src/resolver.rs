//! Flag resolution for a single file
//!
//! Headers have no entry of their own in a compilation database, so they
//! borrow the flags of their companion implementation file, or of a
//! project-wide fallback source when no companion exists.

use crate::config::Config;
use crate::database::{absolute, CompilationDatabase, CompilationInfo};
use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Flags that take a path as the following argument
const PATH_FLAGS: &[&str] = &[
    "-I",
    "-isystem",
    "-iquote",
    "-idirafter",
    "-isysroot",
    "-include",
    "-include-pch",
    "-imacros",
    "-F",
    "--sysroot",
];

/// Passed through while a path operand is pending, as in `-Xclang -include-pch -Xclang x.pch`
const FORWARDING_FLAGS: &[&str] = &["-Xclang", "-Xpreprocessor"];

/// Prefixes of flags that carry a path joined to the flag itself.
/// Longer prefixes first so `-isystem` is not read as `-i` + `system`.
/// A remainder starting with `-` is another flag, not a path.
const JOINED_PATH_PREFIXES: &[&str] = &[
    "--sysroot=",
    "-idirafter",
    "-isysroot",
    "-isystem",
    "-include",
    "-imacros",
    "-iquote",
    "-I",
    "-F",
];

/// Compiler flags for one file, in the shape completion hosts expect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    /// Flags in compilation database order
    pub flags: Vec<String>,
    /// Whether the host may reuse these flags for later requests on the same file
    pub do_cache: bool,
}

/// Outcome of one query, as handed to the exporters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// File as named by the caller
    pub file: String,
    /// Resolved flags, or `None` when nothing is known about the file
    pub configuration: Option<Configuration>,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        self.configuration.is_some()
    }
}

/// Resolves compiler flags for files of one project
pub struct FlagResolver<'a> {
    config: &'a Config,
}

impl<'a> FlagResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Resolve flags for `filename`, collapsing every failure to `None`
    ///
    /// A database that exists but cannot be parsed is logged and treated
    /// like a missing one.
    pub fn resolve(&self, filename: &Path) -> Option<Configuration> {
        match self.try_resolve(filename) {
            Ok(configuration) => configuration,
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    /// Resolve flags for `filename`
    ///
    /// # Returns
    /// * `Ok(None)` - no database, no usable source for a header, or no flags
    /// * `Ok(Some(_))` - a non-empty flag list with caching allowed
    /// * `Err(_)` - the database directory exists but its contents are unusable
    pub fn try_resolve(&self, filename: &Path) -> Result<Option<Configuration>> {
        let Some(database) = CompilationDatabase::open(&self.config.database_path())? else {
            return Ok(None);
        };

        let Some(info) = self.compilation_info(&database, filename) else {
            log::debug!("No compile command for '{}'", filename.display());
            return Ok(None);
        };

        if info.compiler_flags.is_empty() {
            log::debug!("Empty compile command for '{}'", filename.display());
            return Ok(None);
        }

        let flags = if self.config.absolute_paths {
            make_paths_absolute(&info.compiler_flags, &info.working_directory)
        } else {
            info.compiler_flags
        };

        Ok(Some(Configuration {
            flags,
            do_cache: true,
        }))
    }

    /// Query the database for `filename`, or for the file standing in for it
    fn compilation_info(
        &self,
        database: &CompilationDatabase,
        filename: &Path,
    ) -> Option<CompilationInfo> {
        if !self.config.is_header(filename) {
            return database.compilation_info_for_file(filename);
        }

        let source = self.translation_unit_for_header(filename)?;
        log::debug!(
            "Using '{}' for header '{}'",
            source.display(),
            filename.display()
        );
        database.compilation_info_for_file(&source)
    }

    /// The implementation file whose flags apply to `header`
    ///
    /// The companion `foo.cpp` for `foo.hpp` when it exists on disk, else
    /// the fallback source when that exists, else nothing.
    fn translation_unit_for_header(&self, header: &Path) -> Option<PathBuf> {
        let companion = header.with_extension(&self.config.source_extension);
        if companion.exists() {
            return Some(companion);
        }

        let fallback = self.config.fallback_path();
        if fallback.exists() {
            return Some(fallback);
        }

        log::debug!(
            "Neither '{}' nor fallback '{}' exists",
            companion.display(),
            fallback.display()
        );
        None
    }
}

/// Rewrite relative path arguments of include-style flags to absolute paths
///
/// The number and order of flags never change; only the path parts of
/// recognized flags are rewritten.
pub fn make_paths_absolute(flags: &[String], working_directory: &Path) -> Vec<String> {
    let anchor = |path: &str| -> String {
        let path = Path::new(path);
        if path.is_absolute() {
            path.display().to_string()
        } else {
            absolute(&working_directory.join(path)).display().to_string()
        }
    };

    let mut result = Vec::with_capacity(flags.len());
    let mut path_follows = false;

    for flag in flags {
        if path_follows && FORWARDING_FLAGS.contains(&flag.as_str()) {
            result.push(flag.clone());
            continue;
        }

        if path_follows {
            result.push(anchor(flag));
            path_follows = false;
            continue;
        }

        if PATH_FLAGS.contains(&flag.as_str()) {
            result.push(flag.clone());
            path_follows = true;
            continue;
        }

        let joined = JOINED_PATH_PREFIXES
            .iter()
            .find(|prefix| {
                flag.len() > prefix.len()
                    && flag.starts_with(*prefix)
                    && !flag[prefix.len()..].starts_with('-')
            });

        match joined {
            Some(prefix) => result.push(format!("{}{}", prefix, anchor(&flag[prefix.len()..]))),
            None => result.push(flag.clone()),
        }
    }

    result
}
