//! JSON compilation database access
//!
//! Loads `compile_commands.json` from a build directory and answers
//! "which flags compile this file" queries. A database is opened per
//! lookup and never cached, so a rebuilt database is picked up immediately.

mod command;

use crate::config::DATABASE_FILENAME;
use crate::error::{FlagsError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use command::{normalize_path, CompileCommand};

/// Flags for one translation unit, as found in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationInfo {
    /// Full compiler invocation in database order
    pub compiler_flags: Vec<String>,
    /// Directory the compiler runs in; relative flags are relative to it
    pub working_directory: PathBuf,
}

/// A loaded compilation database
#[derive(Debug)]
pub struct CompilationDatabase {
    /// Directory the database was loaded from
    directory: PathBuf,
    commands: Vec<CompileCommand>,
}

impl CompilationDatabase {
    /// Open the database stored in `dir`
    ///
    /// # Returns
    /// `Ok(None)` when `dir` does not exist, the database otherwise. A
    /// directory without a readable, well-formed `compile_commands.json`
    /// is an error.
    pub fn open(dir: &Path) -> Result<Option<Self>> {
        if !dir.exists() {
            log::debug!("No compilation database directory at '{}'", dir.display());
            return Ok(None);
        }

        let path = dir.join(DATABASE_FILENAME);
        let file = File::open(&path).map_err(|e| FlagsError::DatabaseUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let commands: Vec<CompileCommand> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| FlagsError::DatabaseMalformed {
                path: path.clone(),
                source,
            })?;

        log::debug!(
            "Loaded {} compile commands from '{}'",
            commands.len(),
            path.display()
        );

        Ok(Some(Self {
            directory: absolute(dir),
            commands,
        }))
    }

    /// Parse a database from a JSON string, anchoring relative entries at `directory`
    #[cfg(test)]
    pub fn from_json(directory: &Path, json: &str) -> Result<Self> {
        let commands: Vec<CompileCommand> =
            serde_json::from_str(json).map_err(|source| FlagsError::DatabaseMalformed {
                path: directory.join(DATABASE_FILENAME),
                source,
            })?;
        Ok(Self {
            directory: directory.to_path_buf(),
            commands,
        })
    }

    /// Look up the compile command for `file`
    ///
    /// Paths are compared after making them absolute and lexically
    /// normalized. The first matching entry wins.
    pub fn compilation_info_for_file(&self, file: &Path) -> Option<CompilationInfo> {
        let wanted = absolute(file);

        let command = self
            .commands
            .iter()
            .find(|cmd| cmd.source_path(&self.directory) == wanted)?;

        Some(CompilationInfo {
            compiler_flags: command.arguments(),
            working_directory: command.working_directory(&self.directory),
        })
    }
}

/// Make `path` absolute against the process working directory, then normalize it
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_path(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize_path(&cwd.join(path)),
        Err(e) => {
            log::warn!("Cannot determine working directory: {}", e);
            normalize_path(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const JSON: &str = r#"[
        {
            "directory": "/proj/Build",
            "file": "/proj/Source/Main.cpp",
            "arguments": ["c++", "-I/proj/Source", "-std=c++17", "-c", "/proj/Source/Main.cpp"]
        },
        {
            "directory": "/proj/Build",
            "file": "../Source/UI/MainWindow.cpp",
            "command": "c++ -I../Source -DQT_WIDGETS_LIB -c ../Source/UI/MainWindow.cpp"
        },
        {
            "directory": "/elsewhere",
            "file": "/proj/Source/Main.cpp",
            "arguments": ["cc", "-O3"]
        }
    ]"#;

    #[test]
    fn test_lookup_absolute_entry() {
        let db = CompilationDatabase::from_json(Path::new("/proj/Build"), JSON).unwrap();
        assert_eq!(db.commands.len(), 3);

        let info = db
            .compilation_info_for_file(Path::new("/proj/Source/Main.cpp"))
            .unwrap();
        // first match wins
        assert_eq!(
            info.compiler_flags,
            vec!["c++", "-I/proj/Source", "-std=c++17", "-c", "/proj/Source/Main.cpp"]
        );
        assert_eq!(info.working_directory, PathBuf::from("/proj/Build"));
    }

    #[test]
    fn test_lookup_relative_entry() {
        let db = CompilationDatabase::from_json(Path::new("/proj/Build"), JSON).unwrap();
        let info = db
            .compilation_info_for_file(Path::new("/proj/Source/UI/../UI/MainWindow.cpp"))
            .unwrap();
        assert_eq!(
            info.compiler_flags,
            vec!["c++", "-I../Source", "-DQT_WIDGETS_LIB", "-c", "../Source/UI/MainWindow.cpp"]
        );
    }

    #[test]
    fn test_lookup_missing_entry() {
        let db = CompilationDatabase::from_json(Path::new("/proj/Build"), JSON).unwrap();
        assert!(db
            .compilation_info_for_file(Path::new("/proj/Source/SampleProvider.cpp"))
            .is_none());
    }

    #[test]
    fn test_open_missing_directory() {
        let temp = TempDir::new().unwrap();
        let result = CompilationDatabase::open(&temp.path().join("Build")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_open_directory_without_json() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Build");
        fs::create_dir(&dir).unwrap();

        let result = CompilationDatabase::open(&dir);
        assert!(matches!(result, Err(FlagsError::DatabaseUnreadable { .. })));
    }

    #[test]
    fn test_open_malformed_json() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Build");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(DATABASE_FILENAME), r#"{"not": "an array"}"#).unwrap();

        let result = CompilationDatabase::open(&dir);
        assert!(matches!(result, Err(FlagsError::DatabaseMalformed { .. })));
    }

    #[test]
    fn test_open_and_lookup_on_disk() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Build");
        fs::create_dir(&dir).unwrap();
        let source = temp.path().join("a.cpp");
        let json = serde_json::json!([{
            "directory": dir,
            "file": "../a.cpp",
            "arguments": ["c++", "-Wall", "-c", "../a.cpp"],
        }]);
        fs::write(dir.join(DATABASE_FILENAME), json.to_string()).unwrap();

        let db = CompilationDatabase::open(&dir).unwrap().unwrap();
        let info = db.compilation_info_for_file(&source).unwrap();
        assert_eq!(info.compiler_flags, vec!["c++", "-Wall", "-c", "../a.cpp"]);
        assert_eq!(info.working_directory, dir);
    }
}
