//! A single entry of a JSON compilation database

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// One compile command from compile_commands.json
#[derive(Debug, Clone, Deserialize)]
pub struct CompileCommand {
    /// Working directory of the compilation
    pub directory: PathBuf,

    /// Main translation unit source, absolute or relative to `directory`
    pub file: PathBuf,

    /// Full command line as a single shell-quoted string
    #[serde(default)]
    pub command: Option<String>,

    /// Command line as an argument array (preferred over `command`)
    #[serde(default)]
    pub arguments: Option<Vec<String>>,

    /// Output file of the compilation step
    #[serde(default)]
    #[allow(dead_code)]
    pub output: Option<PathBuf>,
}

impl CompileCommand {
    /// The compiler invocation as an ordered argument list
    ///
    /// `arguments` is taken verbatim when present. Otherwise `command` is
    /// split following POSIX shell quoting.
    pub fn arguments(&self) -> Vec<String> {
        if let Some(args) = &self.arguments {
            args.clone()
        } else if let Some(cmd) = &self.command {
            split_command_line(cmd)
        } else {
            Vec::new()
        }
    }

    /// Normalized absolute path of the source file this entry compiles
    ///
    /// A relative `directory` is taken relative to `base`, the directory the
    /// database was loaded from.
    pub fn source_path(&self, base: &Path) -> PathBuf {
        normalize_path(&self.working_directory(base).join(&self.file))
    }

    /// Working directory, anchored at `base` when stored relative
    pub fn working_directory(&self, base: &Path) -> PathBuf {
        normalize_path(&base.join(&self.directory))
    }
}

/// Split a command line into arguments
///
/// Handles single quotes (literal), double quotes (backslash escapes `"`,
/// `\`, `$` and backtick) and backslash escapes outside quotes. Unbalanced
/// quotes run to the end of the string.
pub fn split_command_line(cmd: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = cmd.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_word = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => match chars.peek() {
                            Some(&next @ ('"' | '\\' | '$' | '`')) => {
                                current.push(next);
                                chars.next();
                            }
                            _ => current.push('\\'),
                        },
                        _ => current.push(q),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        args.push(current);
    }

    args
}

/// Lexically normalize a path: drop `.` components and fold `..`
///
/// Symlinks are not resolved, so this never touches the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_plain_command() {
        assert_eq!(
            split_command_line("c++  -Iinclude -DDEBUG=1\t-c main.cpp"),
            strings(&["c++", "-Iinclude", "-DDEBUG=1", "-c", "main.cpp"])
        );
    }

    #[test]
    fn test_split_quoted_command() {
        assert_eq!(
            split_command_line(r#"c++ -DNAME="\"Whistle Lab\"" -I'/opt/my libs' -c a.cpp"#),
            strings(&["c++", r#"-DNAME="Whistle Lab""#, "-I/opt/my libs", "-c", "a.cpp"])
        );
    }

    #[test]
    fn test_split_backslash_escapes() {
        assert_eq!(
            split_command_line(r"c++ -I/opt/my\ libs -DA=\'x\'"),
            strings(&["c++", "-I/opt/my libs", "-DA='x'"])
        );
    }

    #[test]
    fn test_split_empty_quotes_are_an_argument() {
        assert_eq!(split_command_line(r#"tool "" x"#), strings(&["tool", "", "x"]));
        assert!(split_command_line("   ").is_empty());
    }

    #[test]
    fn test_arguments_preferred_over_command() {
        let cmd = CompileCommand {
            directory: PathBuf::from("/p/Build"),
            file: PathBuf::from("../Source/Main.cpp"),
            command: Some("cc -O0".to_string()),
            arguments: Some(strings(&["c++", "-O2"])),
            output: None,
        };
        assert_eq!(cmd.arguments(), strings(&["c++", "-O2"]));
    }

    #[test]
    fn test_command_and_arguments_agree() {
        let from_command = CompileCommand {
            directory: PathBuf::from("/p"),
            file: PathBuf::from("a.cpp"),
            command: Some(r#"c++ "-I/a b" -std=c++17 -c a.cpp"#.to_string()),
            arguments: None,
            output: None,
        };
        let from_arguments = CompileCommand {
            command: None,
            arguments: Some(strings(&["c++", "-I/a b", "-std=c++17", "-c", "a.cpp"])),
            ..from_command.clone()
        };
        assert_eq!(from_command.arguments(), from_arguments.arguments());
    }

    #[test]
    fn test_source_path_relative_file() {
        let cmd = CompileCommand {
            directory: PathBuf::from("/p/Build"),
            file: PathBuf::from("../Source/./UI/MainWindow.cpp"),
            command: None,
            arguments: None,
            output: None,
        };
        assert_eq!(
            cmd.source_path(Path::new("/p/Build")),
            PathBuf::from("/p/Source/UI/MainWindow.cpp")
        );
        assert!(cmd.arguments().is_empty());
    }

    #[test]
    fn test_source_path_relative_directory() {
        let cmd = CompileCommand {
            directory: PathBuf::from("."),
            file: PathBuf::from("x.cpp"),
            command: None,
            arguments: None,
            output: None,
        };
        assert_eq!(cmd.source_path(Path::new("/p/Build")), PathBuf::from("/p/Build/x.cpp"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("../a/../../b")), PathBuf::from("../../b"));
    }
}
