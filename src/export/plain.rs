//! Plain text exporter

use crate::error::Result;
use crate::export::Exporter;
use crate::resolver::Resolution;
use std::io::Write;

/// Shell-quoted flags, ready to paste onto a compiler command line
pub struct PlainExporter {
    /// Prefix every line with the file it belongs to
    pub batch: bool,
}

impl Exporter for PlainExporter {
    fn export(&self, resolutions: &[Resolution], writer: &mut dyn Write) -> Result<()> {
        for resolution in resolutions {
            if self.batch {
                write!(writer, "{}: ", resolution.file)?;
            }
            match &resolution.configuration {
                Some(configuration) => {
                    let quoted: Vec<String> =
                        configuration.flags.iter().map(|f| shell_quote(f)).collect();
                    writeln!(writer, "{}", quoted.join(" "))?;
                }
                None => writeln!(writer, "<no flags>")?,
            }
        }

        Ok(())
    }
}

/// Quote `arg` for a POSIX shell, leaving plain words untouched
fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=+./,:@%".contains(c));

    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Configuration;

    fn export(resolutions: &[Resolution]) -> String {
        let mut output = Vec::new();
        PlainExporter {
            batch: resolutions.len() != 1,
        }
        .export(resolutions, &mut output)
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn resolved(file: &str, flags: &[&str]) -> Resolution {
        Resolution {
            file: file.to_string(),
            configuration: Some(Configuration {
                flags: flags.iter().map(|s| s.to_string()).collect(),
                do_cache: true,
            }),
        }
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("-I/usr/include"), "-I/usr/include");
        assert_eq!(shell_quote("-I/opt/my libs"), "'-I/opt/my libs'");
        assert_eq!(shell_quote("-DNAME=\"x\""), "'-DNAME=\"x\"'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_single_query() {
        let out = export(&[resolved("a.cpp", &["c++", "-I/a b", "-c"])]);
        assert_eq!(out, "c++ '-I/a b' -c\n");
    }

    #[test]
    fn test_batch_prefixes_file() {
        let out = export(&[
            resolved("a.cpp", &["-DA"]),
            Resolution {
                file: "b.hpp".to_string(),
                configuration: None,
            },
        ]);
        assert_eq!(out, "a.cpp: -DA\nb.hpp: <no flags>\n");
    }
}
