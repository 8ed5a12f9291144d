//! JSON exporter
//!
//! A single file named on the command line prints exactly what a completion
//! host expects back from its flags callback: `{"flags": [...], "do_cache": true}`
//! or `null`. A batch (several files, or a list read from stdin) always
//! prints an array, even when it holds one entry or none.

use crate::error::Result;
use crate::export::Exporter;
use crate::resolver::Resolution;
use serde::Serialize;
use std::io::Write;

/// JSON output exporter
pub struct JsonExporter {
    /// Print an array of entries instead of a single configuration
    pub batch: bool,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    file: &'a str,
    flags: Option<&'a [String]>,
    do_cache: bool,
}

impl Exporter for JsonExporter {
    fn export(&self, resolutions: &[Resolution], writer: &mut dyn Write) -> Result<()> {
        let json = match resolutions {
            [single] if !self.batch => serde_json::to_string_pretty(&single.configuration)?,
            _ => {
                let entries: Vec<JsonEntry> = resolutions
                    .iter()
                    .map(|r| JsonEntry {
                        file: &r.file,
                        flags: r.configuration.as_ref().map(|c| c.flags.as_slice()),
                        do_cache: r.configuration.as_ref().is_some_and(|c| c.do_cache),
                    })
                    .collect();
                serde_json::to_string_pretty(&entries)?
            }
        };
        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
