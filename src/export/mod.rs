//! Export system for resolved flag configurations

mod json;
mod plain;

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::resolver::Resolution;
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub use json::JsonExporter;
pub use plain::PlainExporter;

/// Trait for output formatting
pub trait Exporter {
    /// Write the complete output for the given resolutions, in query order
    fn export(&self, resolutions: &[Resolution], writer: &mut dyn Write) -> Result<()>;
}

/// Create an appropriate exporter based on configuration
pub fn create_exporter(config: &Config) -> Box<dyn Exporter> {
    let batch = config.is_batch();
    match config.output_format {
        OutputFormat::Json => Box::new(JsonExporter { batch }),
        OutputFormat::Plain => Box::new(PlainExporter { batch }),
    }
}

/// Get a writer for the output (file or stdout)
pub fn get_output_writer(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(BufWriter::new(io::stdout())))
    } else {
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
