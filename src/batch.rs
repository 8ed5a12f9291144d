//! Query collection and batch resolution

use crate::config::Config;
use crate::error::{FlagsError, Result};
use crate::resolver::{FlagResolver, Resolution};
use rayon::prelude::*;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Expand the configured queries into the list of files to resolve
///
/// A query of "-" is replaced by the filenames read from `stdin`, one per
/// line. Blank lines are skipped and surrounding whitespace is trimmed.
pub fn load_queries(config: &Config, stdin: impl Read) -> Result<Vec<String>> {
    let mut stdin = Some(stdin);
    let mut queries = Vec::new();

    for query in &config.queries {
        if query != "-" {
            queries.push(query.clone());
            continue;
        }

        let Some(input) = stdin.take() else {
            log::warn!("Standard input listed more than once; ignoring repeat");
            continue;
        };

        let lines = BufReader::new(input)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| FlagsError::InputUnreadable {
                path: "-".to_string(),
                reason: e.to_string(),
            })?;

        queries.extend(
            lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .map(String::from),
        );
    }

    Ok(queries)
}

/// Resolve every query, in parallel, keeping the input order
///
/// In strict mode the first unusable database aborts the batch; otherwise
/// such failures are logged and reported as unresolved.
pub fn resolve_all(queries: &[String], config: &Config) -> Result<Vec<Resolution>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| FlagsError::ThreadPool(e.to_string()))?;

    let resolver = FlagResolver::new(config);

    pool.install(|| {
        queries
            .par_iter()
            .map(|file| -> Result<Resolution> {
                let path = Path::new(file);
                let configuration = if config.strict {
                    resolver.try_resolve(path)?
                } else {
                    resolver.resolve(path)
                };
                Ok(Resolution {
                    file: file.clone(),
                    configuration,
                })
            })
            .collect()
    })
}
