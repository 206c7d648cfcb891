//! Loading and saving an [`Expe`] as JSON, with the stats-in-filename
//! checkpoint convention layered on top.

pub mod csv_import;
pub mod naming;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;

use crate::core::{Expe, Meta, QA};
use crate::error::{Error, PersistenceError, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%Hh%M,%S";

/// Loads an `Expe` from `path`, tolerating both a bare `[...]` array of QAs
/// and the `{meta, items}` object shape.
pub fn load(path: &Path) -> Result<Expe> {
    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;

    match value {
        Value::Array(items) => {
            let qas = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<QA>, _>>()?;
            Ok(Expe::from_qas(qas))
        }
        Value::Object(mut map) => {
            if let Some(items) = map.remove("items") {
                let qas: Vec<QA> = serde_json::from_value(items)?;
                let meta: Meta = map
                    .remove("meta")
                    .map(serde_json::from_value)
                    .transpose()?
                    .unwrap_or_default();
                Ok(Expe { qas, meta })
            } else {
                Ok(serde_json::from_value(Value::Object(map))?)
            }
        }
        _ => Err(Error::Persistence(PersistenceError::UnrecognizedShape)),
    }
}

/// Saves `expe` to `path`, appending (or replacing) the stats/timestamp
/// suffix on the filename stem and refusing to clobber an existing file
/// unless `allow_overwrite` is set.
///
/// Returns the path actually written, which differs from `path` whenever
/// a suffix was applied.
///
/// # Errors
///
/// Returns [`PersistenceError::EmptyExport`] if `expe` has zero QAs, and
/// [`PersistenceError::WouldOverwrite`] if the resolved path exists and
/// `allow_overwrite` is `false`.
pub fn save(expe: &Expe, path: &Path, allow_overwrite: bool) -> Result<PathBuf> {
    write(expe, &suffixed_path(expe, path), allow_overwrite)
}

/// Saves `expe` under a `Stopped_at_<index>_of_<total>_`-prefixed name next
/// to `path`, marking a mid-run failure checkpoint (`index` is 1-based).
///
/// Shares every other rule with [`save`] (zero-QA rejection, overwrite
/// guard, stats suffix).
pub fn save_failure_checkpoint(
    expe: &Expe,
    path: &Path,
    index: usize,
    total: usize,
    allow_overwrite: bool,
) -> Result<PathBuf> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("expe");
    let prefixed_stem = naming::failure_stem(stem, index, total);
    let mut prefixed_path = path.to_path_buf();
    prefixed_path.set_file_name(&prefixed_stem);
    write(expe, &suffixed_path(expe, &prefixed_path), allow_overwrite)
}

fn write(expe: &Expe, resolved: &Path, allow_overwrite: bool) -> Result<PathBuf> {
    if expe.is_empty() {
        return Err(Error::Persistence(PersistenceError::EmptyExport));
    }
    if resolved.exists() && !allow_overwrite {
        return Err(Error::Persistence(PersistenceError::WouldOverwrite {
            path: resolved.display().to_string(),
        }));
    }

    let json = serde_json::to_string_pretty(expe)?;
    fs::write(resolved, &json)?;
    Ok(resolved.to_path_buf())
}

fn suffixed_path(expe: &Expe, path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("expe");
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let suffix = naming::stats_suffix(&expe.stats(), &timestamp);
    let new_stem = naming::apply_suffix(stem, &suffix);

    let mut resolved = path.to_path_buf();
    resolved.set_file_name(&new_stem);
    resolved.set_extension("json");
    resolved
}
