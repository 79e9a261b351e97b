//! Durable record of which amino acids each report lacks.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Report path -> catalog amino acids with a zero total in that report.
/// Only reports missing at least one amino acid have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingAminoAcidIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl MissingAminoAcidIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `missing` for `path`. Empty lists are not stored, and neither
    /// are paths that are not valid UTF-8.
    pub fn record(&mut self, path: &Path, missing: Vec<String>) {
        if missing.is_empty() {
            return;
        }
        match path.to_str() {
            Some(key) => {
                self.entries.insert(key.to_string(), missing);
            }
            None => log::warn!("Not indexing non UTF-8 path {}", path.display()),
        }
    }

    pub fn merge(&mut self, other: MissingAminoAcidIndex) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries
            .iter()
            .map(|(path, missing)| (path.as_str(), missing.as_slice()))
    }
}

/// Write the index as JSON to `path`, replacing whatever is there.
///
/// The content goes to a temporary file in the same directory first and is
/// renamed into place, so a failed write leaves any previous artifact intact.
pub fn save_missing_index(index: &MissingAminoAcidIndex, path: &Path) -> Result<()> {
    let persist_error = |source| Error::Persist {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(persist_error)?;
    {
        let mut wtr = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut wtr, index).map_err(|e| persist_error(e.into()))?;
        wtr.flush().map_err(persist_error)?;
    }
    tmp.persist(path).map_err(|e| persist_error(e.error))?;
    log::info!("Missing amino acid index saved to {}", path.display());
    Ok(())
}

pub fn load_missing_index(path: &Path) -> Result<MissingAminoAcidIndex> {
    let file = File::open(path).map_err(|source| Error::ReadReport {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}
