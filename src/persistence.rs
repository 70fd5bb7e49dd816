// File: src/persistence.rs
use crate::core::log::ActionLog;
use crate::core::store::{PhraseTable, TranslationStore};
use crate::core::types::{Language, LanguagePair};
use crate::error::TranslatorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Version tag written into the textual form.
pub const JSON_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Binary,
    Json,
}

impl Format {
    /// `.json` files are textual, everything else binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Binary,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Binary => "binary",
            Format::Json => "json",
        })
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binary" | "bin" => Ok(Format::Binary),
            "json" | "text" => Ok(Format::Json),
            other => Err(format!("unknown format '{other}' (expected binary or json)")),
        }
    }
}

/// Whether loaded content is merged into the local state or replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Merge,
    Replace,
}

/// Everything a save file holds, decoded into domain types.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub store: TranslationStore,
    pub log: ActionLog,
    pub saved_at: DateTime<Utc>,
}

/// Persisted dictionary: source name -> target name -> phrase -> record.
type Dictionary = BTreeMap<String, BTreeMap<String, PhraseTable>>;

/// The binary document.
#[derive(Serialize, Deserialize)]
struct Document {
    dictionary: Dictionary,
    #[serde(default)]
    history: ActionLog,
    saved_at: DateTime<Utc>,
}

/// The textual document: the binary schema plus a version tag.
#[derive(Serialize, Deserialize)]
struct JsonDocument {
    #[serde(default)]
    version: String,
    dictionary: Dictionary,
    #[serde(default)]
    history: ActionLog,
    saved_at: DateTime<Utc>,
}

fn encode_dictionary(store: &TranslationStore) -> Dictionary {
    let mut dictionary = Dictionary::new();
    for (pair, table) in store.tables() {
        dictionary
            .entry(pair.source.as_str().to_string())
            .or_default()
            .insert(pair.target.as_str().to_string(), table.clone());
    }
    dictionary
}

/// Rebuilds a store from persisted tables. Unknown languages and
/// same-language pairs are skipped rather than failing the load.
fn decode_dictionary(dictionary: Dictionary) -> TranslationStore {
    let mut store = TranslationStore::new();
    for (source_name, targets) in dictionary {
        let Ok(source) = source_name.parse::<Language>() else {
            warn!(language = %source_name, "Skipping unknown source language");
            continue;
        };
        for (target_name, table) in targets {
            let Ok(target) = target_name.parse::<Language>() else {
                warn!(language = %target_name, "Skipping unknown target language");
                continue;
            };
            let pair = LanguagePair::new(source, target);
            if pair.is_reflexive() {
                if !table.is_empty() {
                    warn!(%pair, entries = table.len(), "Skipping same-language pair");
                }
                continue;
            }
            store.set_table(pair, table);
        }
    }
    store
}

pub fn save_to_disk(
    store: &TranslationStore,
    log: &ActionLog,
    path: &Path,
    format: Format,
) -> Result<(), TranslatorError> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| TranslatorError::io(parent_dir, e))?;

    let dictionary = encode_dictionary(store);
    let history = log.clone();
    let saved_at = Utc::now();

    // Written next to the destination, then renamed over it, so a failed
    // write never leaves a half-written dictionary behind.
    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| TranslatorError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        match format {
            Format::Binary => {
                let document = Document { dictionary, history, saved_at };
                bincode::serialize_into(&mut writer, &document)
                    .map_err(|e| TranslatorError::io(path, std::io::Error::other(e)))?;
            }
            Format::Json => {
                let document = JsonDocument {
                    version: JSON_FORMAT_VERSION.to_string(),
                    dictionary,
                    history,
                    saved_at,
                };
                serde_json::to_writer_pretty(&mut writer, &document)
                    .map_err(|e| TranslatorError::io(path, std::io::Error::other(e)))?;
            }
        }
        writer.flush().map_err(|e| TranslatorError::io(path, e))?;
    }

    temp_file.persist(path).map_err(|e| TranslatorError::io(path, e.error))?;
    info!(path = %path.display(), %format, entries = store.len(), "Saved dictionary");
    Ok(())
}

pub fn load_from_disk(path: &Path, format: Format) -> Result<Snapshot, TranslatorError> {
    let bytes = fs::read(path).map_err(|e| TranslatorError::io(path, e))?;

    let (dictionary, history, saved_at) = match format {
        Format::Binary => {
            let document: Document =
                bincode::deserialize(&bytes).map_err(|e| TranslatorError::corrupt(path, e))?;
            (document.dictionary, document.history, document.saved_at)
        }
        Format::Json => {
            let document: JsonDocument =
                serde_json::from_slice(&bytes).map_err(|e| TranslatorError::corrupt(path, e))?;
            if document.version != JSON_FORMAT_VERSION {
                warn!(
                    path = %path.display(),
                    version = %document.version,
                    expected = JSON_FORMAT_VERSION,
                    "Loading dictionary with unexpected format version"
                );
            }
            (document.dictionary, document.history, document.saved_at)
        }
    };

    let snapshot = Snapshot {
        store: decode_dictionary(dictionary),
        log: history,
        saved_at,
    };
    info!(
        path = %path.display(),
        %format,
        entries = snapshot.store.len(),
        actions = snapshot.log.len(),
        "Loaded dictionary"
    );
    Ok(snapshot)
}
