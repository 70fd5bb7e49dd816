use crate::core::entry::EntryRecord;
use crate::core::log::{Action, ActionLog, LogRecord};
use crate::core::scoring;
use crate::core::stats::{self, AggregateStats};
use crate::core::store::{RankOrder, TranslationStore};
use crate::core::types::{LanguagePair, DEFAULT_SCORE};
use crate::error::TranslatorError;
use crate::merge::{MergeEngine, MergeStats};
use crate::persistence::{load_from_disk, save_to_disk, Format, LoadMode, Snapshot};
use crate::report;
use crate::seed::SEED_VOCABULARY;
use std::path::Path;
use tracing::{debug, info};

/// Result of rating a translation, for the caller to display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub previous_average: f64,
    pub new_average: f64,
    pub evaluation_count: usize,
}

/// What a load did to the local state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOutcome {
    Merged(MergeStats),
    Replaced { entries: usize },
}

// The learner owns both the dictionary and its audit trail; it is the unit
// that gets saved, loaded and merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Learner {
    store: TranslationStore,
    log: ActionLog,
}

impl Learner {
    /// An empty learner with the full per-pair skeleton.
    pub fn new() -> Self {
        Self {
            store: TranslationStore::new(),
            log: ActionLog::new(),
        }
    }

    /// A learner pre-filled with the starter vocabulary.
    pub fn with_seed_vocabulary() -> Self {
        let mut learner = Self::new();
        for &(source, target, phrase, translation) in SEED_VOCABULARY {
            learner.insert(LanguagePair::new(source, target), phrase, translation, DEFAULT_SCORE);
        }
        learner
    }

    pub fn from_parts(store: TranslationStore, log: ActionLog) -> Self {
        Self { store, log }
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Creates or overwrites the entry with a fresh single-score history.
    /// The reverse direction is left alone.
    pub fn insert(&mut self, pair: LanguagePair, phrase: &str, translation: &str, score: f64) {
        let replaced = self
            .store
            .put(pair, phrase, EntryRecord::new(translation, score))
            .is_some();
        debug!(%pair, phrase, translation, score, replaced, "Inserted translation");
        self.log.append(LogRecord::now(
            pair,
            phrase,
            Action::Insert {
                translation: translation.to_string(),
                score,
            },
        ));
    }

    /// Exact, case-insensitive lookup. A hit is recorded in the log.
    pub fn lookup(&mut self, pair: LanguagePair, phrase: &str) -> Result<String, TranslatorError> {
        let entry = self
            .store
            .get(pair, phrase)
            .ok_or_else(|| TranslatorError::NotFound {
                pair,
                phrase: phrase.to_string(),
            })?;
        let translation = entry.translated_text().to_string();
        let average_score = entry.average_score();

        debug!(%pair, phrase, %translation, "Looked up translation");
        self.log.append(LogRecord::now(
            pair,
            phrase,
            Action::Lookup {
                translation: translation.clone(),
                average_score,
            },
        ));
        Ok(translation)
    }

    pub fn exists(&self, pair: LanguagePair, phrase: &str) -> bool {
        self.store.contains(pair, phrase)
    }

    pub fn entry(&self, pair: LanguagePair, phrase: &str) -> Option<&EntryRecord> {
        self.store.get(pair, phrase)
    }

    /// Records one human rating in [1, 10] against an existing entry.
    /// The score is checked before the entry is looked up.
    pub fn evaluate(&mut self, pair: LanguagePair, phrase: &str, score: f64) -> Result<Evaluation, TranslatorError> {
        let score = scoring::validate_score(score)?;
        let entry = self
            .store
            .get_mut(pair, phrase)
            .ok_or_else(|| TranslatorError::NotFound {
                pair,
                phrase: phrase.to_string(),
            })?;
        let (previous_average, new_average) = entry.record_score(score)?;
        let evaluation = Evaluation {
            score,
            previous_average,
            new_average,
            evaluation_count: entry.evaluation_count(),
        };

        debug!(%pair, phrase, score, previous_average, new_average, "Evaluated translation");
        self.log.append(LogRecord::now(
            pair,
            phrase,
            Action::Evaluate {
                score,
                previous_average,
                new_average,
            },
        ));
        Ok(evaluation)
    }

    pub fn best(&self, pair: LanguagePair, limit: usize) -> Vec<(&str, &EntryRecord)> {
        self.store.ranked(pair, RankOrder::Best, limit)
    }

    pub fn worst(&self, pair: LanguagePair, limit: usize) -> Vec<(&str, &EntryRecord)> {
        self.store.ranked(pair, RankOrder::Worst, limit)
    }

    pub fn total_count(&self) -> usize {
        self.store.len()
    }

    /// Drops every entry and the whole log. Does not re-seed.
    pub fn clear(&mut self) {
        let dropped = self.store.len();
        self.store.clear();
        self.log.clear();
        info!(dropped, "Cleared dictionary");
    }

    pub fn aggregate_stats(&self) -> AggregateStats {
        stats::aggregate(&self.store, self.log.len())
    }

    /// Folds a foreign store and log into this learner.
    pub fn merge(&mut self, foreign_store: TranslationStore, foreign_log: ActionLog) -> MergeStats {
        MergeEngine::new().merge(&mut self.store, &mut self.log, foreign_store, foreign_log)
    }

    pub fn merge_learner(&mut self, foreign: Learner) -> MergeStats {
        self.merge(foreign.store, foreign.log)
    }

    pub fn save(&self, path: &Path, format: Format) -> Result<(), TranslatorError> {
        save_to_disk(&self.store, &self.log, path, format)
    }

    /// Reads a save file and either merges it in or adopts it. A replace
    /// drops records that would fail merge validation; a merge counts them
    /// as errors. On error the local state is untouched.
    pub fn load(&mut self, path: &Path, format: Format, mode: LoadMode) -> Result<LoadOutcome, TranslatorError> {
        let Snapshot { store, log, .. } = load_from_disk(path, format)?;
        match mode {
            LoadMode::Merge => Ok(LoadOutcome::Merged(self.merge(store, log))),
            LoadMode::Replace => {
                let mut store = store;
                let dropped = store.drop_malformed();
                self.store = store;
                self.log = log;
                info!(entries = self.store.len(), dropped, "Replaced dictionary");
                Ok(LoadOutcome::Replaced {
                    entries: self.store.len(),
                })
            }
        }
    }

    /// Writes the human-readable report grouped by language pair.
    pub fn export_readable(&self, path: &Path) -> Result<(), TranslatorError> {
        let stats = self.aggregate_stats();
        let text = report::render_dictionary(&self.store, &stats);
        std::fs::write(path, text).map_err(|e| TranslatorError::io(path, e))?;
        info!(path = %path.display(), entries = stats.total_entries, "Exported readable dictionary");
        Ok(())
    }
}
