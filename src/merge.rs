// File: src/merge.rs
use crate::core::entry::EntryRecord;
use crate::core::log::ActionLog;
use crate::core::store::TranslationStore;
use crate::core::types::LanguagePair;
use crate::error::TranslatorError;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{info, warn};

/// Counters reported after a merge. A merge always completes; entries it
/// could not take are tallied in `errors`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub updated: usize,
    pub errors: usize,
    pub total_before: usize,
    pub total_after: usize,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Merge statistics:")?;
        writeln!(f, "  entries before: {}", self.total_before)?;
        writeln!(f, "  added:          {}", self.added)?;
        writeln!(f, "  updated:        {}", self.updated)?;
        writeln!(f, "  entries after:  {}", self.total_after)?;
        write!(f, "  errors:         {}", self.errors)
    }
}

enum EntryMerge {
    Added,
    Updated,
}

/// Folds a foreign dictionary into a local one without losing either side's
/// evaluations.
pub struct MergeEngine {
    merged_at: DateTime<Utc>,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self { merged_at: Utc::now() }
    }

    /// Pins the timestamp written to `last_modified_at` of updated entries.
    pub fn at(merged_at: DateTime<Utc>) -> Self {
        Self { merged_at }
    }

    pub fn merge(
        &self,
        local_store: &mut TranslationStore,
        local_log: &mut ActionLog,
        foreign_store: TranslationStore,
        foreign_log: ActionLog,
    ) -> MergeStats {
        let mut stats = MergeStats {
            total_before: local_store.len(),
            ..MergeStats::default()
        };

        for (pair, phrase, record) in foreign_store.iter() {
            match self.merge_entry(local_store, pair, phrase, record) {
                Ok(EntryMerge::Added) => stats.added += 1,
                Ok(EntryMerge::Updated) => stats.updated += 1,
                Err(e) => {
                    warn!(%pair, phrase, error = %e, "Skipping entry during merge");
                    stats.errors += 1;
                }
            }
        }

        local_log.absorb(foreign_log);

        stats.total_after = local_store.len();
        info!(
            added = stats.added,
            updated = stats.updated,
            errors = stats.errors,
            total = stats.total_after,
            "Merged foreign dictionary"
        );
        stats
    }

    fn merge_entry(
        &self,
        local_store: &mut TranslationStore,
        pair: LanguagePair,
        phrase: &str,
        foreign: &EntryRecord,
    ) -> Result<EntryMerge, TranslatorError> {
        if pair.is_reflexive() {
            return Err(TranslatorError::SameLanguage(pair.source));
        }
        foreign.validate()?;

        match local_store.get_mut(pair, phrase) {
            Some(local) => {
                local.absorb(foreign, self.merged_at);
                Ok(EntryMerge::Updated)
            }
            None => {
                local_store.put(pair, phrase, foreign.clone());
                Ok(EntryMerge::Added)
            }
        }
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Language;

    fn es_fr() -> LanguagePair {
        LanguagePair::new(Language::Spanish, Language::French)
    }

    #[test]
    fn new_keys_are_added_verbatim() {
        let mut local = TranslationStore::new();
        let mut log = ActionLog::new();
        let mut foreign = TranslationStore::new();
        let record = EntryRecord::new("merci", 8.0);
        foreign.put(es_fr(), "gracias", record.clone());

        let stats = MergeEngine::new().merge(&mut local, &mut log, foreign, ActionLog::new());
        assert_eq!(stats.added, 1);
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.total_before, 0);
        assert_eq!(stats.total_after, 1);
        assert_eq!(local.get(es_fr(), "gracias"), Some(&record));
    }

    #[test]
    fn malformed_entries_are_counted_not_fatal() {
        let now = Utc::now();
        let mut local = TranslationStore::new();
        let mut log = ActionLog::new();
        let mut foreign = TranslationStore::new();
        foreign.put(es_fr(), "vacío", EntryRecord::from_history("vide", vec![], now, now));
        foreign.put(es_fr(), "agua", EntryRecord::new("eau", 7.0));

        let stats = MergeEngine::new().merge(&mut local, &mut log, foreign, ActionLog::new());
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.added, 1);
        assert!(!local.contains(es_fr(), "vacío"));
    }

    #[test]
    fn conflicts_take_foreign_text_and_stamp_merge_time() {
        let merged_at = Utc::now();
        let mut local = TranslationStore::new();
        local.put(es_fr(), "hola", EntryRecord::new("salut", 4.0));
        let mut foreign = TranslationStore::new();
        foreign.put(es_fr(), "HOLA", EntryRecord::new("bonjour", 8.0));

        let stats = MergeEngine::at(merged_at).merge(
            &mut local,
            &mut ActionLog::new(),
            foreign,
            ActionLog::new(),
        );
        assert_eq!(stats.updated, 1);
        let entry = local.get(es_fr(), "hola").unwrap();
        assert_eq!(entry.translated_text(), "bonjour");
        assert_eq!(entry.score_history(), &[4.0, 8.0]);
        assert_eq!(entry.average_score(), 6.0);
        assert_eq!(entry.last_modified_at(), merged_at);
    }
}
