// File: src/core/log.rs
use crate::core::types::LanguagePair;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened, with the fields specific to each kind of action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Insert {
        translation: String,
        score: f64,
    },
    Lookup {
        translation: String,
        average_score: f64,
    },
    Evaluate {
        score: f64,
        previous_average: f64,
        new_average: f64,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Insert { .. } => "insert",
            Action::Lookup { .. } => "lookup",
            Action::Evaluate { .. } => "evaluate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub pair: LanguagePair,
    /// The phrase as the caller typed it, not the normalized key.
    pub source_phrase: String,
    pub action: Action,
}

impl LogRecord {
    pub fn now(pair: LanguagePair, source_phrase: impl Into<String>, action: Action) -> Self {
        Self {
            timestamp: Utc::now(),
            pair,
            source_phrase: source_phrase.into(),
            action,
        }
    }
}

/// Append-only audit trail, kept in timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    records: Vec<LogRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<LogRecord>) -> Self {
        Self { records }
    }

    pub fn append(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    /// Concatenates `foreign` after the local records and re-sorts by
    /// timestamp. The sort is stable: equal timestamps keep local-then-foreign
    /// order, and each side keeps its own order.
    pub fn absorb(&mut self, foreign: ActionLog) {
        self.records.extend(foreign.records);
        self.records.sort_by_key(|record| record.timestamp);
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// The last `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &LogRecord> {
        self.records.iter().rev().take(limit)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Language;
    use chrono::TimeZone;

    fn record(secs: i64, phrase: &str) -> LogRecord {
        LogRecord {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            pair: LanguagePair::new(Language::English, Language::French),
            source_phrase: phrase.to_string(),
            action: Action::Insert {
                translation: "x".to_string(),
                score: 5.0,
            },
        }
    }

    #[test]
    fn absorb_interleaves_by_time_with_stable_ties() {
        let mut local = ActionLog::from_records(vec![record(10, "l1"), record(30, "l2")]);
        let foreign = ActionLog::from_records(vec![record(10, "f1"), record(20, "f2")]);
        local.absorb(foreign);
        let order: Vec<_> = local.records().iter().map(|r| r.source_phrase.as_str()).collect();
        assert_eq!(order, vec!["l1", "f1", "f2", "l2"]);
    }

    #[test]
    fn recent_is_newest_first() {
        let log = ActionLog::from_records(vec![record(1, "a"), record(2, "b"), record(3, "c")]);
        let recent: Vec<_> = log.recent(2).map(|r| r.source_phrase.as_str()).collect();
        assert_eq!(recent, vec!["c", "b"]);
    }
}
