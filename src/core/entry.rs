// src/core/entry.rs
use crate::core::scoring;
use crate::error::TranslatorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One directional phrase translation and its reputation.
///
/// The score history is the source of truth. `evaluation_count` and
/// `average_score` are caches that every mutation rederives before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PersistedEntry")]
pub struct EntryRecord {
    #[serde(rename = "text")]
    translated_text: String,
    average_score: f64,
    evaluation_count: usize,
    score_history: Vec<f64>,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}

/// On-disk shape of a record. Counts and averages read from disk are not
/// trusted; `From` recomputes both from the history.
#[derive(Deserialize)]
struct PersistedEntry {
    text: String,
    average_score: f64,
    evaluation_count: usize,
    score_history: Vec<f64>,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}

impl From<PersistedEntry> for EntryRecord {
    fn from(raw: PersistedEntry) -> Self {
        let mut entry = EntryRecord {
            translated_text: raw.text,
            average_score: raw.average_score,
            evaluation_count: raw.evaluation_count,
            score_history: raw.score_history,
            created_at: raw.created_at,
            last_modified_at: raw.last_modified_at,
        };
        entry.recompute();
        entry
    }
}

impl EntryRecord {
    /// A fresh record whose history holds only the seed score.
    pub fn new(translated_text: impl Into<String>, seed_score: f64) -> Self {
        let at = Utc::now();
        Self {
            translated_text: translated_text.into(),
            average_score: seed_score,
            evaluation_count: 1,
            score_history: vec![seed_score],
            created_at: at,
            last_modified_at: at,
        }
    }

    /// Rebuilds a record from an explicit history, e.g. one received from a
    /// foreign dictionary.
    pub fn from_history(
        translated_text: impl Into<String>,
        score_history: Vec<f64>,
        created_at: DateTime<Utc>,
        last_modified_at: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self {
            translated_text: translated_text.into(),
            average_score: 0.0,
            evaluation_count: 0,
            score_history,
            created_at,
            last_modified_at,
        };
        entry.recompute();
        entry
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn score_history(&self) -> &[f64] {
        &self.score_history
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluation_count
    }

    pub fn average_score(&self) -> f64 {
        self.average_score
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    /// Appends one human rating. Returns (previous average, new average).
    /// A rejected score leaves the record untouched.
    pub fn record_score(&mut self, score: f64) -> Result<(f64, f64), TranslatorError> {
        let score = scoring::validate_score(score)?;
        let previous = self.average_score;
        self.score_history.push(score);
        self.recompute();
        self.last_modified_at = Utc::now();
        Ok((previous, self.average_score))
    }

    /// Folds a foreign copy of the same key into this record.
    /// Foreign text wins; histories are concatenated, local first.
    pub fn absorb(&mut self, foreign: &EntryRecord, at: DateTime<Utc>) {
        if foreign.translated_text != self.translated_text {
            self.translated_text = foreign.translated_text.clone();
        }
        self.score_history = scoring::combine(&self.score_history, &foreign.score_history);
        self.recompute();
        self.last_modified_at = at;
    }

    /// Checks the shape a record must have before it may enter a store by merge.
    pub fn validate(&self) -> Result<(), TranslatorError> {
        if self.translated_text.is_empty() {
            return Err(TranslatorError::MalformedEntry(
                "translation text is empty".to_string(),
            ));
        }
        if self.score_history.is_empty() {
            return Err(TranslatorError::MalformedEntry(
                "score history is empty".to_string(),
            ));
        }
        if let Some(bad) = self
            .score_history
            .iter()
            .find(|s| scoring::validate_score(**s).is_err())
        {
            return Err(TranslatorError::MalformedEntry(format!(
                "score {bad} in history is outside the 1-10 range"
            )));
        }
        Ok(())
    }

    /// An empty history averages to zero; `validate` rejects such records.
    fn recompute(&mut self) {
        self.evaluation_count = self.score_history.len();
        self.average_score = scoring::mean(&self.score_history).unwrap_or(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_appends_and_rederives() {
        let mut entry = EntryRecord::new("hello", 5.0);
        let (prev, new) = entry.record_score(9.0).unwrap();
        assert_eq!(prev, 5.0);
        assert_eq!(new, 7.0);
        assert_eq!(entry.score_history(), &[5.0, 9.0]);
        assert_eq!(entry.evaluation_count(), 2);
    }

    #[test]
    fn rejected_score_leaves_record_unchanged() {
        let mut entry = EntryRecord::new("hello", 5.0);
        let before = entry.clone();
        assert!(matches!(
            entry.record_score(11.0),
            Err(TranslatorError::InvalidScore(_))
        ));
        assert!(entry.record_score(0.0).is_err());
        assert_eq!(entry, before);
    }

    #[test]
    fn absorb_prefers_foreign_text_and_concatenates() {
        let now = Utc::now();
        let mut local = EntryRecord::from_history("thanks", vec![4.0, 6.0], now, now);
        let foreign = EntryRecord::from_history("thank you", vec![8.0], now, now);
        local.absorb(&foreign, now);
        assert_eq!(local.translated_text(), "thank you");
        assert_eq!(local.score_history(), &[4.0, 6.0, 8.0]);
        assert_eq!(local.evaluation_count(), 3);
        assert_eq!(local.average_score(), 6.0);
    }

    #[test]
    fn validate_flags_bad_shapes() {
        let now = Utc::now();
        assert!(EntryRecord::from_history("x", vec![], now, now).validate().is_err());
        assert!(EntryRecord::from_history("x", vec![12.0], now, now).validate().is_err());
        assert!(EntryRecord::from_history("", vec![5.0], now, now).validate().is_err());
        assert!(EntryRecord::new("x", 5.0).validate().is_ok());
    }

    #[test]
    fn persisted_counts_are_rederived() {
        let json = r#"{
            "text": "merci",
            "average_score": 1.0,
            "evaluation_count": 9,
            "score_history": [8.0, 6.0],
            "created_at": "2024-01-01T00:00:00Z",
            "last_modified_at": "2024-01-02T00:00:00Z"
        }"#;
        let entry: EntryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(entry.evaluation_count(), 2);
        assert_eq!(entry.average_score(), 7.0);
    }

    #[test]
    fn persisted_empty_history_zeroes_the_caches() {
        let json = r#"{
            "text": "merci",
            "average_score": 4.0,
            "evaluation_count": 9,
            "score_history": [],
            "created_at": "2024-01-01T00:00:00Z",
            "last_modified_at": "2024-01-02T00:00:00Z"
        }"#;
        let entry: EntryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(entry.evaluation_count(), 0);
        assert_eq!(entry.average_score(), 0.0);
        assert!(entry.validate().is_err());
    }
}
