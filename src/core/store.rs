// --- File: src/core/store.rs
use crate::core::entry::EntryRecord;
use crate::core::types::{normalize_phrase, Language, LanguagePair};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::warn;

// --- PhraseTable: the phrases of one language pair ---

/// Entries for a single (source, target) pair, kept in insertion order.
/// `index` maps the lower-cased phrase to its slot in `entries`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhraseTable {
    entries: Vec<(String, EntryRecord)>,
    index: HashMap<String, usize>,
}

impl PhraseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, phrase: &str) -> Option<&EntryRecord> {
        self.index
            .get(&normalize_phrase(phrase))
            .map(|&slot| &self.entries[slot].1)
    }

    pub fn get_mut(&mut self, phrase: &str) -> Option<&mut EntryRecord> {
        let slot = *self.index.get(&normalize_phrase(phrase))?;
        Some(&mut self.entries[slot].1)
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.index.contains_key(&normalize_phrase(phrase))
    }

    /// Stores `record` under the normalized phrase. An existing record is
    /// replaced in place, keeping its original insertion position.
    pub fn put(&mut self, phrase: &str, record: EntryRecord) -> Option<EntryRecord> {
        let key = normalize_phrase(phrase);
        if let Some(&slot) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[slot].1, record));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, record));
        None
    }

    /// Like `put`, but a record already under the same normalized phrase
    /// absorbs the new one instead of being replaced. Returns true on a
    /// collision.
    pub fn put_or_absorb(&mut self, phrase: &str, record: EntryRecord) -> bool {
        match self.get_mut(phrase) {
            Some(existing) => {
                let at = existing.last_modified_at().max(record.last_modified_at());
                existing.absorb(&record, at);
                true
            }
            None => {
                self.put(phrase, record);
                false
            }
        }
    }

    /// Keeps only the records `keep` accepts, preserving order.
    /// Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &EntryRecord) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(phrase, record)| keep(phrase, record));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            self.index = self
                .entries
                .iter()
                .enumerate()
                .map(|(slot, (phrase, _))| (phrase.clone(), slot))
                .collect();
        }
        dropped
    }

    /// Phrases and records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntryRecord)> {
        self.entries.iter().map(|(phrase, record)| (phrase.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by average score. The sort is stable, so ties keep
    /// insertion order.
    pub fn ranked(&self, order: RankOrder, limit: usize) -> Vec<(&str, &EntryRecord)> {
        let mut ranked: Vec<_> = self.iter().collect();
        match order {
            RankOrder::Best => {
                ranked.sort_by(|a, b| b.1.average_score().total_cmp(&a.1.average_score()))
            }
            RankOrder::Worst => {
                ranked.sort_by(|a, b| a.1.average_score().total_cmp(&b.1.average_score()))
            }
        }
        ranked.truncate(limit);
        ranked
    }
}

impl Serialize for PhraseTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (phrase, record) in &self.entries {
            map.serialize_entry(phrase, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PhraseTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PhraseTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of phrase to translation record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PhraseTable, A::Error> {
                let mut table = PhraseTable::new();
                while let Some((phrase, record)) = access.next_entry::<String, EntryRecord>()? {
                    // Raw keys differing only by case share one normalized
                    // key; their histories are combined, not overwritten.
                    if table.put_or_absorb(&phrase, record) {
                        warn!(phrase = %phrase, "Combined records whose phrases differ only by case");
                    }
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    Best,
    Worst,
}

// --- TranslationStore: every pair's table ---

/// All translations, keyed by language pair and then by phrase.
///
/// A table exists for every distinct-language pair even when it is empty,
/// so iterating "by source" or "by pair" never has to special-case gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationStore {
    tables: BTreeMap<LanguagePair, PhraseTable>,
}

impl Default for TranslationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationStore {
    pub fn new() -> Self {
        Self {
            tables: LanguagePair::all().map(|pair| (pair, PhraseTable::new())).collect(),
        }
    }

    pub fn get(&self, pair: LanguagePair, phrase: &str) -> Option<&EntryRecord> {
        self.tables.get(&pair)?.get(phrase)
    }

    pub fn get_mut(&mut self, pair: LanguagePair, phrase: &str) -> Option<&mut EntryRecord> {
        self.tables.get_mut(&pair)?.get_mut(phrase)
    }

    pub fn contains(&self, pair: LanguagePair, phrase: &str) -> bool {
        self.tables.get(&pair).is_some_and(|t| t.contains(phrase))
    }

    /// Creates or overwrites the record at (pair, phrase).
    pub fn put(&mut self, pair: LanguagePair, phrase: &str, record: EntryRecord) -> Option<EntryRecord> {
        self.tables.entry(pair).or_default().put(phrase, record)
    }

    /// Replaces the table of one pair wholesale.
    pub fn set_table(&mut self, pair: LanguagePair, table: PhraseTable) {
        self.tables.insert(pair, table);
    }

    /// Every pair with its table, source-major.
    pub fn tables(&self) -> impl Iterator<Item = (LanguagePair, &PhraseTable)> {
        self.tables.iter().map(|(pair, table)| (*pair, table))
    }

    /// The tables whose source is `source`. A contiguous range of the map.
    pub fn tables_from(&self, source: Language) -> impl Iterator<Item = (LanguagePair, &PhraseTable)> {
        let lo = LanguagePair::new(source, Language::ALL[0]);
        let hi = LanguagePair::new(source, Language::ALL[Language::ALL.len() - 1]);
        self.tables.range(lo..=hi).map(|(pair, table)| (*pair, table))
    }

    /// Flat view over every (pair, phrase, record).
    pub fn iter(&self) -> impl Iterator<Item = (LanguagePair, &str, &EntryRecord)> {
        self.tables
            .iter()
            .flat_map(|(pair, table)| table.iter().map(move |(phrase, record)| (*pair, phrase, record)))
    }

    pub fn ranked(&self, pair: LanguagePair, order: RankOrder, limit: usize) -> Vec<(&str, &EntryRecord)> {
        self.tables
            .get(&pair)
            .map(|table| table.ranked(order, limit))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(PhraseTable::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes records that fail `EntryRecord::validate`, logging each one.
    /// Returns how many were removed.
    pub fn drop_malformed(&mut self) -> usize {
        let mut dropped = 0;
        for (pair, table) in self.tables.iter_mut() {
            dropped += table.retain(|phrase, record| match record.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(%pair, phrase, error = %e, "Dropping malformed entry");
                    false
                }
            });
        }
        dropped
    }

    /// Drops every entry and restores the empty per-pair skeleton.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> LanguagePair {
        LanguagePair::new(Language::Spanish, Language::English)
    }

    #[test]
    fn keys_are_case_insensitive_but_text_is_not() {
        let mut store = TranslationStore::new();
        store.put(pair(), "Hello", EntryRecord::new("Hola", 5.0));
        assert!(store.contains(pair(), "HELLO"));
        assert_eq!(store.get(pair(), "hello").unwrap().translated_text(), "Hola");
        assert!(!store.contains(LanguagePair::new(Language::English, Language::Spanish), "hello"));
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut table = PhraseTable::new();
        table.put("a", EntryRecord::new("1", 5.0));
        table.put("b", EntryRecord::new("2", 5.0));
        table.put("A", EntryRecord::new("3", 5.0));
        let order: Vec<_> = table.iter().map(|(p, r)| (p, r.translated_text())).collect();
        assert_eq!(order, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let mut table = PhraseTable::new();
        table.put("first", EntryRecord::new("1", 6.0));
        table.put("low", EntryRecord::new("2", 2.0));
        table.put("second", EntryRecord::new("3", 6.0));
        let best: Vec<_> = table.ranked(RankOrder::Best, 10).into_iter().map(|(p, _)| p).collect();
        assert_eq!(best, vec!["first", "second", "low"]);
        let worst: Vec<_> = table.ranked(RankOrder::Worst, 2).into_iter().map(|(p, _)| p).collect();
        assert_eq!(worst, vec!["low", "first"]);
    }

    #[test]
    fn skeleton_survives_clear() {
        let mut store = TranslationStore::new();
        store.put(pair(), "hola", EntryRecord::new("hello", 5.0));
        store.clear();
        assert_eq!(store.len(), 0);
        assert_eq!(store.tables().count(), 12);
        assert_eq!(store.tables_from(Language::French).count(), 3);
        assert!(store.tables_from(Language::French).all(|(p, _)| p.source == Language::French));
    }

    #[test]
    fn case_variants_in_a_decoded_table_are_combined() {
        let json = r#"{
            "Hola": {"text": "hello", "average_score": 4.0, "evaluation_count": 1, "score_history": [4.0],
                     "created_at": "2024-01-01T00:00:00Z", "last_modified_at": "2024-01-01T00:00:00Z"},
            "hola": {"text": "hi", "average_score": 8.0, "evaluation_count": 1, "score_history": [8.0],
                     "created_at": "2024-02-01T00:00:00Z", "last_modified_at": "2024-02-01T00:00:00Z"}
        }"#;
        let table: PhraseTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 1);
        let record = table.get("HOLA").unwrap();
        assert_eq!(record.translated_text(), "hi");
        assert_eq!(record.score_history(), &[4.0, 8.0]);
        assert_eq!(record.average_score(), 6.0);
    }

    #[test]
    fn drop_malformed_reindexes_survivors() {
        let now = chrono::Utc::now();
        let mut store = TranslationStore::new();
        store.put(pair(), "bad", EntryRecord::from_history("x", vec![], now, now));
        store.put(pair(), "good", EntryRecord::new("y", 5.0));

        assert_eq!(store.drop_malformed(), 1);
        assert_eq!(store.len(), 1);
        assert!(!store.contains(pair(), "bad"));
        assert_eq!(store.get(pair(), "good").unwrap().translated_text(), "y");
    }
}
