// File: src/report.rs
use crate::core::entry::EntryRecord;
use crate::core::log::{Action, LogRecord};
use crate::core::stats::AggregateStats;
use crate::core::store::{RankOrder, TranslationStore};
use chrono::Utc;
use std::fmt;

const RULE: usize = 60;

/// Plain-text dump of the dictionary, one section per populated pair,
/// each sorted by descending average score.
pub fn render_dictionary(store: &TranslationStore, stats: &AggregateStats) -> String {
    DictionaryReport { store, stats }.to_string()
}

struct DictionaryReport<'a> {
    store: &'a TranslationStore,
    stats: &'a AggregateStats,
}

impl fmt::Display for DictionaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(RULE))?;
        writeln!(f, "TRANSLATION DICTIONARY - LEARNING TRANSLATOR")?;
        writeln!(f, "{}", "=".repeat(RULE))?;
        writeln!(f)?;
        writeln!(f, "Exported at: {}", Utc::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Total translations: {}", self.stats.total_entries)?;
        writeln!(f, "Global average score: {:.2}/10", self.stats.global_average)?;

        for (pair, table) in self.store.tables() {
            if table.is_empty() {
                continue;
            }
            writeln!(f)?;
            writeln!(
                f,
                "{} → {}:",
                pair.source.as_str().to_uppercase(),
                pair.target.as_str().to_uppercase()
            )?;
            writeln!(f, "{}", "-".repeat(40))?;
            for (phrase, record) in table.ranked(RankOrder::Best, table.len()) {
                writeln!(f, "  {}", render_entry(phrase, record))?;
            }
        }
        Ok(())
    }
}

/// One ranked line: phrase, translation, average and evaluation count.
pub fn render_entry(phrase: &str, record: &EntryRecord) -> String {
    format!(
        "{:20} → {:20} [{:.1}/10, {} eval.]",
        phrase,
        record.translated_text(),
        record.average_score(),
        record.evaluation_count()
    )
}

pub fn render_stats(stats: &AggregateStats) -> String {
    StatsReport(stats).to_string()
}

struct StatsReport<'a>(&'a AggregateStats);

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "Total translations:   {}", stats.total_entries)?;
        writeln!(f, "Total evaluations:    {}", stats.total_evaluations)?;
        writeln!(f, "Global average score: {:.2}/10", stats.global_average)?;
        writeln!(f, "Populated pairs:      {}", stats.populated_pairs)?;
        writeln!(f, "Logged actions:       {}", stats.history_len)?;
        writeln!(f)?;
        for (language, lang) in &stats.languages {
            write!(
                f,
                "{:12} source: {:4}  target: {:4}",
                language.as_str(),
                lang.as_source,
                lang.as_target
            )?;
            if let (Some(best), Some(worst)) = (lang.best_score, lang.worst_score) {
                write!(f, "  best: {best:.1}  worst: {worst:.1}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Numbered listing of log records, in the order given.
pub fn render_history<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> String {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| HistoryLine { number: i + 1, record }.to_string())
        .collect()
}

struct HistoryLine<'a> {
    number: usize,
    record: &'a LogRecord,
}

impl fmt::Display for HistoryLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        writeln!(
            f,
            "{:2}. [{}] {} ({})",
            self.number,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.action.name(),
            record.pair
        )?;
        match &record.action {
            Action::Insert { translation, score } => {
                writeln!(f, "    \"{}\" → \"{}\" (seed {score})", record.source_phrase, translation)
            }
            Action::Lookup {
                translation,
                average_score,
            } => {
                writeln!(f, "    \"{}\" → \"{}\"", record.source_phrase, translation)?;
                writeln!(f, "    score: {average_score:.1}/10")
            }
            Action::Evaluate {
                score,
                previous_average,
                new_average,
            } => {
                writeln!(f, "    \"{}\" rated {score}/10", record.source_phrase)?;
                writeln!(f, "    average: {previous_average:.1} → {new_average:.1}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::aggregate;
    use crate::core::types::{Language, LanguagePair};

    #[test]
    fn dictionary_sections_are_sorted_by_score() {
        let mut store = TranslationStore::new();
        let pair = LanguagePair::new(Language::English, Language::French);
        store.put(pair, "water", EntryRecord::new("eau", 3.0));
        store.put(pair, "hello", EntryRecord::new("bonjour", 9.0));

        let text = render_dictionary(&store, &aggregate(&store, 0));
        assert!(text.contains("ENGLISH → FRENCH:"));
        assert!(!text.contains("SPANISH →"));
        let hello = text.find("bonjour").unwrap();
        let water = text.find("eau").unwrap();
        assert!(hello < water);
    }

    #[test]
    fn history_lines_are_numbered_in_order() {
        let pair = LanguagePair::new(Language::Spanish, Language::French);
        let records = [
            LogRecord::now(pair, "hola", Action::Insert { translation: "salut".into(), score: 5.0 }),
            LogRecord::now(
                pair,
                "hola",
                Action::Evaluate { score: 9.0, previous_average: 5.0, new_average: 7.0 },
            ),
        ];
        let text = render_history(&records);
        assert!(text.contains(" 1. ["));
        assert!(text.contains(" 2. ["));
        assert!(text.contains("\"hola\" → \"salut\" (seed 5)"));
        assert!(text.contains("average: 5.0 → 7.0"));
        assert!(text.find("insert").unwrap() < text.find("evaluate").unwrap());
    }
}
