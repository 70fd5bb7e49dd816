// File: src/core/stats.rs
use crate::core::store::TranslationStore;
use crate::core::types::Language;
use std::collections::BTreeMap;

/// Per-language counters. Best/worst only consider entries where the
/// language is the source, and are `None` when there are none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageStats {
    pub as_source: usize,
    pub as_target: usize,
    pub best_score: Option<f64>,
    pub worst_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    pub total_entries: usize,
    pub total_evaluations: usize,
    /// Mean of per-pair averages: each populated pair weighs the same,
    /// however many entries it holds. Zero when nothing is populated.
    pub global_average: f64,
    pub populated_pairs: usize,
    pub history_len: usize,
    pub languages: BTreeMap<Language, LanguageStats>,
}

pub fn aggregate(store: &TranslationStore, history_len: usize) -> AggregateStats {
    let mut languages: BTreeMap<Language, LanguageStats> = Language::ALL
        .into_iter()
        .map(|lang| (lang, LanguageStats::default()))
        .collect();
    let mut total_entries = 0;
    let mut total_evaluations = 0;
    let mut pair_average_sum = 0.0;
    let mut populated_pairs = 0;

    for source in Language::ALL {
        for (pair, table) in store.tables_from(source) {
            if table.is_empty() {
                continue;
            }
            total_entries += table.len();
            languages.entry(pair.target).or_default().as_target += table.len();

            let stats = languages.entry(source).or_default();
            stats.as_source += table.len();

            let mut score_sum = 0.0;
            for (_, record) in table.iter() {
                let avg = record.average_score();
                score_sum += avg;
                total_evaluations += record.evaluation_count();
                stats.best_score = Some(stats.best_score.map_or(avg, |b| b.max(avg)));
                stats.worst_score = Some(stats.worst_score.map_or(avg, |w| w.min(avg)));
            }
            pair_average_sum += score_sum / table.len() as f64;
            populated_pairs += 1;
        }
    }

    let global_average = if populated_pairs > 0 {
        pair_average_sum / populated_pairs as f64
    } else {
        0.0
    };

    AggregateStats {
        total_entries,
        total_evaluations,
        global_average,
        populated_pairs,
        history_len,
        languages,
    }
}
