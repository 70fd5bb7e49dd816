// src/core/types.rs
use crate::error::TranslatorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest rating a human evaluation may give.
pub const MIN_SCORE: f64 = 1.0;
/// Highest rating a human evaluation may give.
pub const MAX_SCORE: f64 = 10.0;
/// Seed score given to a freshly inserted translation.
pub const DEFAULT_SCORE: f64 = 5.0;

/// The closed set of languages the dictionary knows about.
/// Only ever used as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::Portuguese,
    ];

    /// Lower-case display name, also used as the persisted map key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::Portuguese => "portuguese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "spanish" | "es" => Ok(Language::Spanish),
            "french" | "fr" => Ok(Language::French),
            "portuguese" | "pt" => Ok(Language::Portuguese),
            _ => Err(TranslatorError::UnknownLanguage(s.to_string())),
        }
    }
}

/// A directed (source, target) language combination.
/// Ordering is source-first, so a range over one source is contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

impl LanguagePair {
    pub fn new(source: Language, target: Language) -> Self {
        Self { source, target }
    }

    /// Like `new`, but rejects a pair that translates a language into itself.
    pub fn distinct(source: Language, target: Language) -> Result<Self, TranslatorError> {
        if source == target {
            return Err(TranslatorError::SameLanguage(source));
        }
        Ok(Self { source, target })
    }

    pub fn is_reflexive(&self) -> bool {
        self.source == self.target
    }

    /// Every ordered pair of distinct languages, source-major.
    pub fn all() -> impl Iterator<Item = LanguagePair> {
        Language::ALL.into_iter().flat_map(|source| {
            Language::ALL
                .into_iter()
                .filter(move |&target| target != source)
                .map(move |target| LanguagePair { source, target })
        })
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Lookups are case-insensitive; phrase keys are stored lower-cased.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("Spanish".parse::<Language>().unwrap(), Language::Spanish);
        assert_eq!("pt".parse::<Language>().unwrap(), Language::Portuguese);
        assert!(matches!(
            "klingon".parse::<Language>(),
            Err(TranslatorError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn all_pairs_skip_reflexive_combinations() {
        let pairs: Vec<_> = LanguagePair::all().collect();
        assert_eq!(pairs.len(), 12);
        assert!(pairs.iter().all(|p| !p.is_reflexive()));
        assert!(pairs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn distinct_rejects_same_language() {
        assert!(matches!(
            LanguagePair::distinct(Language::French, Language::French),
            Err(TranslatorError::SameLanguage(Language::French))
        ));
    }
}
