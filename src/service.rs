// File: src/service.rs
//! The surface a front-end talks to. Every call completes and reports a
//! success flag plus a message; typed errors never escape past here.
use crate::config::Config;
use crate::core::engine::{Learner, LoadOutcome};
use crate::core::scoring::validate_score;
use crate::core::types::{Language, LanguagePair};
use crate::error::TranslatorError;
use crate::persistence::{Format, LoadMode};
use crate::report;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<TranslatorError> for Outcome {
    fn from(err: TranslatorError) -> Self {
        Outcome::fail(err.to_string())
    }
}

fn outcome(result: Result<String, TranslatorError>) -> Outcome {
    result.map_or_else(Outcome::from, Outcome::ok)
}

pub struct TranslatorService {
    learner: Learner,
    config: Config,
}

impl TranslatorService {
    pub fn new(config: Config) -> Self {
        Self {
            learner: Learner::new(),
            config,
        }
    }

    /// Restores the autosave if there is one, otherwise starts from the
    /// starter vocabulary (when enabled) or empty.
    pub fn open(config: Config) -> Self {
        let mut service = Self::new(config);
        if service.config.autosave_path.exists() {
            let restored = service.load_autosave();
            if restored.success {
                info!("{}", restored.message);
                return service;
            }
            warn!(message = %restored.message, "Could not restore autosave");
        }
        if service.config.seed_vocabulary {
            service.learner = Learner::with_seed_vocabulary();
        }
        service
    }

    pub fn learner(&self) -> &Learner {
        &self.learner
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn translate(&mut self, source: Language, target: Language, text: &str) -> Outcome {
        outcome(LanguagePair::distinct(source, target).and_then(|pair| self.learner.lookup(pair, text)))
    }

    pub fn evaluate(&mut self, source: Language, target: Language, text: &str, score: f64) -> Outcome {
        outcome(
            LanguagePair::distinct(source, target)
                .and_then(|pair| self.learner.evaluate(pair, text, score))
                .map(|eval| {
                    format!(
                        "Evaluation recorded: {}/10\nPrevious average: {:.1}/10\nNew average: {:.1}/10 ({} evaluations)",
                        eval.score, eval.previous_average, eval.new_average, eval.evaluation_count
                    )
                }),
        )
    }

    pub fn add(
        &mut self,
        source: Language,
        target: Language,
        text: &str,
        translation: &str,
        score: Option<f64>,
    ) -> Outcome {
        let score = score.unwrap_or(self.config.default_score);
        let result = LanguagePair::distinct(source, target).and_then(|pair| {
            validate_score(score)?;
            self.learner.insert(pair, text, translation, score);
            Ok(format!("Added \"{text}\" → \"{translation}\" ({pair}) with score {score}"))
        });
        outcome(result)
    }

    pub fn exists(&self, source: Language, target: Language, text: &str) -> Outcome {
        match LanguagePair::distinct(source, target) {
            Ok(pair) if self.learner.exists(pair, text) => {
                Outcome::ok(format!("A translation for \"{text}\" exists ({pair})"))
            }
            Ok(pair) => Outcome::fail(format!("No translation for \"{text}\" ({pair})")),
            Err(e) => e.into(),
        }
    }

    pub fn best(&self, source: Language, target: Language, limit: Option<usize>) -> Outcome {
        self.ranked(source, target, limit, true)
    }

    pub fn worst(&self, source: Language, target: Language, limit: Option<usize>) -> Outcome {
        self.ranked(source, target, limit, false)
    }

    fn ranked(&self, source: Language, target: Language, limit: Option<usize>, best: bool) -> Outcome {
        let pair = match LanguagePair::distinct(source, target) {
            Ok(pair) => pair,
            Err(e) => return e.into(),
        };
        let limit = limit.unwrap_or(self.config.list_limit);
        let entries = if best {
            self.learner.best(pair, limit)
        } else {
            self.learner.worst(pair, limit)
        };
        if entries.is_empty() {
            return Outcome::ok(format!("No translations for {pair}"));
        }
        let lines: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(i, (phrase, record))| format!("{:2}. {}", i + 1, report::render_entry(phrase, record)))
            .collect();
        Outcome::ok(lines.join("\n"))
    }

    pub fn stats(&self) -> Outcome {
        Outcome::ok(report::render_stats(&self.learner.aggregate_stats()))
    }

    pub fn history(&self, limit: Option<usize>) -> Outcome {
        let log = self.learner.log();
        if log.is_empty() {
            return Outcome::ok("No actions recorded.");
        }
        let limit = limit.unwrap_or(self.config.history_limit);
        let shown = log.len().min(limit);
        Outcome::ok(format!(
            "Last {shown} actions:\n{}\nTotal in history: {} actions",
            report::render_history(log.recent(limit)),
            log.len()
        ))
    }

    pub fn save(&self, path: &Path, format: Format) -> Outcome {
        match self.learner.save(path, format) {
            Ok(()) => Outcome::ok(format!("Dictionary saved ({format}) to {}", path.display())),
            Err(e) => Outcome::fail(format!("Error saving dictionary: {e}")),
        }
    }

    pub fn load(&mut self, path: &Path, format: Format, mode: LoadMode) -> Outcome {
        match self.learner.load(path, format, mode) {
            Ok(LoadOutcome::Merged(stats)) => {
                Outcome::ok(format!("Dictionary merged from {}\n\n{stats}", path.display()))
            }
            Ok(LoadOutcome::Replaced { entries }) => Outcome::ok(format!(
                "Dictionary replaced from {} ({entries} translations)",
                path.display()
            )),
            Err(e) => Outcome::fail(format!("Error loading dictionary: {e}")),
        }
    }

    pub fn export_readable(&self, path: &Path) -> Outcome {
        match self.learner.export_readable(path) {
            Ok(()) => Outcome::ok(format!("Translations exported to {}", path.display())),
            Err(e) => Outcome::fail(format!("Error exporting translations: {e}")),
        }
    }

    pub fn clear(&mut self) -> Outcome {
        self.learner.clear();
        Outcome::ok("Dictionary cleared")
    }

    pub fn load_autosave(&mut self) -> Outcome {
        let path = self.config.autosave_path.clone();
        let format = self.config.autosave_format;
        self.load(&path, format, LoadMode::Replace)
    }

    pub fn autosave(&self) -> Outcome {
        self.save(&self.config.autosave_path, self.config.autosave_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TranslatorService {
        TranslatorService::new(Config::default())
    }

    #[test]
    fn add_validates_before_inserting() {
        let mut svc = service();
        assert!(!svc.add(Language::English, Language::English, "hi", "hi", None).success);
        assert!(!svc.add(Language::English, Language::French, "hi", "salut", Some(0.0)).success);
        assert_eq!(svc.learner().total_count(), 0);

        assert!(svc.add(Language::English, Language::French, "hi", "salut", None).success);
        let entry = svc
            .learner()
            .entry(LanguagePair::new(Language::English, Language::French), "HI")
            .unwrap();
        assert_eq!(entry.average_score(), 5.0);
    }

    #[test]
    fn translate_reports_text_or_failure() {
        let mut svc = service();
        svc.add(Language::Spanish, Language::English, "Hola", "Hello", None);
        let hit = svc.translate(Language::Spanish, Language::English, "HOLA");
        assert_eq!(hit, Outcome::ok("Hello"));
        assert!(!svc.translate(Language::Spanish, Language::English, "adiós").success);
    }

    #[test]
    fn evaluate_message_shows_both_averages() {
        let mut svc = service();
        svc.add(Language::Spanish, Language::English, "hola", "hello", Some(5.0));
        let out = svc.evaluate(Language::Spanish, Language::English, "hola", 9.0);
        assert!(out.success);
        assert!(out.message.contains("Previous average: 5.0/10"));
        assert!(out.message.contains("New average: 7.0/10"));
        assert!(!svc.evaluate(Language::Spanish, Language::English, "hola", 11.0).success);
    }

    #[test]
    fn open_falls_back_to_seed_without_autosave() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            autosave_path: dir.path().join("autosave.json"),
            ..Config::default()
        };
        let svc = TranslatorService::open(config);
        assert!(svc.learner().total_count() > 0);
    }

    #[test]
    fn autosave_round_trips_through_open() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            autosave_path: dir.path().join("autosave.json"),
            seed_vocabulary: false,
            ..Config::default()
        };
        let mut svc = TranslatorService::open(config.clone());
        assert_eq!(svc.learner().total_count(), 0);
        svc.add(Language::French, Language::Portuguese, "eau", "água", Some(8.0));
        assert!(svc.autosave().success);

        let reopened = TranslatorService::open(config);
        assert_eq!(reopened.learner(), svc.learner());
    }
}
