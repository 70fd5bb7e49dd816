use crate::core::types::{Language, LanguagePair};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("score {0} is outside the 1-10 range")]
    InvalidScore(f64),
    #[error("no translation for \"{phrase}\" ({pair})")]
    NotFound { pair: LanguagePair, phrase: String },
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("corrupt data in {}: {reason}", .path.display())]
    CorruptData { path: PathBuf, reason: String },
    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} cannot be translated into itself")]
    SameLanguage(Language),
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
    #[error("malformed entry: {0}")]
    MalformedEntry(String),
}

impl TranslatorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            TranslatorError::FileNotFound { path }
        } else {
            TranslatorError::Io { path, source }
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TranslatorError::CorruptData {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
