// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod merge;
pub mod persistence;
pub mod report;
pub mod seed;
pub mod service;

pub use crate::core::engine::Learner;
pub use crate::core::types::{Language, LanguagePair};
pub use crate::error::TranslatorError;
pub use crate::service::{Outcome, TranslatorService};
