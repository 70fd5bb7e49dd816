// src/core/mod.rs
pub mod engine;
pub mod entry;
pub mod log;
pub mod scoring;
pub mod stats;
pub mod store;
pub mod types;
