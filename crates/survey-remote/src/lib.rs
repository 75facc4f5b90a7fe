//! Remote persistence for survey responses
//!
//! This crate provides the HTTP implementation of the RecordStore trait used
//! by the remote submission strategy.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::RemoteRecordStore;
pub use config::{normalize_base_path, RemoteConfig, DEFAULT_COLLECTION};

// Re-export core types for convenience
pub use survey_core::{Error, RecordStore, Result, SurveyRecord};
