//! Core types and logic for the recommendation survey
//!
//! This crate holds everything with decision-making content: description
//! truncation, rating validation, response assembly and the two submission
//! strategies (remote persistence and mail hand-off). Browser collaborators
//! (alerts, navigation, the hosted record service) sit behind traits so the
//! page shell and tests can supply their own.

pub mod config;
pub mod error;
pub mod mailto;
pub mod page;
pub mod session;
pub mod strategy;
pub mod submitter;
pub mod text;
pub mod truncator;
pub mod types;

#[cfg(test)]
mod testing;


pub use config::{
    EmptyFieldPolicy, Messages, StrategyKind, SubmissionConfig, SurveyConfig, TruncationConfig,
    DEFAULT_MAX_LENGTH, DEFAULT_MINIMUM_ANSWERED, DEFAULT_SENTINEL,
};
pub use error::{Error, Result};
pub use page::{DescriptionBlock, MoreLink, Page, Recommendation};
pub use session::PageSession;
pub use strategy::{
    build_strategy, DispatchReceipt, MailStrategy, Navigator, Notifier, RecordStore,
    RemoteStrategy, SubmissionStrategy, SurveyRecord,
};
pub use submitter::{SubmissionOutcome, SubmitPhase, SurveySubmitter};
pub use text::clean_text;
pub use truncator::{ready_page, truncate_all, TruncationReport};
pub use types::*;
