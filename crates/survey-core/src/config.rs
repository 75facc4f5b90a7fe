//! Survey configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;

use crate::types::FieldName;
use crate::{Error, Result};

/// Answered ratings required before a response may be sent
pub const DEFAULT_MINIMUM_ANSWERED: usize = 10;

/// Longest description rendered before truncation kicks in
pub const DEFAULT_MAX_LENGTH: usize = 500;

/// Value a rating control holds until the user picks a score
pub const DEFAULT_SENTINEL: &str = "0";

/// How a response leaves the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Persist through the hosted record service
    Remote,
    /// Hand off to the local mail client via a `mailto:` URI
    Mail,
}

impl StrategyKind {
    pub fn parse(s: &str) -> Option<StrategyKind> {
        match s.trim().to_lowercase().as_str() {
            "remote" | "api" | "service" => Some(StrategyKind::Remote),
            "mail" | "mailto" | "email" => Some(StrategyKind::Mail),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Remote => write!(f, "remote"),
            StrategyKind::Mail => write!(f, "mail"),
        }
    }
}

/// What a missing or blank free-text field contributes to the body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyFieldPolicy {
    /// No label/value pair at all
    #[default]
    Omit,
    /// The label with an empty value
    IncludeEmpty,
}

/// User-facing texts shown at the end of a submit cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// `{minimum}` and `{answered}` are substituted
    pub below_minimum: String,
    pub sending: String,
    pub remote_success: String,
    /// `{reason}` is substituted
    pub remote_failure: String,
    pub mail_handoff: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            below_minimum: "Please rate at least {minimum} recommendations before submitting (rated so far: {answered}).".to_string(),
            sending: "Sending your answers...".to_string(),
            remote_success: "Thank you! Your answers have been saved.".to_string(),
            remote_failure: "Your answers could not be saved: {reason}. Please try again.".to_string(),
            mail_handoff: "Your mail client has been opened with the answers. Please send the message.".to_string(),
        }
    }
}

impl Messages {
    pub fn below_minimum(&self, minimum: usize, answered: usize) -> String {
        self.below_minimum
            .replace("{minimum}", &minimum.to_string())
            .replace("{answered}", &answered.to_string())
    }

    pub fn remote_failure(&self, reason: &str) -> String {
        self.remote_failure.replace("{reason}", reason)
    }
}

/// Everything the submitter needs to validate, assemble and dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub strategy: StrategyKind,
    pub minimum_answered: usize,
    pub sentinel: String,
    /// Mail strategy recipient
    pub recipient: String,
    /// Mail strategy subject
    pub subject: String,
    /// Free-text fields read at submit time, in body order
    pub active_fields: Vec<FieldName>,
    pub empty_fields: EmptyFieldPolicy,
    pub messages: Messages,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Mail,
            minimum_answered: DEFAULT_MINIMUM_ANSWERED,
            sentinel: DEFAULT_SENTINEL.to_string(),
            recipient: "survey@example.org".to_string(),
            subject: "Recommendation survey".to_string(),
            active_fields: FieldName::all(),
            empty_fields: EmptyFieldPolicy::Omit,
            messages: Messages::default(),
        }
    }
}

/// Description truncation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruncationConfig {
    pub max_length: usize,
    pub ellipsis: String,
    pub link_text: String,
    /// Fallback "more" target for blocks without one; `{id}` is substituted
    pub more_url_template: Option<String>,
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            ellipsis: "...".to_string(),
            link_text: "read more".to_string(),
            more_url_template: None,
        }
    }
}

/// Complete page configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub submission: SubmissionConfig,
    pub truncation: TruncationConfig,
}

impl SurveyConfig {
    /// Create configuration from environment variables, on top of defaults
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load a JSON configuration file; absent keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: SurveyConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let submission = &mut config.submission;

        if let Some(value) = lookup("SURVEY_STRATEGY") {
            submission.strategy = StrategyKind::parse(&value).ok_or_else(|| {
                Error::Configuration(format!("SURVEY_STRATEGY must be 'remote' or 'mail', got '{}'", value))
            })?;
        }
        if let Some(value) = lookup("SURVEY_MIN_ANSWERED") {
            submission.minimum_answered = parse_number("SURVEY_MIN_ANSWERED", &value)?;
        }
        if let Some(value) = lookup("SURVEY_SENTINEL") {
            submission.sentinel = value;
        }
        if let Some(value) = lookup("SURVEY_RECIPIENT") {
            submission.recipient = value.trim().to_string();
        }
        if let Some(value) = lookup("SURVEY_SUBJECT") {
            submission.subject = value;
        }
        if let Some(value) = lookup("SURVEY_FIELDS") {
            submission.active_fields = value
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| {
                    FieldName::parse(part)
                        .ok_or_else(|| Error::Configuration(format!("Unknown survey field '{}'", part.trim())))
                })
                .collect::<Result<Vec<_>>>()?;
        }
        if let Some(value) = lookup("SURVEY_EMPTY_FIELDS") {
            submission.empty_fields = match value.trim().to_lowercase().as_str() {
                "omit" => EmptyFieldPolicy::Omit,
                "include" | "include_empty" => EmptyFieldPolicy::IncludeEmpty,
                other => {
                    return Err(Error::Configuration(format!(
                        "SURVEY_EMPTY_FIELDS must be 'omit' or 'include', got '{}'",
                        other
                    )));
                }
            };
        }
        if let Some(value) = lookup("SURVEY_MAX_LENGTH") {
            config.truncation.max_length = parse_number("SURVEY_MAX_LENGTH", &value)?;
        }
        if let Some(value) = lookup("SURVEY_MORE_URL_TEMPLATE") {
            config.truncation.more_url_template = Some(value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make a submit cycle misbehave
    pub fn validate(&self) -> Result<()> {
        let submission = &self.submission;

        if submission.sentinel.trim().is_empty() {
            return Err(Error::Configuration("sentinel must not be empty".to_string()));
        }
        if submission.strategy == StrategyKind::Mail {
            let recipient = submission.recipient.trim();
            let malformed = recipient.is_empty()
                || !recipient.contains('@')
                || recipient.contains(|c: char| c.is_whitespace() || matches!(c, '?' | '&' | '#'));
            if malformed {
                return Err(Error::Configuration(format!(
                    "mail strategy needs a valid recipient address, got '{}'",
                    submission.recipient
                )));
            }
        }
        if self.truncation.max_length == 0 {
            return Err(Error::Configuration("max_length must be greater than zero".to_string()));
        }
        if let Some(template) = &self.truncation.more_url_template {
            if !template.contains("{id}") {
                return Err(Error::Configuration(
                    "more_url_template must contain an {id} placeholder".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Configuration(format!("{} must be a non-negative integer, got '{}'", key, value)))
}
