//! Common types used across the survey system

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{EmptyFieldPolicy, SubmissionConfig};

/// Value of one rating control, classified against the configured sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingValue {
    /// The control still holds the sentinel: the user has not rated it.
    Unset,
    /// Any other value, ordinal or categorical.
    Rated(String),
}

impl RatingValue {
    /// Classify a raw control value.
    ///
    /// The comparison against `sentinel` is exact (after trimming); an empty
    /// control also counts as unset. Nothing else is treated as unanswered, so
    /// a scale that legitimately includes `0` only needs a different sentinel.
    pub fn classify(raw: &str, sentinel: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == sentinel.trim() {
            RatingValue::Unset
        } else {
            RatingValue::Rated(trimmed.to_string())
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, RatingValue::Rated(_))
    }

    /// Single whitespace-free token for the assembled body
    pub fn token(&self, sentinel: &str) -> String {
        match self {
            RatingValue::Unset => join_words(sentinel),
            RatingValue::Rated(value) => join_words(value),
        }
    }
}

fn join_words(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("_")
}

/// One recommendation's rating control as rendered on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingInput {
    /// Identity of the control (element id)
    pub element_ref: String,
    /// Current raw value of the control
    pub value: String,
}

impl RatingInput {
    pub fn new(element_ref: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            element_ref: element_ref.into(),
            value: value.into(),
        }
    }

    /// A control that has not been touched yet
    pub fn unset(element_ref: impl Into<String>, sentinel: &str) -> Self {
        Self::new(element_ref, sentinel)
    }

    pub fn rating(&self, sentinel: &str) -> RatingValue {
        RatingValue::classify(&self.value, sentinel)
    }
}

/// Free-text fields the survey form can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Suggestions,
    Frequency,
    Navigation,
    Expectations,
    Email,
}

impl FieldName {
    /// Fixed label written in front of the value in the assembled body
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::Suggestions => "Suggestions",
            FieldName::Frequency => "Frequency of use",
            FieldName::Navigation => "Ease of navigation",
            FieldName::Expectations => "Met expectations",
            FieldName::Email => "Contact email",
        }
    }

    /// Element identifier of the control on the page
    pub fn element_id(&self) -> &'static str {
        match self {
            FieldName::Suggestions => "suggestions",
            FieldName::Frequency => "frequency",
            FieldName::Navigation => "navigation",
            FieldName::Expectations => "expectations",
            FieldName::Email => "email",
        }
    }

    pub fn all() -> Vec<FieldName> {
        vec![
            FieldName::Suggestions,
            FieldName::Frequency,
            FieldName::Navigation,
            FieldName::Expectations,
            FieldName::Email,
        ]
    }

    /// Parse from an element identifier or a loose alias
    pub fn parse(s: &str) -> Option<FieldName> {
        match s.trim().to_lowercase().as_str() {
            "suggestions" | "suggestion" => Some(FieldName::Suggestions),
            "frequency" | "frequency_of_use" => Some(FieldName::Frequency),
            "navigation" | "navigation_ease" => Some(FieldName::Navigation),
            "expectations" | "expectation" => Some(FieldName::Expectations),
            "email" | "contact" | "contact_email" => Some(FieldName::Email),
            _ => None,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element_id())
    }
}

/// Current values of the free-text controls, keyed by field
pub type FreeText = BTreeMap<FieldName, String>;

/// Aggregate of one submit attempt. Built by [`SurveyResponse::assemble`] and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyResponse {
    ratings: Vec<RatingValue>,
    fields: Vec<(FieldName, String)>,
    sentinel: String,
}

impl SurveyResponse {
    /// Assemble a response from the controls' current state.
    ///
    /// Ratings keep DOM order. Free-text fields follow the configured active
    /// field order; a field that is missing or blank is dropped under
    /// [`EmptyFieldPolicy::Omit`] and kept with an empty value under
    /// [`EmptyFieldPolicy::IncludeEmpty`].
    pub fn assemble(ratings: &[RatingInput], free_text: &FreeText, config: &SubmissionConfig) -> Self {
        let ratings = ratings
            .iter()
            .map(|input| input.rating(&config.sentinel))
            .collect();

        let fields = config
            .active_fields
            .iter()
            .filter_map(|field| {
                let value = free_text
                    .get(field)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default();
                match (value.is_empty(), config.empty_fields) {
                    (true, EmptyFieldPolicy::Omit) => None,
                    _ => Some((*field, value)),
                }
            })
            .collect();

        Self {
            ratings,
            fields,
            sentinel: config.sentinel.clone(),
        }
    }

    pub fn ratings(&self) -> &[RatingValue] {
        &self.ratings
    }

    pub fn fields(&self) -> &[(FieldName, String)] {
        &self.fields
    }

    pub fn field(&self, name: FieldName) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn answered_count(&self) -> usize {
        self.ratings.iter().filter(|r| r.is_answered()).count()
    }

    pub fn is_submittable(&self, minimum_answered: usize) -> bool {
        self.answered_count() >= minimum_answered
    }

    /// Space-separated rating tokens, one per control
    pub fn rating_line(&self) -> String {
        self.ratings
            .iter()
            .map(|r| r.token(&self.sentinel))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Full text body: the rating line, then one `Label: value` line per field
    pub fn body(&self) -> String {
        let mut body = self.rating_line();
        for (field, value) in &self.fields {
            body.push('\n');
            body.push_str(format!("{}: {}", field.label(), value).trim_end());
        }
        body
    }
}
