//! Rendered page snapshot: description blocks and survey controls

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::text::clean_text;
use crate::types::{FieldName, FreeText, RatingInput};
use crate::Result;

/// External-navigation link appended to a truncated description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoreLink {
    pub href: String,
    pub text: String,
    /// Opens in a new browsing context (`target="_blank"`)
    pub new_context: bool,
}

/// One rendered description with its optional "more" target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionBlock {
    pub id: String,
    /// Rendered text content
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<MoreLink>,
}

impl DescriptionBlock {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            more_target: None,
            link: None,
        }
    }

    pub fn with_more_target(mut self, target: impl Into<String>) -> Self {
        self.more_target = Some(target.into());
        self
    }

    /// Rendered length in characters
    pub fn rendered_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// A recommendation as returned by the backend search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Recommendation {
    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn title(&self) -> Option<String> {
        self.metadata_str("title").map(clean_text)
    }

    pub fn description(&self) -> String {
        self.metadata_str("description")
            .map(clean_text)
            .unwrap_or_default()
    }

    /// Link to the full record, if the metadata carries one
    pub fn landing_page(&self) -> Option<String> {
        ["url", "landing_page", "landingPage"]
            .iter()
            .find_map(|key| self.metadata_str(key))
            .map(str::to_string)
    }
}

/// Snapshot of the rendered recommendation page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub descriptions: Vec<DescriptionBlock>,
    /// Rating controls in DOM order
    #[serde(default)]
    pub ratings: Vec<RatingInput>,
    #[serde(default)]
    pub fields: FreeText,
    /// Set once the ready-time truncation pass has run over this page
    #[serde(default)]
    pub truncated: bool,
}

impl Page {
    /// Render a fresh page for a list of recommendations: one description
    /// block and one untouched rating control per item.
    pub fn from_recommendations(items: &[Recommendation], sentinel: &str) -> Self {
        let descriptions = items
            .iter()
            .map(|item| DescriptionBlock {
                id: item.id.clone(),
                content: item.description(),
                more_target: item.landing_page(),
                link: None,
            })
            .collect();

        let ratings = items
            .iter()
            .map(|item| RatingInput::unset(format!("rating-{}", item.id), sentinel))
            .collect();

        Self {
            descriptions,
            ratings,
            fields: FreeText::new(),
            truncated: false,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Set a rating control's value; returns false when no control matches
    pub fn set_rating(&mut self, element_ref: &str, value: impl Into<String>) -> bool {
        match self.ratings.iter_mut().find(|r| r.element_ref == element_ref) {
            Some(input) => {
                input.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_recommendations() {
        let items = vec![
            Recommendation {
                id: "ds-1".to_string(),
                metadata: json!({
                    "title": "Air quality",
                    "description": "<b>Hourly</b> PM10 readings",
                    "landing_page": "https://data.example.org/ds-1"
                }),
            },
            Recommendation {
                id: "ds-2".to_string(),
                metadata: json!({}),
            },
        ];

        let page = Page::from_recommendations(&items, "0");

        assert_eq!(page.descriptions.len(), 2);
        assert_eq!(page.descriptions[0].content, "Hourly PM10 readings");
        assert_eq!(
            page.descriptions[0].more_target.as_deref(),
            Some("https://data.example.org/ds-1")
        );
        assert_eq!(page.descriptions[1].content, "");
        assert_eq!(page.descriptions[1].more_target, None);
        assert_eq!(page.ratings[1], RatingInput::new("rating-ds-2", "0"));
        assert_eq!(items[0].title().as_deref(), Some("Air quality"));
    }

    #[test]
    fn test_set_rating_and_field() {
        let mut page = Page {
            ratings: vec![RatingInput::new("rating-a", "0")],
            ..Page::default()
        };

        assert!(page.set_rating("rating-a", "4"));
        assert!(!page.set_rating("rating-z", "4"));
        page.set_field(FieldName::Email, "me@example.org");

        assert_eq!(page.ratings[0].value, "4");
        assert_eq!(page.fields.get(&FieldName::Email).map(String::as_str), Some("me@example.org"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        let mut page = Page::default();
        page.descriptions.push(DescriptionBlock::new("a", "text").with_more_target("https://x.org/a"));
        page.set_field(FieldName::Suggestions, "none");

        page.save(&path).unwrap();
        let loaded = Page::load(&path).unwrap();

        assert_eq!(loaded, page);
    }
}
