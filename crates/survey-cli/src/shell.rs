//! Page shell operations on snapshot files

use std::path::Path;

use survey_core::{Error, FieldName, Page, Recommendation, Result};

/// Render a page from a backend search response (a JSON array of results)
pub fn render_from_results(results_path: impl AsRef<Path>, sentinel: &str) -> Result<Page> {
    let content = std::fs::read_to_string(results_path.as_ref())?;
    let items: Vec<Recommendation> = serde_json::from_str(&content)?;
    Ok(Page::from_recommendations(&items, sentinel))
}

/// Split `key=value`
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::InvalidInput(format!("expected key=value, got '{}'", raw)))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::InvalidInput(format!("missing key in '{}'", raw)));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Apply `ref=value` assignments to the rating controls.
///
/// A key matches a control's element ref; a bare number that matches no ref
/// selects the control at that 1-based position in DOM order.
pub fn apply_ratings(page: &mut Page, assignments: &[String]) -> Result<usize> {
    let mut applied = 0;

    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;

        if page.set_rating(&key, value.trim()) {
            applied += 1;
            continue;
        }

        let position = key
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1 && *n <= page.ratings.len())
            .ok_or_else(|| Error::InvalidInput(format!("no rating control '{}'", key)))?;
        page.ratings[position - 1].value = value.trim().to_string();
        applied += 1;
    }

    Ok(applied)
}

/// Apply `field=text` assignments to the free-text controls
pub fn apply_fields(page: &mut Page, assignments: &[String]) -> Result<usize> {
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        let field = FieldName::parse(&key)
            .ok_or_else(|| Error::InvalidInput(format!("unknown field '{}'", key)))?;
        page.set_field(field, value);
    }
    Ok(assignments.len())
}
