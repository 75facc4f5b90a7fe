//! Rendered-text extraction for recommendation descriptions

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static MD_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^\)]+\)").expect("valid link regex"));
static MD_STRONG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\*_]{2,}(.*?)[\*_]{2,}").expect("valid strong regex"));
static MD_EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\*_](.*?)[\*_]").expect("valid emphasis regex"));
static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"={3,}").expect("valid rule regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Turn a raw title/description into the text a reader actually sees.
///
/// Entities are decoded first, then anything shaped like a tag is stripped;
/// Markdown links and emphasis are reduced to their text, `===` decorations
/// dropped and whitespace collapsed. A bare `<` with no closing `>` is kept.
pub fn clean_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let text = decode_entities(raw);
    let text = TAG.replace_all(&text, "");
    let text = MD_LINK.replace_all(&text, "$1");
    let text = MD_STRONG.replace_all(&text, "$1");
    let text = MD_EMPHASIS.replace_all(&text, "$1");
    let text = RULE.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");

    text.trim().to_string()
}

/// Decode character references only. Every `<` is escaped before parsing so
/// the fragment holds a single text node and no markup is interpreted.
fn decode_entities(raw: &str) -> String {
    let escaped = raw.replace('<', "&lt;");
    Html::parse_fragment(&escaped).root_element().text().collect()
}
