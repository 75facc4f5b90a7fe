//! Description truncation with a "read more" affordance
//!
//! The pass is meant to run once per page lifecycle: running it again over
//! already shortened blocks would shorten the truncated text (ellipsis
//! included) a second time. [`ready_page`] and [`crate::PageSession::ready`]
//! guarantee the single invocation; [`truncate_all`] itself does not guard.

use serde::Serialize;
use tracing::{debug, warn};
use url::{ParseError, Url};

use crate::config::TruncationConfig;
use crate::page::{DescriptionBlock, MoreLink, Page};

/// Summary of one truncation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TruncationReport {
    pub examined: usize,
    pub truncated: usize,
    /// Blocks that were shortened but had no usable "more" target
    pub missing_targets: Vec<String>,
}

/// First `max_length` characters of `content`, or `None` when it already fits
pub fn truncate_text(content: &str, max_length: usize) -> Option<&str> {
    content
        .char_indices()
        .nth(max_length)
        .map(|(cut, _)| &content[..cut])
}

/// Resolve a block's "more" target: its own target first, then the template
pub fn default_more_url(block: &DescriptionBlock, config: &TruncationConfig) -> Option<String> {
    block.more_target.clone().or_else(|| {
        config
            .more_url_template
            .as_ref()
            .map(|template| template.replace("{id}", &block.id))
    })
}

/// Absolute URLs and relative references are both fine as an `href`; only
/// targets that cannot be parsed either way (e.g. a broken host) are dropped.
fn is_usable_href(target: &str) -> bool {
    match Url::parse(target) {
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Shorten every block whose rendered content exceeds `config.max_length`.
///
/// A shortened block keeps exactly `max_length` characters of its original
/// content followed by `config.ellipsis`, and gets one [`MoreLink`] pointing
/// at the target `more_url_of(block)` returns, kept as given apart from
/// trimming. Without a target the block is still shortened, only the link is
/// left out.
pub fn truncate_all<F>(
    blocks: &mut [DescriptionBlock],
    config: &TruncationConfig,
    more_url_of: F,
) -> TruncationReport
where
    F: Fn(&DescriptionBlock) -> Option<String>,
{
    let mut report = TruncationReport::default();

    for block in blocks.iter_mut() {
        report.examined += 1;

        let Some(kept) = truncate_text(&block.content, config.max_length) else {
            continue;
        };

        let target = more_url_of(block);
        block.content = format!("{}{}", kept, config.ellipsis);
        report.truncated += 1;

        match target.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(href) if is_usable_href(href) => {
                debug!(block = %block.id, href, "truncated description");
                block.link = Some(MoreLink {
                    href: href.to_string(),
                    text: config.link_text.clone(),
                    new_context: true,
                });
            }
            Some(href) => {
                warn!(block = %block.id, href, "unusable more target, truncating without link");
                report.missing_targets.push(block.id.clone());
            }
            None => {
                warn!(block = %block.id, "no more target, truncating without link");
                report.missing_targets.push(block.id.clone());
            }
        }
    }

    report
}

/// Ready-time pass over a whole page, guarded by the page's own marker so a
/// reloaded snapshot is never shortened twice.
pub fn ready_page(page: &mut Page, config: &TruncationConfig) -> TruncationReport {
    if page.truncated {
        debug!("page already truncated, skipping");
        return TruncationReport::default();
    }

    let report = truncate_all(&mut page.descriptions, config, |block| default_more_url(block, config));
    page.truncated = true;
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_length: usize) -> TruncationConfig {
        TruncationConfig {
            max_length,
            ..TruncationConfig::default()
        }
    }

    fn own_target(block: &DescriptionBlock) -> Option<String> {
        block.more_target.clone()
    }

    #[test]
    fn test_short_content_is_untouched() {
        let original = "Short description";
        let mut blocks = vec![
            DescriptionBlock::new("a", original).with_more_target("https://x.org/a"),
            DescriptionBlock::new("b", "x".repeat(500)).with_more_target("https://x.org/b"),
        ];

        let report = truncate_all(&mut blocks, &config(500), own_target);

        assert_eq!(blocks[0].content, original);
        assert_eq!(blocks[0].link, None);
        assert_eq!(blocks[1].content, "x".repeat(500));
        assert_eq!(blocks[1].link, None);
        assert_eq!(report.examined, 2);
        assert_eq!(report.truncated, 0);
    }

    #[test]
    fn test_long_content_keeps_exact_prefix_and_one_link() {
        let original: String = (0..600).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let mut blocks = vec![DescriptionBlock::new("c", original.clone()).with_more_target("https://x.org/c")];

        let report = truncate_all(&mut blocks, &config(500), own_target);

        let expected: String = original.chars().take(500).collect();
        assert_eq!(blocks[0].content, format!("{}...", expected));
        assert_eq!(
            blocks[0].link,
            Some(MoreLink {
                href: "https://x.org/c".to_string(),
                text: "read more".to_string(),
                new_context: true,
            })
        );
        assert_eq!(report.truncated, 1);
        assert!(report.missing_targets.is_empty());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let original = "é".repeat(12);
        let mut blocks = vec![DescriptionBlock::new("d", original).with_more_target("https://x.org/d")];

        truncate_all(&mut blocks, &config(10), own_target);

        assert_eq!(blocks[0].content, format!("{}...", "é".repeat(10)));
    }

    #[test]
    fn test_missing_target_degrades_to_plain_truncation() {
        let mut blocks = vec![
            DescriptionBlock::new("e", "y".repeat(20)),
            DescriptionBlock::new("f", "z".repeat(20)).with_more_target("https://[broken"),
            DescriptionBlock::new("h", "w".repeat(20)).with_more_target("   "),
        ];

        let report = truncate_all(&mut blocks, &config(5), own_target);

        assert_eq!(blocks[0].content, "yyyyy...");
        assert_eq!(blocks[0].link, None);
        assert_eq!(blocks[1].content, "zzzzz...");
        assert_eq!(blocks[1].link, None);
        assert_eq!(blocks[2].link, None);
        assert_eq!(
            report.missing_targets,
            vec!["e".to_string(), "f".to_string(), "h".to_string()]
        );
    }

    #[test]
    fn test_target_is_kept_as_given() {
        let mut blocks = vec![
            DescriptionBlock::new("a", "abcdef").with_more_target("https://data.example.org"),
            DescriptionBlock::new("b", "abcdef").with_more_target(" /datasets/b "),
        ];

        let report = truncate_all(&mut blocks, &config(3), own_target);

        let hrefs: Vec<_> = blocks
            .iter()
            .map(|b| b.link.as_ref().map(|l| l.href.as_str()))
            .collect();
        assert_eq!(hrefs, vec![Some("https://data.example.org"), Some("/datasets/b")]);
        assert!(report.missing_targets.is_empty());
    }

    #[test]
    fn test_template_fallback() {
        let cfg = TruncationConfig {
            max_length: 3,
            more_url_template: Some("https://data.example.org/items/{id}".to_string()),
            ..TruncationConfig::default()
        };
        let mut blocks = vec![DescriptionBlock::new("ds-9", "abcdef")];

        truncate_all(&mut blocks, &cfg, |block| default_more_url(block, &cfg));

        assert_eq!(
            blocks[0].link.as_ref().map(|l| l.href.as_str()),
            Some("https://data.example.org/items/ds-9")
        );
    }

    #[test]
    fn test_ready_page_runs_once_per_page() {
        let mut page = Page {
            descriptions: vec![DescriptionBlock::new("g", "abcdefgh").with_more_target("https://x.org/g")],
            ..Page::default()
        };

        let first = ready_page(&mut page, &config(4));
        let second = ready_page(&mut page, &config(4));

        assert_eq!(first.truncated, 1);
        assert_eq!(second, TruncationReport::default());
        assert_eq!(page.descriptions[0].content, "abcd...");
        assert!(page.truncated);
    }

    #[test]
    fn test_truncate_text_boundaries() {
        assert_eq!(truncate_text("abc", 3), None);
        assert_eq!(truncate_text("abcd", 3), Some("abc"));
        assert_eq!(truncate_text("", 0), None);
    }
}
