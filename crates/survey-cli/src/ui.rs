//! Terminal rendering of the page's messages and reports

use colored::*;
use crossterm::terminal::size;
use std::process::Command;
use tracing::warn;

use survey_core::{Navigator, Notifier, Page, SubmissionOutcome, TruncationReport};

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(60, terminal_width.saturating_sub(4)).max(30);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));

    let title = "Recommendation survey";
    let version = format!("v{}", env!("CARGO_PKG_VERSION"));

    println!();
    println!("{}", top_border.blue());
    println!(
        "{}{}{}",
        "│  ".blue(),
        format!("{}{}", title.bold(), " ".repeat(banner_width - title.len() - 4)),
        "│".blue()
    );
    println!(
        "{}{}{}",
        "│  ".blue(),
        format!("{}{}", version.dimmed(), " ".repeat(banner_width - version.len() - 4)),
        "│".blue()
    );
    println!("{}", bottom_border.blue());
    println!();
}

/// Writes page messages to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{} {}", "⚠️ ".yellow(), message.yellow().bold());
    }

    fn inform(&self, message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn progress(&self, message: &str) {
        println!("{} {}", "📨".blue(), message.dimmed());
    }
}

/// Hands URIs to the platform opener; always prints them so the user can
/// copy the link if no handler is registered.
#[derive(Debug, Clone, Copy)]
pub struct SystemNavigator {
    launch: bool,
}

impl SystemNavigator {
    pub fn new(launch: bool) -> Self {
        Self { launch }
    }

    fn open(uri: &str) -> std::io::Result<std::process::ExitStatus> {
        if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "start", "", uri]).status()
        } else if cfg!(target_os = "macos") {
            Command::new("open").arg(uri).status()
        } else {
            Command::new("xdg-open").arg(uri).status()
        }
    }
}

impl Navigator for SystemNavigator {
    fn navigate(&self, uri: &str) {
        println!("{} {}", "→".green(), uri);

        if !self.launch {
            return;
        }

        match Self::open(uri) {
            Ok(status) if status.success() => {}
            Ok(status) => {
                warn!(%status, "URI handler exited with failure");
                eprintln!("{} Could not open the link automatically; use the URI above.", "❌".red());
            }
            Err(e) => {
                warn!(error = %e, "no URI handler available");
                eprintln!("{} Could not open the link automatically; use the URI above.", "❌".red());
            }
        }
    }
}

/// Describe a truncation pass
pub fn format_report(report: &TruncationReport) -> String {
    let mut text = format!(
        "{} of {} descriptions truncated",
        report.truncated, report.examined
    );
    if !report.missing_targets.is_empty() {
        text.push_str(&format!(
            " ({} without a read-more link: {})",
            report.missing_targets.len(),
            report.missing_targets.join(", ")
        ));
    }
    text
}

/// Describe the end of a submit cycle
pub fn format_outcome(outcome: &SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Rejected { answered, minimum } => {
            format!("rejected: {} of {} required ratings", answered, minimum)
        }
        SubmissionOutcome::Persisted { record_id: Some(id) } => format!("saved as record {}", id),
        SubmissionOutcome::Persisted { record_id: None } => "saved".to_string(),
        SubmissionOutcome::MailComposed { .. } => "handed to mail client".to_string(),
        SubmissionOutcome::DispatchFailed { reason } => format!("failed: {}", reason),
        SubmissionOutcome::InFlight => "ignored: a submission is already in progress".to_string(),
    }
}

/// One-screen overview of the page's controls
pub fn print_page_summary(page: &Page, sentinel: &str) {
    let answered = page
        .ratings
        .iter()
        .filter(|r| r.rating(sentinel).is_answered())
        .count();

    println!("{}", "Page".bold());
    println!("  descriptions: {}", page.descriptions.len());
    println!("  ratings:      {} of {} answered", answered, page.ratings.len());
    for (field, value) in &page.fields {
        println!("  {:<13} {}", format!("{}:", field), value.dimmed());
    }
}
