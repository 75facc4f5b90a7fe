//! Page lifecycle: one truncation pass, one submit handler

use std::sync::Arc;
use tracing::info;

use crate::config::{SurveyConfig, TruncationConfig};
use crate::page::Page;
use crate::strategy::{Navigator, Notifier, RecordStore, build_strategy};
use crate::submitter::{SubmissionOutcome, SurveySubmitter};
use crate::truncator::{TruncationReport, ready_page};
use crate::Result;

/// Owns the rendered page and wires exactly one submitter to it
pub struct PageSession {
    page: Page,
    truncation_config: TruncationConfig,
    submitter: SurveySubmitter,
    truncation: Option<TruncationReport>,
}

impl PageSession {
    pub fn new(page: Page, truncation_config: TruncationConfig, submitter: SurveySubmitter) -> Self {
        Self {
            page,
            truncation_config,
            submitter,
            truncation: None,
        }
    }

    /// Build the session and its submitter from configuration
    pub fn from_config(
        page: Page,
        config: SurveyConfig,
        store: Option<Arc<dyn RecordStore>>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        config.validate()?;
        let strategy = build_strategy(&config.submission, store, navigator)?;
        info!(strategy = %strategy.kind(), "submit handler registered");
        let submitter = SurveySubmitter::new(config.submission, strategy, notifier);
        Ok(Self::new(page, config.truncation, submitter))
    }

    /// Document-ready: truncate descriptions once. Later calls return the
    /// first pass's report and leave the page alone.
    pub fn ready(&mut self) -> &TruncationReport {
        let Self {
            page,
            truncation_config,
            truncation,
            ..
        } = self;
        let config: &TruncationConfig = truncation_config;

        truncation.get_or_insert_with(|| {
            let report = ready_page(page, config);
            info!(
                examined = report.examined,
                truncated = report.truncated,
                missing_targets = report.missing_targets.len(),
                "description truncation done"
            );
            report
        })
    }

    pub fn is_ready(&self) -> bool {
        self.truncation.is_some()
    }

    /// Submit action: runs the submitter over the controls as they are now
    pub async fn submit(&self) -> SubmissionOutcome {
        self.submitter
            .handle_submit(&self.page.ratings, &self.page.fields)
            .await
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// User interaction with the controls
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn submitter(&self) -> &SurveySubmitter {
        &self.submitter
    }

    pub fn into_page(self) -> Page {
        self.page
    }
}
