//! Survey submitter: validate, assemble, dispatch

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::{StrategyKind, SubmissionConfig};
use crate::strategy::{DispatchReceipt, Notifier, SubmissionStrategy};
use crate::types::{FreeText, RatingInput, SurveyResponse};

/// Where the submitter is within one submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmitPhase {
    Idle,
    Validating,
    Rejected,
    Assembling,
    Dispatching,
}

/// Result of one submit cycle, as the page saw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SubmissionOutcome {
    /// Too few ratings; nothing was sent
    Rejected { answered: usize, minimum: usize },
    /// Remote record created
    Persisted { record_id: Option<String> },
    /// Mail client handed a `mailto:` URI
    MailComposed { uri: String },
    /// Remote call failed; the user may submit again
    DispatchFailed { reason: String },
    /// A previous submit is still dispatching
    InFlight,
}

impl SubmissionOutcome {
    /// Whether the response left the page
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::Persisted { .. } | SubmissionOutcome::MailComposed { .. }
        )
    }
}

/// Puts the phase back to idle however the cycle ends
struct IdleOnDrop<'a>(&'a watch::Sender<SubmitPhase>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(SubmitPhase::Idle);
    }
}

/// Handles the page's submit action
pub struct SurveySubmitter {
    config: SubmissionConfig,
    strategy: Box<dyn SubmissionStrategy>,
    notifier: Arc<dyn Notifier>,
    phase: watch::Sender<SubmitPhase>,
}

impl SurveySubmitter {
    pub fn new(
        config: SubmissionConfig,
        strategy: Box<dyn SubmissionStrategy>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (phase, _) = watch::channel(SubmitPhase::Idle);
        Self {
            config,
            strategy,
            notifier,
            phase,
        }
    }

    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn phase(&self) -> SubmitPhase {
        *self.phase.borrow()
    }

    /// Observe phase changes, e.g. to drive a loading indicator
    pub fn subscribe(&self) -> watch::Receiver<SubmitPhase> {
        self.phase.subscribe()
    }

    /// Run one submit cycle over the controls' current values.
    ///
    /// Validation always precedes assembly, which always precedes dispatch.
    /// The controls are only read, so a failed cycle leaves them intact for
    /// the next attempt. Every cycle ends in [`SubmitPhase::Idle`].
    pub async fn handle_submit(&self, ratings: &[RatingInput], free_text: &FreeText) -> SubmissionOutcome {
        let entered = self.phase.send_if_modified(|phase| {
            if *phase == SubmitPhase::Idle {
                *phase = SubmitPhase::Validating;
                true
            } else {
                false
            }
        });
        if !entered {
            debug!("submit ignored, previous submission still in progress");
            return SubmissionOutcome::InFlight;
        }
        let _idle = IdleOnDrop(&self.phase);

        let minimum = self.config.minimum_answered;
        let answered = ratings
            .iter()
            .filter(|input| input.rating(&self.config.sentinel).is_answered())
            .count();

        if answered < minimum {
            self.phase.send_replace(SubmitPhase::Rejected);
            warn!(answered, minimum, total = ratings.len(), "submission rejected");
            self.notifier
                .alert(&self.config.messages.below_minimum(minimum, answered));
            return SubmissionOutcome::Rejected { answered, minimum };
        }

        self.phase.send_replace(SubmitPhase::Assembling);
        let response = SurveyResponse::assemble(ratings, free_text, &self.config);
        debug!(
            answered,
            total = ratings.len(),
            fields = response.fields().len(),
            "response assembled"
        );

        self.phase.send_replace(SubmitPhase::Dispatching);
        if self.strategy.kind() == StrategyKind::Remote {
            self.notifier.progress(&self.config.messages.sending);
        }

        match self.strategy.dispatch(&response).await {
            Ok(DispatchReceipt::Persisted { record_id }) => {
                self.notifier.inform(&self.config.messages.remote_success);
                SubmissionOutcome::Persisted { record_id }
            }
            Ok(DispatchReceipt::MailComposed { uri }) => {
                self.notifier.inform(&self.config.messages.mail_handoff);
                SubmissionOutcome::MailComposed { uri }
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(strategy = %self.strategy.kind(), error = %reason, "dispatch failed");
                self.notifier
                    .alert(&self.config.messages.remote_failure(&reason));
                SubmissionOutcome::DispatchFailed { reason }
            }
        }
    }
}
