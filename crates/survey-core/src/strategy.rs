//! Submission strategies and the page collaborators they talk to

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{StrategyKind, SubmissionConfig};
use crate::mailto;
use crate::types::SurveyResponse;
use crate::{Error, Result};

/// User-facing message sink (the page's alert and banner area)
pub trait Notifier: Send + Sync {
    /// Blocking message the user has to acknowledge
    fn alert(&self, message: &str);

    /// Non-blocking confirmation
    fn inform(&self, message: &str);

    /// Shown while a slow operation is outstanding
    fn progress(&self, message: &str);
}

/// Full-page navigation of the browsing context
pub trait Navigator: Send + Sync {
    fn navigate(&self, uri: &str);
}

/// Record handed to the hosted persistence service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Assembled response body
    pub response: String,
    pub answered: usize,
    pub total: usize,
    pub submitted_at: DateTime<Utc>,
}

impl SurveyRecord {
    pub fn from_response(response: &SurveyResponse) -> Self {
        Self {
            response: response.body(),
            answered: response.answered_count(),
            total: response.ratings().len(),
            submitted_at: Utc::now(),
        }
    }
}

/// Create-record interface of the hosted persistence service
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create one record; returns the service-assigned id when it sends one
    async fn create(&self, record: &SurveyRecord) -> Result<Option<String>>;
}

/// What a successful dispatch produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DispatchReceipt {
    Persisted { record_id: Option<String> },
    MailComposed { uri: String },
}

/// One way of getting an assembled response off the page
#[async_trait]
pub trait SubmissionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn dispatch(&self, response: &SurveyResponse) -> Result<DispatchReceipt>;
}

/// Persist through the hosted record service. Failures are returned as-is;
/// retrying is left to the user.
pub struct RemoteStrategy {
    store: Arc<dyn RecordStore>,
}

impl RemoteStrategy {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubmissionStrategy for RemoteStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Remote
    }

    async fn dispatch(&self, response: &SurveyResponse) -> Result<DispatchReceipt> {
        let record = SurveyRecord::from_response(response);
        debug!(answered = record.answered, total = record.total, "creating remote record");
        let record_id = self.store.create(&record).await?;
        info!(record_id = ?record_id, "survey response persisted");
        Ok(DispatchReceipt::Persisted { record_id })
    }
}

/// Hand the response to the local mail client
pub struct MailStrategy {
    recipient: String,
    subject: String,
    navigator: Arc<dyn Navigator>,
}

impl MailStrategy {
    pub fn new(recipient: impl Into<String>, subject: impl Into<String>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            navigator,
        }
    }
}

#[async_trait]
impl SubmissionStrategy for MailStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Mail
    }

    async fn dispatch(&self, response: &SurveyResponse) -> Result<DispatchReceipt> {
        let uri = mailto::compose(&self.recipient, &self.subject, &response.body());
        info!(recipient = %self.recipient, "handing response to mail client");
        self.navigator.navigate(&uri);
        Ok(DispatchReceipt::MailComposed { uri })
    }
}

/// Pick the strategy named by the configuration
pub fn build_strategy(
    config: &SubmissionConfig,
    store: Option<Arc<dyn RecordStore>>,
    navigator: Arc<dyn Navigator>,
) -> Result<Box<dyn SubmissionStrategy>> {
    match config.strategy {
        StrategyKind::Remote => {
            let store = store.ok_or_else(|| {
                Error::Configuration("remote strategy selected but no record store is configured".to_string())
            })?;
            Ok(Box::new(RemoteStrategy::new(store)))
        }
        StrategyKind::Mail => Ok(Box::new(MailStrategy::new(
            config.recipient.clone(),
            config.subject.clone(),
            navigator,
        ))),
    }
}
