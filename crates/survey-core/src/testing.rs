//! In-memory page collaborators for unit tests

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

use crate::strategy::{Navigator, Notifier, RecordStore, SurveyRecord};
use crate::{Error, Result};

#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
    informs: Mutex<Vec<String>>,
    progress: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn informs(&self) -> Vec<String> {
        self.informs.lock().unwrap().clone()
    }

    pub fn progress_messages(&self) -> Vec<String> {
        self.progress.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn inform(&self, message: &str) {
        self.informs.lock().unwrap().push(message.to_string());
    }

    fn progress(&self, message: &str) {
        self.progress.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, uri: &str) {
        self.visited.lock().unwrap().push(uri.to_string());
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SurveyRecord>>,
}

impl MemoryStore {
    pub fn records(&self) -> Vec<SurveyRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, record: &SurveyRecord) -> Result<Option<String>> {
        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        Ok(Some(format!("rec-{}", records.len())))
    }
}

/// Store whose every call fails with a fresh copy of the same error
pub struct FailingStore {
    error: Box<dyn Fn() -> Error + Send + Sync>,
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new(error: impl Fn() -> Error + Send + Sync + 'static) -> Self {
        Self {
            error: Box::new(error),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn create(&self, _record: &SurveyRecord) -> Result<Option<String>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err((self.error)())
    }
}

/// Store that parks every call until [`BlockingStore::release`]
#[derive(Default)]
pub struct BlockingStore {
    entered: Notify,
    released: Notify,
    calls: AtomicUsize,
}

impl BlockingStore {
    /// Resolves once a call is parked inside the store
    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for BlockingStore {
    async fn create(&self, _record: &SurveyRecord) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.released.notified().await;
        Ok(Some("rec-slow".to_string()))
    }
}
