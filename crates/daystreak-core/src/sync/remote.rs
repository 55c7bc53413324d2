//! Remote document store boundary.
//!
//! The production implementation speaks to a hosted JSON document API of
//! the `{base}/{namespace}/{key}.json` shape (GET to read, PUT to
//! replace). Change subscription is poll-based: the document is re-read on
//! an interval and pushed to the subscriber whenever its write stamp
//! advances.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use url::Url;

use super::types::{RemoteError, SyncEnvelope};
use crate::storage::RemoteConfig;

/// Key-value document store holding one streak record per user key.
///
/// Read and write apply the implementation's own timeout/retry policy;
/// callers treat any error as "remote unavailable" and fall back locally.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<SyncEnvelope>, RemoteError>;

    async fn write(&self, key: &str, envelope: &SyncEnvelope) -> Result<(), RemoteError>;

    /// Start pushing remote changes for `key` into `tx`. Delivery stops
    /// when the returned handle is dropped or unsubscribed.
    fn subscribe(&self, key: &str, tx: mpsc::UnboundedSender<SyncEnvelope>) -> Subscription;
}

/// Handle for an active change subscription.
///
/// Dropping it cancels the delivery task, so no callbacks fire into a
/// disposed context.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// REST client for the hosted document store.
#[derive(Clone)]
pub struct RestRemoteStore {
    client: reqwest::Client,
    base_url: Url,
    namespace: String,
    retry_attempts: u32,
    poll_interval: Duration,
}

impl RestRemoteStore {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RemoteError::Unavailable(format!("invalid base url: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            namespace: config.namespace.clone(),
            retry_attempts: config.retry_attempts.max(1),
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
        })
    }

    fn document_url(&self, key: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(&format!("{}/{}.json", self.namespace, key))
            .map_err(|e| RemoteError::Unavailable(format!("invalid document url: {e}")))
    }

    async fn read_once(&self, url: Url) -> Result<Option<SyncEnvelope>, RemoteError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        // The store answers JSON `null` for absent documents.
        let value: serde_json::Value = response.json().await?;
        if value.is_null() {
            return Ok(None);
        }
        let envelope = serde_json::from_value(value)
            .map_err(|e| RemoteError::InvalidRecord(e.to_string()))?;
        Ok(Some(envelope))
    }

    async fn write_once(&self, url: Url, envelope: &SyncEnvelope) -> Result<(), RemoteError> {
        self.client
            .put(url)
            .json(envelope)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn read(&self, key: &str) -> Result<Option<SyncEnvelope>, RemoteError> {
        let url = self.document_url(key)?;
        let mut last_err = RemoteError::Unavailable("no attempts made".into());
        for attempt in 1..=self.retry_attempts {
            match self.read_once(url.clone()).await {
                Ok(found) => return Ok(found),
                // A record that parses wrong will parse wrong again.
                Err(e @ RemoteError::InvalidRecord(_)) => return Err(e),
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "remote read failed");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    async fn write(&self, key: &str, envelope: &SyncEnvelope) -> Result<(), RemoteError> {
        let url = self.document_url(key)?;
        let mut last_err = RemoteError::Unavailable("no attempts made".into());
        for attempt in 1..=self.retry_attempts {
            match self.write_once(url.clone(), envelope).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "remote write failed");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    fn subscribe(&self, key: &str, tx: mpsc::UnboundedSender<SyncEnvelope>) -> Subscription {
        let store = self.clone();
        let key = key.to_string();
        let task = tokio::spawn(async move {
            let mut last_seen: Option<DateTime<Utc>> = None;
            let mut ticker = tokio::time::interval(store.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match store.read(&key).await {
                    Ok(Some(envelope)) => {
                        let advanced = last_seen.is_none_or(|seen| envelope.last_updated > seen);
                        if advanced {
                            last_seen = Some(envelope.last_updated);
                            if tx.send(envelope).is_err() {
                                // Receiver dropped; stop polling.
                                break;
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::debug!(error = %e, "subscription poll failed"),
                }
            }
        });
        Subscription::new(task)
    }
}
