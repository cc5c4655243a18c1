//! Stats-persistence boundary.
//!
//! On completion the workflow emits one [`UserStat`] record. Delivery is
//! best-effort and one-shot: a failure is logged by the caller, never
//! retried, and never blocks or reverses the completed attempt.

use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use exam_core::model::UserId;

use crate::error::StatsError;

//
// ─── WIRE RECORD ───────────────────────────────────────────────────────────────
//

/// One completed-exam record, serialized exactly as the stats endpoint
/// expects it: camelCase keys, ISO-8601 timestamp, score as a 0-100
/// float. This shape is the compatibility contract with the endpoint's
/// consumer; do not rename fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStat {
    pub user_id: UserId,
    pub stage: String,
    pub subject: String,
    pub date: DateTime<Utc>,
    pub score: f64,
}

//
// ─── SINK TRAIT ────────────────────────────────────────────────────────────────
//

/// Destination for completed-exam records.
#[async_trait]
pub trait StatsSink: Send + Sync {
    /// Deliver one record.
    ///
    /// # Errors
    ///
    /// Returns `StatsError` when delivery fails; the caller treats this
    /// as log-and-forget.
    async fn record(&self, stat: &UserStat) -> Result<(), StatsError>;
}

//
// ─── HTTP SINK ─────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct StatsConfig {
    pub endpoint: String,
}

impl StatsConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("EXAM_STATS_URL").ok()?;
        if endpoint.trim().is_empty() {
            return None;
        }
        Some(Self { endpoint })
    }
}

/// Posts records as JSON to the stats endpoint.
#[derive(Clone)]
pub struct HttpStatsSink {
    client: Client,
    config: Option<StatsConfig>,
}

impl HttpStatsSink {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(StatsConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<StatsConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl StatsSink for HttpStatsSink {
    async fn record(&self, stat: &UserStat) -> Result<(), StatsError> {
        let config = self.config.as_ref().ok_or(StatsError::Disabled)?;

        let response = self
            .client
            .post(&config.endpoint)
            .json(stat)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StatsError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

//
// ─── RECORDING SINK ────────────────────────────────────────────────────────────
//

/// Captures records in memory instead of delivering them, for tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingStatsSink {
    records: Arc<Mutex<Vec<UserStat>>>,
}

impl RecordingStatsSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn records(&self) -> Vec<UserStat> {
        self.records.lock().expect("records lock poisoned").clone()
    }
}

#[async_trait]
impl StatsSink for RecordingStatsSink {
    async fn record(&self, stat: &UserStat) -> Result<(), StatsError> {
        self.records
            .lock()
            .expect("records lock poisoned")
            .push(stat.clone());
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
