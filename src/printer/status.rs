//! Printer status and job documents, with accessors on [`PrinterClient`].
//!
//! Two upstream endpoints are read: `/api/v1/status` (the Buddy status
//! document with job id and printer state) and `/api/job` (the legacy job
//! document whose top-level `state` string is all the proxy uses).

use serde::Deserialize;

use super::client::PrinterClient;
use crate::error::ProxyError;

/// `/api/v1/status` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub job: JobStatus,
    #[serde(default)]
    pub printer: PrinterState,
}

/// Active-job section of the status document. An `id` of 0 (or an absent
/// `job` section) means no active job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub time_remaining: f64,
    #[serde(default)]
    pub time_printing: f64,
}

/// Printer section of the status document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrinterState {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub temp_bed: f64,
    #[serde(default)]
    pub target_bed: f64,
    #[serde(default)]
    pub temp_nozzle: f64,
    #[serde(default)]
    pub target_nozzle: f64,
    #[serde(default)]
    pub axis_x: f64,
    #[serde(default)]
    pub axis_y: f64,
    #[serde(default)]
    pub axis_z: f64,
    #[serde(default)]
    pub flow: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub fan_hotend: f64,
    #[serde(default)]
    pub fan_print: f64,
}

/// `/api/job` document; only the top-level state string is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub state: String,
}

impl PrinterClient {
    /// Fetch and decode the full status document for `address`.
    pub async fn status(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Status, ProxyError> {
        let body = self
            .get(&format!("http://{address}/api/v1/status"), username, password)
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Current job id for `address`; 0 means no active job.
    pub async fn job_id(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<i64, ProxyError> {
        Ok(self.status(address, username, password).await?.job.id)
    }

    /// Top-level state string from the job document, e.g. `Printing`.
    pub async fn state(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ProxyError> {
        let body = self
            .get(&format!("http://{address}/api/job"), username, password)
            .await?;
        let job: Job = serde_json::from_slice(&body)?;
        Ok(job.state)
    }
}
