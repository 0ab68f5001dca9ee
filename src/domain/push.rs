//! Loading a push's job records
//!
//! Job records arrive as JSON:
//! ```json
//! { "push_id": 511, "revision": "abc123", "jobs": [ { "id": 1, ... } ] }
//! ```
//! Records are validated and enriched here so nothing downstream has to
//! second-guess optional fields.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Job, JobId};

/// Error type for push data loading
#[derive(Debug, thiserror::Error)]
pub enum JobDataError {
    #[error("Failed to read push data: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid push JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Job {job_id} is missing required field: {field}")]
    MissingField { job_id: JobId, field: &'static str },

    #[error("Job {job_id} has invalid tier {tier} (expected 1..=3)")]
    InvalidTier { job_id: JobId, tier: u8 },
}

/// All jobs of one push
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushData {
    pub push_id: u64,

    #[serde(default)]
    pub revision: String,

    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl PushData {
    /// Parse, validate and enrich push data from a JSON string
    pub fn from_json(content: &str) -> Result<Self, JobDataError> {
        let mut push: PushData = serde_json::from_str(content)?;

        for job in &mut push.jobs {
            validate(job)?;
            if job.push_id == 0 {
                job.push_id = push.push_id;
            }
            job.add_aggregate_fields();
        }

        tracing::debug!("Loaded push {} with {} jobs", push.push_id, push.jobs.len());
        Ok(push)
    }

    pub fn from_file(path: &Path) -> Result<Self, JobDataError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

fn validate(job: &Job) -> Result<(), JobDataError> {
    if job.job_type_name.trim().is_empty() {
        return Err(JobDataError::MissingField {
            job_id: job.id,
            field: "job_type_name",
        });
    }
    if job.platform.trim().is_empty() {
        return Err(JobDataError::MissingField {
            job_id: job.id,
            field: "platform",
        });
    }
    if let Some(tier) = job.tier {
        if !(1..=3).contains(&tier) {
            return Err(JobDataError::InvalidTier { job_id: job.id, tier });
        }
    }
    Ok(())
}
