use crate::review::ReviewResponseCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Lifecycle states of a review job.
///
/// Transitions are forward-only:
/// `queued -> in_progress -> {completed | error}` and
/// `{queued | in_progress} -> canceled`. Terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Canceled,
    Error,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Canceled => "canceled",
            JobStatus::Error => "error",
        }
    }

    /// Whether this state can never be left again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Canceled | JobStatus::Error
        )
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Queued, JobStatus::InProgress | JobStatus::Canceled) => true,
            (
                JobStatus::InProgress,
                JobStatus::Completed | JobStatus::Error | JobStatus::Canceled,
            ) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJobStatus(pub String);

impl fmt::Display for UnknownJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown job status: {}", self.0)
    }
}

impl std::error::Error for UnknownJobStatus {}

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "in_progress" => Ok(JobStatus::InProgress),
            "completed" => Ok(JobStatus::Completed),
            "canceled" => Ok(JobStatus::Canceled),
            "error" => Ok(JobStatus::Error),
            other => Err(UnknownJobStatus(other.to_string())),
        }
    }
}

/// Output payload for `POST /jobs`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobCreateResponse {
    #[serde(rename = "jobId")]
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
}

/// Output payload for `GET /jobs/{jobId}` and `PUT /jobs/{jobId}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobStatusResponse {
    #[serde(rename = "jobId")]
    pub job_id: String,
    pub status: JobStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "completedAt")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "reviewId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
    /// Present once the job completed and its review was stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ReviewResponseCategory>>,
}

/// Input payload for `PUT /jobs/{jobId}`; only `{"status":"canceled"}` is honored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobUpdateRequest {
    pub status: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_str() {
        for status in [
            JobStatus::Queued,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Canceled,
            JobStatus::Error,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("paused".parse::<JobStatus>().is_err());
    }

    #[test]
    fn terminal_states_accept_no_transition() {
        for terminal in [JobStatus::Completed, JobStatus::Canceled, JobStatus::Error] {
            assert!(terminal.is_terminal());
            for next in [
                JobStatus::Queued,
                JobStatus::InProgress,
                JobStatus::Completed,
                JobStatus::Canceled,
                JobStatus::Error,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn forward_transitions_only() {
        assert!(JobStatus::Queued.can_transition_to(JobStatus::InProgress));
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Canceled));
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::InProgress.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::InProgress.can_transition_to(JobStatus::Error));
        assert!(JobStatus::InProgress.can_transition_to(JobStatus::Canceled));
        assert!(!JobStatus::InProgress.can_transition_to(JobStatus::Queued));
    }
}
