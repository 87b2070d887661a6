//! Error types for the platform client.

use std::time::Duration;

use url::Url;

use crate::types::JobState;

/// Failures while parsing a raw scan result document.
#[derive(Debug, thiserror::Error)]
pub enum ScanParseError {
    /// The document has no top-level `version` field.
    #[error("scan result has no version field")]
    MissingVersion,

    /// The `version` field is not a `major[.minor]` integer string.
    #[error("'{version}' is not a valid scan result version")]
    UnparsableVersion { version: String },

    /// The major version has no known schema.
    #[error("scan result version with major {major} is not supported")]
    UnsupportedVersion { major: u32 },

    /// The document is not valid JSON, or violates the schema for its version.
    #[error("scan result could not be deserialized: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but carries values the schema cannot accept.
    #[error("invalid scan result: {message}")]
    InvalidDocument { message: String },

    /// The scan result file could not be read.
    #[error("could not read scan result: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport and protocol errors talking to the platform API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The resource does not exist (HTTP 404).
    #[error("resource not found: {url}")]
    NotFound { url: Url },

    /// Authentication failed (HTTP 401/403).
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// The response body could not be decoded.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Client construction or configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for platform API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures while waiting for a remote analysis job.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// The job did not reach a terminal state within the timeout budget.
    #[error("job at {url} did not end in the provided timeout of {}", format_hms(*.timeout))]
    Timeout { url: Url, timeout: Duration },

    /// The job ended in a state other than COMPLETED.
    #[error(
        "job at {url} ended with state {state} instead of COMPLETED{}",
        .reason.as_deref().map(|r| format!(" because: {r}")).unwrap_or_default()
    )]
    Failed {
        url: Url,
        state: JobState,
        reason: Option<String>,
    },

    /// The job ended but its definitive state could not be read.
    #[error("job at {url} ended but its state cannot be determined")]
    Indeterminate { url: Url },

    /// Transport failure while fetching job status.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failures while resolving the total issue count for a scan.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Polling was required but the timeout cannot meaningfully bound it.
    #[error(
        "job timeout must be a positive integer if the CLI is run without waiting for completion"
    )]
    InvalidTimeout,

    /// Neither an inline issue summary nor an issue API URL is present.
    #[error(
        "cannot find the total issue count or issue api url in the scan result; ensure a supported version of the CLI is used"
    )]
    MissingIssueApiUrl,

    /// A tool carries no job status URL to poll.
    #[error("tool with name {tool} has no job status url")]
    ToolMissingJobStatusUrl { tool: String },

    /// The scan result document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ScanParseError),

    /// A tool's analysis job failed or timed out.
    #[error(transparent)]
    Job(#[from] JobError),

    /// Transport failure while fetching the issue counts.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Format a duration as `H:MM:SS.mmm` for human-facing messages.
pub(crate) fn format_hms(duration: Duration) -> String {
    let total_millis = duration.as_millis();
    let hours = total_millis / 3_600_000;
    let minutes = total_millis / 60_000 % 60;
    let seconds = total_millis / 1_000 % 60;
    let millis = total_millis % 1_000;
    format!("{hours}:{minutes:02}:{seconds:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::from_secs(0)), "0:00:00.000");
        assert_eq!(format_hms(Duration::from_millis(1_500)), "0:00:01.500");
        assert_eq!(format_hms(Duration::from_secs(30 * 60)), "0:30:00.000");
        assert_eq!(format_hms(Duration::from_secs(3_600 + 62)), "1:01:02.000");
    }

    #[test]
    fn test_timeout_message_carries_url_and_budget() {
        let err = JobError::Timeout {
            url: Url::parse("https://auspex.example.com/api/jobs/1").unwrap(),
            timeout: Duration::from_secs(60),
        };
        let message = err.to_string();
        assert!(message.contains("https://auspex.example.com/api/jobs/1"));
        assert!(message.contains("0:01:00.000"));
    }

    #[test]
    fn test_failed_message_with_and_without_reason() {
        let url = Url::parse("https://auspex.example.com/api/jobs/2").unwrap();

        let with_reason = JobError::Failed {
            url: url.clone(),
            state: JobState::Failed,
            reason: Some("license expired".to_string()),
        };
        assert!(with_reason.to_string().contains("because: license expired"));

        let without_reason = JobError::Failed {
            url,
            state: JobState::Unknown,
            reason: None,
        };
        let message = without_reason.to_string();
        assert!(message.contains("UNKNOWN"));
        assert!(!message.contains("because"));
    }
}
