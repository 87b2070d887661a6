//! Wire types for the platform API and client configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default page size for paged collection requests.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Default spacing between job status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default job wait budget (30 minutes).
pub const DEFAULT_JOB_TIMEOUT_SECS: i64 = 30 * 60;

/// A JSON:API resource: `{ "type": ..., "id": ..., "attributes": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<A> {
    /// Resource type discriminator.
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,

    /// Resource identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// Typed attribute payload.
    #[serde(default = "Option::default")]
    pub attributes: Option<A>,
}

/// Envelope of a single-resource endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleResponse<A> {
    /// The one resource, if the server produced it.
    #[serde(default = "Option::default")]
    pub data: Option<Resource<A>>,
}

/// Envelope of one page of a paged collection.
///
/// The pager reuses this shape for the fully accumulated collection: the
/// first page's `meta` with `data` and `included` replaced by the totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<A> {
    /// Resources on this page.
    #[serde(default = "Vec::default")]
    pub data: Vec<Resource<A>>,

    /// Untyped side-resources delivered alongside the page.
    #[serde(default)]
    pub included: Vec<serde_json::Value>,

    /// Pagination metadata, absent on servers that fit everything in one page.
    #[serde(default)]
    pub meta: Option<PaginationMeta>,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Total number of resources in the collection.
    #[serde(default)]
    pub total: Option<u64>,

    /// Offset of this page.
    #[serde(default)]
    pub offset: Option<u64>,

    /// Limit used for this page.
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Attributes of a job resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAttributes {
    /// Current status block.
    #[serde(default)]
    pub status: Option<JobStatus>,

    /// Failure details, present once a job has failed.
    #[serde(default)]
    pub failure_info: Option<FailureInfo>,
}

/// Status block of a job resource. Fetched fresh on every poll, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    /// Remote job state.
    pub state: JobState,

    /// Completion percentage, 0-100.
    #[serde(default)]
    pub progress: Option<u32>,
}

/// Remote job states.
///
/// Anything the server reports outside the known set deserializes to
/// [`JobState::Unknown`], which is treated as terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Queued,
    Dispatched,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// Whether the job may still make progress.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Queued | Self::Dispatched | Self::Running)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "QUEUED",
            Self::Dispatched => "DISPATCHED",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Failure details of a failed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureInfo {
    /// Human-readable reason suitable for build logs.
    #[serde(default)]
    pub user_friendly_failure_reason: Option<String>,

    /// Remote exception text.
    #[serde(default)]
    pub exception: Option<String>,
}

/// Attributes of an issue-count resource.
///
/// Servers may shard one logical total across several of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountAttributes {
    /// Issue count carried by this shard.
    #[serde(default)]
    pub value: Option<u64>,
}

/// Platform client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Static access token sent as a bearer credential. No refresh is
    /// attempted; token lifecycle belongs to the caller.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Page size for paged collection walks.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl PlatformConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `AUSPEX_ACCESS_TOKEN` | Access token |
    /// | `AUSPEX_TIMEOUT` | Request timeout in seconds (default: 30) |
    /// | `AUSPEX_PAGE_SIZE` | Page size for paged walks (default: 25) |
    pub fn from_env() -> Self {
        Self {
            access_token: std::env::var("AUSPEX_ACCESS_TOKEN").ok(),
            timeout_secs: std::env::var("AUSPEX_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
            page_size: std::env::var("AUSPEX_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_page_size),
        }
    }

    /// Set the access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
