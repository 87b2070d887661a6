//! Client for the Auspex analysis platform.
//!
//! The platform runs analysis jobs asynchronously. The CLI writes a
//! `cli-scan.json` document describing the scan it launched; this crate
//! ingests that document across its incompatible schema versions and
//! resolves the one number a build step cares about: the total issue count.
//!
//! - [`scan`] parses any supported document version into a [`ScanResult`]
//! - [`jobs`] polls each tool's analysis job until it reaches a terminal state
//! - [`pager`] walks paged collections; [`counts`] reduces count resources
//! - [`resolver`] ties the pipeline together
//!
//! # Quick start
//!
//! ```no_run
//! use auspex_client::{IssueCountResolver, PlatformClient, PlatformConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PlatformClient::new(PlatformConfig::from_env())?;
//!
//! let raw = std::fs::read(".auspex/cli-scan.json")?;
//! let count = IssueCountResolver::new(&client)
//!     .resolve_from_slice(&raw, 30 * 60)
//!     .await?;
//! println!("total issues: {count}");
//! # Ok(())
//! # }
//! ```
//!
//! # Failure model
//!
//! Resolution is all or nothing. The only tolerated anomaly is a job status
//! resource that does not exist yet while polling; every other failure
//! surfaces immediately as a typed error. Partial counts are never reported.

pub mod client;
pub mod counts;
pub mod error;
pub mod jobs;
pub mod pager;
pub mod resolver;
pub mod scan;
pub mod types;

// Re-export main types
pub use client::{PlatformClient, API_MIME_TYPE};
pub use error::{ApiError, ApiResult, JobError, ResolveError, ScanParseError};
pub use jobs::JobPoller;
pub use resolver::IssueCountResolver;
pub use scan::{
    default_scan_file_path, IssueSummary, ProjectInfo, ScanInfo, ScanResult, ScanVersion,
    ToolInfo, SCAN_OUTPUT_DIR, SCAN_RESULT_FILE,
};
pub use types::{
    CountAttributes, FailureInfo, JobAttributes, JobState, JobStatus, PagedResponse,
    PaginationMeta, PlatformConfig, Resource, SingleResponse, DEFAULT_JOB_TIMEOUT_SECS,
    DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL,
};
