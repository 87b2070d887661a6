//! Orchestration of the issue-count resolution pipeline.

use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::client::PlatformClient;
use crate::counts;
use crate::error::ResolveError;
use crate::jobs::JobPoller;
use crate::scan::ScanResult;
use crate::types::{DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL};

/// Resolves the authoritative total issue count for one scan.
///
/// Resolution is all or nothing: either every tool's job completes and the
/// count endpoint answers, or a typed error comes back. Nothing is cached
/// between calls; independent resolutions may run concurrently, each with
/// its own state.
pub struct IssueCountResolver<'a> {
    client: &'a PlatformClient,
    page_size: u32,
    poll_interval: Duration,
}

impl<'a> IssueCountResolver<'a> {
    /// Create a resolver with default page size and poll interval.
    pub fn new(client: &'a PlatformClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the page size used for the count walk.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the spacing between job status polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Parse a raw scan result document and resolve its total issue count.
    ///
    /// This is the collaborator-facing entry point: raw bytes and a timeout
    /// in, a count or a typed error out.
    pub async fn resolve_from_slice(
        &self,
        raw: &[u8],
        job_timeout_secs: i64,
    ) -> Result<u64, ResolveError> {
        let scan_result = ScanResult::from_slice(raw)?;
        self.resolve(&scan_result, job_timeout_secs).await
    }

    /// Resolve the total issue count for a parsed scan result.
    ///
    /// A scan run in blocking mode embeds its summary in the document; that
    /// count is authoritative and short-circuits all polling and paging.
    /// Otherwise every tool's job is awaited in order, then the paged count
    /// collection behind the scan's issue API URL is reduced by summation.
    pub async fn resolve(
        &self,
        scan_result: &ScanResult,
        job_timeout_secs: i64,
    ) -> Result<u64, ResolveError> {
        if let Some(summary) = &scan_result.issue_summary {
            debug!(
                total = summary.total_issue_count,
                "found total issue count in the scan result, scan must have waited for completion"
            );
            return Ok(summary.total_issue_count);
        }

        if job_timeout_secs < 1 {
            return Err(ResolveError::InvalidTimeout);
        }
        let job_timeout = Duration::from_secs(job_timeout_secs.unsigned_abs());

        let issue_api_url: &Url = scan_result
            .scan_info
            .issue_api_url
            .as_ref()
            .ok_or(ResolveError::MissingIssueApiUrl)?;

        debug!(url = %issue_api_url, "found issue api url, polling for job status");

        let poller = JobPoller::new(self.client).with_poll_interval(self.poll_interval);
        for tool in &scan_result.tools {
            let job_status_url = tool.job_status_url.as_ref().ok_or_else(|| {
                ResolveError::ToolMissingJobStatusUrl {
                    tool: tool.tool_name.clone(),
                }
            })?;

            info!(tool = %tool.tool_name, url = %job_status_url, "waiting for analysis job");
            poller.wait_for_completion(job_status_url, job_timeout).await?;
        }

        Ok(counts::total_issue_count(self.client, issue_api_url, self.page_size).await?)
    }
}
