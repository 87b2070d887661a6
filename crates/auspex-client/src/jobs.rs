//! Polling loop for remote analysis jobs.

use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::info;
use url::Url;

use crate::client::PlatformClient;
use crate::error::{ApiError, ApiResult, JobError};
use crate::types::{JobAttributes, JobState, Resource, DEFAULT_POLL_INTERVAL};

/// Waits for remote analysis jobs to reach a terminal state.
///
/// One poller may serve any number of jobs; it holds no per-job state.
pub struct JobPoller<'a> {
    client: &'a PlatformClient,
    poll_interval: Duration,
}

impl<'a> JobPoller<'a> {
    /// Create a poller with the default 5-second poll interval.
    pub fn new(client: &'a PlatformClient) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the spacing between polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Fetch the current job resource.
    pub async fn job_by_url(&self, job_status_url: &Url) -> ApiResult<Resource<JobAttributes>> {
        self.client.get_single(job_status_url).await
    }

    /// Block until the job at `job_status_url` leaves its active states.
    ///
    /// A missing job resource is tolerated while polling: the remote side
    /// creates it asynchronously, and a 404 only means "not there yet". Any
    /// other fetch failure is fatal. The wall clock starts when this method
    /// is entered, not per poll.
    pub async fn wait_for_completion(
        &self,
        job_status_url: &Url,
        timeout: Duration,
    ) -> Result<(), JobError> {
        let started = Instant::now();

        loop {
            if self.has_job_ended(job_status_url).await? {
                break;
            }
            if started.elapsed() >= timeout {
                return Err(JobError::Timeout {
                    url: job_status_url.clone(),
                    timeout,
                });
            }
            sleep(self.poll_interval).await;
        }

        // One definitive read now that the job is out of its active states.
        let job = self.job_by_url(job_status_url).await?;
        let attributes = job.attributes.ok_or_else(|| JobError::Indeterminate {
            url: job_status_url.clone(),
        })?;
        let state = attributes
            .status
            .as_ref()
            .map(|status| status.state)
            .ok_or_else(|| JobError::Indeterminate {
                url: job_status_url.clone(),
            })?;

        if state == JobState::Completed {
            info!(url = %job_status_url, "job completed");
            return Ok(());
        }

        let reason = attributes
            .failure_info
            .and_then(|info| info.user_friendly_failure_reason)
            .filter(|reason| !reason.trim().is_empty());

        Err(JobError::Failed {
            url: job_status_url.clone(),
            state,
            reason,
        })
    }

    /// One poll tick. `Ok(false)` means keep polling.
    async fn has_job_ended(&self, job_status_url: &Url) -> Result<bool, JobError> {
        match self.job_by_url(job_status_url).await {
            Ok(job) => {
                let Some(status) = job.attributes.and_then(|attributes| attributes.status) else {
                    info!(url = %job_status_url, "job was found but its status could not be determined");
                    return Ok(false);
                };

                if status.state.is_active() {
                    info!(
                        url = %job_status_url,
                        state = %status.state,
                        progress = ?status.progress,
                        "job still in progress"
                    );
                    return Ok(false);
                }

                Ok(true)
            }

            // The job resource is created asynchronously on the remote side.
            Err(ApiError::NotFound { .. }) => {
                info!(url = %job_status_url, "job could not be found yet");
                Ok(false)
            }

            Err(other) => Err(JobError::Api(other)),
        }
    }
}
