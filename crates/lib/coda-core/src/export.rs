//! Asynchronous markdown export of a page.
//!
//! The remote API renders page content in the background, so reading a page
//! is a three phase exchange: begin an export, poll its status on a fixed
//! cadence, then download the rendered markdown from the returned link.

use std::time::Duration;

use coda_api::CodaApi;
use coda_api::models::{BeginExportRequest, ExportStatus};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Wait before each status check.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Status checks allowed before the export is considered timed out.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Terminal failure of a page export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export could not be started: {0}")]
    StartFailed(String),
    #[error("failed to get page content export status: {0}")]
    StatusCheckFailed(String),
    #[error("page content export did not complete after {attempts} retries")]
    TimedOut { attempts: u32 },
    #[error("failed to download exported page content from {link}: {cause}")]
    DownloadFailed { link: String, cause: String },
}

/// Poll cadence and budget for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportPolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl ExportPolicy {
    #[must_use]
    pub const fn new(poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            poll_interval,
            max_attempts,
        }
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Progress of a single export.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExportPhase {
    Started { request_id: String },
    Polling { request_id: String, attempt: u32 },
    Complete { download_link: String },
}

/// Drives one page export against a [`CodaApi`].
pub struct PageExport<'a, A: CodaApi> {
    api: &'a A,
    policy: ExportPolicy,
    doc_id: &'a str,
    page_id_or_name: &'a str,
}

impl<'a, A: CodaApi> PageExport<'a, A> {
    #[must_use]
    pub const fn new(
        api: &'a A,
        policy: ExportPolicy,
        doc_id: &'a str,
        page_id_or_name: &'a str,
    ) -> Self {
        Self {
            api,
            policy,
            doc_id,
            page_id_or_name,
        }
    }

    /// Runs the export to completion and returns the markdown verbatim.
    ///
    /// An empty body is a valid result.
    ///
    /// # Errors
    /// Returns the `ExportError` of whichever phase failed. Any reported status
    /// other than `complete` is retried until the budget runs out; a failed
    /// status query is terminal.
    pub async fn run(self) -> Result<String, ExportError> {
        let mut phase = self.begin().await?;
        loop {
            phase = match phase {
                ExportPhase::Started { request_id } => ExportPhase::Polling {
                    request_id,
                    attempt: 1,
                },
                ExportPhase::Polling {
                    request_id,
                    attempt,
                } => self.poll(request_id, attempt).await?,
                ExportPhase::Complete { download_link } => {
                    return self.download(&download_link).await;
                }
            };
        }
    }

    async fn begin(&self) -> Result<ExportPhase, ExportError> {
        let response = self
            .api
            .begin_page_content_export(
                self.doc_id,
                self.page_id_or_name,
                BeginExportRequest::markdown(),
            )
            .await
            .map_err(|err| {
                warn!(
                    doc_id = self.doc_id,
                    page = self.page_id_or_name,
                    error = %err,
                    "begin export failed"
                );
                ExportError::StartFailed(err.to_string())
            })?;

        if response.id.trim().is_empty() {
            warn!(
                doc_id = self.doc_id,
                page = self.page_id_or_name,
                "begin export returned no request id"
            );
            return Err(ExportError::StartFailed(
                "no export request id returned".to_string(),
            ));
        }

        debug!(
            doc_id = self.doc_id,
            page = self.page_id_or_name,
            request_id = %response.id,
            "page export started"
        );
        Ok(ExportPhase::Started {
            request_id: response.id,
        })
    }

    async fn poll(&self, request_id: String, attempt: u32) -> Result<ExportPhase, ExportError> {
        if attempt > self.policy.max_attempts {
            warn!(
                request_id = %request_id,
                attempts = self.policy.max_attempts,
                "page export timed out"
            );
            return Err(ExportError::TimedOut {
                attempts: self.policy.max_attempts,
            });
        }

        tokio::time::sleep(self.policy.poll_interval).await;

        let status = self
            .api
            .get_page_content_export_status(self.doc_id, self.page_id_or_name, &request_id)
            .await
            .map_err(|err| {
                warn!(
                    request_id = %request_id,
                    attempt,
                    error = %err,
                    "export status check failed"
                );
                ExportError::StatusCheckFailed(err.to_string())
            })?;
        debug!(request_id = %request_id, attempt, status = ?status.status, "polled page export");

        match status.status {
            ExportStatus::Complete => {
                let download_link = status
                    .download_link
                    .filter(|link| !link.trim().is_empty())
                    .ok_or_else(|| {
                        ExportError::StatusCheckFailed(
                            "export completed without a download link".to_string(),
                        )
                    })?;
                info!(request_id = %request_id, attempt, "page export complete");
                Ok(ExportPhase::Complete { download_link })
            }
            ExportStatus::Failed | ExportStatus::InProgress | ExportStatus::Unknown => {
                if let Some(cause) = status.error.as_deref() {
                    warn!(
                        request_id = %request_id,
                        attempt,
                        cause,
                        "page export reported an error"
                    );
                }
                Ok(ExportPhase::Polling {
                    request_id,
                    attempt: attempt + 1,
                })
            }
        }
    }

    async fn download(&self, link: &str) -> Result<String, ExportError> {
        self.api.download_text(link).await.map_err(|err| {
            warn!(link, error = %err, "export download failed");
            ExportError::DownloadFailed {
                link: link.to_string(),
                cause: err.to_string(),
            }
        })
    }
}

/// Exports a page as markdown using `policy`.
///
/// # Errors
/// See [`PageExport::run`].
pub async fn fetch_page_markdown<A: CodaApi>(
    api: &A,
    policy: ExportPolicy,
    doc_id: &str,
    page_id_or_name: &str,
) -> Result<String, ExportError> {
    PageExport::new(api, policy, doc_id, page_id_or_name)
        .run()
        .await
}
