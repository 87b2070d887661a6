//! Versioned scan result ingestion.
//!
//! The CLI has shipped several incompatible shapes of its `cli-scan.json`
//! document. This module reads any supported shape and normalizes it into
//! one [`ScanResult`] model, selected by the major number of the document's
//! `version` field. Major 1 keeps tool information in two fixed slots; major
//! 2 carries a self-describing tool list. Unknown majors are rejected.

mod common;
mod v1;
mod v2;
mod version;

pub use version::ScanVersion;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ScanParseError;

/// Directory under the project root where the CLI writes its output.
pub const SCAN_OUTPUT_DIR: &str = ".auspex";

/// File name of the scan result document.
pub const SCAN_RESULT_FILE: &str = "cli-scan.json";

/// Normalized scan result, independent of document version.
///
/// Owns all of its data; nothing borrows from the raw document. Created once
/// per resolution and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Scan-level metadata, including the issue count API entry point.
    pub scan_info: ScanInfo,

    /// Project coordinates, when the CLI recorded them.
    pub project_info: Option<ProjectInfo>,

    /// Inline issue summary. Present when the CLI waited for completion;
    /// authoritative when present.
    pub issue_summary: Option<IssueSummary>,

    /// One entry per analysis tool that ran in this scan.
    pub tools: Vec<ToolInfo>,
}

/// Scan-level metadata.
#[derive(Debug, Clone)]
pub struct ScanInfo {
    /// Version of the CLI that produced the document.
    pub cli_version: Option<String>,

    /// When the scan ran, as reported by the CLI.
    pub scan_time: Option<String>,

    /// Entry point for the paged issue-count query.
    pub issue_api_url: Option<Url>,
}

/// Project coordinates of the scanned codebase.
#[derive(Debug, Clone, Default)]
pub struct ProjectInfo {
    pub project_id: Option<String>,
    pub branch_id: Option<String>,
    pub revision_id: Option<String>,
}

/// Inline issue summary embedded by a blocking-mode CLI run.
#[derive(Debug, Clone)]
pub struct IssueSummary {
    /// The authoritative total issue count.
    pub total_issue_count: u64,

    /// Issue counts broken down by severity.
    pub issues_by_severity: BTreeMap<String, u64>,

    /// Link to the human-facing summary.
    pub summary_url: Url,
}

/// One analysis tool's contribution to a scan.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name, fixed for major-1 documents and self-described for major 2.
    pub tool_name: String,

    /// Tool version.
    pub tool_version: Option<String>,

    /// Identifier of the tool's asynchronous job.
    pub job_id: Option<String>,

    /// Job state snapshot taken when the CLI exited. Stale by definition;
    /// the poller never reads it.
    pub job_status: Option<String>,

    /// Where to poll for the job's live status.
    pub job_status_url: Option<Url>,

    /// Tool-scoped issue API entry point (major 2 only).
    pub issue_api_url: Option<Url>,
}

impl ScanResult {
    /// Parse a raw scan result document.
    pub fn from_slice(raw: &[u8]) -> Result<Self, ScanParseError> {
        let document: Value = serde_json::from_slice(raw)?;
        Self::from_value(document)
    }

    /// Parse the scan result document at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ScanParseError> {
        debug!(path = %path.display(), "reading scan result");
        let raw = std::fs::read(path)?;
        Self::from_slice(&raw)
    }

    fn from_value(document: Value) -> Result<Self, ScanParseError> {
        let version_value = document
            .get("version")
            .ok_or(ScanParseError::MissingVersion)?;
        let version_string = version_value.as_str().unwrap_or_default();
        let version = ScanVersion::parse(version_string).ok_or_else(|| {
            ScanParseError::UnparsableVersion {
                version: version_string.to_string(),
            }
        })?;

        debug!(%version, "parsing scan result");

        match version.major {
            1 => v1::from_document(document),
            2 => v2::from_document(document),
            major => Err(ScanParseError::UnsupportedVersion { major }),
        }
    }
}

impl FromStr for ScanResult {
    type Err = ScanParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_slice(raw.as_bytes())
    }
}

/// Default location of the scan result under a project root.
pub fn default_scan_file_path(project_root: &Path) -> PathBuf {
    project_root.join(SCAN_OUTPUT_DIR).join(SCAN_RESULT_FILE)
}
