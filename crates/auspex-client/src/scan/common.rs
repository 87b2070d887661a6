//! Raw document fragments shared between schema versions.
//!
//! Scan info, project info, and the issue summary kept their shape across
//! majors; only the tool section diverged.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use super::{IssueSummary, ProjectInfo, ScanInfo, ToolInfo};
use crate::error::ScanParseError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawScanInfo {
    #[serde(default)]
    pub cli_version: Option<String>,
    #[serde(default)]
    pub scan_time: Option<String>,
    #[serde(default)]
    pub issue_api_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawProjectInfo {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub revision_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawIssueSummary {
    #[serde(default)]
    pub issues_by_severity: BTreeMap<String, u64>,
    pub summary_url: String,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawToolInfo {
    #[serde(default)]
    pub tool_version: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub job_status: Option<String>,
    #[serde(default)]
    pub job_status_url: Option<String>,
}

pub(super) fn scan_info(raw: RawScanInfo) -> Result<ScanInfo, ScanParseError> {
    let issue_api_url = raw
        .issue_api_url
        .map(|u| parse_url(&u, "scanInfo.issueApiUrl"))
        .transpose()?;

    Ok(ScanInfo {
        cli_version: raw.cli_version,
        scan_time: raw.scan_time,
        issue_api_url,
    })
}

pub(super) fn project_info(raw: RawProjectInfo) -> ProjectInfo {
    ProjectInfo {
        project_id: raw.project_id,
        branch_id: raw.branch_id,
        revision_id: raw.revision_id,
    }
}

pub(super) fn issue_summary(raw: RawIssueSummary) -> Result<IssueSummary, ScanParseError> {
    Ok(IssueSummary {
        total_issue_count: raw.total,
        issues_by_severity: raw.issues_by_severity,
        summary_url: parse_url(&raw.summary_url, "issueSummary.summaryUrl")?,
    })
}

/// Translate a tool block. An absent `jobStatusUrl` stays absent (the
/// resolver reports it per tool); a present but invalid one is an error.
pub(super) fn tool_info(raw: RawToolInfo, tool_name: &str) -> Result<ToolInfo, ScanParseError> {
    let job_status_url = raw
        .job_status_url
        .map(|u| parse_url(&u, "jobStatusUrl"))
        .transpose()?;

    Ok(ToolInfo {
        tool_name: tool_name.to_string(),
        tool_version: raw.tool_version,
        job_id: raw.job_id,
        job_status: raw.job_status,
        job_status_url,
        issue_api_url: None,
    })
}

pub(super) fn parse_url(value: &str, field: &str) -> Result<Url, ScanParseError> {
    Url::parse(value).map_err(|e| ScanParseError::InvalidDocument {
        message: format!("{field} '{value}' is not a valid url: {e}"),
    })
}
