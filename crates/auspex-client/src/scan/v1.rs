//! Major-version-1 scan result documents.
//!
//! Version 1 carries at most two well-known tool blocks under fixed keys.
//! Translation is strict: a present block that does not translate fails the
//! whole parse.

use serde::Deserialize;
use serde_json::Value;

use super::{common, ScanResult};
use crate::error::ScanParseError;

/// Tool name assigned to the software-composition block.
pub(super) const SCA_TOOL_NAME: &str = "sca";

/// Tool name assigned to the static-analysis block.
pub(super) const SAST_TOOL_NAME: &str = "sast";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliScanV1 {
    scan_info: common::RawScanInfo,
    #[serde(default)]
    project_info: Option<common::RawProjectInfo>,
    #[serde(default)]
    issue_summary: Option<common::RawIssueSummary>,
    #[serde(default)]
    sca_tool_info: Option<common::RawToolInfo>,
    #[serde(default)]
    sast_tool_info: Option<common::RawToolInfo>,
}

pub(super) fn from_document(document: Value) -> Result<ScanResult, ScanParseError> {
    let raw: CliScanV1 = serde_json::from_value(document)?;

    // Fixed slots, SCA first when both tools ran.
    let mut tools = Vec::new();
    if let Some(tool) = raw.sca_tool_info {
        tools.push(common::tool_info(tool, SCA_TOOL_NAME)?);
    }
    if let Some(tool) = raw.sast_tool_info {
        tools.push(common::tool_info(tool, SAST_TOOL_NAME)?);
    }

    Ok(ScanResult {
        scan_info: common::scan_info(raw.scan_info)?,
        project_info: raw.project_info.map(common::project_info),
        issue_summary: raw.issue_summary.map(common::issue_summary).transpose()?,
        tools,
    })
}
