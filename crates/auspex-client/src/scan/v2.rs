//! Major-version-2 scan result documents.
//!
//! Version 2 carries an arbitrary-length list of self-describing tool
//! entries. Translation is lenient: an entry that does not translate is
//! dropped with a logged reason instead of failing the parse.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{common, ScanResult, ToolInfo};
use crate::error::ScanParseError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliScanV2 {
    scan_info: common::RawScanInfo,
    #[serde(default)]
    project_info: Option<common::RawProjectInfo>,
    #[serde(default)]
    issue_summary: Option<common::RawIssueSummary>,
    #[serde(default)]
    tools: Vec<RawToolInfoV2>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToolInfoV2 {
    #[serde(default)]
    tool_name: Option<String>,
    #[serde(default)]
    issue_api_url: Option<String>,
    #[serde(flatten)]
    base: common::RawToolInfo,
}

pub(super) fn from_document(document: Value) -> Result<ScanResult, ScanParseError> {
    let raw: CliScanV2 = serde_json::from_value(document)?;

    let tools = raw
        .tools
        .into_iter()
        .filter_map(|tool| match translate_tool(tool) {
            Ok(tool) => Some(tool),
            Err(reason) => {
                warn!(%reason, "dropping tool entry that could not be translated");
                None
            }
        })
        .collect();

    Ok(ScanResult {
        scan_info: common::scan_info(raw.scan_info)?,
        project_info: raw.project_info.map(common::project_info),
        issue_summary: raw.issue_summary.map(common::issue_summary).transpose()?,
        tools,
    })
}

fn translate_tool(raw: RawToolInfoV2) -> Result<ToolInfo, ScanParseError> {
    let tool_name = raw
        .tool_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ScanParseError::InvalidDocument {
            message: "tool entry has no toolName".to_string(),
        })?;

    let mut tool = common::tool_info(raw.base, &tool_name)?;
    tool.issue_api_url = raw
        .issue_api_url
        .filter(|u| !u.trim().is_empty())
        .map(|u| common::parse_url(&u, "issueApiUrl"))
        .transpose()?;

    Ok(tool)
}
