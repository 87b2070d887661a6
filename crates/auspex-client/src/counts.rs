//! Reduction of paged count resources to a single total.

use tracing::debug;
use url::Url;

use crate::client::PlatformClient;
use crate::error::ApiResult;
use crate::pager;
use crate::types::{CountAttributes, PagedResponse, Resource};

/// Fetch every count resource behind `issue_api_url`.
pub async fn count_resources(
    client: &PlatformClient,
    issue_api_url: &Url,
    page_size: u32,
) -> ApiResult<Vec<Resource<CountAttributes>>> {
    let response: PagedResponse<CountAttributes> =
        pager::fetch_all(client, issue_api_url, page_size).await?;
    Ok(response.data)
}

/// Sum the count resources behind `issue_api_url` into a total issue count.
///
/// Servers may shard one logical total across several count resources; a
/// resource without a value contributes zero.
pub async fn total_issue_count(
    client: &PlatformClient,
    issue_api_url: &Url,
    page_size: u32,
) -> ApiResult<u64> {
    let total = count_resources(client, issue_api_url, page_size)
        .await?
        .into_iter()
        .filter_map(|resource| resource.attributes)
        .filter_map(|attributes| attributes.value)
        .sum();

    debug!(url = %issue_api_url, total, "reduced issue count");
    Ok(total)
}
