//! Offset-based accumulation of paged collections.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::client::PlatformClient;
use crate::error::ApiResult;
use crate::types::PagedResponse;

/// Walk a paged collection and return the full accumulation.
///
/// `meta.total` is captured from the first page only; a server that changes
/// its reported total mid-walk does not move the stop condition. Servers may
/// omit the total when a single page satisfies the request, so an unknown
/// total keeps the walk going until a page comes back empty.
///
/// Pages are appended verbatim, duplicates included: overlapping pages from a
/// misbehaving server inflate the result rather than hang the walk. A failed
/// page fetch aborts the whole walk with no partial result.
pub async fn fetch_all<A>(
    client: &PlatformClient,
    url: &Url,
    page_size: u32,
) -> ApiResult<PagedResponse<A>>
where
    A: DeserializeOwned,
{
    let mut accumulated: PagedResponse<A> = PagedResponse {
        data: Vec::new(),
        included: Vec::new(),
        meta: None,
    };
    let mut expected_total: Option<u64> = None;
    let mut offset: u64 = 0;
    let mut first_page = true;

    loop {
        let page: PagedResponse<A> = client.get_page(url, page_size, offset).await?;

        if first_page {
            expected_total = page.meta.as_ref().and_then(|meta| meta.total);
            accumulated.meta = page.meta.clone();
            first_page = false;
        }

        let this_page_had_data = !page.data.is_empty();
        accumulated.data.extend(page.data);
        accumulated.included.extend(page.included);

        let is_more_data = match expected_total {
            None => true,
            Some(total) => (accumulated.data.len() as u64) < total,
        };

        if !this_page_had_data || !is_more_data {
            debug!(url = %url, collected = accumulated.data.len(), "finished paged walk");
            return Ok(accumulated);
        }

        offset += u64::from(page_size);
    }
}
