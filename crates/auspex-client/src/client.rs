//! HTTP client for the platform API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::types::{PagedResponse, PlatformConfig, Resource, SingleResponse};

/// Media type of all platform API exchanges.
pub const API_MIME_TYPE: &str = "application/vnd.api+json";

/// User agent for platform requests.
const USER_AGENT_VALUE: &str = concat!("auspex-client/", env!("CARGO_PKG_VERSION"));

const LIMIT_PARAMETER: &str = "page[limit]";
const OFFSET_PARAMETER: &str = "page[offset]";

/// Client for the platform REST API.
///
/// Every request URL is absolute: URLs come out of the scan result document
/// the CLI assembled, not from a configured base. The client only carries
/// transport configuration and an optional static bearer token.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    /// HTTP client.
    http: reqwest::Client,

    /// Static access token, sent as-is on every request.
    access_token: Option<String>,
}

impl PlatformClient {
    /// Create a new platform client.
    pub fn new(config: PlatformConfig) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(ACCEPT, HeaderValue::from_static(API_MIME_TYPE));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| ApiError::Config {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            access_token: config.access_token,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(PlatformConfig::from_env())
    }

    /// Fetch a single resource.
    pub async fn get_single<A>(&self, url: &Url) -> ApiResult<Resource<A>>
    where
        A: DeserializeOwned,
    {
        debug!(url = %url, "fetching resource");

        let response = self.execute(self.http.get(url.clone())).await?;
        let single: SingleResponse<A> = decode(response).await?;

        single.data.ok_or_else(|| ApiError::InvalidResponse {
            message: format!("response from {url} has no data"),
        })
    }

    /// Fetch one page of a paged collection.
    pub async fn get_page<A>(&self, url: &Url, limit: u32, offset: u64) -> ApiResult<PagedResponse<A>>
    where
        A: DeserializeOwned,
    {
        debug!(url = %url, limit, offset, "fetching page");

        let request = self.http.get(url.clone()).query(&[
            (LIMIT_PARAMETER, limit.to_string()),
            (OFFSET_PARAMETER, offset.to_string()),
        ]);

        let response = self.execute(request).await?;
        decode(response).await
    }

    /// Send a request and map error statuses into the error taxonomy.
    async fn execute(&self, mut request: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        if let Some(token) = &self.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        match status.as_u16() {
            200..=299 => Ok(response),

            401 | 403 => Err(ApiError::Unauthorized {
                message: "invalid or expired access token".to_string(),
            }),

            404 => Err(ApiError::NotFound {
                url: response.url().clone(),
            }),

            _ => {
                let message = response.text().await.unwrap_or_else(|_| status.to_string());
                Err(ApiError::Http {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Decode a response body, attributing failures to the request URL.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let url = response.url().clone();
    response.json().await.map_err(|e| ApiError::InvalidResponse {
        message: format!("failed to decode response from {url}: {e}"),
    })
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::types::CountAttributes;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client() -> PlatformClient {
        let config = PlatformConfig::default().with_access_token("test-token");
        PlatformClient::new(config).expect("failed to create client")
    }

    fn url(mock_server: &MockServer, relative: &str) -> Url {
        Url::parse(&format!("{}{relative}", mock_server.uri())).expect("valid url")
    }

    #[tokio::test]
    async fn test_get_single_sends_accept_and_auth_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/counts/c1"))
            .and(header("accept", API_MIME_TYPE))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "type": "issue-count", "id": "c1", "attributes": { "value": 3 } }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client();
        let resource: Resource<CountAttributes> = client
            .get_single(&url(&mock_server, "/api/counts/c1"))
            .await
            .expect("fetch failed");

        assert_eq!(resource.id.as_deref(), Some("c1"));
        assert_eq!(resource.attributes.unwrap().value, Some(3));
    }

    #[tokio::test]
    async fn test_get_page_sends_pagination_parameters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/issues"))
            .and(query_param("page[limit]", "25"))
            .and(query_param("page[offset]", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [],
                "meta": { "total": 0 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client();
        let page: PagedResponse<CountAttributes> = client
            .get_page(&url(&mock_server, "/api/issues"), 25, 50)
            .await
            .expect("fetch failed");

        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn test_404_maps_to_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = create_test_client();
        let result: ApiResult<Resource<CountAttributes>> =
            client.get_single(&url(&mock_server, "/api/jobs/missing")).await;

        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_401_maps_to_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = create_test_client();
        let result: ApiResult<Resource<CountAttributes>> =
            client.get_single(&url(&mock_server, "/api/jobs/1")).await;

        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_5xx_maps_to_http_with_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
            .mount(&mock_server)
            .await;

        let client = create_test_client();
        let result: ApiResult<Resource<CountAttributes>> =
            client.get_single(&url(&mock_server, "/api/jobs/1")).await;

        match result {
            Err(ApiError::Http { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance window");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_maps_to_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = create_test_client();
        let result: ApiResult<Resource<CountAttributes>> =
            client.get_single(&url(&mock_server, "/api/jobs/1")).await;

        assert!(matches!(result, Err(ApiError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_no_auth_header_without_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/counts/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "type": "issue-count", "id": "c1", "attributes": { "value": 0 } }
            })))
            .mount(&mock_server)
            .await;

        let client = PlatformClient::new(PlatformConfig::default()).expect("failed to create");
        let result: ApiResult<Resource<CountAttributes>> =
            client.get_single(&url(&mock_server, "/api/counts/c1")).await;

        assert!(result.is_ok());
        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests
            .iter()
            .all(|r| !r.headers.contains_key("authorization")));
    }
}
