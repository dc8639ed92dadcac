use futures::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::types::{decode_collection, decode_created_post, DecodeError, FeedKind, Item, NewPost};
use crate::util::{validate_base_url, BaseUrlError};

/// Upper bound on a single response body.
pub const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] BaseUrlError),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response: {0}")]
    Malformed(#[from] DecodeError),
    #[error("Could not encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// HTTP client bound to one backend base URL.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Validates `base_url` and builds a pooled HTTP client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = validate_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, kind: FeedKind) -> Result<Url, ApiError> {
        self.base_url
            .join(kind.endpoint())
            .map_err(|e| ApiError::InvalidBaseUrl(BaseUrlError::Parse(e)))
    }

    /// `GET /api/blogs` or `GET /api/community`.
    ///
    /// Returns the items in server order, or the first failure encountered.
    pub async fn fetch_collection(&self, kind: FeedKind) -> Result<Vec<Item>, ApiError> {
        let url = self.endpoint(kind)?;
        tracing::debug!(url = %url, kind = kind.name(), "Fetching collection");

        let request = self.http.get(url).header(ACCEPT, "application/json");
        let body = self.send(request).await?;
        let items = decode_collection(kind, &body)?;

        tracing::info!(kind = kind.name(), count = items.len(), "Collection loaded");
        Ok(items)
    }

    /// `POST /api/community`. Returns the created post as stored by the server.
    pub async fn create_post(&self, post: &NewPost) -> Result<Item, ApiError> {
        let url = self.endpoint(FeedKind::Community)?;
        let payload = serde_json::to_vec(post).map_err(ApiError::Encode)?;
        tracing::debug!(
            url = %url,
            category = post.category.label(),
            anonymous = post.anonymous,
            "Submitting post"
        );

        let request = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        let body = self.send(request).await?;
        let item = decode_created_post(&body)?;

        tracing::info!(id = %item.id, "Post created");
        Ok(item)
    }

    /// Sends the request under the configured timeout and reads a bounded body.
    ///
    /// The timeout covers the whole exchange, headers and body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let secs = self.timeout.as_secs();
        tokio::time::timeout(self.timeout, async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                tracing::warn!(status = status.as_u16(), "Backend returned error status");
                return Err(ApiError::HttpStatus(status.as_u16()));
            }
            read_limited_body(response, MAX_RESPONSE_SIZE).await
        })
        .await
        .map_err(|_| ApiError::Timeout(secs))?
    }
}

async fn read_limited_body(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Category;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_blogs_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blogs"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{"_id": "b1", "title": "Tenant Rights", "content": "Body",
                     "categories": ["Housing"], "createdAt": "2024-03-01T10:00:00Z"}]"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let items = client_for(&server)
            .fetch_collection(FeedKind::Blogs)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Tenant Rights");
    }

    #[tokio::test]
    async fn test_fetch_community_hits_community_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/community"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let items = client_for(&server)
            .fetch_collection(FeedKind::Community)
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/legal/api/community"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/legal", server.uri()), Duration::from_secs(5))
            .unwrap();
        assert!(client.fetch_collection(FeedKind::Community).await.is_ok());
    }

    #[tokio::test]
    async fn test_http_500_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_collection(FeedKind::Blogs).await;
        assert!(matches!(result, Err(ApiError::HttpStatus(500))));
    }

    #[tokio::test]
    async fn test_non_array_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"error": "nope"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_collection(FeedKind::Blogs).await;
        assert!(matches!(result, Err(ApiError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_collection(FeedKind::Community).await;
        assert!(matches!(result, Err(ApiError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("[]", "application/json")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
        let result = client.fetch_collection(FeedKind::Community).await;
        assert!(matches!(result, Err(ApiError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_oversized_response_rejected() {
        let server = MockServer::start().await;
        let big = "x".repeat(MAX_RESPONSE_SIZE + 1);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(big))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_collection(FeedKind::Blogs).await;
        assert!(matches!(result, Err(ApiError::ResponseTooLarge(_))));
    }

    #[tokio::test]
    async fn test_create_post_sends_json_and_decodes_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/community"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "title": "Small claims",
                "content": "How do I file?",
                "category": "Court Proceedings",
                "anonymous": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_raw(
                r#"{"_id": "p9", "title": "Small claims", "content": "How do I file?",
                    "category": "Court Proceedings", "timestamp": "2024-07-01T09:00:00Z",
                    "likes": 0, "comments": [], "anonymous": false}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let post = NewPost {
            title: "Small claims".to_string(),
            content: "How do I file?".to_string(),
            category: Category::CourtProceedings,
            anonymous: false,
        };
        let item = client_for(&server).create_post(&post).await.unwrap();
        assert_eq!(item.id, "p9");
        assert_eq!(item.anonymous, Some(false));
    }

    #[tokio::test]
    async fn test_create_post_rejected_by_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/community"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let post = NewPost {
            title: "t".to_string(),
            content: "c".to_string(),
            category: Category::LegalAdvice,
            anonymous: true,
        };
        let result = client_for(&server).create_post(&post).await;
        assert!(matches!(result, Err(ApiError::HttpStatus(400))));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::new("ftp://example.com", Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }
}
