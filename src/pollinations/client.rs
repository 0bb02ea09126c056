use std::sync::{PoisonError, RwLock};

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Response;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio_retry::RetryIf;

use super::PollinationsError;
use super::types::{ApiCredentials, GenerationRequest, PreparedRequest, TransportPolicy};

pub const BASE_URL: &str = "https://gen.pollinations.ai/image";

/// Characters left unescaped in the prompt path segment.
const PROMPT_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Longest error body kept in error messages.
const DETAIL_LIMIT: usize = 500;

pub struct PollinationsClient {
    http: reqwest::Client,
    base_url: String,
    policy: TransportPolicy,
    credentials: RwLock<ApiCredentials>,
}

impl PollinationsClient {
    pub fn new(credentials: ApiCredentials) -> Result<Self, PollinationsError> {
        Self::with_base_url(BASE_URL, credentials, TransportPolicy::default())
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: ApiCredentials,
        policy: TransportPolicy,
    ) -> Result<Self, PollinationsError> {
        let http = reqwest::Client::builder()
            .timeout(policy.timeout)
            .pool_max_idle_per_host(policy.max_connections)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
            credentials: RwLock::new(credentials),
        })
    }

    pub fn credentials(&self) -> ApiCredentials {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap the key/model used by subsequent requests.
    pub fn update_credentials(&self, credentials: ApiCredentials) {
        tracing::info!(
            model = %credentials.model,
            has_custom_key = credentials.is_authenticated(),
            "image API credentials updated"
        );
        *self
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner) = credentials;
    }

    /// Prepare `request` (seed, variation) and fetch the image.
    pub async fn generate_image(
        &self,
        request: &GenerationRequest,
    ) -> Result<Bytes, PollinationsError> {
        self.fetch(&request.prepare()).await
    }

    /// Issue the GET for an already prepared request and return raw image bytes.
    pub async fn fetch(&self, request: &PreparedRequest) -> Result<Bytes, PollinationsError> {
        let credentials = self.credentials();
        let model = credentials.model_for(&request.model_name);
        let url = self.image_url(&request.prompt);
        let query = request.query(model);

        tracing::info!(
            width = request.width,
            height = request.height,
            seed = request.seed,
            model,
            "requesting image"
        );
        tracing::debug!(%url, ?query, "image request");

        let resp = RetryIf::start(
            self.policy.delays(),
            || self.send_once(&url, &query, credentials.key.as_deref()),
            PollinationsError::is_transient,
        )
        .await?;

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !content_type.contains("image") {
            let detail = resp.text().await.unwrap_or_default();
            tracing::warn!(%content_type, "image endpoint returned a non-image body");
            return Err(PollinationsError::NonImage {
                content_type,
                detail: truncate(detail),
            });
        }

        let bytes = resp.bytes().await?;
        tracing::debug!(size = bytes.len(), %content_type, "image received");
        Ok(bytes)
    }

    /// Generate a small image without variation; true when it succeeds.
    pub async fn test_connection(&self) -> bool {
        let request = GenerationRequest::new("test image", 1024, 1024)
            .model(self.credentials().model)
            .variation(false);
        match self.generate_image(&request).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("connection test failed: {e}");
                false
            }
        }
    }

    /// One attempt; non-2xx statuses become `ApiError` so the retry loop can
    /// decide whether to try again.
    async fn send_once(
        &self,
        url: &str,
        query: &[(&'static str, String)],
        key: Option<&str>,
    ) -> Result<Response, PollinationsError> {
        let mut req = self
            .http
            .get(url)
            .query(query)
            .headers(cache_busting_headers());
        if let Some(key) = key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "image endpoint responded");

        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(PollinationsError::ApiError {
                status: status.as_u16(),
                detail: truncate(detail),
            });
        }

        Ok(resp)
    }

    /// Build `{base}/{percent-encoded prompt}`.
    pub(crate) fn image_url(&self, prompt: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(prompt, PROMPT_SEGMENT)
        )
    }
}

fn cache_busting_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers
}

fn truncate(mut text: String) -> String {
    if text.len() > DETAIL_LIMIT {
        let mut end = DETAIL_LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{PNG_BYTES, Reply, ScriptedServer};

    fn fast_policy() -> TransportPolicy {
        TransportPolicy {
            backoff: Duration::from_millis(10),
            ..TransportPolicy::default()
        }
    }

    fn client_for(server: &ScriptedServer, credentials: ApiCredentials) -> PollinationsClient {
        PollinationsClient::with_base_url(&server.base_url, credentials, fast_policy()).unwrap()
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("misty pine forest", 1920, 1080)
            .seed(Some(1234))
            .variation(false)
    }

    #[test]
    fn prompt_is_percent_encoded_into_path() {
        let client = PollinationsClient::with_base_url(
            "https://example.test/image/",
            ApiCredentials::default(),
            TransportPolicy::default(),
        )
        .unwrap();
        assert_eq!(
            client.image_url("neon city, 8k/uhd"),
            "https://example.test/image/neon%20city%2C%208k%2Fuhd"
        );
        assert_eq!(client.image_url("a-b_c.d~e"), "https://example.test/image/a-b_c.d~e");
    }

    #[tokio::test]
    async fn image_response_returns_bytes() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let client = client_for(&server, ApiCredentials::default());

        let bytes = client.generate_image(&request()).await.unwrap();
        assert_eq!(&bytes[..], PNG_BYTES);
        assert_eq!(server.hits(), 1);

        let head = server.requests()[0].to_lowercase();
        assert!(head.starts_with("get /image/misty%20pine%20forest?"), "{head}");
        for param in [
            "model=flux",
            "width=1920",
            "height=1080",
            "seed=1234",
            "enhance=true",
            "nologo=true",
            "private=true",
            "quality=high",
            "nofeed=true",
        ] {
            assert!(head.contains(param), "missing {param}: {head}");
        }
        assert!(head.contains("cache-control: no-cache, no-store, must-revalidate"));
        assert!(head.contains("pragma: no-cache"));
        assert!(!head.contains("authorization"));
    }

    #[tokio::test]
    async fn custom_key_sends_bearer_and_model() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let client = client_for(&server, ApiCredentials::new(Some("sk-test".into()), "turbo"));

        client
            .generate_image(&request().model("turbo"))
            .await
            .unwrap();

        let head = server.requests()[0].to_lowercase();
        assert!(head.contains("authorization: bearer sk-test"), "{head}");
        assert!(head.contains("model=turbo"));
    }

    #[tokio::test]
    async fn anonymous_requests_use_default_model() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let client = client_for(&server, ApiCredentials::default());

        client
            .generate_image(&request().model("midjourney"))
            .await
            .unwrap();
        assert!(server.requests()[0].contains("model=flux"));
    }

    #[tokio::test]
    async fn updated_credentials_apply_to_next_request() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let client = client_for(&server, ApiCredentials::default());

        client.update_credentials(ApiCredentials::new(Some("sk-new".into()), "flux"));
        client.generate_image(&request()).await.unwrap();
        assert!(
            server.requests()[0]
                .to_lowercase()
                .contains("authorization: bearer sk-new")
        );
    }

    #[tokio::test]
    async fn text_response_with_200_is_not_an_image() {
        let server = ScriptedServer::start(vec![Reply::text(200, "queue full")]).await;
        let client = client_for(&server, ApiCredentials::default());

        let err = client.generate_image(&request()).await.unwrap_err();
        assert!(
            matches!(err, PollinationsError::NonImage { ref detail, .. } if detail == "queue full"),
            "{err:?}"
        );
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn persistent_503_exhausts_two_retries() {
        let server = ScriptedServer::start(vec![Reply::text(503, "busy")]).await;
        let client = client_for(&server, ApiCredentials::default());

        let err = client.generate_image(&request()).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn single_503_then_image_succeeds() {
        let server =
            ScriptedServer::start(vec![Reply::text(503, "busy"), Reply::image()]).await;
        let client = client_for(&server, ApiCredentials::default());

        let bytes = client.generate_image(&request()).await.unwrap();
        assert_eq!(&bytes[..], PNG_BYTES);
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn unlisted_status_is_not_retried() {
        let server = ScriptedServer::start(vec![Reply::text(404, "nope")]).await;
        let client = client_for(&server, ApiCredentials::default());

        let err = client.generate_image(&request()).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transient());
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn slow_response_times_out_without_retry() {
        let server =
            ScriptedServer::start(vec![Reply::image().delayed(Duration::from_secs(3))]).await;
        let policy = TransportPolicy {
            timeout: Duration::from_millis(200),
            ..fast_policy()
        };
        let client =
            PollinationsClient::with_base_url(&server.base_url, ApiCredentials::default(), policy)
                .unwrap();

        let err = client.generate_image(&request()).await.unwrap_err();
        assert!(matches!(err, PollinationsError::Timeout), "{err:?}");
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_connection_reports_failure() {
        let server = ScriptedServer::start(vec![Reply::text(500, "down")]).await;
        let client = client_for(&server, ApiCredentials::default());
        assert!(!client.test_connection().await);
        assert_eq!(server.hits(), 3);
    }

    #[test]
    fn long_details_are_truncated() {
        let long = "é".repeat(400);
        let cut = truncate(long);
        assert!(cut.len() <= DETAIL_LIMIT);
        assert!(cut.chars().all(|c| c == 'é'));
    }
}
