//! JSON transport shared by every service client.
//!
//! Two request styles are supported:
//!
//! - **REST-JSON**: an HTTP method and a path per operation, JSON bodies.
//! - **JSON-RPC**: `POST /` with the operation named in `X-Amz-Target`.
//!
//! Non-2xx responses are decoded into [`ApiError`]. Throttling and server
//! errors are retried here, up to the configured budget, so adapters never
//! retry on their own. Request signing is not performed; a configured
//! session token is forwarded as `X-Amz-Security-Token`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{Credentials, ProviderConfig};
use crate::error::{ApiError, ProviderError};

/// Maximum length of a response body written to logs.
const MAX_LOG_BODY_LENGTH: usize = 200;

const BASE_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";
const TARGET_HEADER: &str = "x-amz-target";
const SECURITY_TOKEN_HEADER: &str = "x-amz-security-token";

const REST_CONTENT_TYPE: &str = "application/json";
const RPC_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// An HTTP client bound to one service endpoint.
#[derive(Debug, Clone)]
pub struct JsonTransport {
    http: Client,
    service: &'static str,
    endpoint: Url,
    credentials: Credentials,
    max_retries: u32,
}

impl JsonTransport {
    /// Create a transport for `service` rooted at `endpoint`.
    pub fn new(
        service: &'static str,
        endpoint: Url,
        config: &ProviderConfig,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .user_agent(concat!("hemmer-provider-aws/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            service,
            endpoint,
            credentials: config.credentials.clone(),
            max_retries: config.max_retries,
        })
    }

    /// The service this transport talks to.
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// The base URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue a REST-JSON request.
    ///
    /// `path` is joined onto the endpoint and must already be percent-encoded.
    pub async fn rest<I, O>(&self, method: Method, path: &str, input: Option<&I>) -> Result<O, ProviderError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = rest_url(&self.endpoint, path).map_err(|e| {
            ProviderError::Configuration(format!("invalid request path {:?}: {}", path, e))
        })?;
        let body = input.map(serde_json::to_vec).transpose()?;

        self.send_with_retries(&format!("{} {}", method, path), || {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .headers(self.common_headers());
            if let Some(body) = &body {
                request = request
                    .header(CONTENT_TYPE, REST_CONTENT_TYPE)
                    .body(body.clone());
            }
            request
        })
        .await
    }

    /// Issue a JSON-RPC request for `target`, e.g. `CloudSearch.CreateDomain`.
    pub async fn rpc<I, O>(&self, target: &str, input: &I) -> Result<O, ProviderError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(input)?;

        self.send_with_retries(target, || {
            self.http
                .post(self.endpoint.clone())
                .headers(self.common_headers())
                .header(CONTENT_TYPE, RPC_CONTENT_TYPE)
                .header(TARGET_HEADER, target)
                .body(body.clone())
        })
        .await
    }

    fn common_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.credentials.token {
            if let Ok(value) = HeaderValue::from_str(token) {
                headers.insert(SECURITY_TOKEN_HEADER, value);
            }
        }
        headers
    }

    async fn send_with_retries<O, F>(&self, operation: &str, build: F) -> Result<O, ProviderError>
    where
        O: DeserializeOwned,
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            debug!(service = self.service, operation, attempt, "sending request");
            match self.send_once(build()).await {
                Err(ProviderError::Api(err)) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = backoff(attempt);
                    warn!(
                        service = self.service,
                        operation,
                        attempt,
                        code = %err.code,
                        delay_ms = delay.as_millis() as u64,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                result => return result,
            }
        }
    }

    async fn send_once<O: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<O, ProviderError> {
        let response = request.send().await?;
        let status = response.status();
        let error_type = response
            .headers()
            .get(ERROR_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if !status.is_success() {
            let err = decode_error(status.as_u16(), error_type.as_deref(), &body);
            debug!(
                service = self.service,
                status = status.as_u16(),
                code = %err.code,
                body = %sanitize_for_log(&body),
                "request failed"
            );
            return Err(err.into());
        }

        if body.trim().is_empty() {
            return Ok(serde_json::from_value(Value::Object(Default::default()))?);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Resolve `path` under the endpoint, keeping any path prefix the endpoint has.
fn rest_url(endpoint: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = endpoint.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
}

fn backoff(attempt: u32) -> Duration {
    BASE_BACKOFF
        .checked_mul(1u32 << attempt.min(16))
        .map(|d| d.min(MAX_BACKOFF))
        .unwrap_or(MAX_BACKOFF)
}

/// Decode an error response into an [`ApiError`].
///
/// The code comes from the `X-Amzn-ErrorType` header when present, else from
/// `__type`, `code`/`Code` or a nested `Error.Code` in the body. Namespace
/// prefixes (`aws.protocols#`) and suffixes (`:http://...`) are stripped.
pub fn decode_error(status: u16, error_type: Option<&str>, body: &str) -> ApiError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let nested = parsed.get("Error").unwrap_or(&Value::Null);

    let code = error_type
        .map(str::to_string)
        .or_else(|| string_field(&parsed, &["__type", "code", "Code"]))
        .or_else(|| string_field(nested, &["Code", "code"]))
        .map(|raw| normalize_code(&raw).to_string())
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| format!("Http{}", status));

    let message = string_field(&parsed, &["message", "Message"])
        .or_else(|| string_field(nested, &["Message", "message"]))
        .unwrap_or_default();

    ApiError::new(code, message, status)
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn normalize_code(raw: &str) -> &str {
    let without_suffix = raw.split(':').next().unwrap_or(raw);
    without_suffix
        .rsplit('#')
        .next()
        .unwrap_or(without_suffix)
        .trim()
}

fn sanitize_for_log(body: &str) -> String {
    let truncated: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
    let truncated = if truncated.len() < body.len() {
        format!("{}... [truncated, {} bytes total]", truncated, body.len())
    } else {
        truncated
    };
    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        #[serde(rename = "Name")]
        name: Option<String>,
    }

    async fn transport(server: &MockServer, max_retries: u32) -> JsonTransport {
        let mut config = ProviderConfig::new("us-east-1").with_max_retries(max_retries);
        config.credentials.token = Some("session-token".to_string());
        let endpoint = Url::parse(&server.uri()).unwrap();
        JsonTransport::new("test", endpoint, &config).unwrap()
    }

    #[test]
    fn test_decode_error_header_wins() {
        let err = decode_error(
            404,
            Some("NotFoundException:http://internal.amazon.com/"),
            r#"{"__type": "Other", "Message": "Group g1 not found"}"#,
        );
        assert_eq!(err.code, "NotFoundException");
        assert_eq!(err.message, "Group g1 not found");
        assert_eq!(err.status, 404);
    }

    #[test]
    fn test_decode_error_body_shapes() {
        let err = decode_error(
            400,
            None,
            r#"{"__type": "com.amazonaws.cloudsearch#ResourceNotFound", "message": "gone"}"#,
        );
        assert_eq!(err.code, "ResourceNotFound");
        assert_eq!(err.message, "gone");

        let err = decode_error(
            404,
            None,
            r#"{"Error": {"Code": "NoSuchResponseHeadersPolicy", "Message": "no policy"}}"#,
        );
        assert_eq!(err.code, "NoSuchResponseHeadersPolicy");
        assert_eq!(err.message, "no policy");

        let err = decode_error(502, None, "<html>bad gateway</html>");
        assert_eq!(err.code, "Http502");
        assert_eq!(err.message, "");
    }

    #[test]
    fn test_rest_url_keeps_endpoint_prefix() {
        let root = Url::parse("http://localhost:4566").unwrap();
        assert_eq!(
            rest_url(&root, "/get-group").unwrap().as_str(),
            "http://localhost:4566/get-group"
        );

        let prefixed = Url::parse("http://localhost:4566/proxy").unwrap();
        assert_eq!(
            rest_url(&prefixed, "/2020-05-31/response-headers-policy/p1")
                .unwrap()
                .as_str(),
            "http://localhost:4566/proxy/2020-05-31/response-headers-policy/p1"
        );

        let slashed = Url::parse("http://localhost:4566/proxy/").unwrap();
        assert_eq!(
            rest_url(&slashed, "/get-group").unwrap().as_str(),
            "http://localhost:4566/proxy/get-group"
        );
    }

    #[tokio::test]
    async fn test_rest_request_under_prefixed_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/proxy/get-group"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Name": "g1"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig::new("us-east-1").with_max_retries(0);
        let endpoint = Url::parse(&format!("{}/proxy", server.uri())).unwrap();
        let transport = JsonTransport::new("test", endpoint, &config).unwrap();
        let out: Echo = transport
            .rest(Method::POST, "/get-group", Some(&json!({"Group": "g1"})))
            .await
            .unwrap();
        assert_eq!(out.name.as_deref(), Some("g1"));
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff(0), Duration::from_millis(100));
        assert_eq!(backoff(3), Duration::from_millis(800));
        assert_eq!(backoff(10), MAX_BACKOFF);
        assert_eq!(backoff(40), MAX_BACKOFF);
    }

    #[test]
    fn test_sanitize_for_log_truncates() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 500 bytes total"));
        assert_eq!(sanitize_for_log("short\nbody"), "shortbody");
    }

    #[tokio::test]
    async fn test_rest_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-group"))
            .and(header("x-amz-security-token", "session-token"))
            .and(body_json(json!({"Group": "g1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Name": "g1"})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, 0).await;
        let out: Echo = transport
            .rest(Method::POST, "/get-group", Some(&json!({"Group": "g1"})))
            .await
            .unwrap();
        assert_eq!(out.name.as_deref(), Some("g1"));
    }

    #[tokio::test]
    async fn test_rpc_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", "CloudSearch.DescribeDomains"))
            .and(header("content-type", RPC_CONTENT_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, 0).await;
        let out: Echo = transport
            .rpc("CloudSearch.DescribeDomains", &json!({"DomainNames": ["d1"]}))
            .await
            .unwrap();
        assert_eq!(out, Echo { name: None });
    }

    #[tokio::test]
    async fn test_error_response_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-group"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("x-amzn-ErrorType", "NotFoundException")
                    .set_body_json(json!({"Message": "not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, 3).await;
        let err = transport
            .rest::<_, Echo>(Method::POST, "/get-group", Some(&json!({"Group": "g1"})))
            .await
            .unwrap_err();

        let api = err.api_error().expect("api error");
        assert_eq!(api.code, "NotFoundException");
        assert_eq!(api.status, 404);
    }

    #[tokio::test]
    async fn test_throttling_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-group"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"__type": "TooManyRequestsException"})),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/get-group"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Name": "g1"})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, 2).await;
        let out: Echo = transport
            .rest(Method::POST, "/get-group", Some(&json!({"Group": "g1"})))
            .await
            .unwrap();
        assert_eq!(out.name.as_deref(), Some("g1"));
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-group"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"__type": "InternalFailure"})))
            .expect(2)
            .mount(&server)
            .await;

        let transport = transport(&server, 1).await;
        let err = transport
            .rest::<_, Echo>(Method::POST, "/get-group", Some(&json!({"Group": "g1"})))
            .await
            .unwrap_err();
        assert_eq!(err.api_error().map(|e| e.status), Some(500));
    }
}
