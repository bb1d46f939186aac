use std::future::Future;

use url::Url;

use crate::error::BoxError;

/// A minimal HTTP request representation (method is always POST for OAuth2).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing header with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }
}

/// A minimal HTTP response representation.
///
/// `body` holds the payload regardless of status: OAuth2 error responses
/// arrive on 4xx statuses with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for sending HTTP requests. Implementations must be `Send + Sync`
/// so they can be shared across async tasks.
///
/// TLS policy, proxies and timeouts are the implementation's concern.
pub trait HttpClient: Send + Sync {
    /// Prepare a request to `endpoint`. Implementations may pre-set headers
    /// (a `User-Agent`, or an `Accept` the caller prefers) or fail early,
    /// e.g. when the endpoint is not reachable under the client's policy.
    fn open(&self, endpoint: &Url) -> Result<HttpRequest, BoxError> {
        Ok(HttpRequest::new(endpoint.clone()))
    }

    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send;
}

#[cfg(feature = "reqwest-client")]
mod reqwest_impl {
    use url::Url;

    use super::{HttpClient, HttpRequest, HttpResponse};
    use crate::error::BoxError;

    const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    pub struct ReqwestClient {
        inner: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new() -> Self {
            Self {
                inner: reqwest::Client::new(),
            }
        }

        /// Use a preconfigured client, e.g. one with timeouts or a proxy.
        pub fn with_client(inner: reqwest::Client) -> Self {
            Self { inner }
        }
    }

    impl Default for ReqwestClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl HttpClient for ReqwestClient {
        fn open(&self, endpoint: &Url) -> Result<HttpRequest, BoxError> {
            let mut request = HttpRequest::new(endpoint.clone());
            request.set_header("User-Agent", USER_AGENT);
            Ok(request)
        }

        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, BoxError> {
            let mut builder = self.inner.post(req.url);

            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }

            builder = builder.body(req.body);

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();

            Ok(HttpResponse { status, body })
        }
    }
}

#[cfg(feature = "reqwest-client")]
pub use reqwest_impl::ReqwestClient;
