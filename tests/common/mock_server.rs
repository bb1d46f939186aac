use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock token endpoint built on `wiremock`.
pub struct MockTokenServer {
    server: MockServer,
}

impl MockTokenServer {
    /// Start a new mock server on a random available port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the mock server (e.g. "http://127.0.0.1:PORT").
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Full URL of the mocked `POST /token` endpoint.
    pub fn token_endpoint(&self) -> url::Url {
        url::Url::parse(&format!("{}/token", self.url())).expect("mock server URL is valid")
    }

    /// Mount a handler that returns `status` with a JSON body at `POST /token`.
    pub async fn mock_token_json(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(&body))
            .mount(&self.server)
            .await;
    }

    /// Mount a handler that returns `status` with a raw text body at `POST /token`.
    pub async fn mock_token_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    async fn last_request(&self) -> wiremock::Request {
        let requests = self
            .server
            .received_requests()
            .await
            .expect("request recording enabled");
        requests
            .last()
            .cloned()
            .expect("expected at least one request")
    }

    /// Assert that the last request to the mock server contained
    /// the expected form-urlencoded parameters in its body.
    pub async fn verify_token_request(&self, expected_params: &[(&str, &str)]) {
        let last = self.last_request().await;
        let body_str = String::from_utf8(last.body.clone()).expect("body should be UTF-8");
        let parsed: Vec<(String, String)> = url::form_urlencoded::parse(body_str.as_bytes())
            .into_owned()
            .collect();

        for (key, value) in expected_params {
            let found = parsed.iter().any(|(k, v)| k == key && v == value);
            assert!(
                found,
                "expected form param {}={} in request body, got: {}",
                key, value, body_str
            );
        }
    }

    /// Value of a header on the last request.
    pub async fn last_header(&self, name: &str) -> Option<String> {
        let last = self.last_request().await;
        last.headers
            .get(name)
            .map(|v| v.to_str().expect("header is ASCII").to_string())
    }
}
