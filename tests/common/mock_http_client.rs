use oauth_token_exchange::{BoxError, HttpClient, HttpRequest, HttpResponse};
use std::sync::Mutex;
use url::Url;

/// What the client does when asked to open or send.
pub enum Scripted {
    Respond(HttpResponse),
    FailSend(std::io::ErrorKind),
}

/// An `HttpClient` implementation that records requests and returns
/// pre-configured responses. Used for testing exchange logic without a
/// network server.
pub struct MockHttpClient {
    /// Pre-configured outcomes to return in order.
    script: Mutex<Vec<Scripted>>,
    /// Recorded requests for assertion.
    recorded: Mutex<Vec<HttpRequest>>,
    /// When set, `open` fails with this error kind.
    open_failure: Option<std::io::ErrorKind>,
    /// Headers every opened request starts with.
    preset_headers: Vec<(String, String)>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            recorded: Mutex::new(Vec::new()),
            open_failure: None,
            preset_headers: Vec::new(),
        }
    }

    /// A client whose `open` always fails.
    pub fn failing_open(kind: std::io::ErrorKind) -> Self {
        Self {
            open_failure: Some(kind),
            ..Self::new()
        }
    }

    pub fn with_preset_header(mut self, name: &str, value: &str) -> Self {
        self.preset_headers
            .push((name.to_string(), value.to_string()));
        self
    }

    /// Add a response to the queue. Responses are returned in FIFO order.
    pub fn enqueue_response(&self, response: HttpResponse) {
        self.script.lock().unwrap().push(Scripted::Respond(response));
    }

    pub fn enqueue_json(&self, status: u16, body: serde_json::Value) {
        self.enqueue_response(HttpResponse {
            status,
            body: serde_json::to_vec(&body).unwrap(),
        });
    }

    pub fn enqueue_raw(&self, status: u16, body: &[u8]) {
        self.enqueue_response(HttpResponse {
            status,
            body: body.to_vec(),
        });
    }

    pub fn enqueue_send_failure(&self, kind: std::io::ErrorKind) {
        self.script.lock().unwrap().push(Scripted::FailSend(kind));
    }

    /// Drain and return all recorded requests.
    pub fn take_requests(&self) -> Vec<HttpRequest> {
        self.recorded.lock().unwrap().drain(..).collect()
    }
}

impl HttpClient for MockHttpClient {
    fn open(&self, endpoint: &Url) -> Result<HttpRequest, BoxError> {
        if let Some(kind) = self.open_failure {
            return Err(Box::new(std::io::Error::new(kind, "mock open failure")));
        }
        let mut request = HttpRequest::new(endpoint.clone());
        request.headers = self.preset_headers.clone();
        Ok(request)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        self.recorded.lock().unwrap().push(request);
        match self.script.lock().unwrap().remove(0) {
            Scripted::Respond(response) => Ok(response),
            Scripted::FailSend(kind) => {
                Err(Box::new(std::io::Error::new(kind, "mock send failure")))
            }
        }
    }
}
