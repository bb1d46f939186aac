use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::client_auth::ClientAuthentication;
use crate::clock::{Clock, SystemClock};
use crate::config::ValidationOptions;
use crate::error::Error;
use crate::http::HttpClient;
use crate::request::{TokenRequest, encode_form};
use crate::response::parse_token_response;
use crate::tokens::TokenResponse;

/// Outcome of a token exchange: a validated response or exactly one failure.
pub type ExchangeResult = Result<TokenResponse, Error>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Performs token requests against a provider's token endpoint.
///
/// Holds no per-request state; one instance can serve any number of
/// concurrent exchanges.
///
/// ```rust,no_run
/// use oauth_token_exchange::{
///     ClientAuthentication, ProviderConfiguration, ReqwestClient, TokenExchange, TokenRequest,
/// };
///
/// # async fn example() -> Result<(), oauth_token_exchange::Error> {
/// let configuration = ProviderConfiguration::new(
///     "https://accounts.example.com/token".parse().unwrap(),
/// )
/// .with_issuer("https://accounts.example.com");
///
/// let request = TokenRequest::for_authorization_code(
///     configuration,
///     "client-id",
///     "authorization-code",
///     "https://app.example.com/callback",
/// )
/// .with_code_verifier("code-verifier")
/// .with_nonce("nonce-from-authorization-request");
///
/// let exchange = TokenExchange::new(ClientAuthentication::basic("client-secret"));
/// let tokens = exchange.execute(&ReqwestClient::new(), &request).await?;
/// println!("Access token: {}", tokens.access_token());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokenExchange<C = SystemClock> {
    client_authentication: ClientAuthentication,
    clock: C,
    options: ValidationOptions,
}

impl TokenExchange<SystemClock> {
    pub fn new(client_authentication: ClientAuthentication) -> Self {
        Self {
            client_authentication,
            clock: SystemClock,
            options: ValidationOptions::default(),
        }
    }
}

impl<C: Clock> TokenExchange<C> {
    pub fn with_clock<D: Clock>(self, clock: D) -> TokenExchange<D> {
        TokenExchange {
            client_authentication: self.client_authentication,
            clock,
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Send `request` to its token endpoint and interpret the response.
    ///
    /// Never panics on bad input; every failure comes back as an [`Error`].
    pub async fn execute(
        &self,
        http_client: &(impl HttpClient + ?Sized),
        request: &TokenRequest,
    ) -> ExchangeResult {
        let endpoint = &request.configuration().token_endpoint;
        let payload = self.perform_request(http_client, request).await;
        let result = parse_token_response(payload, request, &self.clock, &self.options);

        match &result {
            Ok(_) => debug!(%endpoint, "token exchange completed"),
            Err(err) => debug!(
                %endpoint,
                code = err.code(),
                kind = ?err.kind(),
                error = %err,
                "token exchange failed"
            ),
        }

        result
    }

    async fn perform_request(
        &self,
        http_client: &(impl HttpClient + ?Sized),
        request: &TokenRequest,
    ) -> Result<Map<String, Value>, Error> {
        let client_id = request.client_id();
        let mut http_request = http_client.open(&request.configuration().token_endpoint)?;

        http_request.set_header("Content-Type", FORM_CONTENT_TYPE);
        // Some providers (GitHub) only send RFC 6749 JSON error bodies
        // when JSON is explicitly accepted.
        if http_request.header("Accept").is_none_or(str::is_empty) {
            http_request.set_header("Accept", JSON_CONTENT_TYPE);
        }
        for (name, value) in self.client_authentication.headers(client_id) {
            http_request.set_header(name, value);
        }

        let mut parameters = request.request_parameters();
        parameters.extend(self.client_authentication.parameters(client_id));

        let body = encode_form(&parameters);
        http_request.set_header("Content-Length", body.len().to_string());
        http_request.body = body.into_bytes();

        let response = http_client.send(http_request).await?;
        trace!(
            status = response.status,
            success = response.is_success(),
            "token endpoint responded"
        );

        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Run one token exchange with default validation options.
pub async fn perform_token_request(
    http_client: &(impl HttpClient + ?Sized),
    request: &TokenRequest,
    client_authentication: &ClientAuthentication,
    clock: &impl Clock,
) -> ExchangeResult {
    TokenExchange::new(client_authentication.clone())
        .with_clock(clock)
        .execute(http_client, request)
        .await
}
