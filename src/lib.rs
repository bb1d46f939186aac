mod client_auth;
mod clock;
mod config;
mod error;
mod exchange;
mod http;
mod oidc;
mod request;
mod response;
mod token_error;
mod tokens;
mod validation;

// Core
pub use exchange::{ExchangeResult, TokenExchange, perform_token_request};
pub use request::{GrantType, TokenRequest};
pub use response::parse_token_response;
pub use tokens::TokenResponse;

// Errors
pub use error::{BoxError, Error, ErrorKind};
pub use oidc::IdTokenError;
pub use token_error::TokenErrorCode;
pub use validation::ValidationError;

// Collaborators
pub use client_auth::{ClientAuthentication, ClientAuthenticator, encode_basic_credentials};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ProviderConfiguration, ValidationOptions};
pub use http::{HttpClient, HttpRequest, HttpResponse};

// ID tokens
pub use oidc::IdToken;

// Default HTTP client (behind feature flag)
#[cfg(feature = "reqwest-client")]
pub use http::ReqwestClient;
