use url::Url;

use crate::oidc::IdTokenError;
use crate::token_error::TokenErrorCode;
use crate::validation::ValidationError;

/// Error type produced by [`HttpClient`](crate::HttpClient) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a token exchange can fail.
///
/// The variants are mutually exclusive and map one-to-one onto
/// [`ErrorKind`]. A failure is terminal for the exchange that produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection or I/O failure while sending the request or reading the
    /// response.
    #[error("Network error: {0}")]
    Network(#[from] BoxError),

    /// The response body is not a JSON object, or it looks like a success
    /// response but is missing required fields or has mistyped ones.
    #[error("JSON deserialization error: {0}")]
    JsonDeserialization(#[from] serde_json::Error),

    /// The token endpoint answered with an OAuth2 error response.
    /// Per RFC 6749 Section 5.2.
    #[error("OAuth2 token error: {code}")]
    OAuth {
        code: TokenErrorCode,
        description: Option<String>,
        uri: Option<Url>,
    },

    /// The `id_token` in the response is not a structurally valid JWT.
    #[error("ID token parsing error: {0}")]
    IdTokenParsing(#[from] IdTokenError),

    /// The `id_token` parsed but failed a claim check.
    #[error("ID token validation error: {0}")]
    IdTokenValidation(#[from] ValidationError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    JsonDeserialization,
    OAuthToken,
    IdTokenParsing,
    IdTokenValidation,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::JsonDeserialization(_) => ErrorKind::JsonDeserialization,
            Error::OAuth { .. } => ErrorKind::OAuthToken,
            Error::IdTokenParsing(_) => ErrorKind::IdTokenParsing,
            Error::IdTokenValidation(_) => ErrorKind::IdTokenValidation,
        }
    }

    /// Stable machine-readable code.
    ///
    /// OAuth errors report the server's `error` string unchanged; ID token
    /// validation errors report one code per failed check.
    pub fn code(&self) -> &str {
        match self {
            Error::Network(_) => "network_error",
            Error::JsonDeserialization(_) => "json_deserialization_error",
            Error::OAuth { code, .. } => code.as_str(),
            Error::IdTokenParsing(_) => "id_token_parsing_error",
            Error::IdTokenValidation(err) => err.code(),
        }
    }

    /// Human-readable description: the server's `error_description` for
    /// OAuth errors, the underlying cause for everything else.
    pub fn description(&self) -> Option<String> {
        match self {
            Error::Network(err) => Some(err.to_string()),
            Error::JsonDeserialization(err) => Some(err.to_string()),
            Error::OAuth { description, .. } => description.clone(),
            Error::IdTokenParsing(err) => Some(err.to_string()),
            Error::IdTokenValidation(err) => Some(err.to_string()),
        }
    }

    /// Documentation link supplied by the server in `error_uri`.
    pub fn uri(&self) -> Option<&Url> {
        match self {
            Error::OAuth { uri, .. } => uri.as_ref(),
            _ => None,
        }
    }

    /// Whether repeating the same exchange could plausibly succeed.
    ///
    /// Transport and deserialization failures are transient; protocol
    /// errors and ID token failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::JsonDeserialization)
    }
}
