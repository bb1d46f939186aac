use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Error codes a token endpoint may return in the `error` field of an
/// error response.
///
/// Covers RFC 6749 Section 5.2, the device authorization grant (RFC 8628)
/// and resource indicators (RFC 8707). Anything else is kept verbatim in
/// [`TokenErrorCode::Other`] so new provider codes never fail classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenErrorCode {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    UnauthorizedClient,
    UnsupportedGrantType,
    InvalidScope,
    AuthorizationPending,
    SlowDown,
    AccessDenied,
    ExpiredToken,
    InvalidTarget,
    Other(String),
}

impl TokenErrorCode {
    /// Map the `error` string of a token error response to a code.
    pub fn classify(error: &str) -> Self {
        match error {
            "invalid_request" => Self::InvalidRequest,
            "invalid_client" => Self::InvalidClient,
            "invalid_grant" => Self::InvalidGrant,
            "unauthorized_client" => Self::UnauthorizedClient,
            "unsupported_grant_type" => Self::UnsupportedGrantType,
            "invalid_scope" => Self::InvalidScope,
            "authorization_pending" => Self::AuthorizationPending,
            "slow_down" => Self::SlowDown,
            "access_denied" => Self::AccessDenied,
            "expired_token" => Self::ExpiredToken,
            "invalid_target" => Self::InvalidTarget,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire representation of this code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::InvalidScope => "invalid_scope",
            Self::AuthorizationPending => "authorization_pending",
            Self::SlowDown => "slow_down",
            Self::AccessDenied => "access_denied",
            Self::ExpiredToken => "expired_token",
            Self::InvalidTarget => "invalid_target",
            Self::Other(code) => code,
        }
    }

    /// Whether this code is one of the codes defined by the OAuth RFCs.
    pub fn is_standard(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for TokenErrorCode {
    fn from(error: &str) -> Self {
        Self::classify(error)
    }
}

impl FromStr for TokenErrorCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::classify(s))
    }
}

impl fmt::Display for TokenErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
