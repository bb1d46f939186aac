use serde::{Deserialize, Serialize};
use url::Url;

/// What the client knows about the authorization server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfiguration {
    pub token_endpoint: Url,

    /// Expected `iss` of ID tokens. When `None`, the issuer is not compared.
    #[serde(default)]
    pub issuer: Option<String>,
}

impl ProviderConfiguration {
    pub fn new(token_endpoint: Url) -> Self {
        Self {
            token_endpoint,
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// Tunables for ID token claim validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationOptions {
    /// Clock skew tolerance in seconds for `exp` and `iat` checks.
    #[serde(default = "default_clock_skew")]
    pub clock_skew_secs: u64,

    /// Reject tokens whose `iat` is older than this many seconds.
    /// `None` disables the check.
    #[serde(default = "default_max_issued_at_age")]
    pub max_issued_at_age_secs: Option<u64>,

    /// Accept issuers that are not `https` URLs. Only meant for local
    /// development servers.
    #[serde(default)]
    pub skip_issuer_https_check: bool,
}

fn default_clock_skew() -> u64 {
    30
}

fn default_max_issued_at_age() -> Option<u64> {
    Some(600) // 10 minutes
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            clock_skew_secs: default_clock_skew(),
            max_issued_at_age_secs: default_max_issued_at_age(),
            skip_issuer_https_check: false,
        }
    }
}
