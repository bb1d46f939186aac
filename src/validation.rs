use url::Url;

use crate::clock::{Clock, unix_secs};
use crate::config::ValidationOptions;
use crate::oidc::IdToken;
use crate::request::TokenRequest;

/// An ID token claim that does not hold for the request it answers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("issuer {0:?} is not an https URL without query or fragment")]
    InvalidIssuer(String),

    #[error("issuer {actual:?} does not match expected issuer {expected:?}")]
    IssuerMismatch { expected: String, actual: String },

    #[error("audience {audience:?} does not include client id {client_id:?}")]
    AudienceMismatch {
        client_id: String,
        audience: Vec<String>,
    },

    #[error("token expired at {expires_at} (now {now})")]
    Expired { expires_at: u64, now: u64 },

    #[error("token issued at {issued_at}, which is in the future (now {now})")]
    IssuedInFuture { issued_at: u64, now: u64 },

    #[error("token issued at {issued_at}, which is too long ago (now {now})")]
    IssuedTooLongAgo { issued_at: u64, now: u64 },

    #[error("nonce {actual:?} does not match expected nonce")]
    NonceMismatch {
        expected: String,
        actual: Option<String>,
    },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidIssuer(_) => "id_token_invalid_issuer",
            ValidationError::IssuerMismatch { .. } => "id_token_issuer_mismatch",
            ValidationError::AudienceMismatch { .. } => "id_token_audience_mismatch",
            ValidationError::Expired { .. } => "id_token_expired",
            ValidationError::IssuedInFuture { .. } => "id_token_issued_in_future",
            ValidationError::IssuedTooLongAgo { .. } => "id_token_issued_too_long_ago",
            ValidationError::NonceMismatch { .. } => "id_token_nonce_mismatch",
        }
    }
}

impl IdToken {
    /// Check the claims against the request that produced this token.
    ///
    /// Per OpenID Connect Core Section 3.1.3.7. Returns the first check
    /// that fails.
    pub fn validate(
        &self,
        request: &TokenRequest,
        clock: &impl Clock,
        options: &ValidationOptions,
    ) -> Result<(), ValidationError> {
        self.validate_issuer(request, options)?;
        self.validate_audience(request.client_id())?;
        self.validate_times(unix_secs(clock.now()), options)?;
        self.validate_nonce(request.nonce())
    }

    fn validate_issuer(
        &self,
        request: &TokenRequest,
        options: &ValidationOptions,
    ) -> Result<(), ValidationError> {
        if !options.skip_issuer_https_check {
            let valid = Url::parse(&self.issuer).is_ok_and(|url| {
                url.scheme() == "https" && url.query().is_none() && url.fragment().is_none()
            });
            if !valid {
                return Err(ValidationError::InvalidIssuer(self.issuer.clone()));
            }
        }

        if let Some(expected) = request.configuration().issuer.as_deref() {
            if self.issuer != expected {
                return Err(ValidationError::IssuerMismatch {
                    expected: expected.to_string(),
                    actual: self.issuer.clone(),
                });
            }
        }

        Ok(())
    }

    fn validate_audience(&self, client_id: &str) -> Result<(), ValidationError> {
        let listed = self.audience.iter().any(|aud| aud == client_id);
        let authorized = self.authorized_party.as_deref() == Some(client_id);
        if listed || authorized {
            return Ok(());
        }

        Err(ValidationError::AudienceMismatch {
            client_id: client_id.to_string(),
            audience: self.audience.clone(),
        })
    }

    fn validate_times(&self, now: u64, options: &ValidationOptions) -> Result<(), ValidationError> {
        let skew = options.clock_skew_secs;

        if now >= self.expiration.saturating_add(skew) {
            return Err(ValidationError::Expired {
                expires_at: self.expiration,
                now,
            });
        }

        if self.issued_at > now.saturating_add(skew) {
            return Err(ValidationError::IssuedInFuture {
                issued_at: self.issued_at,
                now,
            });
        }

        if let Some(max_age) = options.max_issued_at_age_secs {
            if now > self.issued_at.saturating_add(max_age).saturating_add(skew) {
                return Err(ValidationError::IssuedTooLongAgo {
                    issued_at: self.issued_at,
                    now,
                });
            }
        }

        Ok(())
    }

    fn validate_nonce(&self, expected: Option<&str>) -> Result<(), ValidationError> {
        let Some(expected) = expected else {
            return Ok(());
        };

        if self.nonce.as_deref() == Some(expected) {
            return Ok(());
        }

        Err(ValidationError::NonceMismatch {
            expected: expected.to_string(),
            actual: self.nonce.clone(),
        })
    }
}
