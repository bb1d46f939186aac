use std::time::{Duration, SystemTime};

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A successful token endpoint response (RFC 6749 Section 5.1).
#[derive(Debug, Clone, PartialEq)]
pub struct TokenResponse {
    token_type: String,
    access_token: String,
    expires_in: Option<u64>,
    access_token_expiration_time: Option<SystemTime>,
    refresh_token: Option<String>,
    scope: Option<String>,
    id_token: Option<String>,
    additional_parameters: Map<String, Value>,
    received_at: SystemTime,
}

#[derive(Deserialize)]
struct RawTokenResponse {
    token_type: String,
    access_token: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(flatten)]
    additional: Map<String, Value>,
}

/// Accept `expires_in` as an integer, an integral float or a numeric
/// string; some providers quote it.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Float(f64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
            Ok(Some(f as u64))
        }
        Some(NumberOrString::Float(f)) => Err(serde::de::Error::custom(format!(
            "expires_in must be a non-negative integer, got {f}"
        ))),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl TokenResponse {
    /// Build a response from the endpoint's JSON object. `received_at` is
    /// the moment the response was issued and anchors `expires_in`.
    pub fn from_json(
        json: Map<String, Value>,
        received_at: SystemTime,
    ) -> Result<Self, serde_json::Error> {
        let raw: RawTokenResponse = serde_json::from_value(Value::Object(json))?;

        let access_token_expiration_time = match raw.expires_in {
            Some(secs) => Some(
                received_at
                    .checked_add(Duration::from_secs(secs))
                    .ok_or_else(|| {
                        <serde_json::Error as serde::de::Error>::custom(format!(
                            "expires_in out of range: {secs}"
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            token_type: raw.token_type,
            access_token: raw.access_token,
            expires_in: raw.expires_in,
            access_token_expiration_time,
            refresh_token: raw.refresh_token,
            scope: raw.scope,
            id_token: raw.id_token,
            additional_parameters: raw.additional,
            received_at,
        })
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn access_token_expires_in_seconds(&self) -> Option<u64> {
        self.expires_in
    }

    pub fn access_token_expires_at(&self) -> Option<SystemTime> {
        self.access_token_expiration_time
    }

    pub fn received_at(&self) -> SystemTime {
        self.received_at
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The granted scope, split on spaces. Empty when no scope was returned.
    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .map(|scope| scope.split(' ').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// The raw ID token, if the response carried one.
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }

    /// Response fields this type does not model, in document order.
    pub fn additional_parameters(&self) -> &Map<String, Value> {
        &self.additional_parameters
    }
}
