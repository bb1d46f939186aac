use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Structural problems with an ID token string.
#[derive(Debug, thiserror::Error)]
pub enum IdTokenError {
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("{segment} segment is not valid base64url")]
    Encoding {
        segment: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("header is not a JSON object: {0}")]
    Header(#[source] serde_json::Error),

    #[error("claims are missing, mistyped or not a JSON object: {0}")]
    Claims(#[source] serde_json::Error),
}

/// The claims of an OpenID Connect ID token.
///
/// Parsing only checks structure. Claim checks against the originating
/// request live in [`IdToken::validate`]. The signature is never verified;
/// that is the application's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct IdToken {
    pub issuer: String,
    pub subject: String,
    pub audience: Vec<String>,
    /// `exp`, seconds since the Unix epoch.
    pub expiration: u64,
    /// `iat`, seconds since the Unix epoch.
    pub issued_at: u64,
    pub nonce: Option<String>,
    /// `azp`
    pub authorized_party: Option<String>,
    /// Every claim not listed above, in document order.
    pub additional_claims: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawClaims {
    iss: String,
    sub: String,
    aud: Audience,
    exp: u64,
    iat: u64,
    #[serde(default)]
    nonce: Option<String>,
    #[serde(default)]
    azp: Option<String>,
    #[serde(flatten)]
    additional: Map<String, Value>,
}

/// `aud` may be a single string or an array of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl From<Audience> for Vec<String> {
    fn from(audience: Audience) -> Self {
        match audience {
            Audience::Single(aud) => vec![aud],
            Audience::Multiple(auds) => auds,
        }
    }
}

impl IdToken {
    /// Parse a compact-serialized JWT into its claims.
    ///
    /// The token must have exactly three segments. The header and claims
    /// segments must decode to JSON objects; the signature segment may be
    /// empty (unsecured JWTs).
    pub fn parse(id_token: &str) -> Result<Self, IdTokenError> {
        let segments: Vec<&str> = id_token.split('.').collect();
        if segments.len() != 3 {
            return Err(IdTokenError::SegmentCount(segments.len()));
        }

        let header = decode_segment(segments[0], "header")?;
        serde_json::from_slice::<Map<String, Value>>(&header).map_err(IdTokenError::Header)?;

        let claims = decode_segment(segments[1], "claims")?;
        let raw: RawClaims = serde_json::from_slice(&claims).map_err(IdTokenError::Claims)?;

        Ok(Self {
            issuer: raw.iss,
            subject: raw.sub,
            audience: raw.aud.into(),
            expiration: raw.exp,
            issued_at: raw.iat,
            nonce: raw.nonce,
            authorized_party: raw.azp,
            additional_claims: raw.additional,
        })
    }

    /// `exp` as a point in time; `None` when the platform cannot represent it.
    pub fn expires_at(&self) -> Option<SystemTime> {
        UNIX_EPOCH.checked_add(Duration::from_secs(self.expiration))
    }

    pub fn issued_at_time(&self) -> Option<SystemTime> {
        UNIX_EPOCH.checked_add(Duration::from_secs(self.issued_at))
    }
}

fn decode_segment(segment: &str, name: &'static str) -> Result<Vec<u8>, IdTokenError> {
    // Some issuers pad their segments; URL_SAFE_NO_PAD rejects padding
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|source| IdTokenError::Encoding {
            segment: name,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: base64url-encode without padding.
    fn b64url(data: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(data)
    }

    /// Build a fake JWT from header and payload JSON strings.
    fn make_jwt(header: &str, payload: &str) -> String {
        format!(
            "{}.{}.fake-signature",
            b64url(header.as_bytes()),
            b64url(payload.as_bytes())
        )
    }

    const HEADER: &str = r#"{"alg":"RS256","typ":"JWT"}"#;

    #[test]
    fn parses_standard_claims() {
        let payload = r#"{
            "iss":"https://issuer.example.com",
            "sub":"1234567890",
            "aud":"client-1",
            "exp":1700003600,
            "iat":1700000000,
            "nonce":"n-0S6_WzA2Mj",
            "name":"Jane Doe",
            "email":"jane@example.com"
        }"#;
        let token = IdToken::parse(&make_jwt(HEADER, payload)).unwrap();

        assert_eq!(token.issuer, "https://issuer.example.com");
        assert_eq!(token.subject, "1234567890");
        assert_eq!(token.audience, vec!["client-1"]);
        assert_eq!(token.expiration, 1700003600);
        assert_eq!(token.issued_at, 1700000000);
        assert_eq!(token.nonce.as_deref(), Some("n-0S6_WzA2Mj"));
        assert!(token.authorized_party.is_none());
        assert_eq!(
            token.expires_at(),
            Some(UNIX_EPOCH + Duration::from_secs(1700003600))
        );
        assert_eq!(
            token.issued_at_time(),
            Some(UNIX_EPOCH + Duration::from_secs(1700000000))
        );
    }

    #[test]
    fn out_of_range_times_are_none() {
        let payload = format!(
            r#"{{"iss":"https://i","sub":"s","aud":"c","exp":{},"iat":{}}}"#,
            u64::MAX,
            u64::MAX
        );
        let token = IdToken::parse(&make_jwt(HEADER, &payload)).unwrap();
        assert_eq!(token.expiration, u64::MAX);
        assert!(token.expires_at().is_none());
        assert!(token.issued_at_time().is_none());
    }

    #[test]
    fn additional_claims_keep_document_order() {
        let payload = r#"{"iss":"https://i","sub":"s","aud":"c","exp":2,"iat":1,"zeta":1,"alpha":{"nested":true}}"#;
        let token = IdToken::parse(&make_jwt(HEADER, payload)).unwrap();

        let keys: Vec<&str> = token.additional_claims.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(token.additional_claims["alpha"]["nested"], true);
    }

    #[test]
    fn audience_array_and_azp() {
        let payload = r#"{"iss":"https://i","sub":"s","aud":["a","b"],"azp":"b","exp":2,"iat":1}"#;
        let token = IdToken::parse(&make_jwt(HEADER, payload)).unwrap();
        assert_eq!(token.audience, vec!["a", "b"]);
        assert_eq!(token.authorized_party.as_deref(), Some("b"));
    }

    #[test]
    fn malformed_token_no_dots() {
        let result = IdToken::parse("not-a-jwt");
        assert!(matches!(result, Err(IdTokenError::SegmentCount(1))));
    }

    #[test]
    fn two_segment_token_is_rejected() {
        let token = format!(
            "{}.{}",
            b64url(HEADER.as_bytes()),
            b64url(br#"{"sub":"no-sig"}"#)
        );
        assert!(matches!(
            IdToken::parse(&token),
            Err(IdTokenError::SegmentCount(2))
        ));
    }

    #[test]
    fn unsecured_token_with_empty_signature_parses() {
        let payload = r#"{"iss":"https://i","sub":"s","aud":"c","exp":2,"iat":1}"#;
        let token = format!(
            "{}.{}.",
            b64url(br#"{"alg":"none"}"#),
            b64url(payload.as_bytes())
        );
        assert!(IdToken::parse(&token).is_ok());
    }

    #[test]
    fn invalid_base64_payload() {
        let token = format!("{}.!!!invalid-base64!!!.signature", b64url(HEADER.as_bytes()));
        assert!(matches!(
            IdToken::parse(&token),
            Err(IdTokenError::Encoding {
                segment: "claims",
                ..
            })
        ));
    }

    #[test]
    fn invalid_json_in_header() {
        let token = format!("{}.{}.sig", b64url(b"not json"), b64url(b"{}"));
        assert!(matches!(IdToken::parse(&token), Err(IdTokenError::Header(_))));
    }

    #[test]
    fn invalid_json_in_payload() {
        // Valid base64url but not valid JSON
        let not_json = b64url(b"this is not json");
        let token = format!("{}.{not_json}.signature", b64url(HEADER.as_bytes()));
        assert!(matches!(IdToken::parse(&token), Err(IdTokenError::Claims(_))));
    }

    #[test]
    fn missing_required_claim() {
        let payload = r#"{"iss":"https://i","aud":"c","exp":2,"iat":1}"#;
        assert!(matches!(
            IdToken::parse(&make_jwt(HEADER, payload)),
            Err(IdTokenError::Claims(_))
        ));
    }

    #[test]
    fn token_with_padded_base64() {
        // Some JWT libraries produce base64url with padding
        let payload = r#"{"iss":"https://i","sub":"test","aud":"c","exp":2,"iat":1}"#;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        let padded = match payload_b64.len() % 4 {
            2 => format!("{payload_b64}=="),
            3 => format!("{payload_b64}="),
            _ => payload_b64,
        };
        let token = format!("{}.{padded}.sig", b64url(HEADER.as_bytes()));

        let claims = IdToken::parse(&token).unwrap();
        assert_eq!(claims.subject, "test");
    }
}
