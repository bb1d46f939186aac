#![allow(dead_code)]

pub mod mock_http_client;
pub mod mock_server;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Build an unsigned-but-well-formed JWT around `claims`.
pub fn make_id_token(claims: &serde_json::Value) -> String {
    format!(
        "{}.{}.fake-signature",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}
