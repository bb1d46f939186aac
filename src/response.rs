use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::clock::Clock;
use crate::config::ValidationOptions;
use crate::error::Error;
use crate::oidc::IdToken;
use crate::request::TokenRequest;
use crate::token_error::TokenErrorCode;
use crate::tokens::TokenResponse;

/// Turn the payload of a token endpoint response into a result.
///
/// - upstream failure -> returned unchanged
/// - object with an `error` key -> Err(Error::OAuth { .. })
/// - success-shaped but malformed -> Err(Error::JsonDeserialization(..))
/// - `id_token` present -> parsed and validated against `request`
/// - otherwise -> Ok(TokenResponse)
pub fn parse_token_response(
    payload: Result<Map<String, Value>, Error>,
    request: &TokenRequest,
    clock: &impl Clock,
    options: &ValidationOptions,
) -> Result<TokenResponse, Error> {
    let json = payload?;

    if let Some(error) = json.get("error") {
        return Err(parse_error_response(error, &json));
    }

    let response = TokenResponse::from_json(json, clock.now())?;

    let Some(raw_id_token) = response.id_token() else {
        return Ok(response);
    };

    let id_token = IdToken::parse(raw_id_token)?;
    id_token.validate(request, clock, options)?;

    Ok(response)
}

fn parse_error_response(error: &Value, json: &Map<String, Value>) -> Error {
    let error = match String::deserialize(error) {
        Ok(error) => error,
        Err(err) => return Error::JsonDeserialization(err),
    };

    let description = json
        .get("error_description")
        .and_then(Value::as_str)
        .map(String::from);

    let uri = json
        .get("error_uri")
        .and_then(Value::as_str)
        .and_then(|raw| match Url::parse(raw) {
            Ok(uri) => Some(uri),
            Err(err) => {
                tracing::warn!(error_uri = raw, %err, "ignoring unparseable error_uri");
                None
            }
        });

    Error::OAuth {
        code: TokenErrorCode::classify(&error),
        description,
        uri,
    }
}
