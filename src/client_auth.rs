use std::fmt;
use std::sync::Arc;

use base64::Engine;

/// A client authentication method that is not built in, e.g. `private_key_jwt`.
pub trait ClientAuthenticator: Send + Sync {
    /// Headers to add to the token request.
    fn headers(&self, client_id: &str) -> Vec<(String, String)>;

    /// Form parameters to add to the token request body. These take
    /// precedence over the request's own parameters.
    fn parameters(&self, client_id: &str) -> Vec<(String, String)>;
}

/// How the client proves its identity to the token endpoint.
#[derive(Clone, Default)]
pub enum ClientAuthentication {
    /// Public client: only `client_id` is sent in the body.
    #[default]
    None,
    /// `client_secret_basic`: credentials in an HTTP Basic `Authorization` header.
    ClientSecretBasic { client_secret: String },
    /// `client_secret_post`: credentials in the form body.
    ClientSecretPost { client_secret: String },
    Custom(Arc<dyn ClientAuthenticator>),
}

impl ClientAuthentication {
    pub fn basic(client_secret: impl Into<String>) -> Self {
        Self::ClientSecretBasic {
            client_secret: client_secret.into(),
        }
    }

    pub fn post(client_secret: impl Into<String>) -> Self {
        Self::ClientSecretPost {
            client_secret: client_secret.into(),
        }
    }

    pub fn custom(authenticator: impl ClientAuthenticator + 'static) -> Self {
        Self::Custom(Arc::new(authenticator))
    }

    pub fn headers(&self, client_id: &str) -> Vec<(String, String)> {
        match self {
            Self::ClientSecretBasic { client_secret } => vec![(
                "Authorization".to_string(),
                encode_basic_credentials(client_id, client_secret),
            )],
            Self::Custom(authenticator) => authenticator.headers(client_id),
            Self::None | Self::ClientSecretPost { .. } => Vec::new(),
        }
    }

    pub fn parameters(&self, client_id: &str) -> Vec<(String, String)> {
        match self {
            Self::None => vec![("client_id".to_string(), client_id.to_string())],
            Self::ClientSecretPost { client_secret } => vec![
                ("client_id".to_string(), client_id.to_string()),
                ("client_secret".to_string(), client_secret.clone()),
            ],
            Self::Custom(authenticator) => authenticator.parameters(client_id),
            Self::ClientSecretBasic { .. } => Vec::new(),
        }
    }
}

impl fmt::Debug for ClientAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::ClientSecretBasic { .. } => f
                .debug_struct("ClientSecretBasic")
                .field("client_secret", &"<redacted>")
                .finish(),
            Self::ClientSecretPost { .. } => f
                .debug_struct("ClientSecretPost")
                .field("client_secret", &"<redacted>")
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Encode client credentials as HTTP Basic auth header value.
/// Returns `Basic <base64(urlencode(client_id):urlencode(client_secret))>`,
/// per RFC 6749 Section 2.3.1.
pub fn encode_basic_credentials(client_id: &str, client_secret: &str) -> String {
    let credentials = format!(
        "{}:{}",
        form_urlencode(client_id),
        form_urlencode(client_secret)
    );
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
    format!("Basic {encoded}")
}

fn form_urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
