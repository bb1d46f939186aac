use std::collections::BTreeMap;
use std::fmt;

use crate::config::ProviderConfiguration;

/// The `grant_type` of a token request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrantType {
    AuthorizationCode,
    RefreshToken,
    ClientCredentials,
    /// RFC 8628 device authorization grant.
    DeviceCode,
    Custom(String),
}

impl GrantType {
    pub fn as_str(&self) -> &str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::RefreshToken => "refresh_token",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::DeviceCode => "urn:ietf:params:oauth:grant-type:device_code",
            GrantType::Custom(grant) => grant,
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to a token endpoint.
///
/// The named constructors take the parameters each standard grant requires;
/// everything else is set with the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    configuration: ProviderConfiguration,
    client_id: String,
    grant_type: GrantType,
    authorization_code: Option<String>,
    redirect_uri: Option<String>,
    refresh_token: Option<String>,
    scope: Option<String>,
    code_verifier: Option<String>,
    nonce: Option<String>,
    additional_parameters: BTreeMap<String, String>,
}

impl TokenRequest {
    pub fn new(
        configuration: ProviderConfiguration,
        client_id: impl Into<String>,
        grant_type: GrantType,
    ) -> Self {
        Self {
            configuration,
            client_id: client_id.into(),
            grant_type,
            authorization_code: None,
            redirect_uri: None,
            refresh_token: None,
            scope: None,
            code_verifier: None,
            nonce: None,
            additional_parameters: BTreeMap::new(),
        }
    }

    /// Exchange an authorization code for tokens.
    pub fn for_authorization_code(
        configuration: ProviderConfiguration,
        client_id: impl Into<String>,
        code: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        let mut request = Self::new(configuration, client_id, GrantType::AuthorizationCode);
        request.authorization_code = Some(code.into());
        request.redirect_uri = Some(redirect_uri.into());
        request
    }

    /// Refresh an access token.
    pub fn for_refresh_token(
        configuration: ProviderConfiguration,
        client_id: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        let mut request = Self::new(configuration, client_id, GrantType::RefreshToken);
        request.refresh_token = Some(refresh_token.into());
        request
    }

    pub fn for_client_credentials(
        configuration: ProviderConfiguration,
        client_id: impl Into<String>,
    ) -> Self {
        Self::new(configuration, client_id, GrantType::ClientCredentials)
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the scope from individual values, space-joined. An empty slice
    /// clears the scope.
    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        self.scope = (!scopes.is_empty()).then(|| scopes.join(" "));
        self
    }

    /// PKCE code verifier (RFC 7636).
    pub fn with_code_verifier(mut self, code_verifier: impl Into<String>) -> Self {
        self.code_verifier = Some(code_verifier.into());
        self
    }

    /// Nonce sent with the authorization request. When set, the ID token in
    /// the response must echo it.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Extra form parameter. Ignored if it collides with a standard one.
    pub fn with_additional_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.additional_parameters.insert(name.into(), value.into());
        self
    }

    pub fn configuration(&self) -> &ProviderConfiguration {
        &self.configuration
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn grant_type(&self) -> &GrantType {
        &self.grant_type
    }

    pub fn authorization_code(&self) -> Option<&str> {
        self.authorization_code.as_deref()
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn code_verifier(&self) -> Option<&str> {
        self.code_verifier.as_deref()
    }

    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    pub fn additional_parameters(&self) -> &BTreeMap<String, String> {
        &self.additional_parameters
    }

    /// The form parameters of this request, without client authentication.
    pub fn request_parameters(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("grant_type".to_string(), self.grant_type.as_str().to_string());

        let optional = [
            ("code", &self.authorization_code),
            ("redirect_uri", &self.redirect_uri),
            ("code_verifier", &self.code_verifier),
            ("refresh_token", &self.refresh_token),
            ("scope", &self.scope),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                params.insert(name.to_string(), value.clone());
            }
        }

        for (name, value) in &self.additional_parameters {
            params
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }

        params
    }
}

/// Form-urlencode parameters for a request body.
pub fn encode_form<'a>(params: impl IntoIterator<Item = (&'a String, &'a String)>) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}
