use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::types::NationalId;

/// Provider calls are blocking network I/O with an explicit cap; a hung
/// provider must not hold a login attempt forever.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(180);

/// USW SSO `OAuth2` configuration.
///
/// Required fields are constructor parameters — no runtime "missing field"
/// errors.
///
/// ```rust,ignore
/// use usw_accounts::SsoConfig;
///
/// let config = SsoConfig::new("my-client-id", "secret", "https://my-app.com/callback".parse()?);
/// // Optional overrides via chaining:
/// let config = config
///     .with_auth_url("https://custom.example.com/oauth2/authorize".parse()?);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SsoConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) auth_url: Url,
    pub(crate) token_url: Url,
    pub(crate) jwks_url: Url,
    pub(crate) userinfo_url: Url,
    pub(crate) redirect_uri: Url,
    pub(crate) scopes: Vec<String>,
}

impl SsoConfig {
    /// Create a new `OAuth2` configuration for a confidential client.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Url,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
            auth_url: "https://sso.razi.ac.ir/oauth2/authorize"
                .parse()
                .expect("valid default URL"),
            token_url: "https://sso.razi.ac.ir/oauth2/token"
                .parse()
                .expect("valid default URL"),
            jwks_url: "https://sso.razi.ac.ir/oauth2/jwks"
                .parse()
                .expect("valid default URL"),
            userinfo_url: "https://sso.razi.ac.ir/api/v1/User/userinfo"
                .parse()
                .expect("valid default URL"),
            scopes: vec!["openid".into(), "profile".into()],
        }
    }

    /// Override the provider authorization endpoint.
    #[must_use]
    pub fn with_auth_url(mut self, url: Url) -> Self {
        self.auth_url = url;
        self
    }

    /// Override the provider token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: Url) -> Self {
        self.token_url = url;
        self
    }

    /// Override the provider key-discovery endpoint.
    #[must_use]
    pub fn with_jwks_url(mut self, url: Url) -> Self {
        self.jwks_url = url;
        self
    }

    /// Override the provider userinfo endpoint.
    #[must_use]
    pub fn with_userinfo_url(mut self, url: Url) -> Self {
        self.userinfo_url = url;
        self
    }

    /// Override the `OAuth2` scopes (default: `["openid", "profile"]`).
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// `OAuth2` client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Authorization endpoint URL.
    #[must_use]
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    /// Token exchange endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Key-discovery endpoint URL.
    #[must_use]
    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }

    /// User info endpoint URL.
    #[must_use]
    pub fn userinfo_url(&self) -> &Url {
        &self.userinfo_url
    }

    /// `OAuth2` redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// Requested `OAuth2` scopes.
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// `OAuth2` client for the USW SSO provider.
pub struct SsoClient {
    config: SsoConfig,
    http: reqwest::Client,
}

/// Token response from the provider token endpoint.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Userinfo envelope as the provider returns it.
///
/// The provider wraps profile claims in `{ isSuccess, data }`; a deserialized
/// envelope with a missing `nationalId` claim is a deserialization failure,
/// so an `Ok` here always carries a usable profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileEnvelope {
    #[serde(default = "default_true")]
    pub(crate) is_success: bool,
    pub(crate) data: Profile,
}

fn default_true() -> bool {
    true
}

/// Profile claims from the userinfo endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Profile {
    pub national_id: NationalId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
}

impl Profile {
    /// Create a new `Profile` with only the required `national_id` claim.
    #[must_use]
    pub fn new(national_id: NationalId) -> Self {
        Self {
            national_id,
            first_name: None,
            last_name: None,
            email: None,
            mobile: None,
        }
    }

    /// Set the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Set the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Set the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl SsoClient {
    /// Create a new SSO client with the default provider timeout.
    #[must_use]
    pub fn new(config: SsoConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .expect("default TLS backend");
        Self { config, http }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SsoConfig {
        &self.config
    }

    /// Build the provider authorization URL for a login redirect.
    ///
    /// `state` is the single-use CSRF token minted for this login; the
    /// embedded `redirect_uri` must exactly match the one later sent to the
    /// token endpoint.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        let scope = self.config.scopes.join(" ");

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("scope", &scope)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("state", state)
            .append_pair("redirect_uri", self.config.redirect_uri.as_str());

        url.into()
    }

    /// Exchange an authorization code for an access token.
    ///
    /// No retries: a failed exchange is terminal for this login attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Sso`] if the
    /// token endpoint returns a non-success status.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        let scope = self.config.scopes.join(" ");
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("scope", &scope),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await?;

        let response = Self::ensure_success(response, "token exchange").await?;
        response.json::<TokenResponse>().await.map_err(Into::into)
    }

    /// Fetch the user profile for an access token.
    ///
    /// Probes the key-discovery endpoint first as a reachability diagnostic,
    /// then calls userinfo with a bearer header. The probe does not validate
    /// the token — validity is decided solely by the userinfo response — but
    /// the two calls carry distinct `operation` tags so an unreachable
    /// provider and a rejected token are distinguishable in logs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Sso`] if
    /// either endpoint returns a non-success status or the envelope reports
    /// failure.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<Profile, Error> {
        let probe = self.http.get(self.config.jwks_url.clone()).send().await?;
        Self::ensure_success(probe, "key discovery").await?;

        let response = self
            .http
            .get(self.config.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = Self::ensure_success(response, "userinfo").await?;
        let envelope = response.json::<ProfileEnvelope>().await?;
        if !envelope.is_success {
            return Err(Error::Sso {
                operation: "userinfo",
                status: None,
                detail: "provider reported failure".into(),
            });
        }
        Ok(envelope.data)
    }

    /// Checks HTTP response status; returns the response on success or an
    /// error with details.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(Error::Sso {
            operation,
            status: Some(status),
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SsoConfig {
        SsoConfig::new(
            "test-client",
            "test-secret",
            "https://example.com/callback".parse().unwrap(),
        )
    }

    #[test]
    fn authorize_url_contains_code_flow_params() {
        let client = SsoClient::new(test_config());
        let url = client.authorize_url("abc123");

        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid+profile"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fcallback"));
        assert!(!url.contains("client_secret"), "secret must never leak into the redirect");
    }

    #[test]
    fn config_constructor() {
        let config = test_config();

        assert_eq!(config.client_id(), "test-client");
        assert_eq!(config.redirect_uri().as_str(), "https://example.com/callback");
        assert_eq!(
            config.auth_url().as_str(),
            "https://sso.razi.ac.ir/oauth2/authorize"
        );
        assert_eq!(
            config.userinfo_url().as_str(),
            "https://sso.razi.ac.ir/api/v1/User/userinfo"
        );
    }

    #[test]
    fn config_with_overrides() {
        let config = test_config()
            .with_auth_url("https://custom.example.com/authorize".parse().unwrap())
            .with_scopes(vec!["openid".into()]);

        assert_eq!(
            config.auth_url().as_str(),
            "https://custom.example.com/authorize"
        );
        assert_eq!(config.scopes(), &["openid"]);
    }

    #[test]
    fn profile_envelope_requires_national_id() {
        let missing = r#"{"isSuccess":true,"data":{"firstName":"A"}}"#;
        assert!(serde_json::from_str::<ProfileEnvelope>(missing).is_err());

        let invalid = r#"{"isSuccess":true,"data":{"nationalId":"123"}}"#;
        assert!(serde_json::from_str::<ProfileEnvelope>(invalid).is_err());

        let ok = r#"{"isSuccess":true,"data":{"nationalId":"0012345678","firstName":"A"}}"#;
        let envelope: ProfileEnvelope = serde_json::from_str(ok).unwrap();
        assert!(envelope.is_success);
        assert_eq!(envelope.data.national_id.as_str(), "0012345678");
        assert_eq!(envelope.data.first_name.as_deref(), Some("A"));
    }

    #[test]
    fn profile_envelope_defaults_success_when_absent() {
        let json = r#"{"data":{"nationalId":"0012345678"}}"#;
        let envelope: ProfileEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.is_success);
    }

    #[test]
    fn token_response_optional_fields() {
        let json = r#"{"access_token":"T","token_type":"Bearer"}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "T");
        assert_eq!(token.expires_in, None);
    }
}
