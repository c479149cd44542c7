use axum_extra::extract::cookie::Key;
use url::Url;

use super::error::AuthError;
use crate::codec::TokenCodec;
use crate::sso::{SsoClient, SsoConfig};

/// Shared auth settings used by both config and runtime state.
#[derive(Clone)]
pub(crate) struct AuthSettings {
    pub(crate) cookie_key: Key,
    pub(crate) codec: TokenCodec,
    pub(crate) token_cookie_name: String,
    pub(crate) act_cookie_name: String,
    pub(crate) secure_cookies: bool,
    pub(crate) auth_path: String,
    pub(crate) error_redirect: String,
}

impl AuthSettings {
    fn defaults() -> Self {
        Self {
            cookie_key: Key::generate(),
            codec: TokenCodec::generate(),
            token_cookie_name: "usw-token".into(),
            act_cookie_name: "usw-act".into(),
            secure_cookies: true,
            auth_path: String::new(),
            error_redirect: "/login-failed".into(),
        }
    }
}

/// USW SSO authentication configuration.
///
/// Required field (`client`) is a constructor parameter — no runtime
/// "missing field" errors.
///
/// Use [`from_env()`](UswAuthConfig::from_env) for convention-based setup,
/// or [`new()`](UswAuthConfig::new) with `with_*` methods for full control.
pub struct UswAuthConfig {
    pub(super) client: SsoClient,
    pub(super) settings: AuthSettings,
}

impl UswAuthConfig {
    /// Create config with the required `SsoClient`.
    ///
    /// All optional fields use sensible defaults. Override with `with_*`
    /// methods. Without explicit keys, cookie and token keys are ephemeral:
    /// every process restart invalidates outstanding logins.
    #[must_use]
    pub fn new(client: SsoClient) -> Self {
        Self {
            client,
            settings: AuthSettings::defaults(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `SSO_CLIENT_ID`: OAuth2 client ID
    /// - `SSO_CLIENT_SECRET`: OAuth2 client secret
    /// - `SSO_REDIRECT_URI`: OAuth2 callback URI (must be a valid URL)
    ///
    /// # Optional env vars
    /// - `SSO_AUTH_URL` / `SSO_TOKEN_URL` / `SSO_JWKS_URL` / `SSO_USERINFO_URL`:
    ///   endpoint overrides
    /// - `SSO_SCOPES`: comma-separated OAuth2 scopes
    /// - `COOKIE_KEY`: cookie encryption key bytes (at least 64)
    /// - `TOKEN_KEY`: hex-encoded 32-byte access-token sealing key
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if required env vars are missing or
    /// values are invalid.
    pub fn from_env() -> Result<Self, AuthError> {
        let client_id = std::env::var("SSO_CLIENT_ID")
            .map_err(|_| AuthError::Config("SSO_CLIENT_ID is required".into()))?;
        let client_secret = std::env::var("SSO_CLIENT_SECRET")
            .map_err(|_| AuthError::Config("SSO_CLIENT_SECRET is required".into()))?;
        let redirect_uri: Url = std::env::var("SSO_REDIRECT_URI")
            .map_err(|_| AuthError::Config("SSO_REDIRECT_URI is required".into()))?
            .parse()
            .map_err(|e| AuthError::Config(format!("SSO_REDIRECT_URI: {e}")))?;

        let mut config = SsoConfig::new(client_id, client_secret, redirect_uri);

        if let Ok(url_str) = std::env::var("SSO_AUTH_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| AuthError::Config(format!("SSO_AUTH_URL: {e}")))?;
            config = config.with_auth_url(url);
        }
        if let Ok(url_str) = std::env::var("SSO_TOKEN_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| AuthError::Config(format!("SSO_TOKEN_URL: {e}")))?;
            config = config.with_token_url(url);
        }
        if let Ok(url_str) = std::env::var("SSO_JWKS_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| AuthError::Config(format!("SSO_JWKS_URL: {e}")))?;
            config = config.with_jwks_url(url);
        }
        if let Ok(url_str) = std::env::var("SSO_USERINFO_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| AuthError::Config(format!("SSO_USERINFO_URL: {e}")))?;
            config = config.with_userinfo_url(url);
        }
        if let Ok(scopes) = std::env::var("SSO_SCOPES") {
            config =
                config.with_scopes(scopes.split(',').map(|s| s.trim().to_string()).collect());
        }

        let cookie_key = match std::env::var("COOKIE_KEY") {
            Ok(k) => Key::try_from(k.as_bytes()).map_err(|_| {
                AuthError::Config(
                    "COOKIE_KEY is set but invalid (must be at least 64 bytes). \
                     Remove the env var to use an ephemeral key, or provide a valid key."
                        .into(),
                )
            })?,
            Err(_) => Key::generate(),
        };

        let codec = match std::env::var("TOKEN_KEY") {
            Ok(k) => TokenCodec::from_hex(&k)
                .map_err(|e| AuthError::Config(format!("TOKEN_KEY: {e}")))?,
            Err(_) => TokenCodec::generate(),
        };

        Ok(Self::new(SsoClient::new(config))
            .with_cookie_key(cookie_key)
            .with_token_codec(codec))
    }

    #[must_use]
    pub fn with_cookie_key(mut self, key: Key) -> Self {
        self.settings.cookie_key = key;
        self
    }

    #[must_use]
    pub fn with_token_codec(mut self, codec: TokenCodec) -> Self {
        self.settings.codec = codec;
        self
    }

    #[must_use]
    pub fn with_token_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.token_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_act_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.act_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    /// Path prefix the auth routes are mounted under (default: none).
    #[must_use]
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.settings.auth_path = path.into();
        self
    }

    /// Page the browser is sent to when a provider-side step of the callback
    /// fails (with an `error` query code).
    #[must_use]
    pub fn with_error_redirect(mut self, path: impl Into<String>) -> Self {
        self.settings.error_redirect = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> SsoClient {
        SsoClient::new(SsoConfig::new(
            "client",
            "secret",
            "https://example.com/callback".parse().unwrap(),
        ))
    }

    #[test]
    fn defaults() {
        let config = UswAuthConfig::new(test_client());
        assert_eq!(config.settings.token_cookie_name, "usw-token");
        assert_eq!(config.settings.act_cookie_name, "usw-act");
        assert!(config.settings.secure_cookies);
        assert_eq!(config.settings.auth_path, "");
    }

    #[test]
    fn builder_overrides() {
        let config = UswAuthConfig::new(test_client())
            .with_auth_path("/api/account")
            .with_secure_cookies(false)
            .with_token_cookie_name("tok");
        assert_eq!(config.settings.auth_path, "/api/account");
        assert!(!config.settings.secure_cookies);
        assert_eq!(config.settings.token_cookie_name, "tok");
    }
}
