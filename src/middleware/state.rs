use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use super::config::AuthSettings;
use super::extractor::{ActStoreDyn, UserStoreDyn};
use crate::sso::SsoClient;

/// Shared state for auth route handlers.
///
/// Stores are held as trait objects so the state (and the [`AuthUser`]
/// extractor that reads it) stays non-generic.
///
/// [`AuthUser`]: super::AuthUser
#[derive(Clone)]
pub struct AuthState {
    pub(super) client: Arc<SsoClient>,
    pub(super) users: Arc<dyn UserStoreDyn>,
    pub(super) acts: Arc<dyn ActStoreDyn>,
    pub(super) settings: AuthSettings,
}

// PrivateCookieJar requires Key to be extractable from state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.settings.cookie_key.clone()
    }
}
