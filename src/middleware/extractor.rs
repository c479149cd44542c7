use std::future::Future;
use std::pin::Pin;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::Key;

use super::cookies;
use super::error::AuthError;
use super::state::AuthState;
use super::traits::{ActStore, StoreError, UserStore};
use super::types::{ActRecord, ActSummary, UserContext};
use crate::sso::Profile;
use crate::types::{ActId, NationalId, UserId};

/// Authenticated user extracted from the credential cookie.
///
/// Use as an Axum extractor in route handlers. The sealed access token is
/// decrypted and **re-validated against the provider on every request** — the
/// SSO is the source of truth, there is no local session trust. Any failure
/// (missing cookie, tampered ciphertext, expired token) returns
/// `401 Unauthorized`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected(user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {} ({})", user.user_id, user.national_id)
/// }
///
/// // Optional: accessible to both authenticated and anonymous users
/// async fn public(user: Option<AuthUser>) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}", u.user_id),
///         None => "Hello, guest".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Local user id (provisioned on first login).
    pub user_id: UserId,
    /// External identity the provider vouched for on this request.
    pub national_id: NationalId,
    /// Fresh profile claims from the provider.
    pub profile: Profile,
    /// Act bound to this session, if one has been chosen.
    pub act_id: Option<ActId>,
}

impl FromRequestParts<AuthState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthState,
    ) -> Result<Self, Self::Rejection> {
        let jar: PrivateCookieJar<Key> = PrivateCookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthError::Unauthenticated)?;

        let sealed = jar
            .get(&state.settings.token_cookie_name)
            .map(|c| c.value().to_string())
            .ok_or(AuthError::Unauthenticated)?;

        let access_token = state
            .settings
            .codec
            .decrypt(&sealed)
            .map_err(|_| AuthError::Unauthenticated)?;

        let profile = state
            .client
            .fetch_profile(&access_token)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token re-validation failed");
                AuthError::Unauthenticated
            })?;

        let user_id = state
            .users
            .find_or_create_dyn(&profile.national_id, &profile)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        let act_id = cookies::get_act(&jar, &state.settings.act_cookie_name);

        Ok(Self {
            user_id,
            national_id: profile.national_id.clone(),
            profile,
            act_id,
        })
    }
}

type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Object-safe wrapper for [`UserStore`] (needed for `Arc<dyn>`).
pub(super) trait UserStoreDyn: Send + Sync {
    fn find_or_create_dyn<'a>(
        &'a self,
        national_id: &'a NationalId,
        profile: &'a Profile,
    ) -> StoreFuture<'a, UserId>;

    fn context_dyn<'a>(&'a self, national_id: &'a NationalId) -> StoreFuture<'a, UserContext>;
}

impl<T: UserStore> UserStoreDyn for T {
    fn find_or_create_dyn<'a>(
        &'a self,
        national_id: &'a NationalId,
        profile: &'a Profile,
    ) -> StoreFuture<'a, UserId> {
        Box::pin(self.find_or_create(national_id, profile))
    }

    fn context_dyn<'a>(&'a self, national_id: &'a NationalId) -> StoreFuture<'a, UserContext> {
        Box::pin(self.context(national_id))
    }
}

/// Object-safe wrapper for [`ActStore`] (needed for `Arc<dyn>`).
pub(super) trait ActStoreDyn: Send + Sync {
    fn candidates_dyn<'a>(&'a self, user_id: &'a UserId) -> StoreFuture<'a, Vec<ActSummary>>;

    fn find_dyn<'a>(&'a self, act_id: &'a ActId) -> StoreFuture<'a, Option<ActRecord>>;
}

impl<T: ActStore> ActStoreDyn for T {
    fn candidates_dyn<'a>(&'a self, user_id: &'a UserId) -> StoreFuture<'a, Vec<ActSummary>> {
        Box::pin(self.candidates(user_id))
    }

    fn find_dyn<'a>(&'a self, act_id: &'a ActId) -> StoreFuture<'a, Option<ActRecord>> {
        Box::pin(self.find(act_id))
    }
}
