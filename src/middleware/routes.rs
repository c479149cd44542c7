use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use super::config::UswAuthConfig;
use super::cookies;
use super::error::AuthError;
use super::extractor::AuthUser;
use super::state::AuthState;
use super::traits::{ActStore, UserStore};
use super::types::{ActSummary, CommandResponse, UserProfile};
use crate::flow::FlowTicket;
use crate::types::ActId;

/// Create the USW SSO authentication router.
pub fn auth_routes<U, A>(config: UswAuthConfig, users: U, acts: A) -> Router
where
    U: UserStore,
    A: ActStore,
{
    let auth_path = config.settings.auth_path.clone();

    let state = AuthState {
        client: Arc::new(config.client),
        users: Arc::new(users),
        acts: Arc::new(acts),
        settings: config.settings,
    };

    Router::new()
        .route(&format!("{auth_path}/login"), get(login))
        .route(&format!("{auth_path}/callback"), get(callback))
        .route(&format!("{auth_path}/profile"), get(profile))
        .route(&format!("{auth_path}/acts"), get(list_acts))
        .route(&format!("{auth_path}/chooseAct"), post(choose_act))
        .route(
            &format!("{auth_path}/logout"),
            get(logout).post(logout),
        )
        .with_state(state)
}

// ── Login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginParams {
    #[serde(rename = "redirectUrl")]
    redirect_url: Option<String>,
}

async fn login(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Query(params): Query<LoginParams>,
) -> Result<(PrivateCookieJar, Redirect), AuthError> {
    let ticket = FlowTicket::new(params.redirect_url.unwrap_or_else(|| "/".to_string()));
    let authorize_url = state.client.authorize_url(&ticket.state);

    let ticket_json =
        serde_json::to_string(&ticket).map_err(|e| AuthError::Store(e.to_string()))?;
    let jar = jar.add(cookies::flow_cookie(
        ticket_json,
        state.settings.secure_cookies,
        &state.settings.auth_path,
    ));

    Ok((jar, Redirect::to(&authorize_url)))
}

// ── Callback ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

async fn callback(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    // Single-use: take the pending ticket and clear its cookie up front, so
    // the stored state is gone on success *and* on every failure path below.
    let ticket = cookies::get_flow(&jar);
    let jar = jar.remove(cookies::clear_flow_cookie(&state.settings.auth_path));

    if let Some(error) = &params.error {
        let desc = params.error_description.as_deref().unwrap_or("Unknown error");
        tracing::warn!(error = %error, description = %desc, "OAuth2 error from provider");
        return (jar, login_error(&state.settings.error_redirect, desc)).into_response();
    }

    let presented_state = params.state.unwrap_or_default();
    let redirect_url = match ticket.map(|t| t.redeem(&presented_state)) {
        Some(Ok(url)) => url,
        _ => {
            tracing::warn!("OAuth state missing or mismatched");
            return (jar, AuthError::InvalidState).into_response();
        }
    };

    let Some(code) = params.code else {
        return (jar, login_error(&state.settings.error_redirect, "missing_code"))
            .into_response();
    };

    let token_response = match state.client.exchange_code(&code).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "Token exchange failed");
            return (
                jar,
                login_error(&state.settings.error_redirect, "token_exchange_failed"),
            )
                .into_response();
        }
    };

    let profile = match state.client.fetch_profile(&token_response.access_token).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "Profile fetch failed");
            return (
                jar,
                login_error(&state.settings.error_redirect, "profile_fetch_failed"),
            )
                .into_response();
        }
    };

    let user_id = match state
        .users
        .find_or_create_dyn(&profile.national_id, &profile)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Identity provisioning failed");
            return (
                jar,
                login_error(&state.settings.error_redirect, "provisioning_failed"),
            )
                .into_response();
        }
    };

    let sealed = match state.settings.codec.encrypt(&token_response.access_token) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Token sealing failed");
            return (jar, AuthError::Store(e.to_string())).into_response();
        }
    };

    let jar = jar.add(cookies::token_cookie(
        &state.settings.token_cookie_name,
        &sealed,
        state.settings.secure_cookies,
    ));

    tracing::info!(user_id = %user_id, "SSO login successful");

    (jar, Redirect::to(&redirect_url)).into_response()
}

// ── Profile ────────────────────────────────────────────────────────

async fn profile(
    State(state): State<AuthState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, AuthError> {
    let context = state
        .users
        .context_dyn(&user.national_id)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

    Ok(Json(UserProfile {
        national_id: user.national_id,
        first_name: user.profile.first_name,
        last_name: user.profile.last_name,
        email: user.profile.email,
        company: context.company,
        permissions: context.permissions,
        act_id: user.act_id,
    }))
}

// ── Acts ───────────────────────────────────────────────────────────

async fn list_acts(
    State(state): State<AuthState>,
    user: AuthUser,
) -> Result<Json<Vec<ActSummary>>, AuthError> {
    let acts = state
        .acts
        .candidates_dyn(&user.user_id)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

    Ok(Json(acts))
}

#[derive(Deserialize)]
struct ChooseActDto {
    #[serde(rename = "actId")]
    act_id: ActId,
}

/// Bind the session to one of the user's acts.
///
/// Authorization check, not just existence: an act that exists but belongs to
/// another user is rejected the same way as a missing one. Re-choosing the
/// currently bound act just refreshes the cookie.
async fn choose_act(
    State(state): State<AuthState>,
    user: AuthUser,
    jar: PrivateCookieJar,
    Json(dto): Json<ChooseActDto>,
) -> Result<(PrivateCookieJar, Json<CommandResponse>), AuthError> {
    let record = state
        .acts
        .find_dyn(&dto.act_id)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

    match record {
        Some(act) if act.user_id == user.user_id => {
            let jar = jar.add(cookies::act_cookie(
                &state.settings.act_cookie_name,
                &act.id,
                state.settings.secure_cookies,
            ));
            tracing::info!(user_id = %user.user_id, act_id = %act.id, "Act selected");
            Ok((jar, Json(CommandResponse::success())))
        }
        _ => Err(AuthError::ActNotOwned),
    }
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<CommandResponse>) {
    let jar = jar
        .remove(cookies::clear_token_cookie(&state.settings.token_cookie_name))
        .remove(cookies::clear_act_cookie(&state.settings.act_cookie_name));

    (jar, Json(CommandResponse::success()))
}

// ── Helpers ────────────────────────────────────────────────────────

fn login_error(error_redirect: &str, code: &str) -> Response {
    let encoded = urlencoding::encode(code);
    Redirect::to(&format!("{error_redirect}?error={encoded}")).into_response()
}
