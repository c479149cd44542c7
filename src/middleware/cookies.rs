use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;
use uuid::Uuid;

use crate::flow::FlowTicket;
use crate::types::ActId;

const FLOW_COOKIE_NAME: &str = "__usw_flow";

fn flow_path(auth_path: &str) -> String {
    if auth_path.is_empty() {
        "/".to_string()
    } else {
        auth_path.to_string()
    }
}

/// Create the pending-login cookie carrying the serialized [`FlowTicket`].
///
/// Short-lived: the window between redirecting to the provider and the
/// callback. Scoped to the auth path so it never rides on application
/// requests.
pub(super) fn flow_cookie(ticket_json: String, secure: bool, auth_path: &str) -> Cookie<'static> {
    Cookie::build((FLOW_COOKIE_NAME, ticket_json))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(flow_path(auth_path))
        .max_age(Duration::minutes(5))
        .build()
}

/// Create the removal cookie for the pending-login state.
pub(super) fn clear_flow_cookie(auth_path: &str) -> Cookie<'static> {
    Cookie::build((FLOW_COOKIE_NAME, ""))
        .path(flow_path(auth_path))
        .max_age(Duration::ZERO)
        .build()
}

/// Create the credential cookie holding the sealed access token.
///
/// No max-age: the cookie lives for the browser session, and the provider
/// decides when the token inside it expires.
pub(super) fn token_cookie(name: &str, sealed: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), sealed.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .build()
}

/// Create the removal cookie for the credential.
pub(super) fn clear_token_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Create the act-binding cookie (session-lifetime, like the credential).
pub(super) fn act_cookie(name: &str, act_id: &ActId, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), act_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .build()
}

/// Create the removal cookie for the act binding.
pub(super) fn clear_act_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Get the pending flow ticket from cookies, if present and well-formed.
pub(super) fn get_flow(jar: &PrivateCookieJar) -> Option<FlowTicket> {
    let cookie = jar.get(FLOW_COOKIE_NAME)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Get the bound act id from cookies, if present and well-formed.
pub(super) fn get_act(jar: &PrivateCookieJar, name: &str) -> Option<ActId> {
    jar.get(name)?.value().parse::<Uuid>().ok().map(ActId)
}
