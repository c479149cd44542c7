//! Plug-and-play USW SSO authentication middleware for Axum.
//!
//! This module eliminates OAuth2 boilerplate for Axum applications
//! authenticating against the USW SSO provider: login redirect, single-use
//! CSRF state, code exchange, profile fetch, first-login provisioning,
//! encrypted token custody, and Act selection.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use usw_accounts::middleware::{UswAuthConfig, auth_routes, AuthUser};
//!
//! // 1. Implement the UserStore and ActStore traits for your app
//! // 2. Configure from environment
//! let config = UswAuthConfig::from_env()?;
//!
//! // 3. Mount auth routes
//! let app = axum::Router::new()
//!     .merge(auth_routes(config, user_store, act_store));
//!
//! // 4. Use the AuthUser extractor in protected handlers
//! async fn protected(user: AuthUser) -> String {
//!     format!("hello {}", user.national_id)
//! }
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod routes;
mod state;
mod traits;
mod types;

pub use config::UswAuthConfig;
pub use error::AuthError;
pub use extractor::AuthUser;
pub use routes::auth_routes;
pub use state::AuthState;
pub use traits::{ActStore, StoreError, UserStore};
pub use types::{ActRecord, ActSummary, CommandResponse, UserContext, UserProfile};

/// Re-export cookie key type for builder API.
pub use axum_extra::extract::cookie::Key as CookieKey;
