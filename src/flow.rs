use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Generates a cryptographically random state parameter for `OAuth2`.
///
/// Returns a 22-character URL-safe string (16 random bytes → base64url,
/// 128 bits of entropy).
#[must_use]
pub fn generate_state() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Pending login flow: the CSRF `state` and the post-login redirect target.
///
/// Created at login start, carried in a short-lived encrypted cookie, and
/// consumed exactly once at the callback. [`redeem`](Self::redeem) takes the
/// ticket by value — once redeemed (or failed) there is nothing left to
/// replay; the callback handler removes the backing cookie before checking so
/// the stored state is gone on both outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowTicket {
    pub state: String,
    pub redirect_url: String,
}

impl FlowTicket {
    /// Start a login flow: mint a fresh state bound to `redirect_url`.
    #[must_use]
    pub fn new(redirect_url: impl Into<String>) -> Self {
        Self {
            state: generate_state(),
            redirect_url: redirect_url.into(),
        }
    }

    /// Consume the ticket against the state presented on the callback.
    ///
    /// Returns the stored redirect target on match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateMismatch`] if the presented state differs from
    /// the stored one.
    pub fn redeem(self, presented_state: &str) -> Result<String, Error> {
        if !presented_state.is_empty() && presented_state == self.state {
            Ok(self.redirect_url)
        } else {
            Err(Error::StateMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn state_length() {
        let state = generate_state();
        assert_eq!(state.len(), 22);
    }

    #[test]
    fn state_url_safe() {
        let state = generate_state();
        assert!(
            state
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "state should be URL-safe: {}",
            state
        );
    }

    #[test]
    fn state_no_collisions() {
        let mut seen = HashSet::new();
        for _ in 0..100_000 {
            assert!(seen.insert(generate_state()), "state collision");
        }
    }

    #[test]
    fn ticket_redeems_on_match() {
        let ticket = FlowTicket::new("/dashboard");
        let state = ticket.state.clone();
        assert_eq!(ticket.redeem(&state).unwrap(), "/dashboard");
    }

    #[test]
    fn ticket_rejects_mismatch() {
        let ticket = FlowTicket::new("/dashboard");
        assert!(matches!(ticket.redeem("wrong"), Err(Error::StateMismatch)));
    }

    #[test]
    fn ticket_rejects_empty_state() {
        let mut ticket = FlowTicket::new("/");
        ticket.state = String::new();
        assert!(matches!(ticket.redeem(""), Err(Error::StateMismatch)));
    }

    #[test]
    fn tickets_are_unique_per_login() {
        let t1 = FlowTicket::new("/a");
        let t2 = FlowTicket::new("/a");
        assert_ne!(t1.state, t2.state);
    }

    #[test]
    fn ticket_json_roundtrip() {
        let ticket = FlowTicket::new("/dashboard");
        let json = serde_json::to_string(&ticket).unwrap();
        let parsed: FlowTicket = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.state, ticket.state);
        assert_eq!(parsed.redirect_url, "/dashboard");
    }
}
