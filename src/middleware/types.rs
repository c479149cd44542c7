use serde::{Deserialize, Serialize};

use crate::types::{ActId, NationalId, UserId};

/// One Act a user may operate under, as listed to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActSummary {
    pub id: ActId,
    pub title: String,
}

/// Ownership view of an Act, as the store reports it.
///
/// Returned by [`ActStore::find`](super::ActStore::find); the middleware uses
/// `user_id` for the authorization check when an act is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActRecord {
    pub id: ActId,
    pub user_id: UserId,
}

/// Resolved authorization context for the profile endpoint.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    /// Title of the company/organization the user's acts belong to.
    pub company: Option<String>,
    pub permissions: Vec<String>,
}

/// Success/failure envelope for command-style endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Authenticated profile view returned by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub national_id: NationalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub permissions: Vec<String>,
    /// Currently bound act, if one has been chosen this session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_id: Option<ActId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn command_response_shapes() {
        let ok = serde_json::to_value(CommandResponse::success()).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true}));

        let fail = serde_json::to_value(CommandResponse::failure("nope")).unwrap();
        assert_eq!(fail, serde_json::json!({"success": false, "message": "nope"}));
    }

    #[test]
    fn act_summary_camel_case() {
        let summary = ActSummary {
            id: ActId(Uuid::nil()),
            title: "Planning office".into(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("id").is_some());
        assert_eq!(json["title"], "Planning office");
    }
}
