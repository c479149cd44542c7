use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Validated national identity number (10 ASCII digits).
///
/// Guaranteed valid by construction: holding a `NationalId` proves the format
/// is correct. Use `"0012345678".parse::<NationalId>()` or
/// `NationalId::try_from(string)` to create. This is the subject claim the SSO
/// provider returns and the sole link between a local user and their external
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NationalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for NationalId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for NationalId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s))
        } else {
            Err(Error::InvalidNationalId(s))
        }
    }
}

impl From<NationalId> for String {
    fn from(n: NationalId) -> Self {
        n.0
    }
}

/// Local user identifier.
///
/// Assigned by the consumer's [`UserStore`](crate::middleware::UserStore) when
/// a user is provisioned on first login.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

/// Act identifier — an organizational context a user can operate under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct ActId(pub Uuid);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_national_id() {
        assert!("0012345678".parse::<NationalId>().is_ok());
        assert!("0000000000".parse::<NationalId>().is_ok());
        assert!("9999999999".parse::<NationalId>().is_ok());
    }

    #[test]
    fn invalid_national_id_wrong_length() {
        assert!("001234567".parse::<NationalId>().is_err());
        assert!("00123456789".parse::<NationalId>().is_err());
        assert!("".parse::<NationalId>().is_err());
    }

    #[test]
    fn invalid_national_id_non_digits() {
        assert!("001234567a".parse::<NationalId>().is_err());
        assert!("abcdefghij".parse::<NationalId>().is_err());
        assert!("001234567 ".parse::<NationalId>().is_err());
    }

    #[test]
    fn national_id_serde_roundtrip() {
        let id: NationalId = "0012345678".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0012345678\"");
        let parsed: NationalId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn national_id_serde_rejects_invalid() {
        assert!(serde_json::from_str::<NationalId>("\"123\"").is_err());
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = UserId(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn newtypes_prevent_mixing() {
        fn takes_user_id(_: &UserId) {}
        fn takes_act_id(_: &ActId) {}

        let user = UserId(Uuid::nil());
        let act = ActId(Uuid::nil());

        takes_user_id(&user);
        takes_act_id(&act);
        // takes_user_id(&act);  // Compile error!
        // takes_act_id(&user);  // Compile error!
    }
}
