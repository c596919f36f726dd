use serde::{Deserialize, Serialize};

use super::UserId;

/// Read-only author projection of a user account.
///
/// Posts only store the author's id; the username is resolved through a join at
/// read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub username: String,
}

/// Registration payload forwarded to the remote user-account service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

impl NewAccount {
    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
