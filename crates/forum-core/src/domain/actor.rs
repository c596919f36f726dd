use super::UserId;
use crate::error::DomainError;

/// The caller on whose behalf a post operation runs.
///
/// Passed explicitly into every mutating call of [`crate::PostService`]; nothing
/// in the core reads identity from ambient state.
///
/// The id is a *claim*: the core only compares it against stored ownership and
/// never verifies it. Whatever builds an `Actor` must first authenticate the
/// caller. The HTTP surface currently takes the id from the request body, so a
/// deployment needs a real authentication layer in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
}

impl Actor {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Build an actor from a caller-supplied id. Missing or non-positive ids are rejected.
    pub fn claimed(raw: Option<i64>) -> Result<Self, DomainError> {
        raw.and_then(UserId::from_i64)
            .map(Self::new)
            .ok_or_else(|| DomainError::missing_fields(&["user id"]))
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
