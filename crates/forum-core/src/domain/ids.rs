//! Integer identifiers for posts and users.
//!
//! Both ids are positive 32-bit integers assigned by storage. Keeping them as
//! distinct newtypes means an owner check can only ever compare a `UserId`
//! with a `UserId`; there is no string form to compare against.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i32 {
                self.0
            }

            /// Parse a caller-supplied id. Only positive integers are accepted.
            pub fn parse(raw: &str) -> Option<Self> {
                raw.trim().parse::<i32>().ok().and_then(|v| Self::from_i64(i64::from(v)))
            }

            /// Narrow a wire integer into an id, rejecting zero, negatives, and overflow.
            pub fn from_i64(value: i64) -> Option<Self> {
                i32::try_from(value).ok().filter(|v| *v > 0).map(Self)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Storage-assigned post identifier.
    PostId
);

integer_id!(
    /// Identifier of a user account owned by the remote user service.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_positive_integers() {
        assert_eq!(PostId::parse("42"), Some(PostId::new(42)));
        assert_eq!(UserId::parse(" 7 "), Some(UserId::new(7)));
    }

    #[test]
    fn parse_rejects_non_numeric_and_non_positive() {
        assert_eq!(PostId::parse(""), None);
        assert_eq!(PostId::parse("abc"), None);
        assert_eq!(PostId::parse("1.5"), None);
        assert_eq!(UserId::parse("0"), None);
        assert_eq!(UserId::parse("-3"), None);
    }

    #[test]
    fn from_i64_rejects_overflow() {
        assert_eq!(UserId::from_i64(i64::from(i32::MAX) + 1), None);
        assert_eq!(UserId::from_i64(5), Some(UserId::new(5)));
    }

    #[test]
    fn display_is_canonical_integer() {
        assert_eq!(PostId::new(13).to_string(), "13");
    }
}
