//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Timestamp, ValidationError};

/// Number of user id characters embedded in generated order ids.
const ORDER_USER_PREFIX_LEN: usize = 8;

/// Identifier of an application user (issued by the auth provider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty or blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Merchant order identifier, unique per payment attempt.
///
/// Generated ids have the form `ORDER_<epoch millis>_<first 8 chars of user id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Generates a fresh order id for a payment initiated by `user_id` at `at`.
    pub fn generate(user_id: &UserId, at: Timestamp) -> Self {
        Self(format!("ORDER_{}_{}", at.as_unix_millis(), user_prefix(user_id)))
    }

    /// Returns true if `raw` has the shape [`OrderId::generate`] produces for
    /// `user_id`.
    ///
    /// Only the leading characters of the user id are embedded, so two users
    /// sharing that prefix are indistinguishable here.
    pub fn is_issued_to(raw: &str, user_id: &UserId) -> bool {
        raw.strip_prefix("ORDER_")
            .and_then(|rest| rest.split_once('_'))
            .is_some_and(|(millis, prefix)| {
                !millis.is_empty()
                    && millis.bytes().all(|b| b.is_ascii_digit())
                    && prefix == user_prefix(user_id)
            })
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn user_prefix(user_id: &UserId) -> String {
    user_id.as_str().chars().take(ORDER_USER_PREFIX_LEN).collect()
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_accepts_non_empty_string() {
        let id = UserId::new("user-123").unwrap();
        assert_eq!(id.as_str(), "user-123");
    }

    #[test]
    fn user_id_rejects_empty_string() {
        let result = UserId::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn user_id_rejects_blank_string() {
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn user_id_displays_correctly() {
        let id = UserId::new("user-456").unwrap();
        assert_eq!(format!("{}", id), "user-456");
    }


    #[test]
    fn generated_order_id_embeds_millis_and_user_prefix() {
        let user_id = UserId::new("abcd1234-5678-90ef").unwrap();
        let at = Timestamp::from_unix_millis(1_735_689_600_123).unwrap();

        let order_id = OrderId::generate(&user_id, at);

        assert_eq!(order_id.as_str(), "ORDER_1735689600123_abcd1234");
    }

    #[test]
    fn generated_order_id_uses_whole_short_user_id() {
        let user_id = UserId::new("u-1").unwrap();
        let at = Timestamp::from_unix_millis(123).unwrap();

        assert_eq!(OrderId::generate(&user_id, at).as_str(), "ORDER_123_u-1");
    }

    #[test]
    fn generated_order_id_respects_char_boundaries() {
        let user_id = UserId::new("사용자아이디입니다열").unwrap();
        let at = Timestamp::from_unix_millis(1).unwrap();

        assert_eq!(OrderId::generate(&user_id, at).as_str(), "ORDER_1_사용자아이디입니다");
    }

    #[test]
    fn generated_order_id_is_issued_to_its_user() {
        let user_id = UserId::new("abcd1234-5678-90ef").unwrap();
        let at = Timestamp::from_unix_millis(1_735_689_600_123).unwrap();

        let order_id = OrderId::generate(&user_id, at);

        assert!(OrderId::is_issued_to(order_id.as_str(), &user_id));
    }

    #[test]
    fn order_id_prefix_may_contain_underscores() {
        let user_id = UserId::new("user_name_42").unwrap();
        let at = Timestamp::from_unix_millis(7).unwrap();

        let order_id = OrderId::generate(&user_id, at);

        assert_eq!(order_id.as_str(), "ORDER_7_user_nam");
        assert!(OrderId::is_issued_to(order_id.as_str(), &user_id));
    }

    #[test]
    fn order_id_of_other_user_is_not_issued_to_user() {
        let user_id = UserId::new("u-1").unwrap();

        assert!(!OrderId::is_issued_to("ORDER_123_attacker", &user_id));
        assert!(!OrderId::is_issued_to("ORDER_123_u-12", &user_id));
        assert!(!OrderId::is_issued_to("ORDER_123_xu-1", &user_id));
    }

    #[test]
    fn malformed_order_id_is_not_issued_to_anyone() {
        let user_id = UserId::new("u-1").unwrap();

        for raw in ["", "u-1", "_u-1", "ORDER__u-1", "ORDER_abc_u-1", "PAY_123_u-1"] {
            assert!(!OrderId::is_issued_to(raw, &user_id), "accepted {:?}", raw);
        }
    }
}
