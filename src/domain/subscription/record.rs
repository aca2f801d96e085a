//! Subscription record - one row per user.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

use super::reservation::Reservation;

/// How a new purchase combines with an existing subscription period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenewalPolicy {
    /// Restart the period from now, discarding any remaining time.
    #[default]
    Overwrite,

    /// Append the purchased months to an unexpired period.
    Extend,
}

/// Persisted subscription state for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub user_id: UserId,
    pub plan: String,
    pub started_at: Timestamp,
    pub expires_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SubscriptionRecord {
    /// Computes the record produced by a successful purchase.
    ///
    /// `existing` is only consulted under [`RenewalPolicy::Extend`]; an
    /// expired record is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the expiry overflows the calendar range.
    pub fn activate(
        reservation: &Reservation,
        now: Timestamp,
        existing: Option<&SubscriptionRecord>,
        policy: RenewalPolicy,
    ) -> Result<Self, ValidationError> {
        let carried = match policy {
            RenewalPolicy::Overwrite => None,
            RenewalPolicy::Extend => existing.filter(|record| record.is_active_at(now)),
        };

        let (started_at, period_base) = match carried {
            Some(record) => (record.started_at, record.expires_at),
            None => (now, now),
        };

        let expires_at = period_base
            .checked_add_months(reservation.months.months())
            .ok_or_else(|| {
                ValidationError::invalid_format("expires_at", "subscription end out of range")
            })?;

        Ok(Self {
            user_id: reservation.user_id.clone(),
            plan: reservation.tier.clone(),
            started_at,
            expires_at,
            updated_at: now,
        })
    }

    /// Returns true if the subscription grants access at `at`.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        at.is_before(&self.expires_at)
    }
}
