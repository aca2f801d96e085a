//! Price table for purchasable billing periods.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::reservation::BillingPeriod;

/// Charged amount per billing period, in currency minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    pub one_month: i64,
    pub six_months: i64,
    pub twelve_months: i64,
}

impl PriceTable {
    /// Creates a price table, rejecting non-positive amounts.
    pub fn new(one_month: i64, six_months: i64, twelve_months: i64) -> Result<Self, ValidationError> {
        let table = Self {
            one_month,
            six_months,
            twelve_months,
        };
        for period in BillingPeriod::ALL {
            if table.amount_for(period) <= 0 {
                return Err(ValidationError::invalid_format(
                    "price",
                    format!("price for {} must be positive", period),
                ));
            }
        }
        Ok(table)
    }

    /// Returns the amount charged for `period`.
    pub fn amount_for(&self, period: BillingPeriod) -> i64 {
        match period {
            BillingPeriod::OneMonth => self.one_month,
            BillingPeriod::SixMonths => self.six_months,
            BillingPeriod::TwelveMonths => self.twelve_months,
        }
    }
}
