//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::subscription::{PriceTable, RenewalPolicy};

use super::error::ValidationError;

/// Payment provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Merchant id (`mid`) assigned by the provider
    pub merchant_id: Option<String>,

    /// Shared secret used to sign callbacks
    pub secret_key: Option<SecretString>,

    /// How a purchase combines with an unexpired subscription
    #[serde(default)]
    pub renewal_policy: RenewalPolicy,

    /// Price of one month, in minor units
    #[serde(default = "default_price_one_month")]
    pub price_one_month: i64,

    /// Price of six months, in minor units
    #[serde(default = "default_price_six_months")]
    pub price_six_months: i64,

    /// Price of twelve months, in minor units
    #[serde(default = "default_price_twelve_months")]
    pub price_twelve_months: i64,
}

impl PaymentConfig {
    /// Returns true if a non-blank signing secret is configured.
    pub fn has_secret_key(&self) -> bool {
        self.secret_key
            .as_ref()
            .is_some_and(|secret| !secret.expose_secret().trim().is_empty())
    }

    /// Builds the price table.
    pub fn price_table(&self) -> Result<PriceTable, ValidationError> {
        PriceTable::new(
            self.price_one_month,
            self.price_six_months,
            self.price_twelve_months,
        )
        .map_err(|_| ValidationError::InvalidPrice(self.first_invalid_price()))
    }

    fn first_invalid_price(&self) -> &'static str {
        [
            ("price_one_month", self.price_one_month),
            ("price_six_months", self.price_six_months),
            ("price_twelve_months", self.price_twelve_months),
        ]
        .into_iter()
        .find(|(_, price)| *price <= 0)
        .map(|(name, _)| name)
        .unwrap_or("price")
    }

    /// Validate payment configuration
    ///
    /// A missing secret is not an error here: the service still starts and
    /// answers callbacks with a failure until it is configured.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.price_table()?;
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            merchant_id: None,
            secret_key: None,
            renewal_policy: RenewalPolicy::default(),
            price_one_month: default_price_one_month(),
            price_six_months: default_price_six_months(),
            price_twelve_months: default_price_twelve_months(),
        }
    }
}

fn default_price_one_month() -> i64 {
    299000
}

fn default_price_six_months() -> i64 {
    1490000
}

fn default_price_twelve_months() -> i64 {
    2690000
}
