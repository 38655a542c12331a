//! Revenue projection for the profitability calculator.
//!
//! The preview shown to the visitor is a pure function of four answers:
//! license tier, marketing opt-in, working days per month and services per
//! day. It has no hidden state and is recomputed from the current answers
//! on every input change, so the displayed numbers are never stale.
//!
//! # Projection structure
//!
//! | Figure  | Description                                        |
//! |---------|----------------------------------------------------|
//! | monthly | base daily rate × working days × services per day  |
//! | month3  | monthly × 3                                        |
//! | month6  | monthly × 6                                        |
//! | yearly  | monthly × 12                                       |
//!
//! The base daily rate comes from a fixed three-tier table: a standard
//! tier, an exclusive tier (highest), and a fallback tier (lowest) used
//! when the selection is anything else. Opting out of marketing applies a
//! flat 30% reduction to the monthly figure, rounded to the nearest whole
//! currency unit, before the derived multiples are taken.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::models::Answers;
//! use calc_core::pricing::{PricingConfig, PricingTable};
//!
//! let table = PricingTable::new(PricingConfig::default()).unwrap();
//!
//! let answers = Answers {
//!     license: Some("standard".to_string()),
//!     marketing: Some("yes".to_string()),
//!     workdays: 5,
//!     services: 2,
//!     ..Answers::default()
//! };
//!
//! let quote = table.quote(&answers).unwrap();
//! assert_eq!(quote.monthly, dec!(30000));
//! assert_eq!(quote.yearly, dec!(360000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur when constructing a pricing table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The standard tier daily rate must be positive.
    #[error("standard tier rate must be positive, got {0}")]
    InvalidStandardRate(Decimal),

    /// The exclusive tier daily rate must be positive.
    #[error("exclusive tier rate must be positive, got {0}")]
    InvalidExclusiveRate(Decimal),

    /// The fallback tier daily rate must be positive.
    #[error("fallback tier rate must be positive, got {0}")]
    InvalidFallbackRate(Decimal),

    /// The marketing opt-out factor must be between 0 (exclusive) and 1.
    #[error("marketing opt-out factor must be between 0 and 1, got {0}")]
    InvalidOptOutFactor(Decimal),
}

/// Daily base rates and the marketing opt-out factor.
///
/// Injected at initialization rather than embedded in the engine, so a
/// deployment can reprice without touching code. [`PricingConfig::default`]
/// carries the production values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Daily rate for the `"standard"` tier.
    pub standard_rate: Decimal,
    /// Daily rate for the `"exclusive"` tier (highest).
    pub exclusive_rate: Decimal,
    /// Daily rate used when the selection is anything else (lowest).
    pub fallback_rate: Decimal,
    /// Fraction of revenue kept when the visitor opts out of marketing.
    pub marketing_optout_factor: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            standard_rate: Decimal::from(3000u32),
            exclusive_rate: Decimal::from(3500u32),
            fallback_rate: Decimal::from(2500u32),
            // flat 30% reduction
            marketing_optout_factor: Decimal::new(70, 2),
        }
    }
}

impl PricingConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if any rate is not positive or the opt-out
    /// factor is not in (0, 1].
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.standard_rate <= Decimal::ZERO {
            return Err(PricingError::InvalidStandardRate(self.standard_rate));
        }
        if self.exclusive_rate <= Decimal::ZERO {
            return Err(PricingError::InvalidExclusiveRate(self.exclusive_rate));
        }
        if self.fallback_rate <= Decimal::ZERO {
            return Err(PricingError::InvalidFallbackRate(self.fallback_rate));
        }
        if self.marketing_optout_factor <= Decimal::ZERO
            || self.marketing_optout_factor > Decimal::ONE
        {
            return Err(PricingError::InvalidOptOutFactor(
                self.marketing_optout_factor,
            ));
        }
        Ok(())
    }
}

/// Derived pricing preview, in whole currency units.
///
/// Never persisted; recomputable at any time from the current answers.
/// The multiples are exact: `month3 == monthly * 3`, `month6 == monthly * 6`,
/// `yearly == monthly * 12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub monthly: Decimal,
    pub month3: Decimal,
    pub month6: Decimal,
    pub yearly: Decimal,
}

/// Calculator for the three-tier revenue projection.
#[derive(Debug, Clone)]
pub struct PricingTable {
    config: PricingConfig,
}

impl PricingTable {
    /// Creates a pricing table after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the configuration is invalid.
    pub fn new(config: PricingConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Computes the pricing preview for the current answers.
    ///
    /// Returns `None` while either the license or the marketing question is
    /// unanswered; the preview stays blank until both are known.
    pub fn quote(
        &self,
        answers: &crate::models::Answers,
    ) -> Option<PricingResult> {
        let license = answers.license.as_deref()?;
        let marketing = answers.marketing.as_deref()?;

        let monthly = self.monthly_revenue(
            license,
            marketing,
            answers.workdays,
            answers.services,
        );

        Some(PricingResult {
            monthly,
            month3: monthly * Decimal::from(3u32),
            month6: monthly * Decimal::from(6u32),
            yearly: monthly * Decimal::from(12u32),
        })
    }

    /// Base daily rate for a license selection.
    ///
    /// Unknown selections fall back to the lowest tier, with a warning so
    /// a renamed option is noticed in the logs rather than silently
    /// underpriced.
    fn base_rate(&self, license: &str) -> Decimal {
        match license {
            "standard" => self.config.standard_rate,
            "exclusive" => self.config.exclusive_rate,
            other => {
                if other != "basic" {
                    warn!(license = %other, "unknown license tier; using fallback rate");
                }
                self.config.fallback_rate
            }
        }
    }

    /// Monthly revenue before derived multiples.
    ///
    /// `rate × workdays × services`, with the opt-out factor applied
    /// exactly once and rounded to the nearest whole unit when the visitor
    /// declined marketing.
    fn monthly_revenue(
        &self,
        license: &str,
        marketing: &str,
        workdays: u32,
        services: u32,
    ) -> Decimal {
        let raw = self.base_rate(license) * Decimal::from(workdays) * Decimal::from(services);

        if marketing == "no" {
            round_whole(raw * self.config.marketing_optout_factor)
        } else {
            raw
        }
    }
}

/// Rounds to the nearest whole currency unit, half away from zero.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as a grouped-thousands integer, `30000` → `"30,000"`.
///
/// Every displayed pricing figure goes through this; the raw `Decimal`
/// never reaches the visitor.
pub fn format_money(value: Decimal) -> String {
    let whole = round_whole(value);
    let negative = whole < Decimal::ZERO;
    let digits = whole.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
