//! Captured visitor contact records and their pricing context.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{is_valid_name, is_valid_phone};

use super::step::FieldKey;

/// A contact field that failed lead validation.
///
/// Carries the field to flag and the inline message to show next to it,
/// mirroring how step validation marks offending controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LeadFieldError {
    #[error("Enter a valid name")]
    InvalidName,
    #[error("Enter a valid phone number")]
    InvalidPhone,
}

impl LeadFieldError {
    /// The field the error should be rendered against.
    pub fn field(&self) -> FieldKey {
        match self {
            LeadFieldError::InvalidName => FieldKey::Name,
            LeadFieldError::InvalidPhone => FieldKey::Phone,
        }
    }

    /// Banner text for the notification collaborator.
    pub fn notification(&self) -> &'static str {
        match self {
            LeadFieldError::InvalidName => "Please enter a valid name",
            LeadFieldError::InvalidPhone => "Please enter a valid phone number",
        }
    }
}

/// A captured visitor contact record destined for external delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    /// Optional Telegram handle; empty when not provided.
    pub telegram: String,
    /// Optional Instagram handle; empty when not provided.
    pub instagram: String,
}

impl Lead {
    /// Builds a lead with surrounding whitespace stripped from every field.
    pub fn new(name: &str, phone: &str, telegram: &str, instagram: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            telegram: telegram.trim().to_string(),
            instagram: instagram.trim().to_string(),
        }
    }

    /// Validates the name and phone rules before delivery is attempted.
    ///
    /// Name: letters across Latin, Cyrillic and CJK ranges plus space and
    /// hyphen, at least two characters after trimming. Phone: digit-based
    /// heuristic (at least five digits, no letters, only phone punctuation).
    pub fn validate(&self) -> Result<(), LeadFieldError> {
        if !is_valid_name(&self.name) {
            return Err(LeadFieldError::InvalidName);
        }
        if !is_valid_phone(&self.phone) {
            return Err(LeadFieldError::InvalidPhone);
        }
        Ok(())
    }
}

/// Human-readable pricing context attached to a submitted lead.
///
/// Derived from the answers and the pricing preview at submission time;
/// rendered into the delivery message as a summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingContext {
    /// Label of the selected license option, or "Not selected".
    pub license_label: String,
    pub marketing_opt_in: bool,
    pub workdays: u32,
    pub services: u32,
    pub monthly: Decimal,
    pub yearly: Decimal,
}

impl std::fmt::Display for PricingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Profitability Calculator")?;
        writeln!(f, " 📊 License: {}", self.license_label)?;
        writeln!(
            f,
            " 📢 Marketing: {}",
            if self.marketing_opt_in { "Yes" } else { "No" }
        )?;
        writeln!(f, " 📅 Working days: {}", self.workdays)?;
        writeln!(f, " 🔧 Services per day: {}", self.services)?;
        writeln!(
            f,
            " 💰 Monthly Estimate: €{}",
            crate::pricing::format_money(self.monthly)
        )?;
        write!(
            f,
            " 💰 Yearly Estimate: €{}",
            crate::pricing::format_money(self.yearly)
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_trims_every_field() {
        let lead = Lead::new("  Ada Lovelace ", " +1 555 0100 ", " @ada ", "");

        assert_eq!(lead.name, "Ada Lovelace");
        assert_eq!(lead.phone, "+1 555 0100");
        assert_eq!(lead.telegram, "@ada");
        assert_eq!(lead.instagram, "");
    }

    #[test]
    fn validate_rejects_bad_name_before_phone() {
        let lead = Lead::new("A", "not-a-phone", "", "");

        assert_eq!(lead.validate(), Err(LeadFieldError::InvalidName));
    }

    #[test]
    fn validate_rejects_bad_phone() {
        let lead = Lead::new("Ada Lovelace", "call me", "", "");

        assert_eq!(lead.validate(), Err(LeadFieldError::InvalidPhone));
        assert_eq!(LeadFieldError::InvalidPhone.field(), FieldKey::Phone);
    }

    #[test]
    fn validate_accepts_realistic_lead() {
        let lead = Lead::new("Анна-Мария", "+7 (900) 123-45-67", "@anna", "");

        assert_eq!(lead.validate(), Ok(()));
    }

    #[test]
    fn pricing_context_renders_summary_block() {
        let context = PricingContext {
            license_label: "Standard license".to_string(),
            marketing_opt_in: true,
            workdays: 5,
            services: 2,
            monthly: dec!(30000),
            yearly: dec!(360000),
        };

        let rendered = context.to_string();

        assert!(rendered.starts_with("Profitability Calculator"));
        assert!(rendered.contains("License: Standard license"));
        assert!(rendered.contains("Marketing: Yes"));
        assert!(rendered.contains("Monthly Estimate: €30,000"));
        assert!(rendered.ends_with("Yearly Estimate: €360,000"));
    }
}
