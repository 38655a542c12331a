//! In-memory answer state for one wizard session.

use serde::{Deserialize, Serialize};

use super::step::{FieldKey, Step, StepInput};

/// Everything the visitor has answered so far.
///
/// Created once when the wizard is initialized, mutated in place by every
/// interaction, and discarded with the session. Range fields are seeded
/// from their step defaults so they are never unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    /// Selected license tier value, e.g. `"standard"`.
    pub license: Option<String>,
    /// Marketing opt-in, `"yes"` or `"no"`.
    pub marketing: Option<String>,
    pub workdays: u32,
    pub services: u32,
    pub name: String,
    pub phone: String,
    pub telegram: String,
    pub instagram: String,
}

impl Answers {
    /// Builds the initial answer state for a step sequence, seeding every
    /// range input with its declared default.
    pub fn seeded_from(steps: &[Step]) -> Self {
        let mut answers = Answers::default();
        for input in steps.iter().flat_map(|s| s.inputs.iter()) {
            if let StepInput::Range { field, default, .. } = input {
                answers.set_range(*field, *default);
            }
        }
        answers
    }

    /// Current selection of an exclusive-choice group, if any.
    pub fn choice(&self, field: FieldKey) -> Option<&str> {
        match field {
            FieldKey::License => self.license.as_deref(),
            FieldKey::Marketing => self.marketing.as_deref(),
            _ => None,
        }
    }

    /// Current value of a range field. Non-range keys read as 0.
    pub fn range(&self, field: FieldKey) -> u32 {
        match field {
            FieldKey::Workdays => self.workdays,
            FieldKey::Services => self.services,
            _ => 0,
        }
    }

    /// Current value of a text field. Non-text keys read as empty.
    pub fn text(&self, field: FieldKey) -> &str {
        match field {
            FieldKey::Name => &self.name,
            FieldKey::Phone => &self.phone,
            FieldKey::Telegram => &self.telegram,
            FieldKey::Instagram => &self.instagram,
            _ => "",
        }
    }

    pub(crate) fn set_choice(&mut self, field: FieldKey, value: &str) {
        match field {
            FieldKey::License => self.license = Some(value.to_string()),
            FieldKey::Marketing => self.marketing = Some(value.to_string()),
            _ => {}
        }
    }

    pub(crate) fn set_range(&mut self, field: FieldKey, value: u32) {
        match field {
            FieldKey::Workdays => self.workdays = value,
            FieldKey::Services => self.services = value,
            _ => {}
        }
    }

    pub(crate) fn set_text(&mut self, field: FieldKey, value: &str) {
        match field {
            FieldKey::Name => self.name = value.to_string(),
            FieldKey::Phone => self.phone = value.to_string(),
            FieldKey::Telegram => self.telegram = value.to_string(),
            FieldKey::Instagram => self.instagram = value.to_string(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn seeded_from_applies_range_defaults() {
        let answers = Answers::seeded_from(&Step::default_flow());

        assert_eq!(answers.workdays, 1);
        assert_eq!(answers.services, 1);
        assert_eq!(answers.license, None);
    }

    #[test]
    fn choice_reads_back_what_was_set() {
        let mut answers = Answers::default();

        answers.set_choice(FieldKey::License, "exclusive");

        assert_eq!(answers.choice(FieldKey::License), Some("exclusive"));
        assert_eq!(answers.choice(FieldKey::Marketing), None);
    }

    #[test]
    fn text_defaults_to_empty_for_non_text_keys() {
        let answers = Answers::default();

        assert_eq!(answers.text(FieldKey::Workdays), "");
    }
}
