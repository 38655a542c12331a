mod answers;
mod lead;
mod step;

pub use answers::Answers;
pub use lead::{Lead, LeadFieldError, PricingContext};
pub use step::{ChoiceOption, FieldKey, Step, StepInput, StepKind};
