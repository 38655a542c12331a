//! Step descriptors for the calculator wizard.
//!
//! A wizard is a fixed, ordered sequence of [`Step`]s established at
//! initialization. Indices are stable for the lifetime of the session.

use serde::{Deserialize, Serialize};

/// Identifies a single answer field across the whole wizard.
///
/// The key set is fixed by the step definitions; every input in a
/// [`Step`] names exactly one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKey {
    License,
    Marketing,
    Workdays,
    Services,
    Name,
    Phone,
    Telegram,
    Instagram,
}

impl FieldKey {
    /// Wire/display name of the field, matching the form control names.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::License => "license",
            FieldKey::Marketing => "marketing",
            FieldKey::Workdays => "workdays",
            FieldKey::Services => "services",
            FieldKey::Name => "name",
            FieldKey::Phone => "phone",
            FieldKey::Telegram => "telegram",
            FieldKey::Instagram => "instagram",
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of screen a step renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Opening screen with no inputs; navigation chrome is hidden here.
    Intro,
    /// One or more exclusive-choice (radio) groups.
    SingleChoice,
    /// Bounded numeric sliders carrying a default value.
    Range,
    /// Read-only pricing breakdown; no inputs.
    ResultsDisplay,
    /// Terminal screen capturing the visitor's contact details.
    ContactCapture,
}

/// One selectable option inside an exclusive-choice group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Machine value stored in the answers (e.g. `"standard"`).
    pub value: String,
    /// Human label shown next to the control and echoed in lead summaries.
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A typed input control carried by a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepInput {
    /// Exclusive-choice group; exactly one option must be selected for the
    /// step to be valid.
    Choice {
        field: FieldKey,
        options: Vec<ChoiceOption>,
    },
    /// Bounded slider. Always valid: the default makes "unanswered"
    /// impossible.
    Range {
        field: FieldKey,
        min: u32,
        max: u32,
        default: u32,
    },
    /// Free-text field. Required fields must be non-empty after trimming
    /// on the terminal step.
    Text { field: FieldKey, required: bool },
}

impl StepInput {
    /// The answer key this input writes to.
    pub fn field(&self) -> FieldKey {
        match self {
            StepInput::Choice { field, .. }
            | StepInput::Range { field, .. }
            | StepInput::Text { field, .. } => *field,
        }
    }
}

/// One screen of the multi-screen form flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    /// Heading shown for the screen.
    pub title: String,
    pub inputs: Vec<StepInput>,
}

impl Step {
    pub fn new(kind: StepKind, title: impl Into<String>, inputs: Vec<StepInput>) -> Self {
        Self {
            kind,
            title: title.into(),
            inputs,
        }
    }

    pub fn is_intro(&self) -> bool {
        self.kind == StepKind::Intro
    }

    /// The seven-screen flow of the production calculator: intro, license
    /// tier, marketing opt-in, working days, services per day, results,
    /// contact capture.
    pub fn default_flow() -> Vec<Step> {
        vec![
            Step::new(StepKind::Intro, "Estimate your monthly profit", vec![]),
            Step::new(
                StepKind::SingleChoice,
                "Which license suits you?",
                vec![StepInput::Choice {
                    field: FieldKey::License,
                    options: vec![
                        ChoiceOption::new("standard", "Standard license"),
                        ChoiceOption::new("exclusive", "Exclusive license"),
                        ChoiceOption::new("basic", "Basic license"),
                    ],
                }],
            ),
            Step::new(
                StepKind::SingleChoice,
                "Do you want marketing support?",
                vec![StepInput::Choice {
                    field: FieldKey::Marketing,
                    options: vec![
                        ChoiceOption::new("yes", "Yes, include marketing"),
                        ChoiceOption::new("no", "No, I'll handle it myself"),
                    ],
                }],
            ),
            Step::new(
                StepKind::Range,
                "How many days a month will you work?",
                vec![StepInput::Range {
                    field: FieldKey::Workdays,
                    min: 1,
                    max: 30,
                    default: 1,
                }],
            ),
            Step::new(
                StepKind::Range,
                "How many services per day?",
                vec![StepInput::Range {
                    field: FieldKey::Services,
                    min: 1,
                    max: 10,
                    default: 1,
                }],
            ),
            Step::new(StepKind::ResultsDisplay, "Your projected revenue", vec![]),
            Step::new(
                StepKind::ContactCapture,
                "Where should we send the detailed calculation?",
                vec![
                    StepInput::Text {
                        field: FieldKey::Name,
                        required: true,
                    },
                    StepInput::Text {
                        field: FieldKey::Phone,
                        required: true,
                    },
                    StepInput::Text {
                        field: FieldKey::Telegram,
                        required: false,
                    },
                    StepInput::Text {
                        field: FieldKey::Instagram,
                        required: false,
                    },
                ],
            ),
        ]
    }
}
