//! Step wizard engine.
//!
//! Drives a linear, non-branching sequence of steps, gates forward
//! progress on per-step validity, and keeps the derived pricing preview in
//! sync with the answers. The engine owns only values — steps, current
//! index, answers — and performs no I/O; rendering happens through
//! [`RenderPort`](crate::ports::RenderPort) and submission through
//! [`LeadDelivery`](crate::ports::LeadDelivery).
//!
//! Transitions are total functions: `go_next` at the last step and
//! `go_prev` at the first are no-ops to the same index, so
//! `0 <= current_index < steps.len()` holds after any call sequence.

use thiserror::Error;
use tracing::debug;

use crate::models::{Answers, FieldKey, Lead, PricingContext, Step, StepInput, StepKind};
use crate::ports::RenderPort;
use crate::pricing::{PricingConfig, PricingError, PricingResult, PricingTable};
use crate::validation::{CHOICE_REQUIRED_MESSAGE, FIELD_REQUIRED_MESSAGE};

/// Errors that can occur when building a wizard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The step sequence may not be empty.
    #[error("wizard requires at least one step")]
    NoSteps,

    /// At most one step may be marked as the intro.
    #[error("wizard supports at most one intro step, found {0}")]
    MultipleIntroSteps(usize),

    /// `start` jumps past the intro, so the intro cannot be terminal.
    #[error("intro step cannot be the terminal step")]
    IntroTerminal,

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Outcome of evaluating one step's inputs.
///
/// Invalid outcomes name the first offending control so the renderer can
/// flag it and move focus there. They are values, not errors: validation
/// failure blocks advancement and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepValidity {
    Valid,
    /// An exclusive-choice group has no selection.
    MissingChoice { field: FieldKey },
    /// A required text field is empty after trimming.
    EmptyField { field: FieldKey },
}

impl StepValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, StepValidity::Valid)
    }

    /// The control to flag and focus, when invalid.
    pub fn offending_field(&self) -> Option<FieldKey> {
        match self {
            StepValidity::Valid => None,
            StepValidity::MissingChoice { field } | StepValidity::EmptyField { field } => {
                Some(*field)
            }
        }
    }

    /// Inline marker text for the offending control.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            StepValidity::Valid => None,
            StepValidity::MissingChoice { .. } => Some(CHOICE_REQUIRED_MESSAGE),
            StepValidity::EmptyField { .. } => Some(FIELD_REQUIRED_MESSAGE),
        }
    }
}

/// Result of one navigation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    /// Set when a forward transition was refused by validation.
    pub blocked: Option<StepValidity>,
}

impl Transition {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// The "step X of N" counter, where N excludes the intro step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCounter {
    pub current: usize,
    pub total: usize,
    /// Hidden while the intro is active.
    pub visible: bool,
}

/// Visibility and enablement of the navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub prev_visible: bool,
    pub prev_enabled: bool,
    pub next_visible: bool,
    pub next_enabled: bool,
    /// The results screen relabels the forward button.
    pub next_label: &'static str,
    /// Submit only appears on the terminal step.
    pub submit_visible: bool,
}

/// Everything a renderer needs after a transition or answer change.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardView {
    pub active: usize,
    pub progress_percent: u32,
    pub counter: StepCounter,
    pub controls: Controls,
    /// `None` until both license and marketing are answered.
    pub pricing: Option<PricingResult>,
}

/// The wizard state machine.
///
/// Created once when the calculator is initialized, mutated in place by
/// every interaction, and discarded with the session.
#[derive(Debug, Clone)]
pub struct WizardEngine {
    steps: Vec<Step>,
    current: usize,
    intro: Option<usize>,
    answers: Answers,
    pricing: PricingTable,
}

impl WizardEngine {
    /// Builds a wizard over the given steps, starting at index 0 with
    /// range answers seeded from their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the step list is empty, contains more
    /// than one intro, ends with the intro, or the pricing configuration
    /// is invalid.
    pub fn new(steps: Vec<Step>, pricing: PricingConfig) -> Result<Self, EngineError> {
        if steps.is_empty() {
            return Err(EngineError::NoSteps);
        }
        let intro_count = steps.iter().filter(|s| s.is_intro()).count();
        if intro_count > 1 {
            return Err(EngineError::MultipleIntroSteps(intro_count));
        }
        let intro = steps.iter().position(Step::is_intro);
        if intro == Some(steps.len() - 1) {
            return Err(EngineError::IntroTerminal);
        }

        let answers = Answers::seeded_from(&steps);
        let pricing = PricingTable::new(pricing)?;

        Ok(Self {
            steps,
            current: 0,
            intro,
            answers,
            pricing,
        })
    }

    /// Convenience constructor for the production seven-step flow.
    pub fn with_default_flow(pricing: PricingConfig) -> Result<Self, EngineError> {
        Self::new(Step::default_flow(), pricing)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &Step {
        &self.steps[self.current]
    }

    pub fn intro_index(&self) -> Option<usize> {
        self.intro
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    // ─── navigation ──────────────────────────────────────────────────────

    /// Advances one step if the current step is valid.
    ///
    /// When the current step is invalid the index does not move and the
    /// returned transition carries the validity outcome so the renderer
    /// can flag and focus the offending control. At the last step a valid
    /// `go_next` is a no-op to the same index.
    pub fn go_next(&mut self) -> Transition {
        let from = self.current;
        let validity = self.step_validity(from);
        if !validity.is_valid() {
            debug!(step = from, ?validity, "forward transition blocked");
            return Transition {
                from,
                to: from,
                blocked: Some(validity),
            };
        }

        self.current = (from + 1).min(self.steps.len() - 1);
        debug!(from, to = self.current, "step forward");
        Transition {
            from,
            to: self.current,
            blocked: None,
        }
    }

    /// Steps back one step, clamped at 0. Never validity-gated: the
    /// visitor may always review earlier answers.
    pub fn go_prev(&mut self) -> Transition {
        let from = self.current;
        self.current = from.saturating_sub(1);
        Transition {
            from,
            to: self.current,
            blocked: None,
        }
    }

    /// Leaves the intro for the first question step.
    ///
    /// Only meaningful while the intro is active; the intro has no inputs,
    /// so the validity gate is bypassed. Anywhere else this is a no-op.
    pub fn start(&mut self) -> Transition {
        let from = self.current;
        match self.intro {
            Some(i) if from == i => {
                // new() guarantees the intro is not terminal
                self.current = i + 1;
                debug!(to = self.current, "wizard started");
                Transition {
                    from,
                    to: self.current,
                    blocked: None,
                }
            }
            _ => Transition {
                from,
                to: from,
                blocked: None,
            },
        }
    }

    // ─── answers ─────────────────────────────────────────────────────────

    /// Records a selection in an exclusive-choice group.
    pub fn set_choice(&mut self, field: FieldKey, value: &str) {
        self.answers.set_choice(field, value);
    }

    /// Records a range value, clamped to the declared bounds. Returns the
    /// stored value so the renderer can echo it next to the slider.
    pub fn set_range(&mut self, field: FieldKey, value: u32) -> u32 {
        let clamped = match self.range_bounds(field) {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        };
        self.answers.set_range(field, clamped);
        clamped
    }

    /// Records a free-text value as typed; trimming happens at validation
    /// and lead-capture time.
    pub fn set_text(&mut self, field: FieldKey, value: &str) {
        self.answers.set_text(field, value);
    }

    fn range_bounds(&self, field: FieldKey) -> Option<(u32, u32)> {
        self.steps
            .iter()
            .flat_map(|s| s.inputs.iter())
            .find_map(|input| match input {
                StepInput::Range { field: f, min, max, .. } if *f == field => Some((*min, *max)),
                _ => None,
            })
    }

    // ─── validity ────────────────────────────────────────────────────────

    /// Evaluates one step's inputs against the current answers.
    ///
    /// Intro, results and range-only steps are always valid (ranges carry
    /// defaults, so "unanswered" is impossible). Choice groups need
    /// exactly one selection each; the terminal contact step needs every
    /// required text field non-empty after trimming.
    pub fn step_validity(&self, index: usize) -> StepValidity {
        let Some(step) = self.steps.get(index) else {
            return StepValidity::Valid;
        };

        if step.is_intro() {
            return StepValidity::Valid;
        }

        for input in &step.inputs {
            if let StepInput::Choice { field, .. } = input
                && self.answers.choice(*field).is_none()
            {
                return StepValidity::MissingChoice { field: *field };
            }
        }

        if step.kind == StepKind::ContactCapture {
            for input in &step.inputs {
                if let StepInput::Text { field, required: true } = input
                    && self.answers.text(*field).trim().is_empty()
                {
                    return StepValidity::EmptyField { field: *field };
                }
            }
        }

        StepValidity::Valid
    }

    // ─── derived view ────────────────────────────────────────────────────

    /// Progress through the question steps, in percent.
    ///
    /// The intro is excluded from both numerator and denominator; the
    /// value is floored at 5 so the bar is never visually empty, and
    /// reaches 100 only on the last step.
    pub fn progress_percent(&self) -> u32 {
        let total = self.total_questions();
        let question_index = match self.intro {
            Some(0) => self.current.saturating_sub(1),
            _ => self.current,
        };
        let percent = (((question_index + 1) * 100) as f64 / total as f64).round() as u32;
        percent.max(5)
    }

    /// Step count excluding the intro.
    fn total_questions(&self) -> usize {
        if self.intro.is_some() {
            self.steps.len() - 1
        } else {
            self.steps.len()
        }
    }

    fn counter(&self) -> StepCounter {
        let current = match self.intro {
            Some(0) => self.current.max(1),
            _ => self.current + 1,
        };
        StepCounter {
            current,
            total: self.total_questions(),
            visible: !self.current_step().is_intro(),
        }
    }

    fn controls(&self) -> Controls {
        let is_intro = self.current_step().is_intro();
        let is_last = self.current == self.steps.len() - 1;
        Controls {
            prev_visible: !is_intro,
            prev_enabled: self.current > 0,
            next_visible: !is_last && !is_intro,
            next_enabled: !is_last,
            next_label: if self.current_step().kind == StepKind::ResultsDisplay {
                "Get Detailed Calculation"
            } else {
                "Next"
            },
            submit_visible: is_last,
        }
    }

    /// Snapshot of everything the renderer needs right now.
    pub fn view(&self) -> WizardView {
        WizardView {
            active: self.current,
            progress_percent: self.progress_percent(),
            counter: self.counter(),
            controls: self.controls(),
            pricing: self.pricing.quote(&self.answers),
        }
    }

    /// Pushes the current view through a render port.
    ///
    /// Called after every transition and answer change, moved or not, so
    /// progress, pricing and control chrome never go stale.
    pub fn render(&self, port: &mut dyn RenderPort) {
        let view = self.view();
        port.set_active_step(view.active, &self.steps[view.active]);
        port.set_progress(view.progress_percent, &view.counter);
        port.set_pricing(view.pricing.as_ref());
        port.set_controls(&view.controls);
    }

    // ─── lead capture ────────────────────────────────────────────────────

    /// The contact record as currently entered, trimmed.
    pub fn lead(&self) -> Lead {
        Lead::new(
            &self.answers.name,
            &self.answers.phone,
            &self.answers.telegram,
            &self.answers.instagram,
        )
    }

    /// Pricing summary for the delivery message, when a quote exists.
    pub fn pricing_context(&self) -> Option<PricingContext> {
        let quote = self.pricing.quote(&self.answers)?;
        Some(PricingContext {
            license_label: self.license_label(),
            marketing_opt_in: self.answers.marketing.as_deref() == Some("yes"),
            workdays: self.answers.workdays,
            services: self.answers.services,
            monthly: quote.monthly,
            yearly: quote.yearly,
        })
    }

    fn license_label(&self) -> String {
        let selected = self.answers.license.as_deref();
        self.steps
            .iter()
            .flat_map(|s| s.inputs.iter())
            .find_map(|input| match input {
                StepInput::Choice { field: FieldKey::License, options } => options
                    .iter()
                    .find(|o| Some(o.value.as_str()) == selected)
                    .map(|o| o.label.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "Not selected".to_string())
    }

    /// Clears the answers back to their seeded defaults after a
    /// successful submission. The step index is left where it is.
    pub fn reset_answers(&mut self) {
        self.answers = Answers::seeded_from(&self.steps);
    }
}
