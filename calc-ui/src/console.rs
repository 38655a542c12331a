//! Terminal renderer for the wizard.
//!
//! Implements [`RenderPort`] by drawing the active step, the progress
//! bar, the live pricing preview and the navigation hints to a writer.
//! Inline field errors are tracked per field and drawn under the inputs,
//! the same way the engine reports them.

use std::collections::BTreeMap;
use std::io::Write;

use calc_core::engine::{Controls, StepCounter};
use calc_core::models::{FieldKey, Step, StepInput, StepKind};
use calc_core::ports::RenderPort;
use calc_core::pricing::{PricingResult, format_money};

const PROGRESS_WIDTH: usize = 30;

/// Draws the wizard to any `Write` target, stdout in production.
pub struct ConsolePresenter<W: Write> {
    out: W,
    field_errors: BTreeMap<FieldKey, String>,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Success banner, shown after a delivered submission.
    pub fn notify_success(&mut self, message: &str) {
        let _ = writeln!(self.out, "\n✓ {message}");
    }

    /// Error banner for validation and delivery failures.
    pub fn notify_error(&mut self, message: &str) {
        let _ = writeln!(self.out, "\n✕ {message}");
    }

    fn draw_input(&mut self, input: &StepInput) {
        match input {
            StepInput::Choice { options, .. } => {
                for (i, option) in options.iter().enumerate() {
                    let _ = writeln!(self.out, "  {}) {}", i + 1, option.label);
                }
            }
            StepInput::Range { field, min, max, .. } => {
                let _ = writeln!(self.out, "  {field}: enter a number between {min} and {max}");
            }
            StepInput::Text { field, required } => {
                let marker = if *required { "" } else { " (optional)" };
                let _ = writeln!(self.out, "  {field}{marker}: type '{field} <value>'");
            }
        }
        if let Some(message) = self.field_errors.get(&input.field()) {
            let message = message.clone();
            let _ = writeln!(self.out, "    ! {message}");
        }
    }
}

impl<W: Write> RenderPort for ConsolePresenter<W> {
    fn set_active_step(&mut self, _index: usize, step: &Step) {
        let _ = writeln!(self.out, "\n── {} ──", step.title);
        if step.kind == StepKind::Intro {
            let _ = writeln!(self.out, "  type 'start' to begin");
        }
        for input in step.inputs.clone() {
            self.draw_input(&input);
        }
    }

    fn set_progress(&mut self, percent: u32, counter: &StepCounter) {
        if !counter.visible {
            return;
        }
        let filled = (percent as usize * PROGRESS_WIDTH) / 100;
        let _ = writeln!(
            self.out,
            "  [{}{}] {percent}%  step {} of {}",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled),
            counter.current,
            counter.total,
        );
    }

    fn set_pricing(&mut self, pricing: Option<&PricingResult>) {
        let Some(pricing) = pricing else { return };
        let _ = writeln!(
            self.out,
            "  monthly €{}  ·  3 months €{}  ·  6 months €{}  ·  yearly €{}",
            format_money(pricing.monthly),
            format_money(pricing.month3),
            format_money(pricing.month6),
            format_money(pricing.yearly),
        );
    }

    fn set_controls(&mut self, controls: &Controls) {
        let mut hints: Vec<&str> = Vec::new();
        if controls.prev_visible && controls.prev_enabled {
            hints.push("prev");
        }
        if controls.next_visible && controls.next_enabled {
            hints.push(controls.next_label);
        }
        if controls.submit_visible {
            hints.push("submit");
        }
        hints.push("quit");
        let _ = writeln!(self.out, "  [{}]", hints.join(" | "));
    }

    fn mark_field_invalid(&mut self, field: FieldKey, message: &str) {
        self.field_errors.insert(field, message.to_string());
        let _ = writeln!(self.out, "  ! {field}: {message}");
    }

    fn clear_field_error(&mut self, field: FieldKey) {
        self.field_errors.remove(&field);
    }

    fn focus_field(&mut self, field: FieldKey) {
        let _ = writeln!(self.out, "  > fix '{field}' to continue");
    }
}

#[cfg(test)]
mod tests {
    use calc_core::WizardEngine;
    use calc_core::pricing::PricingConfig;

    use super::*;

    fn rendered(engine: &WizardEngine) -> String {
        let mut presenter = ConsolePresenter::new(Vec::new());
        engine.render(&mut presenter);
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn intro_renders_without_progress_or_nav_hints() {
        let engine = WizardEngine::with_default_flow(PricingConfig::default()).unwrap();

        let out = rendered(&engine);

        assert!(out.contains("Estimate your monthly profit"));
        assert!(out.contains("type 'start' to begin"));
        assert!(!out.contains("step 1 of"));
        assert!(!out.contains("prev"));
    }

    #[test]
    fn question_step_renders_options_progress_and_hints() {
        let mut engine = WizardEngine::with_default_flow(PricingConfig::default()).unwrap();
        engine.start();

        let out = rendered(&engine);

        assert!(out.contains("1) Standard license"));
        assert!(out.contains("3) Basic license"));
        assert!(out.contains("step 1 of 6"));
        assert!(out.contains("17%"));
        assert!(out.contains("prev"));
    }

    #[test]
    fn results_step_renders_the_quote_and_relabeled_button() {
        let mut engine = WizardEngine::with_default_flow(PricingConfig::default()).unwrap();
        engine.start();
        engine.set_choice(FieldKey::License, "standard");
        engine.go_next();
        engine.set_choice(FieldKey::Marketing, "yes");
        engine.go_next();
        engine.set_range(FieldKey::Workdays, 5);
        engine.go_next();
        engine.set_range(FieldKey::Services, 2);
        engine.go_next();

        let out = rendered(&engine);

        assert!(out.contains("monthly €30,000"));
        assert!(out.contains("6 months €180,000"));
        assert!(out.contains("yearly €360,000"));
        assert!(out.contains("Get Detailed Calculation"));
    }

    #[test]
    fn marked_fields_render_inline_errors_until_cleared() {
        let engine = WizardEngine::with_default_flow(PricingConfig::default()).unwrap();
        let mut presenter = ConsolePresenter::new(Vec::new());

        presenter.mark_field_invalid(FieldKey::Phone, "Enter a valid phone number");
        engine.render(&mut presenter);
        presenter.clear_field_error(FieldKey::Phone);

        let out = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(out.contains("phone: Enter a valid phone number"));
    }
}
