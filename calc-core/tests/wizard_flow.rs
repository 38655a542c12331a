//! End-to-end walk of the default calculator flow through the public API,
//! including rendering through a recording port and lead capture.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use calc_core::models::{FieldKey, Step};
use calc_core::ports::RenderPort;
use calc_core::pricing::{PricingConfig, PricingResult};
use calc_core::{Controls, StepCounter, WizardEngine};

/// Render port double that records the last values pushed into it.
#[derive(Default)]
struct RecordingPort {
    active: Option<usize>,
    title: String,
    percent: u32,
    counter: Option<StepCounter>,
    pricing: Option<PricingResult>,
    controls: Option<Controls>,
    invalid: Vec<(FieldKey, String)>,
    cleared: Vec<FieldKey>,
    focused: Vec<FieldKey>,
}

impl RenderPort for RecordingPort {
    fn set_active_step(&mut self, index: usize, step: &Step) {
        self.active = Some(index);
        self.title = step.title.clone();
    }

    fn set_progress(&mut self, percent: u32, counter: &StepCounter) {
        self.percent = percent;
        self.counter = Some(*counter);
    }

    fn set_pricing(&mut self, pricing: Option<&PricingResult>) {
        self.pricing = pricing.copied();
    }

    fn set_controls(&mut self, controls: &Controls) {
        self.controls = Some(*controls);
    }

    fn mark_field_invalid(&mut self, field: FieldKey, message: &str) {
        self.invalid.push((field, message.to_string()));
    }

    fn clear_field_error(&mut self, field: FieldKey) {
        self.cleared.push(field);
    }

    fn focus_field(&mut self, field: FieldKey) {
        self.focused.push(field);
    }
}

#[test]
fn full_flow_from_intro_to_captured_lead() {
    let mut engine = WizardEngine::with_default_flow(PricingConfig::default()).unwrap();
    let mut port = RecordingPort::default();

    // Intro: chrome hidden, pricing blank.
    engine.render(&mut port);
    assert_eq!(port.active, Some(0));
    assert!(!port.counter.unwrap().visible);
    assert_eq!(port.pricing, None);

    engine.start();

    // License tier.
    engine.set_choice(FieldKey::License, "exclusive");
    assert!(engine.go_next().moved());

    // Marketing opt-out takes 30% off the monthly figure.
    engine.set_choice(FieldKey::Marketing, "no");
    assert!(engine.go_next().moved());

    // Sliders.
    assert_eq!(engine.set_range(FieldKey::Workdays, 10), 10);
    assert!(engine.go_next().moved());
    assert_eq!(engine.set_range(FieldKey::Services, 3), 3);
    assert!(engine.go_next().moved());

    // Results: 3500 * 10 * 3 = 105000, opt-out factor 0.7 -> 73500.
    engine.render(&mut port);
    let pricing = port.pricing.expect("quote should exist on results");
    assert_eq!(pricing.monthly, dec!(73500));
    assert_eq!(pricing.month3, dec!(220500));
    assert_eq!(pricing.month6, dec!(441000));
    assert_eq!(pricing.yearly, dec!(882000));
    assert_eq!(
        port.controls.unwrap().next_label,
        "Get Detailed Calculation"
    );

    assert!(engine.go_next().moved());

    // Contact capture gates on required fields.
    let blocked = engine.go_next();
    assert!(!blocked.moved());
    assert_eq!(
        blocked.blocked.unwrap().offending_field(),
        Some(FieldKey::Name)
    );

    engine.set_text(FieldKey::Name, "Анна-Мария");
    engine.set_text(FieldKey::Phone, "+7 (900) 123-45-67");
    engine.set_text(FieldKey::Telegram, "@anna");

    engine.render(&mut port);
    assert_eq!(port.percent, 100);
    let counter = port.counter.unwrap();
    assert_eq!((counter.current, counter.total), (6, 6));
    assert!(port.controls.unwrap().submit_visible);

    let lead = engine.lead();
    assert_eq!(lead.validate(), Ok(()));
    assert_eq!(lead.name, "Анна-Мария");

    let context = engine.pricing_context().unwrap();
    assert_eq!(context.license_label, "Exclusive license");
    assert!(!context.marketing_opt_in);
    assert_eq!(context.monthly, dec!(73500));
    assert_eq!(context.yearly, dec!(882000));

    // Successful submission clears the answers for the next visitor.
    engine.reset_answers();
    assert_eq!(engine.answers().license, None);
    assert_eq!(engine.answers().workdays, 1);
    assert_eq!(engine.lead().name, "");
}

#[test]
fn revisiting_earlier_steps_preserves_answers() {
    let mut engine = WizardEngine::with_default_flow(PricingConfig::default()).unwrap();
    engine.start();
    engine.set_choice(FieldKey::License, "standard");
    engine.go_next();
    engine.set_choice(FieldKey::Marketing, "yes");
    engine.go_next();
    engine.set_range(FieldKey::Workdays, 12);

    engine.go_prev();
    engine.go_prev();
    assert_eq!(engine.current_index(), 1);

    // Nothing was lost on the way back.
    assert_eq!(engine.answers().choice(FieldKey::License), Some("standard"));
    assert_eq!(engine.answers().workdays, 12);

    // Forward again without re-answering.
    assert!(engine.go_next().moved());
    assert!(engine.go_next().moved());
}
