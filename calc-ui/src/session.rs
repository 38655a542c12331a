//! Interactive calculator session.
//!
//! Reads commands line by line, feeds them to the wizard engine and
//! re-renders after every interaction. Submission validates the lead
//! first, then hands it to the configured [`LeadDelivery`]; a failed
//! delivery leaves the answers untouched so the visitor can retry.

use std::io::{BufRead, Write};

use async_trait::async_trait;
use calc_core::engine::{StepValidity, WizardEngine};
use calc_core::models::{FieldKey, Lead, LeadFieldError, PricingContext, StepInput, StepKind};
use calc_core::ports::{DeliveryFailure, LeadDelivery, RenderPort};
use tracing::{info, warn};

use crate::console::ConsolePresenter;

const SUCCESS_BANNER: &str =
    "Thank you! Your request has been sent successfully. We will contact you shortly.";
const FAILURE_BANNER: &str = "An error occurred while sending. Please try again later or call us.";

/// What happened when the visitor submitted the contact form.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Every recipient acknowledged; the answers were reset.
    Delivered,
    /// The lead failed name or phone validation; nothing was sent.
    Rejected(LeadFieldError),
    /// Submit was requested before the terminal step.
    NotReady,
    /// Delivery failed; the answers are intact for a retry.
    Failed(DeliveryFailure),
}

/// Delivery stand-in for `--dry-run`: logs the lead instead of sending it.
pub struct DryRunDelivery;

#[async_trait]
impl LeadDelivery for DryRunDelivery {
    async fn submit_lead(
        &self,
        lead: &Lead,
        _context: Option<&PricingContext>,
    ) -> Result<(), DeliveryFailure> {
        info!(name = %lead.name, phone = %lead.phone, "dry run, lead not sent");
        Ok(())
    }
}

/// One visitor's calculator run, from intro to submission or quit.
pub struct Session<W: Write, D: LeadDelivery> {
    engine: WizardEngine,
    presenter: ConsolePresenter<W>,
    delivery: D,
}

impl<W: Write, D: LeadDelivery> Session<W, D> {
    pub fn new(engine: WizardEngine, presenter: ConsolePresenter<W>, delivery: D) -> Self {
        Self {
            engine,
            presenter,
            delivery,
        }
    }

    /// Drives the wizard until the input ends, the visitor quits, or a
    /// submission is delivered.
    pub async fn run(&mut self, input: impl BufRead) -> std::io::Result<()> {
        self.engine.render(&mut self.presenter);

        for line in input.lines() {
            let line = line?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }

            match command.to_ascii_lowercase().as_str() {
                "quit" | "q" => break,
                "start" => {
                    self.engine.start();
                    self.engine.render(&mut self.presenter);
                }
                "next" | "n" => {
                    self.advance();
                }
                "prev" | "p" | "back" => {
                    self.engine.go_prev();
                    self.engine.render(&mut self.presenter);
                }
                "submit" => {
                    if matches!(self.submit().await, SubmitOutcome::Delivered) {
                        break;
                    }
                }
                _ => {
                    self.answer(command);
                }
            }
        }

        Ok(())
    }

    fn advance(&mut self) {
        let transition = self.engine.go_next();
        if let Some(validity) = transition.blocked {
            self.flag(validity);
        }
        self.engine.render(&mut self.presenter);
    }

    fn flag(&mut self, validity: StepValidity) {
        if let (Some(field), Some(message)) = (validity.offending_field(), validity.message()) {
            self.presenter.mark_field_invalid(field, message);
            self.presenter.focus_field(field);
        }
    }

    /// Interprets free-form input against the active step's controls.
    fn answer(&mut self, command: &str) {
        let step = self.engine.current_step().clone();
        match step.kind {
            StepKind::SingleChoice => {
                for input in &step.inputs {
                    let StepInput::Choice { field, options } = input else {
                        continue;
                    };
                    let picked = command
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| options.get(n.wrapping_sub(1)))
                        .or_else(|| options.iter().find(|o| o.value == command));
                    if let Some(option) = picked {
                        let value = option.value.clone();
                        let field = *field;
                        self.engine.set_choice(field, &value);
                        self.presenter.clear_field_error(field);
                        self.engine.render(&mut self.presenter);
                        return;
                    }
                }
                self.presenter.notify_error("Pick one of the listed options");
            }
            StepKind::Range => {
                let Some(field) = step.inputs.first().map(StepInput::field) else {
                    return;
                };
                match command.parse::<u32>() {
                    Ok(value) => {
                        // echo the clamped value, not the raw one
                        let stored = self.engine.set_range(field, value);
                        info!(%field, value = stored, "range updated");
                        self.engine.render(&mut self.presenter);
                    }
                    Err(_) => self.presenter.notify_error("Enter a whole number"),
                }
            }
            StepKind::ContactCapture => {
                let (name, rest) = match command.split_once(char::is_whitespace) {
                    Some((name, rest)) => (name, rest.trim()),
                    None => (command, ""),
                };
                let field = step
                    .inputs
                    .iter()
                    .map(StepInput::field)
                    .find(|f| f.as_str() == name.to_ascii_lowercase());
                match field {
                    Some(field) => {
                        self.engine.set_text(field, rest);
                        self.presenter.clear_field_error(field);
                        self.engine.render(&mut self.presenter);
                    }
                    None => self
                        .presenter
                        .notify_error("Unknown field; use name, phone, telegram or instagram"),
                }
            }
            StepKind::Intro | StepKind::ResultsDisplay => {
                self.presenter.notify_error("Unrecognized command");
            }
        }
    }

    /// Validates the lead and hands it to the delivery collaborator.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.engine.view().controls.submit_visible {
            self.presenter
                .notify_error("Complete the remaining steps first");
            return SubmitOutcome::NotReady;
        }

        let lead = self.engine.lead();
        if let Err(err) = lead.validate() {
            self.presenter.notify_error(err.notification());
            self.presenter.mark_field_invalid(err.field(), &err.to_string());
            self.presenter.focus_field(err.field());
            return SubmitOutcome::Rejected(err);
        }

        let context = self.engine.pricing_context();
        match self.delivery.submit_lead(&lead, context.as_ref()).await {
            Ok(()) => {
                self.presenter.notify_success(SUCCESS_BANNER);
                self.engine.reset_answers();
                SubmitOutcome::Delivered
            }
            Err(err) => {
                warn!(error = %err, "lead delivery failed");
                self.presenter.notify_error(FAILURE_BANNER);
                SubmitOutcome::Failed(err)
            }
        }
    }

    pub fn engine(&self) -> &WizardEngine {
        &self.engine
    }

    pub fn into_presenter(self) -> ConsolePresenter<W> {
        self.presenter
    }
}
