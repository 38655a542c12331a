//! Boundary traits the wizard engine talks through.
//!
//! The engine never touches a concrete UI or network client. Rendering
//! goes through [`RenderPort`], and finished leads are handed to a
//! [`LeadDelivery`] implementation, so any toolkit can present the wizard
//! and tests can use in-memory doubles for both.

use async_trait::async_trait;
use thiserror::Error;

use crate::engine::{Controls, StepCounter};
use crate::models::{FieldKey, Lead, PricingContext, Step};
use crate::pricing::PricingResult;

/// Rendering surface for the wizard.
///
/// Called by [`crate::engine::WizardEngine::render`] after every
/// transition and answer change, whether or not the step index moved.
pub trait RenderPort {
    /// Shows the given step as the active screen.
    fn set_active_step(&mut self, index: usize, step: &Step);

    /// Updates the progress indicator and the "step X of N" counter.
    fn set_progress(&mut self, percent: u32, counter: &StepCounter);

    /// Redraws the pricing preview; `None` means the preview is blank.
    fn set_pricing(&mut self, pricing: Option<&PricingResult>);

    /// Toggles prev/next/submit visibility and enablement.
    fn set_controls(&mut self, controls: &Controls);

    /// Marks a control with an inline error message.
    fn mark_field_invalid(&mut self, field: FieldKey, message: &str);

    /// Removes the inline error from a control, if present.
    fn clear_field_error(&mut self, field: FieldKey);

    /// Moves input focus to the first offending field after a blocked
    /// forward transition.
    fn focus_field(&mut self, field: FieldKey);
}

/// The external lead-submission collaborator reported failure.
///
/// Surfaced to the visitor as a dismissible retry-later notification; the
/// wizard's state is left unchanged so the submission can be retried
/// without re-entering anything.
#[derive(Debug, Error)]
pub enum DeliveryFailure {
    /// At least one configured recipient did not acknowledge the message.
    #[error("lead was not acknowledged by every recipient")]
    Unacknowledged,

    /// The transport failed before any acknowledgement could be read.
    #[error("lead delivery transport failed: {0}")]
    Transport(String),

    /// The delivery collaborator was misconfigured.
    #[error("lead delivery is misconfigured: {0}")]
    Configuration(String),
}

/// External delivery of captured leads.
///
/// `submit` succeeds only if every configured recipient acknowledged the
/// message. The pricing context travels with the lead as a human-readable
/// summary of what the visitor calculated.
#[async_trait]
pub trait LeadDelivery: Send + Sync {
    async fn submit_lead(
        &self,
        lead: &Lead,
        context: Option<&PricingContext>,
    ) -> Result<(), DeliveryFailure>;
}
