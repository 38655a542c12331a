pub mod engine;
pub mod models;
pub mod ports;
pub mod pricing;
pub mod validation;

pub use engine::{Controls, EngineError, StepCounter, StepValidity, Transition, WizardEngine, WizardView};
pub use models::*;
pub use ports::{DeliveryFailure, LeadDelivery, RenderPort};
pub use pricing::{PricingConfig, PricingError, PricingResult, PricingTable};
