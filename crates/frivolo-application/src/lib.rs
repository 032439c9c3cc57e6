//! Application layer for Frivolo.
//!
//! Coordinates the domain and the injected stores: the profile wizard, the
//! flow between setup and calculator, the price animation and the saved
//! search list.

pub mod animation;
pub mod flow;
pub mod history;
pub mod wizard;

pub use animation::{AnimationFrame, PriceAnimator};
pub use flow::{FlowController, FlowState};
pub use history::{HistoryState, SearchHistory};
pub use wizard::{ProfileWizard, WizardOutcome, WizardStep};
