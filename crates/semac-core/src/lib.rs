pub mod error;
pub mod state;
pub mod table;
mod loader;
pub mod payoff;
pub mod uniform;
pub mod steppers;
pub mod model;

pub use error::CoreError;
pub use state::{BatchState, DurationType, StateId};
pub use table::{TransitionRecord, TransitionTable};

pub use payoff::Payoff;

pub use uniform::{UniformMatrix, UniformSource};

// Steppers
pub use steppers::{ExactStepper, LutStepper, LutTable, Stepper, MAX_DURATION_TYPES};

// Model facade
pub use model::{Model, Origin};
