pub mod cli;
pub mod emitter;
pub mod manifest;

pub use cli::*;
pub use emitter::{format_amount, write_cashflows};
pub use manifest::RunManifest;
