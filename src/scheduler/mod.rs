//! Run orchestration.
//!
//! - [`GaConfig`]: all run parameters, with presets and validation
//! - [`Scheduler`]: the generation loop and its lifecycle
//! - [`GaResult`]: what a finished run reports

mod config;
mod runner;
mod state;
mod termination;

pub use config::GaConfig;
pub use runner::{GaResult, GenerationStats, Scheduler};
pub use state::{SchedulerState, StopReason};
