pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod output;
pub mod signal_processing;
pub mod tracking;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::{FilterOptions, SgConfig};
pub use error::{Result, SgError};
pub use signal_processing::{SavitzkyGolayFilter, Vec3};
