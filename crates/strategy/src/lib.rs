pub mod basket;
pub mod config;
pub mod indicators;
pub mod signal;

pub use basket::partition;
pub use config::{ConfigError, LeverageProfile, MomentumConfig};
pub use signal::SignalComputer;
