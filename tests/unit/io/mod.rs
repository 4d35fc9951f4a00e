pub mod configuration;
pub mod progress;
pub mod snapshot;
