/// Atlas document parsing into rule sets
pub mod atlas;
/// Command-line interface and run orchestration
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types and path context helpers
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Pre-placement parsing
pub mod prefill;
/// Progress bar display
pub mod progress;
/// Map document output and text rendering
pub mod snapshot;
