/// Entropy and weighted sampling helpers
pub mod probability;
