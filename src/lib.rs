//! Duelist - minimax decision engine for two-player turn-based battles

pub mod ai;
pub mod core;
pub mod engine;
pub mod protocol;
pub mod utils;

// Re-export commonly used items
pub use engine::Engine;
