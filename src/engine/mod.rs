pub mod driver;
mod engine;
mod options;
mod search;

pub use driver::{decide, Decision, DriverConfig, FallbackPolicy, TurnMemory};
pub use engine::Engine;
pub use options::EngineOptions;
pub use search::{timed_decide, SearchOptions};
