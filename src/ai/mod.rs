//! Game tree search for the agent's next action
pub mod eval;
pub mod generator;
pub mod graphviz;
pub mod node;
pub mod search;

// Re-export key types
pub use eval::{EvalWeights, Evaluator};
pub use generator::Generator;
pub use node::{Effect, Node, NodeRef};
pub use search::{is_terminal, Minimax, SearchStats};
