//! Turn state machine and orchestration loop.

mod state;
mod turn;

pub use state::TurnState;
pub use turn::{Orchestrator, Turn, TurnError};
