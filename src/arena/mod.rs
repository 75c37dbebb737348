//! The arena is where agents meet the game.
//!
//! The engine itself lives outside this crate; [`GameState`] describes the
//! queries an agent is allowed to make of it. [`board`] is a compact
//! implementation of that trait used by tests, benchmarks, fuzzing and the
//! demos.
pub mod action;
pub mod agent;
pub mod board;
pub mod errors;
pub mod game_state;
pub mod historian;
pub mod team;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use action::{Action, DecisionRecord};
pub use agent::{Agent, AgentGenerator};
pub use game_state::{is_red, AgentId, GameState, NUM_AGENTS};
pub use historian::{Historian, HistorianError};
pub use team::{create_team, create_team_from_names, create_team_with, Team};
