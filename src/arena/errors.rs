use thiserror::Error;

use crate::core::Position;

use super::action::Action;
use super::game_state::AgentId;

/// The engine refused to build a successor for a candidate action.
///
/// Agents treat this as a per candidate failure: the action is skipped and
/// the turn continues.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TransitionError {
    #[error("Action {action} is not legal for agent {id}")]
    IllegalAction { id: AgentId, action: Action },
    #[error("Agent {0} is not part of this game")]
    UnknownAgent(AgentId),
    #[error("Moving {action} from {from} runs into a wall")]
    Blocked { from: Position, action: Action },
    #[error("Agent {0} has no position to move from")]
    NoPosition(AgentId),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AgentInitError {
    #[error("Engine reported no starting position for agent {0}")]
    MissingStartPosition(AgentId),
    #[error("Agent {0} has already registered its initial state")]
    AlreadyRegistered(AgentId),
}

#[derive(Error, Debug)]
pub enum TeamError {
    #[error("Both team members were given index {0}")]
    DuplicateIndex(AgentId),
    #[error("Agent index {0} is outside the engine's numbering")]
    InvalidIndex(AgentId),
    #[error("Agent index {index} is on the wrong side for a team with is_red = {is_red}")]
    WrongSide { index: AgentId, is_red: bool },
    #[error("Agent index {0} is not a member of this team")]
    NotOnTeam(AgentId),
    #[error("Agent selection failed")]
    Config(#[from] super::agent::AgentConfigError),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum BoardError {
    #[error("Layout is empty")]
    EmptyLayout,
    #[error("Layout row {row} has width {actual}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Unknown layout character {ch:?} at {position}")]
    UnknownCell { ch: char, position: Position },
    #[error("Agent start {0} appears more than once")]
    DuplicateStart(AgentId),
    #[error("Layout needs agent starts 1 through {expected}, missing {missing}")]
    MissingStart { expected: usize, missing: usize },
    #[error("Layout is too large for the grid coordinates")]
    TooLarge,
}
