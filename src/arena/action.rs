use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::errors::TransitionError;
use super::game_state::AgentId;

/// Represents an action that an agent can take on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Action {
    North,
    South,
    East,
    West,
    /// Stay in place. Always legal in a well formed game, and the answer an
    /// agent falls back to when nothing else can be chosen.
    Stop,
}

impl Action {
    /// Every action in the order engines usually enumerate them.
    pub const ALL: [Action; 5] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stop,
    ];

    /// The grid offset `(dx, dy)` of this action. North is towards row zero.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Action::North => (0, -1),
            Action::South => (0, 1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
            Action::Stop => (0, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::North => "North",
            Action::South => "South",
            Action::East => "East",
            Action::West => "West",
            Action::Stop => "Stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("Unknown action name: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

/// One candidate that produced a score during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub action: Action,
    pub score: f64,
}

/// One candidate whose successor the engine refused to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedCandidate {
    pub action: Action,
    pub reason: String,
}

impl FailedCandidate {
    pub fn new(action: Action, error: &TransitionError) -> Self {
        Self {
            action,
            reason: error.to_string(),
        }
    }
}

/// Why an agent answered with [`Action::Stop`] instead of a scored action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallbackReason {
    /// The engine offered no legal actions.
    NoLegalActions,
    /// Every successor generation failed.
    NoValidCandidates,
    /// The turn budget ran out before any candidate was scored.
    BudgetExhausted,
}

/// Everything an agent did on a single turn.
///
/// Records are handed to a [`Historian`](crate::arena::Historian) so callers
/// can inspect decisions without parsing log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub agent_id: AgentId,
    /// Zero based count of `choose_action` calls made on this agent.
    pub turn: usize,
    pub legal_actions: Vec<Action>,
    pub candidates: Vec<ScoredCandidate>,
    pub failures: Vec<FailedCandidate>,
    pub chosen: Action,
    pub fallback: Option<FallbackReason>,
    /// Set when the turn budget cut the candidate loop short.
    pub truncated: bool,
}

impl DecisionRecord {
    pub fn new(agent_id: AgentId, turn: usize, legal_actions: Vec<Action>) -> Self {
        Self {
            agent_id,
            turn,
            legal_actions,
            candidates: Vec::new(),
            failures: Vec::new(),
            chosen: Action::Stop,
            fallback: None,
            truncated: false,
        }
    }

    /// The best score seen this turn, if anything was scored.
    pub fn best_score(&self) -> Option<f64> {
        self.candidates
            .iter()
            .map(|c| c.score)
            .reduce(f64::max)
    }
}
