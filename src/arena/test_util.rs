//! Helpers for testing agents without a board.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use approx::assert_relative_eq;

use super::action::{Action, DecisionRecord};
use super::errors::TransitionError;
use super::game_state::{is_red, AgentId, GameState};
use crate::core::Position;

/// A hand built game state on an open grid with no walls.
///
/// Everything is set explicitly: which agents exist and where, who is a
/// pacman, the food and capsules the asking team may collect, and the legal
/// action list. Maze distance is the manhattan distance.
///
/// Successors default to moving the acting agent by the action's vector.
/// Individual actions can instead be scripted to produce a fixed state or to
/// fail.
#[derive(Debug, Clone, Default)]
pub struct ScriptedState {
    // `None` is a known agent whose position is hidden
    agents: BTreeMap<AgentId, Option<Position>>,
    pacman: BTreeSet<AgentId>,
    score: f64,
    food: Vec<Position>,
    capsules: Vec<Position>,
    legal_actions: Option<Vec<Action>>,
    successors: HashMap<Action, Result<ScriptedState, TransitionError>>,
}

impl ScriptedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, id: AgentId, position: Position) -> Self {
        self.agents.insert(id, Some(position));
        self
    }

    pub fn with_hidden_agent(mut self, id: AgentId) -> Self {
        self.agents.insert(id, None);
        self
    }

    pub fn with_pacman(mut self, id: AgentId) -> Self {
        self.pacman.insert(id);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_food(mut self, position: Position) -> Self {
        self.food.push(position);
        self
    }

    pub fn with_capsule(mut self, position: Position) -> Self {
        self.capsules.push(position);
        self
    }

    /// Override the legal actions. Without this every action is legal.
    pub fn with_legal_actions(mut self, actions: Vec<Action>) -> Self {
        self.legal_actions = Some(actions);
        self
    }

    pub fn with_successor(mut self, action: Action, successor: ScriptedState) -> Self {
        self.successors.insert(action, Ok(successor));
        self
    }

    pub fn with_failing_successor(mut self, action: Action, error: TransitionError) -> Self {
        self.successors.insert(action, Err(error));
        self
    }
}

impl GameState for ScriptedState {
    fn legal_actions(&self, _id: AgentId) -> Vec<Action> {
        self.legal_actions
            .clone()
            .unwrap_or_else(|| Action::ALL.to_vec())
    }

    fn generate_successor(&self, id: AgentId, action: Action) -> Result<Self, TransitionError> {
        if let Some(scripted) = self.successors.get(&action) {
            return scripted.clone();
        }
        let from = self
            .agents
            .get(&id)
            .copied()
            .ok_or(TransitionError::UnknownAgent(id))?
            .ok_or(TransitionError::NoPosition(id))?;
        let (dx, dy) = action.vector();
        let target = from
            .offset(dx, dy)
            .ok_or(TransitionError::Blocked { from, action })?;

        let mut next = self.clone();
        next.successors.clear();
        next.agents.insert(id, Some(target));
        Ok(next)
    }

    fn agent_position(&self, id: AgentId) -> Option<Position> {
        self.agents.get(&id).copied().flatten()
    }

    fn is_pacman(&self, id: AgentId) -> bool {
        self.pacman.contains(&id)
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn food(&self, _id: AgentId) -> Vec<Position> {
        self.food.clone()
    }

    fn capsules(&self, _id: AgentId) -> Vec<Position> {
        self.capsules.clone()
    }

    fn opponents(&self, id: AgentId) -> Vec<AgentId> {
        self.agents
            .keys()
            .copied()
            .filter(|other| is_red(*other) != is_red(id))
            .collect()
    }

    fn maze_distance(&self, a: Position, b: Position) -> u32 {
        a.manhattan(b)
    }
}

/// Check that a chosen action is one the engine offered, or the `Stop`
/// fallback.
pub fn assert_valid_choice<G: GameState>(game_state: &G, id: AgentId, action: Action) {
    let legal = game_state.legal_actions(id);
    assert!(
        legal.contains(&action) || action == Action::Stop,
        "agent {id} chose {action} which is not in {legal:?}"
    );
}

/// Check the internal consistency of a record written by an agent that
/// scores its candidates.
pub fn assert_valid_record(record: &DecisionRecord) {
    let attempted = record.candidates.len() + record.failures.len();
    assert!(attempted <= record.legal_actions.len());
    if !record.truncated {
        assert_eq!(attempted, record.legal_actions.len());
    }

    match record.fallback {
        Some(_) => {
            assert_eq!(record.chosen, Action::Stop);
            assert!(record.candidates.is_empty());
        }
        None => {
            let best = record
                .best_score()
                .expect("a decision without fallback must have scored something");
            let first_best = record
                .candidates
                .iter()
                .find(|candidate| candidate.score == best)
                .expect("best score comes from a candidate");
            assert_eq!(record.chosen, first_best.action);
            assert_relative_eq!(first_best.score, best);
        }
    }
}
