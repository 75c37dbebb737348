//! `Agent`s are the automatic players in a capture game. Each one controls
//! a single agent index and answers with one action per turn.
//!
//! Two variants are provided. [`RandomAgent`] is a baseline that never does
//! anything illegal. [`ImprovedAgent`] looks one ply ahead and scores every
//! successor with the [`Evaluator`].
mod budget;
mod config;
mod evaluator;
mod generator;
mod improved;
mod random;

use crate::arena::{
    action::Action,
    errors::AgentInitError,
    game_state::{AgentId, GameState},
};

/// This is the trait that you need to implement in order to implement
/// different strategies. It's up to you to implement the logic and state.
///
/// The engine calls [`Agent::register_initial_state`] once before the first
/// turn and then [`Agent::choose_action`] once per turn, blocking until an
/// action comes back.
pub trait Agent<G: GameState> {
    /// The agent index this agent plays for. Fixed at construction.
    fn index(&self) -> AgentId;

    /// Called once with the game's starting state.
    fn register_initial_state(&mut self, _game_state: &G) -> Result<(), AgentInitError> {
        Ok(())
    }

    /// This is the method that will be called by the game to get the action
    fn choose_action(&mut self, game_state: &G) -> Action;

    /// Returns the name of this agent for logging and identification.
    fn name(&self) -> &str;
}

pub use budget::TurnBudget;
pub use config::{AgentConfig, AgentConfigError, ConfigAgentGenerator};
pub use evaluator::{
    Evaluator, FeatureBreakdown, CAPSULE_WEIGHT, ENEMY_THRESHOLD, ENEMY_WEIGHT, FOOD_WEIGHT,
    INVADER_WEIGHT,
};
pub use generator::AgentGenerator;
pub use improved::{ImprovedAgent, ImprovedAgentGenerator};
pub use random::{RandomAgent, RandomAgentGenerator};
