//! Greedy decision agents for grid based capture the flag games.
//!
//! The game engine is an outside collaborator. It is reached only through the
//! [`arena::GameState`] trait: legal actions, successor generation, positions,
//! postures, food, capsules and maze distances. Agents consume those queries
//! one turn at a time and answer with an [`arena::action::Action`].
//!
//! Two agents are provided:
//!
//! - [`arena::agent::RandomAgent`] picks a legal action uniformly at random.
//!   It is a baseline and a legality sanity check.
//! - [`arena::agent::ImprovedAgent`] simulates every legal action one ply
//!   ahead and scores each successor with a weighted feature
//!   [`arena::agent::Evaluator`].
//!
//! Teams are assembled with [`arena::create_team`] from the closed
//! [`arena::agent::AgentConfig`] registry. Every decision can be observed
//! through an injectable [`arena::historian::Historian`].
//!
//! ```
//! use capture_agents::arena::{agent::AgentConfig, board::BoardState, create_team, GameState};
//!
//! let layout = "\
//! %%%%%%%%%%
//! %1.  o  2%
//! %3  o  .4%
//! %%%%%%%%%%";
//! let state = BoardState::from_layout_str(layout).unwrap();
//! let mut team = create_team(0, 2, true, AgentConfig::default(), AgentConfig::default()).unwrap();
//! team.register_initial_state(&state).unwrap();
//!
//! let action = team.choose_action(0, &state).unwrap();
//! assert!(state.legal_actions(0).contains(&action));
//! ```

/// Grid primitives shared by agents and boards.
pub mod core;

/// Agents, the engine seam, historians and the reference board.
pub mod arena;
