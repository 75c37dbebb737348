use crate::core::Position;

use super::action::Action;
use super::errors::TransitionError;

/// Index of one of the agents in a game. Engines number agents from zero,
/// alternating teams.
pub type AgentId = usize;

/// Number of agents in a standard game, two per team.
pub const NUM_AGENTS: usize = 4;

/// Whether `id` plays for the red team. Red always holds the even indices;
/// engines may not renumber the sides.
pub fn is_red(id: AgentId) -> bool {
    id % 2 == 0
}

/// The queries an agent may make of the engine's game state.
///
/// Implementations are snapshots. Nothing here mutates `self`; applying an
/// action yields a fresh value from [`GameState::generate_successor`].
pub trait GameState: Sized {
    /// Actions the engine will accept from `id` this turn, in the engine's
    /// enumeration order.
    fn legal_actions(&self, id: AgentId) -> Vec<Action>;

    /// The state after `id` plays `action`.
    fn generate_successor(&self, id: AgentId, action: Action) -> Result<Self, TransitionError>;

    /// Where `id` stands, or `None` when the position is not observable.
    fn agent_position(&self, id: AgentId) -> Option<Position>;

    /// Whether `id` is on offense (a pacman) and can be captured.
    fn is_pacman(&self, id: AgentId) -> bool;

    /// The engine's raw score.
    fn score(&self) -> f64;

    /// Food that `id`'s team may collect.
    fn food(&self, id: AgentId) -> Vec<Position>;

    /// Capsules that `id`'s team may collect.
    fn capsules(&self, id: AgentId) -> Vec<Position>;

    /// The agents on the other team.
    fn opponents(&self, id: AgentId) -> Vec<AgentId>;

    /// Shortest path length between two cells, respecting walls.
    fn maze_distance(&self, a: Position, b: Position) -> u32;
}
