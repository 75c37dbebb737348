use crate::arena::{Agent, AgentId, GameState};

/// AgentGenerator is a trait that is used to build agents for a game
/// where each team needs fresh agents.
pub trait AgentGenerator<G: GameState> {
    /// This method is called before each game to build a new agent.
    /// The `index` parameter is the agent index the new agent will control.
    fn generate(&self, index: AgentId) -> Box<dyn Agent<G>>;
}
