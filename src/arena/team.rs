use tracing::{debug, info};

use crate::arena::{
    action::Action,
    agent::{AgentConfig, AgentGenerator, ConfigAgentGenerator},
    errors::{AgentInitError, TeamError},
    game_state::{self, AgentId, GameState, NUM_AGENTS},
    Agent,
};

/// The two agents playing for one side.
pub struct Team<G: GameState> {
    is_red: bool,
    agents: [Box<dyn Agent<G>>; 2],
}

impl<G: GameState> Team<G> {
    pub fn is_red(&self) -> bool {
        self.is_red
    }

    /// The agent indices of both members, in construction order.
    pub fn indices(&self) -> [AgentId; 2] {
        [self.agents[0].index(), self.agents[1].index()]
    }

    pub fn agents(&self) -> &[Box<dyn Agent<G>>; 2] {
        &self.agents
    }

    pub fn agent_mut(&mut self, index: AgentId) -> Option<&mut Box<dyn Agent<G>>> {
        self.agents.iter_mut().find(|agent| agent.index() == index)
    }

    /// Hand the starting state to both members. Any failure means the team
    /// cannot play.
    pub fn register_initial_state(&mut self, game_state: &G) -> Result<(), AgentInitError> {
        for agent in self.agents.iter_mut() {
            agent.register_initial_state(game_state)?;
        }
        Ok(())
    }

    /// Ask the member controlling `index` for its action.
    pub fn choose_action(&mut self, index: AgentId, game_state: &G) -> Result<Action, TeamError> {
        let agent = self
            .agent_mut(index)
            .ok_or(TeamError::NotOnTeam(index))?;
        Ok(agent.choose_action(game_state))
    }
}

fn check_indices(first: AgentId, second: AgentId, is_red: bool) -> Result<(), TeamError> {
    for index in [first, second] {
        if index >= NUM_AGENTS {
            return Err(TeamError::InvalidIndex(index));
        }
        if game_state::is_red(index) != is_red {
            return Err(TeamError::WrongSide { index, is_red });
        }
    }
    if first == second {
        return Err(TeamError::DuplicateIndex(first));
    }
    Ok(())
}

/// Build a team from two agent generators.
pub fn create_team_with<G: GameState>(
    first_index: AgentId,
    second_index: AgentId,
    is_red: bool,
    first: &dyn AgentGenerator<G>,
    second: &dyn AgentGenerator<G>,
) -> Result<Team<G>, TeamError> {
    check_indices(first_index, second_index, is_red)?;
    let agents = [first.generate(first_index), second.generate(second_index)];
    info!(
        is_red,
        first = agents[0].name(),
        second = agents[1].name(),
        "created team"
    );
    Ok(Team { is_red, agents })
}

/// Build a team from two configurations. Use [`AgentConfig::default`] for
/// the usual improved agents.
pub fn create_team<G: GameState + 'static>(
    first_index: AgentId,
    second_index: AgentId,
    is_red: bool,
    first: AgentConfig,
    second: AgentConfig,
) -> Result<Team<G>, TeamError> {
    let first = ConfigAgentGenerator::new(first)?;
    let second = ConfigAgentGenerator::new(second)?;
    create_team_with(first_index, second_index, is_red, &first, &second)
}

/// Build a team from selector names or inline JSON, failing on anything
/// that is not a known agent.
pub fn create_team_from_names<G: GameState + 'static>(
    first_index: AgentId,
    second_index: AgentId,
    is_red: bool,
    first: &str,
    second: &str,
) -> Result<Team<G>, TeamError> {
    debug!(first, second, "resolving agent selectors");
    create_team(
        first_index,
        second_index,
        is_red,
        AgentConfig::parse_selector(first)?,
        AgentConfig::parse_selector(second)?,
    )
}
