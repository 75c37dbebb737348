use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};
use tracing::{error, instrument, trace, warn};

use crate::arena::{
    action::{Action, DecisionRecord, FallbackReason},
    game_state::{AgentId, GameState},
    historian::{Historian, NullHistorian},
};

use super::{Agent, AgentGenerator};

/// An agent that picks uniformly among the legal actions.
///
/// It never scores anything, so it makes a useful baseline and a check that
/// the engine and agents agree on legality.
pub struct RandomAgent {
    index: AgentId,
    name: String,
    rng: StdRng,
    historian: Box<dyn Historian>,
    turn: usize,
}

impl RandomAgent {
    pub fn new(index: AgentId) -> Self {
        Self::with_rng(index, StdRng::from_os_rng())
    }

    /// A reproducible agent.
    pub fn with_seed(index: AgentId, seed: u64) -> Self {
        Self::with_rng(index, StdRng::seed_from_u64(seed))
    }

    fn with_rng(index: AgentId, rng: StdRng) -> Self {
        Self {
            index,
            name: format!("RandomAgent-{index}"),
            rng,
            historian: Box::new(NullHistorian),
            turn: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_historian(mut self, historian: Box<dyn Historian>) -> Self {
        self.historian = historian;
        self
    }
}

impl<G: GameState> Agent<G> for RandomAgent {
    fn index(&self) -> AgentId {
        self.index
    }

    #[instrument(level = "trace", skip(self, game_state), fields(agent_name = %self.name))]
    fn choose_action(&mut self, game_state: &G) -> Action {
        let legal_actions = game_state.legal_actions(self.index);
        let mut record = DecisionRecord::new(self.index, self.turn, legal_actions);
        self.turn += 1;

        match record.legal_actions.choose(&mut self.rng) {
            Some(action) => record.chosen = *action,
            None => {
                // Engines always offer at least Stop, so this is their bug.
                error!(index = self.index, "engine offered no legal actions");
                record.fallback = Some(FallbackReason::NoLegalActions);
            }
        }

        trace!(action = %record.chosen, "RandomAgent decision");
        if let Err(error) = self.historian.record_decision(&record) {
            warn!(%error, "historian failed to record decision");
        }
        record.chosen
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Default `AgentGenerator` for `RandomAgent`.
///
/// With a seed, each generated agent is seeded with `seed + index` so that
/// teammates do not mirror each other.
#[derive(Debug, Clone, Default)]
pub struct RandomAgentGenerator {
    seed: Option<u64>,
}

impl RandomAgentGenerator {
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl<G: GameState + 'static> AgentGenerator<G> for RandomAgentGenerator {
    fn generate(&self, index: AgentId) -> Box<dyn Agent<G>> {
        match self.seed {
            Some(seed) => Box::new(RandomAgent::with_seed(
                index,
                seed.wrapping_add(index as u64),
            )),
            None => Box::new(RandomAgent::new(index)),
        }
    }
}
