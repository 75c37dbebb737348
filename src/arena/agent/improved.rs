use tracing::{debug, instrument, warn};

use crate::arena::{
    action::{Action, DecisionRecord, FailedCandidate, FallbackReason, ScoredCandidate},
    errors::AgentInitError,
    game_state::{AgentId, GameState},
    historian::{Historian, NullHistorian},
};
use crate::core::Position;

use super::{Agent, AgentGenerator, Evaluator, TurnBudget};

/// An agent that plays each legal action one ply ahead and keeps the one
/// whose successor the [`Evaluator`] likes best.
///
/// Ties go to the action the engine listed first. Candidates whose successor
/// cannot be generated are skipped. When nothing can be scored the agent
/// answers [`Action::Stop`].
pub struct ImprovedAgent {
    index: AgentId,
    name: String,
    evaluator: Evaluator,
    budget: TurnBudget,
    historian: Box<dyn Historian>,
    start: Option<Position>,
    turn: usize,
}

impl ImprovedAgent {
    pub fn new(index: AgentId) -> Self {
        Self {
            index,
            name: format!("ImprovedAgent-{index}"),
            evaluator: Evaluator::new(index),
            budget: TurnBudget::unlimited(),
            historian: Box::new(NullHistorian),
            start: None,
            turn: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_budget(mut self, budget: TurnBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_historian(mut self, historian: Box<dyn Historian>) -> Self {
        self.historian = historian;
        self
    }

    /// Where this agent stood when the game began, once registered.
    pub fn start_position(&self) -> Option<Position> {
        self.start
    }

    fn finish(&mut self, record: DecisionRecord) -> Action {
        if let Err(error) = self.historian.record_decision(&record) {
            warn!(%error, "historian failed to record decision");
        }
        record.chosen
    }
}

impl<G: GameState> Agent<G> for ImprovedAgent {
    fn index(&self) -> AgentId {
        self.index
    }

    fn register_initial_state(&mut self, game_state: &G) -> Result<(), AgentInitError> {
        if self.start.is_some() {
            return Err(AgentInitError::AlreadyRegistered(self.index));
        }
        let start = game_state
            .agent_position(self.index)
            .ok_or(AgentInitError::MissingStartPosition(self.index))?;
        debug!(index = self.index, %start, "registered starting position");
        self.start = Some(start);
        Ok(())
    }

    #[instrument(level = "debug", skip(self, game_state), fields(agent_name = %self.name, turn = self.turn))]
    fn choose_action(&mut self, game_state: &G) -> Action {
        let legal_actions = game_state.legal_actions(self.index);
        debug!(?legal_actions, "legal actions");

        let mut record = DecisionRecord::new(self.index, self.turn, legal_actions.clone());
        self.turn += 1;

        if legal_actions.is_empty() {
            warn!(index = self.index, "no legal actions, returning Stop");
            record.fallback = Some(FallbackReason::NoLegalActions);
            return self.finish(record);
        }

        let mut tracker = self.budget.start();
        let mut best: Option<(Action, f64)> = None;

        for action in legal_actions {
            if tracker.exhausted() {
                warn!(%action, "turn budget exhausted, keeping best so far");
                record.truncated = true;
                break;
            }
            tracker.spend();

            let successor = match game_state.generate_successor(self.index, action) {
                Ok(successor) => successor,
                Err(error) => {
                    warn!(%action, %error, "skipping candidate");
                    record.failures.push(FailedCandidate::new(action, &error));
                    continue;
                }
            };

            let score = self.evaluator.evaluate(&successor, action);
            debug!(%action, score, "scored candidate");
            record.candidates.push(ScoredCandidate { action, score });

            // Strictly greater, the first action to reach a score keeps it.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((action, score));
            }
        }

        match best {
            Some((action, score)) => {
                debug!(%action, score, "chose action");
                record.chosen = action;
            }
            None => {
                let reason = if record.truncated {
                    FallbackReason::BudgetExhausted
                } else {
                    FallbackReason::NoValidCandidates
                };
                warn!(index = self.index, ?reason, "no candidate scored, returning Stop");
                record.fallback = Some(reason);
            }
        }

        self.finish(record)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Default `AgentGenerator` for `ImprovedAgent`.
#[derive(Debug, Clone, Default)]
pub struct ImprovedAgentGenerator {
    name: Option<String>,
    budget: TurnBudget,
}

impl ImprovedAgentGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_budget(mut self, budget: TurnBudget) -> Self {
        self.budget = budget;
        self
    }
}

impl<G: GameState + 'static> AgentGenerator<G> for ImprovedAgentGenerator {
    fn generate(&self, index: AgentId) -> Box<dyn Agent<G>> {
        let mut agent = ImprovedAgent::new(index).with_budget(self.budget);
        if let Some(name) = &self.name {
            agent = agent.with_name(name.clone());
        }
        Box::new(agent)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::arena::{
        board::BoardState,
        errors::TransitionError,
        historian::VecHistorian,
        test_util::{assert_valid_choice, assert_valid_record, ScriptedState},
    };

    fn at(x: u16, y: u16) -> Position {
        Position::new(x, y)
    }

    fn watched(index: AgentId) -> (ImprovedAgent, VecHistorian) {
        let historian = VecHistorian::new();
        let agent = ImprovedAgent::new(index).with_historian(Box::new(historian.clone()));
        (agent, historian)
    }

    #[test_log::test]
    fn test_moves_towards_food() {
        let state = ScriptedState::new()
            .with_agent(0, at(5, 5))
            .with_food(at(8, 5))
            .with_legal_actions(vec![Action::West, Action::Stop, Action::East]);
        let mut agent = ImprovedAgent::new(0);
        assert_eq!(agent.choose_action(&state), Action::East);
    }

    #[test_log::test]
    fn test_steps_away_from_defender() {
        let state = ScriptedState::new()
            .with_agent(0, at(5, 5))
            .with_pacman(0)
            .with_agent(1, at(3, 5))
            .with_legal_actions(vec![Action::West, Action::East]);
        let mut agent = ImprovedAgent::new(0);
        assert_eq!(agent.choose_action(&state), Action::East);
    }

    #[test]
    fn test_single_legal_action_is_returned() {
        let state = ScriptedState::new()
            .with_agent(0, at(5, 5))
            .with_agent(1, at(5, 6))
            .with_pacman(0)
            .with_legal_actions(vec![Action::South]);
        let mut agent = ImprovedAgent::new(0);
        assert_eq!(agent.choose_action(&state), Action::South);
    }

    #[test_log::test]
    fn test_no_legal_actions_returns_stop() {
        let state = ScriptedState::new()
            .with_agent(0, at(1, 1))
            .with_legal_actions(vec![]);
        let (mut agent, historian) = watched(0);

        assert_eq!(agent.choose_action(&state), Action::Stop);

        let records = historian.get_storage();
        let records = records.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fallback, Some(FallbackReason::NoLegalActions));
        assert_valid_record(&records[0]);
    }

    #[test_log::test]
    fn test_all_successors_failing_returns_stop() {
        let state = ScriptedState::new()
            .with_agent(0, at(1, 1))
            .with_legal_actions(vec![Action::North, Action::East])
            .with_failing_successor(
                Action::North,
                TransitionError::IllegalAction {
                    id: 0,
                    action: Action::North,
                },
            )
            .with_failing_successor(
                Action::East,
                TransitionError::IllegalAction {
                    id: 0,
                    action: Action::East,
                },
            );
        let (mut agent, historian) = watched(0);

        assert_eq!(agent.choose_action(&state), Action::Stop);

        let records = historian.get_storage();
        let record = &records.borrow()[0];
        assert_eq!(record.fallback, Some(FallbackReason::NoValidCandidates));
        assert_eq!(record.failures.len(), 2);
        assert_eq!(record.failures[0].action, Action::North);
        assert_valid_record(record);
    }

    #[test]
    fn test_failed_candidate_is_skipped_not_penalised() {
        // North would reach the food, but the engine refuses it.
        let state = ScriptedState::new()
            .with_agent(0, at(5, 5))
            .with_food(at(5, 4))
            .with_legal_actions(vec![Action::North, Action::South])
            .with_failing_successor(Action::North, TransitionError::UnknownAgent(0));
        let (mut agent, historian) = watched(0);

        assert_eq!(agent.choose_action(&state), Action::South);

        let records = historian.get_storage();
        let record = &records.borrow()[0];
        assert_eq!(record.candidates.len(), 1);
        assert_eq!(record.failures.len(), 1);
        assert_eq!(record.fallback, None);
        assert_valid_record(record);
    }

    #[test]
    fn test_ties_go_to_first_enumerated() {
        let same = ScriptedState::new().with_agent(0, at(2, 2)).with_score(1.0);
        let state = |order: Vec<Action>| {
            ScriptedState::new()
                .with_agent(0, at(2, 2))
                .with_legal_actions(order)
                .with_successor(Action::East, same.clone())
                .with_successor(Action::West, same.clone())
        };

        let mut agent = ImprovedAgent::new(0);
        assert_eq!(
            agent.choose_action(&state(vec![Action::East, Action::West])),
            Action::East
        );
        assert_eq!(
            agent.choose_action(&state(vec![Action::West, Action::East])),
            Action::West
        );
    }

    #[test]
    fn test_higher_base_score_wins() {
        let state = ScriptedState::new()
            .with_agent(0, at(2, 2))
            .with_legal_actions(vec![Action::Stop, Action::North])
            .with_successor(Action::Stop, ScriptedState::new().with_score(1.0))
            .with_successor(Action::North, ScriptedState::new().with_score(4.0));
        let mut agent = ImprovedAgent::new(0);
        assert_eq!(agent.choose_action(&state), Action::North);
    }

    #[test]
    fn test_register_initial_state_is_write_once() {
        let state = ScriptedState::new().with_agent(0, at(3, 4));
        let mut agent = ImprovedAgent::new(0);

        Agent::<ScriptedState>::register_initial_state(&mut agent, &state).unwrap();
        assert_eq!(agent.start_position(), Some(at(3, 4)));

        let moved = ScriptedState::new().with_agent(0, at(9, 9));
        assert_eq!(
            agent.register_initial_state(&moved),
            Err(AgentInitError::AlreadyRegistered(0))
        );
        assert_eq!(agent.start_position(), Some(at(3, 4)));
    }

    #[test]
    fn test_register_without_position_fails() {
        let state = ScriptedState::new().with_hidden_agent(2);
        let mut agent = ImprovedAgent::new(2);
        assert_eq!(
            agent.register_initial_state(&state),
            Err(AgentInitError::MissingStartPosition(2))
        );
        assert_eq!(agent.start_position(), None);
    }

    #[test]
    fn test_zero_budget_returns_stop() {
        let state = ScriptedState::new()
            .with_agent(0, at(2, 2))
            .with_food(at(2, 3));
        let historian = VecHistorian::new();
        let mut agent = ImprovedAgent::new(0)
            .with_budget(TurnBudget::unlimited().with_max_candidates(0))
            .with_historian(Box::new(historian.clone()));

        assert_eq!(agent.choose_action(&state), Action::Stop);

        let records = historian.get_storage();
        let record = &records.borrow()[0];
        assert!(record.truncated);
        assert_eq!(record.fallback, Some(FallbackReason::BudgetExhausted));
        assert_valid_record(record);
    }

    #[test]
    fn test_budget_keeps_best_so_far() {
        // South reaches the food but is enumerated after the cap.
        let state = ScriptedState::new()
            .with_agent(0, at(2, 2))
            .with_food(at(2, 3))
            .with_legal_actions(vec![Action::West, Action::North, Action::South]);
        let mut agent =
            ImprovedAgent::new(0).with_budget(TurnBudget::unlimited().with_max_candidates(2));
        let action = agent.choose_action(&state);
        assert_ne!(action, Action::South);
        assert_ne!(action, Action::Stop);

        let mut unlimited = ImprovedAgent::new(0);
        assert_eq!(unlimited.choose_action(&state), Action::South);
    }

    #[test]
    fn test_single_candidate_budget() {
        // South reaches the food, but only North fits in the budget.
        let state = ScriptedState::new()
            .with_agent(0, at(2, 2))
            .with_food(at(2, 3))
            .with_legal_actions(vec![Action::North, Action::South]);
        let historian = VecHistorian::new();
        let mut agent = ImprovedAgent::new(0)
            .with_budget(TurnBudget::unlimited().with_max_candidates(1))
            .with_historian(Box::new(historian.clone()));

        assert_eq!(agent.choose_action(&state), Action::North);

        let records = historian.get_storage();
        let record = &records.borrow()[0];
        assert!(record.truncated);
        assert_eq!(record.fallback, None);
        assert_eq!(record.candidates.len(), 1);
        assert_valid_record(record);
    }

    #[test]
    fn test_zero_time_limit_returns_stop() {
        let state = ScriptedState::new()
            .with_agent(0, at(2, 2))
            .with_food(at(2, 3));
        let historian = VecHistorian::new();
        let mut agent = ImprovedAgent::new(0)
            .with_budget(TurnBudget::unlimited().with_time_limit(Duration::ZERO))
            .with_historian(Box::new(historian.clone()));

        assert_eq!(agent.choose_action(&state), Action::Stop);

        let records = historian.get_storage();
        let record = &records.borrow()[0];
        assert!(record.truncated);
        assert!(record.candidates.is_empty());
        assert_eq!(record.fallback, Some(FallbackReason::BudgetExhausted));
        assert_valid_record(record);
    }

    #[test_log::test]
    fn test_records_one_decision_per_turn() {
        let layout = "\
%%%%%%%%%%
%1.  o .2%
%3 o    4%
%%%%%%%%%%";
        let mut state = BoardState::from_layout_str(layout).unwrap();
        let (mut agent, historian) = watched(0);
        agent.register_initial_state(&state).unwrap();

        for _ in 0..5 {
            let action = agent.choose_action(&state);
            assert_valid_choice(&state, 0, action);
            state = state.generate_successor(0, action).unwrap();
        }

        let records = historian.get_storage();
        let records = records.borrow();
        assert_eq!(records.len(), 5);
        for (turn, record) in records.iter().enumerate() {
            assert_eq!(record.turn, turn);
            assert_eq!(record.agent_id, 0);
            assert_valid_record(record);
        }
        assert_eq!(Agent::<BoardState>::index(&agent), 0);
    }

    #[test]
    fn test_generator_names_and_budget() {
        let generator = ImprovedAgentGenerator::new().with_name("Chaser");
        let agent: Box<dyn Agent<ScriptedState>> = generator.generate(3);
        assert_eq!(agent.name(), "Chaser");
        assert_eq!(agent.index(), 3);

        let agent: Box<dyn Agent<ScriptedState>> = ImprovedAgentGenerator::new().generate(1);
        assert_eq!(agent.name(), "ImprovedAgent-1");
    }
}
