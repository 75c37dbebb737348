use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::{Historian, HistorianError};
use crate::arena::action::{Action, DecisionRecord, FallbackReason};
use crate::arena::game_state::AgentId;

/// Running counts of the decisions made by one agent.
///
/// # Fields
///
/// * `decisions` - Number of turns recorded
/// * `action_counts` - How often each action was chosen
/// * `candidate_failures` - Successor generations the engine refused
/// * `fallbacks` - Turns answered with `Stop` for each fallback reason
/// * `truncated_turns` - Turns cut short by the turn budget
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionStats {
    pub decisions: usize,
    pub action_counts: HashMap<Action, usize>,
    pub candidate_failures: usize,
    pub fallbacks: HashMap<FallbackReason, usize>,
    pub truncated_turns: usize,
    // Sum of the best score of every turn that scored something
    best_score_total: f64,
    scored_turns: usize,
}

impl DecisionStats {
    fn record(&mut self, record: &DecisionRecord) {
        self.decisions += 1;
        *self.action_counts.entry(record.chosen).or_insert(0) += 1;
        self.candidate_failures += record.failures.len();
        if let Some(reason) = record.fallback {
            *self.fallbacks.entry(reason).or_insert(0) += 1;
        }
        if record.truncated {
            self.truncated_turns += 1;
        }
        if let Some(best) = record.best_score() {
            self.best_score_total += best;
            self.scored_turns += 1;
        }
    }

    /// Mean of each turn's best candidate score, `None` before any turn
    /// produced a score.
    pub fn mean_best_score(&self) -> Option<f64> {
        if self.scored_turns == 0 {
            None
        } else {
            Some(self.best_score_total / self.scored_turns as f64)
        }
    }

    /// Fraction of turns that fell back to `Stop`.
    pub fn fallback_rate(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.fallbacks.values().sum::<usize>() as f64 / self.decisions as f64
        }
    }
}

/// Aggregates [`DecisionStats`] per agent.
///
/// Like [`VecHistorian`](super::VecHistorian) the storage is shared between
/// clones, so one historian can watch a whole team.
#[derive(Debug, Clone, Default)]
pub struct StatsHistorian {
    storage: Rc<RefCell<HashMap<AgentId, DecisionStats>>>,
}

impl StatsHistorian {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_storage(&self) -> Rc<RefCell<HashMap<AgentId, DecisionStats>>> {
        self.storage.clone()
    }
}

impl Historian for StatsHistorian {
    fn record_decision(&mut self, record: &DecisionRecord) -> Result<(), HistorianError> {
        self.storage
            .try_borrow_mut()
            .map_err(|_| HistorianError::StorageBusy)?
            .entry(record.agent_id)
            .or_default()
            .record(record);
        Ok(())
    }
}
