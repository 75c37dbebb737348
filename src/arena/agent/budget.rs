use std::time::{Duration, Instant};

/// Limits how much work an agent may do in one turn.
///
/// The candidate loop checks the budget before each candidate. Once the
/// budget is spent the agent answers with the best candidate scored so far,
/// or `Stop` when nothing has been scored yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnBudget {
    max_candidates: Option<usize>,
    time_limit: Option<Duration>,
}

impl TurnBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Consider at most `max` candidates, counting ones whose successor
    /// could not be generated.
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = Some(max);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn max_candidates(&self) -> Option<usize> {
        self.max_candidates
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub(crate) fn start(&self) -> BudgetTracker {
        BudgetTracker {
            budget: *self,
            started: Instant::now(),
            attempted: 0,
        }
    }
}

/// A budget being spent during one turn.
#[derive(Debug)]
pub(crate) struct BudgetTracker {
    budget: TurnBudget,
    started: Instant,
    attempted: usize,
}

impl BudgetTracker {
    pub(crate) fn exhausted(&self) -> bool {
        let over_count = self
            .budget
            .max_candidates
            .is_some_and(|max| self.attempted >= max);
        let over_time = self
            .budget
            .time_limit
            .is_some_and(|limit| self.started.elapsed() >= limit);
        over_count || over_time
    }

    pub(crate) fn spend(&mut self) {
        self.attempted += 1;
    }
}
