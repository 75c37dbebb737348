//! Historians observe the decisions agents make.
//!
//! An agent hands every turn's [`DecisionRecord`] to its historian. Recording
//! is purely observational: a historian that fails never changes the action
//! the agent returns.
mod failing;
mod null;
mod stats;
mod vec;

use thiserror::Error;

use crate::arena::{action::DecisionRecord, game_state::AgentId};

pub use failing::FailingHistorian;
pub use null::NullHistorian;
pub use stats::{DecisionStats, StatsHistorian};
pub use vec::VecHistorian;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HistorianError {
    #[error("Unable to record decision")]
    UnableToRecordDecision,
    #[error("Historian storage is already borrowed")]
    StorageBusy,
}

/// A sink for per turn decision records.
pub trait Historian {
    fn record_decision(&mut self, record: &DecisionRecord) -> Result<(), HistorianError>;
}

/// Builds a historian for each agent a generator creates.
pub trait HistorianGenerator {
    fn generate(&self, id: AgentId) -> Box<dyn Historian>;
}

/// Hands out clones of one historian.
///
/// Historians whose clones share storage (like [`VecHistorian`]) end up
/// collecting the records of every agent built from this generator.
#[derive(Debug, Clone)]
pub struct CloneHistorianGenerator<H> {
    historian: H,
}

impl<H: Historian + Clone + 'static> CloneHistorianGenerator<H> {
    pub fn new(historian: H) -> Self {
        Self { historian }
    }
}

impl<H: Historian + Clone + 'static> HistorianGenerator for CloneHistorianGenerator<H> {
    fn generate(&self, _id: AgentId) -> Box<dyn Historian> {
        Box::new(self.historian.clone())
    }
}
