use super::{Historian, HistorianError};
use crate::arena::action::DecisionRecord;

/// A no-op historian that discards all recorded decisions.
///
/// Agents use it when nobody asked to watch them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHistorian;

impl Historian for NullHistorian {
    fn record_decision(&mut self, _record: &DecisionRecord) -> Result<(), HistorianError> {
        Ok(())
    }
}
