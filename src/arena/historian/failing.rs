use tracing::warn;

use super::{Historian, HistorianError};
use crate::arena::action::DecisionRecord;

/// A historian that will always fail to record a decision
/// and will return an error.
///
/// This historian is useful for testing that agents keep deciding
/// when their observers break.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingHistorian;

impl Historian for FailingHistorian {
    fn record_decision(&mut self, _record: &DecisionRecord) -> Result<(), HistorianError> {
        warn!("FailingHistorian intentionally returning error");
        Err(HistorianError::UnableToRecordDecision)
    }
}
