use std::{cell::RefCell, rc::Rc};

use super::{Historian, HistorianError};
use crate::arena::action::DecisionRecord;

/// Keeps every decision record in memory.
///
/// Clones share the same storage, so a test can hold on to
/// [`VecHistorian::get_storage`] after handing the historian to an agent.
#[derive(Debug, Clone, Default)]
pub struct VecHistorian {
    records: Rc<RefCell<Vec<DecisionRecord>>>,
}

impl VecHistorian {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_storage(&self) -> Rc<RefCell<Vec<DecisionRecord>>> {
        self.records.clone()
    }
}

impl Historian for VecHistorian {
    fn record_decision(&mut self, record: &DecisionRecord) -> Result<(), HistorianError> {
        self.records
            .try_borrow_mut()
            .map_err(|_| HistorianError::StorageBusy)?
            .push(record.clone());
        Ok(())
    }
}
