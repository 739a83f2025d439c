use rsopal_core::BlockEnum;
use rsopal_store::Transaction;

/// The election container is told about every block that is about to have
/// its confirmation height raised, so it can finalize the matching election
/// and fire observers. Fire-and-forget from the caller's point of view.
pub trait ActiveElections: Send + Sync {
    fn confirm_block(&self, txn: &dyn Transaction, block: &BlockEnum);
}

pub struct NullActiveElections {}

impl NullActiveElections {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for NullActiveElections {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveElections for NullActiveElections {
    fn confirm_block(&self, _txn: &dyn Transaction, _block: &BlockEnum) {}
}
