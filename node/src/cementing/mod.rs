mod confirmation_height_processor;
mod pending_confirmation_height;

pub use confirmation_height_processor::{
    ConfirmationHeightProcessor, ConfirmationHeightProcessorConfig,
};
pub use pending_confirmation_height::PendingConfirmationHeight;

use rsopal_core::{Account, BlockHash};

/// A queued confirmation height write for one account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfHeightDetails {
    pub account: Account,
    /// Highest block being confirmed for the account by this entry
    pub hash: BlockHash,
    /// 1-based position of `hash` in the account chain
    pub height: u64,
    /// How many blocks this entry newly confirms, i.e. `height` minus the
    /// account's confirmation height at the time the entry was created
    pub num_blocks_confirmed: u64,
}

/// DFS frame: a receive block whose paired send chain still needs to be
/// explored.
#[derive(Clone, Debug)]
pub(crate) struct ReceiveSourcePair {
    pub receive_details: ConfHeightDetails,
    pub source_hash: BlockHash,
}

/// Per-account bounds for a single traversal. `confirmed_height` is the
/// height the account will be raised to; `iterated_height` is how far the
/// chain has already been scanned, which is what breaks cycles from self
/// and circular sends.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmedIteratedPair {
    pub confirmed_height: u64,
    pub iterated_height: u64,
}
