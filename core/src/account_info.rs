use crate::{Account, Amount, BlockHash, Epoch};

/// Latest information about an account.
///
/// `confirmation_height` is the cementing watermark: every block at or below
/// it is final. It only ever moves up, and in this codebase only the
/// confirmation height processor moves it.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct AccountInfo {
    pub head: BlockHash,
    pub representative: Account,
    pub open_block: BlockHash,
    pub balance: Amount,
    /// Seconds since posix epoch
    pub modified: u64,
    pub block_count: u64,
    pub confirmation_height: u64,
    pub epoch: Epoch,
}
