#[macro_use]
extern crate num_derive;

mod ledger;
pub use ledger::{Ledger, NullLedgerBuilder};

mod ledger_cache;
pub use ledger_cache::LedgerCache;

mod ledger_constants;
pub use ledger_constants::LedgerConstants;

mod write_database_queue;
pub use write_database_queue::{WriteDatabaseQueue, WriteGuard, Writer};
