pub mod journal;
pub mod ledger;

pub use journal::{JournalEntry, JournalLine, settlement_journal, withdrawal_journal};
pub use ledger::{LedgerEngine, aggregate, split_commission};
