pub mod error;
pub mod events;
pub mod ledger_profile;
pub mod models;
pub mod storage;

pub use error::{MarketError, Result};
pub use events::{DomainEvent, DomainEventKind};
pub use ledger_profile::{ChartOfAccounts, LedgerProfile, MarketplaceProfile};
pub use models::{
    Actor, NewServiceRequest, RequestStatus, ServiceRequest, SettlementStatus, StatusChange,
    Urgency, UserProfile, UserRole, WalletSummary, WalletTransaction, is_valid_phone,
};
pub use storage::{KeyValueStore, RequestStore};
