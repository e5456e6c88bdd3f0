pub mod catalog;
pub mod config;
pub mod lifecycle;
pub mod marketplace;

pub use catalog::{DEMO_CATALOG, ServiceOffering, Vertical, find_offering};
pub use config::{MAX_SETTLEMENT_HOLD_DAYS, MarketplaceConfig, OpsConfig};
pub use lifecycle::{StatusMachine, TransitionOutcome};
pub use marketplace::Marketplace;
