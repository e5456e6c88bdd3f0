use chrono::{DateTime, Utc};
use servicehub_core::{
    Actor, DomainEvent, MarketplaceProfile, NewServiceRequest, RequestStatus, RequestStore,
    Result, ServiceRequest, SettlementStatus, WalletSummary, WalletTransaction,
};
use servicehub_finance::{JournalEntry, LedgerEngine, settlement_journal, withdrawal_journal};
use servicehub_query::{RequestFilter, SortKey, browse};
use servicehub_store::{EventBus, InMemoryRequestStore};
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::config::MarketplaceConfig;
use crate::lifecycle::StatusMachine;

/// The one shared store dashboards are handed. Every successful command
/// publishes a [`DomainEvent`]; failed commands change nothing.
pub struct Marketplace<S = InMemoryRequestStore> {
    config: MarketplaceConfig,
    requests: S,
    ledger: LedgerEngine,
    machine: StatusMachine,
    bus: EventBus,
}

impl Marketplace<InMemoryRequestStore> {
    pub fn new(config: MarketplaceConfig) -> Result<Self> {
        Self::with_store(config, InMemoryRequestStore::default())
    }
}

impl<S: RequestStore> Marketplace<S> {
    pub fn with_store(config: MarketplaceConfig, requests: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ledger: LedgerEngine::new(config.commission_scale),
            machine: StatusMachine::new(config.commission_rate),
            bus: EventBus::new(config.event_capacity),
            requests,
            config,
        })
    }

    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.bus.subscribe()
    }

    pub fn create_request(&mut self, fields: NewServiceRequest) -> Result<ServiceRequest> {
        let request = self.requests.create(fields)?;
        self.bus.publish(DomainEvent::request_created(&request));
        Ok(request)
    }

    pub fn request(&self, id: &str) -> Result<ServiceRequest> {
        self.requests.get(id)
    }

    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.list()
    }

    pub fn browse(&self, criteria: &RequestFilter, key: SortKey) -> Vec<ServiceRequest> {
        browse(&self.requests.list(), criteria, key)
    }

    pub fn transition(
        &mut self,
        request_id: &str,
        target: RequestStatus,
        actor: Actor,
    ) -> Result<ServiceRequest> {
        let outcome = self.machine.transition(
            &mut self.requests,
            &mut self.ledger,
            request_id,
            target,
            actor,
        )?;

        self.bus
            .publish(DomainEvent::status_changed(request_id, &outcome.change));
        if let Some(entry) = &outcome.ledger_entry {
            self.bus.publish(DomainEvent::ledger_materialized(entry));
        }
        Ok(outcome.request)
    }

    pub fn accept(&mut self, request_id: &str) -> Result<ServiceRequest> {
        self.transition(request_id, RequestStatus::Accepted, Actor::Worker)
    }

    /// Worker declines a pending job.
    pub fn reject(&mut self, request_id: &str) -> Result<ServiceRequest> {
        self.transition(request_id, RequestStatus::Cancelled, Actor::Worker)
    }

    pub fn start(&mut self, request_id: &str) -> Result<ServiceRequest> {
        self.transition(request_id, RequestStatus::InProgress, Actor::Worker)
    }

    pub fn complete(&mut self, request_id: &str) -> Result<ServiceRequest> {
        self.transition(request_id, RequestStatus::Completed, Actor::Worker)
    }

    /// Customer withdraws a pending booking.
    pub fn cancel(&mut self, request_id: &str) -> Result<ServiceRequest> {
        self.transition(request_id, RequestStatus::Cancelled, Actor::Customer)
    }

    pub fn advance_settlement(
        &mut self,
        transaction_id: Uuid,
        target: SettlementStatus,
    ) -> Result<WalletTransaction> {
        let from = self.ledger.get(transaction_id)?.status;
        let entry = self.ledger.advance_settlement(transaction_id, target)?;
        self.bus
            .publish(DomainEvent::settlement_advanced(&entry, from));
        Ok(entry)
    }

    pub fn withdraw(&mut self, transaction_id: Uuid) -> Result<WalletTransaction> {
        self.advance_settlement(transaction_id, SettlementStatus::Withdrawn)
    }

    /// Releases payouts whose settlement hold has elapsed by `now`.
    pub fn release_due_settlements(&mut self, now: DateTime<Utc>) -> Vec<WalletTransaction> {
        let released = self.ledger.release_due(now, self.config.settlement_hold);
        for entry in &released {
            self.bus
                .publish(DomainEvent::settlement_advanced(entry, SettlementStatus::Pending));
        }
        if !released.is_empty() {
            info!(count = released.len(), "payouts released from hold");
        }
        released
    }

    pub fn transactions(&self) -> &[WalletTransaction] {
        self.ledger.list()
    }

    pub fn transaction_for(&self, job_id: &str) -> Option<&WalletTransaction> {
        self.ledger.by_job(job_id)
    }

    pub fn wallet_summary(&self) -> WalletSummary {
        self.ledger.summary()
    }

    /// Journals posted for a payout so far: the completion split, then the
    /// withdrawal once the worker has cashed out.
    pub fn journal(&self, transaction_id: Uuid) -> Result<Vec<JournalEntry>> {
        let entry = self.ledger.get(transaction_id)?;
        let mut journals = vec![settlement_journal(&entry, &MarketplaceProfile)];
        if entry.status == SettlementStatus::Withdrawn {
            journals.push(withdrawal_journal(&entry, &MarketplaceProfile));
        }
        Ok(journals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use servicehub_core::{DomainEventKind, MarketError};
    use tokio::sync::broadcast::error::TryRecvError;

    use crate::catalog::find_offering;

    fn booking(id: &str) -> NewServiceRequest {
        NewServiceRequest {
            id: Some(id.to_string()),
            customer_name: "Nadia".to_string(),
            customer_phone: "9988776655".to_string(),
            address: "22 Station Road".to_string(),
            ..find_offering("svc-deep-clean").unwrap().booking_form()
        }
    }

    fn drain(rx: &mut broadcast::Receiver<DomainEvent>) -> Vec<DomainEventKind> {
        let mut kinds = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => kinds.push(event.kind),
                Err(TryRecvError::Empty) => return kinds,
                Err(other) => panic!("unexpected receive error: {other}"),
            }
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = MarketplaceConfig {
            commission_rate: Decimal::new(-1, 1),
            ..Default::default()
        };
        assert!(matches!(
            Marketplace::new(config),
            Err(MarketError::InvalidCommissionRate(_))
        ));
    }

    #[test]
    fn test_commands_publish_events() {
        let mut market = Marketplace::new(MarketplaceConfig::default()).unwrap();
        let mut dashboard = market.subscribe();

        market.create_request(booking("REQ-1")).unwrap();
        market.accept("REQ-1").unwrap();
        market.start("REQ-1").unwrap();
        market.complete("REQ-1").unwrap();

        assert_eq!(
            drain(&mut dashboard),
            vec![
                DomainEventKind::RequestCreated,
                DomainEventKind::RequestStatusChanged,
                DomainEventKind::RequestStatusChanged,
                DomainEventKind::RequestStatusChanged,
                DomainEventKind::LedgerEntryMaterialized,
            ]
        );
    }

    #[test]
    fn test_failed_command_publishes_nothing() {
        let mut market = Marketplace::new(MarketplaceConfig::default()).unwrap();
        market.create_request(booking("REQ-1")).unwrap();
        let mut dashboard = market.subscribe();

        assert!(market.start("REQ-1").is_err());
        assert!(market.create_request(booking("REQ-1")).is_err());
        assert!(drain(&mut dashboard).is_empty());
    }

    #[test]
    fn test_reject_and_cancel_record_actor() {
        let mut market = Marketplace::new(MarketplaceConfig::default()).unwrap();
        market.create_request(booking("REQ-1")).unwrap();
        market.create_request(booking("REQ-2")).unwrap();

        let rejected = market.reject("REQ-1").unwrap();
        let cancelled = market.cancel("REQ-2").unwrap();

        assert_eq!(rejected.status, RequestStatus::Cancelled);
        assert_eq!(rejected.history[0].actor, Actor::Worker);
        assert_eq!(cancelled.history[0].actor, Actor::Customer);
        assert!(market.transactions().is_empty());
    }

    #[test]
    fn test_release_due_settlements_uses_configured_hold() {
        let mut market = Marketplace::new(MarketplaceConfig {
            settlement_hold: chrono::Duration::hours(1),
            ..Default::default()
        })
        .unwrap();
        market.create_request(booking("REQ-1")).unwrap();
        market.accept("REQ-1").unwrap();
        market.start("REQ-1").unwrap();
        market.complete("REQ-1").unwrap();
        let mut wallet = market.subscribe();

        assert!(market.release_due_settlements(Utc::now()).is_empty());
        let released = market.release_due_settlements(Utc::now() + chrono::Duration::hours(2));

        assert_eq!(released.len(), 1);
        assert_eq!(drain(&mut wallet), vec![DomainEventKind::SettlementAdvanced]);
        assert_eq!(market.wallet_summary().available_total, Decimal::new(1800, 0));
    }

    #[test]
    fn test_journal_for_completed_job() {
        let mut market = Marketplace::new(MarketplaceConfig::default()).unwrap();
        market.create_request(booking("REQ-1")).unwrap();
        market.accept("REQ-1").unwrap();
        market.start("REQ-1").unwrap();
        market.complete("REQ-1").unwrap();

        let id = market.transaction_for("REQ-1").unwrap().id;
        let journals = market.journal(id).unwrap();
        assert_eq!(journals.len(), 1);
        assert!(journals[0].is_balanced());
        assert_eq!(journals[0].reference, "REQ-1");
    }

    #[test]
    fn test_journal_includes_withdrawal_once_cashed_out() {
        let mut market = Marketplace::new(MarketplaceConfig::default()).unwrap();
        market.create_request(booking("REQ-1")).unwrap();
        market.accept("REQ-1").unwrap();
        market.start("REQ-1").unwrap();
        market.complete("REQ-1").unwrap();
        let id = market.transaction_for("REQ-1").unwrap().id;

        market
            .advance_settlement(id, SettlementStatus::Available)
            .unwrap();
        assert_eq!(market.journal(id).unwrap().len(), 1);

        market.withdraw(id).unwrap();
        let journals = market.journal(id).unwrap();
        assert_eq!(journals.len(), 2);
        assert!(journals.iter().all(JournalEntry::is_balanced));
        assert_eq!(journals[1].memo, "Payout withdrawn");
        assert_eq!(journals[1].lines[0].debit, Decimal::new(1800, 0));
    }

    #[test]
    fn test_rejects_unbounded_settlement_hold() {
        let config = MarketplaceConfig {
            settlement_hold: chrono::Duration::MAX,
            ..Default::default()
        };
        assert!(matches!(
            Marketplace::new(config),
            Err(MarketError::InvalidSettlementHold(_))
        ));
    }
}
