use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::{ServiceRequest, SettlementStatus, StatusChange, WalletTransaction};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DomainEventKind {
    RequestCreated,
    RequestStatusChanged,
    LedgerEntryMaterialized,
    SettlementAdvanced,
}

/// A change notification pushed to subscribed dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: Uuid,
    pub aggregate_id: String,
    pub kind: DomainEventKind,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl DomainEvent {
    fn new(kind: DomainEventKind, aggregate_id: String, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            aggregate_id,
            kind,
            occurred_at: Utc::now(),
            payload,
        }
    }

    pub fn request_created(request: &ServiceRequest) -> Self {
        Self::new(
            DomainEventKind::RequestCreated,
            request.id.clone(),
            json!({
                "service_id": request.service_id,
                "category": request.category,
                "total_amount": request.total_amount,
            }),
        )
    }

    pub fn status_changed(request_id: &str, change: &StatusChange) -> Self {
        Self::new(
            DomainEventKind::RequestStatusChanged,
            request_id.to_string(),
            json!({
                "from": change.from,
                "to": change.to,
                "actor": change.actor,
            }),
        )
    }

    pub fn ledger_materialized(entry: &WalletTransaction) -> Self {
        Self::new(
            DomainEventKind::LedgerEntryMaterialized,
            entry.job_id.clone(),
            json!({
                "transaction_id": entry.id,
                "total_amount": entry.total_amount,
                "commission": entry.commission,
                "freelancer_amount": entry.freelancer_amount,
            }),
        )
    }

    pub fn settlement_advanced(entry: &WalletTransaction, from: SettlementStatus) -> Self {
        Self::new(
            DomainEventKind::SettlementAdvanced,
            entry.job_id.clone(),
            json!({
                "transaction_id": entry.id,
                "from": from,
                "to": entry.status,
            }),
        )
    }
}
