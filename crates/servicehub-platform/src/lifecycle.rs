//! Request lifecycle transitions.

use chrono::Utc;
use rust_decimal::Decimal;
use servicehub_core::{
    Actor, MarketError, RequestStatus, RequestStore, Result, ServiceRequest, StatusChange,
    WalletTransaction,
};
use servicehub_finance::LedgerEngine;
use tracing::{info, warn};

/// Result of an applied transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub request: ServiceRequest,
    pub change: StatusChange,
    /// Set when the transition completed the job.
    pub ledger_entry: Option<WalletTransaction>,
}

/// Validates lifecycle edges and applies them through a [`RequestStore`].
///
/// Completing a job is checked against the ledger first, then written to the
/// store, then credited. A rejected entry or a failed write leaves both the
/// request and the ledger where they were.
#[derive(Debug, Clone, Copy)]
pub struct StatusMachine {
    commission_rate: Decimal,
}

impl StatusMachine {
    pub fn new(commission_rate: Decimal) -> Self {
        Self { commission_rate }
    }

    pub fn transition<S: RequestStore + ?Sized>(
        &self,
        store: &mut S,
        ledger: &mut LedgerEngine,
        request_id: &str,
        target: RequestStatus,
        actor: Actor,
    ) -> Result<TransitionOutcome> {
        let current = store.get(request_id)?;

        if !current.status.can_transition_to(target) {
            warn!(
                request_id,
                from = %current.status,
                to = %target,
                ?actor,
                "rejected lifecycle transition"
            );
            return Err(MarketError::invalid_transition(current.status, target));
        }

        if target == RequestStatus::Completed {
            let mut completed = current.clone();
            completed.status = RequestStatus::Completed;
            ledger.check_materialize(&completed, self.commission_rate)?;
        }

        let change = StatusChange {
            from: current.status,
            to: target,
            actor,
            at: Utc::now(),
        };
        let request = store.update_status(request_id, change.clone())?;

        let ledger_entry = if target == RequestStatus::Completed {
            Some(ledger.materialize(&request, self.commission_rate)?)
        } else {
            None
        };

        info!(request_id, from = %change.from, to = %change.to, ?actor, "request transitioned");
        Ok(TransitionOutcome {
            request,
            change,
            ledger_entry,
        })
    }
}
