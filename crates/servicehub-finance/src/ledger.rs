use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use servicehub_core::{
    MarketError, RequestStatus, Result, ServiceRequest, SettlementStatus, WalletSummary,
    WalletTransaction,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Splits `total` into `(commission, payout)`.
///
/// Only the commission is rounded (half away from zero, to `scale` decimal
/// places); the payout is the exact remainder, so the two always sum to `total`.
pub fn split_commission(total: Decimal, rate: Decimal, scale: u32) -> (Decimal, Decimal) {
    let commission = (total * rate)
        .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO)
        .min(total);
    (commission, total - commission)
}

/// Sums `freelancer_amount` per settlement status.
pub fn aggregate<'a, I>(transactions: I) -> WalletSummary
where
    I: IntoIterator<Item = &'a WalletTransaction>,
{
    transactions
        .into_iter()
        .fold(WalletSummary::default(), |mut summary, entry| {
            match entry.status {
                SettlementStatus::Pending => summary.pending_total += entry.freelancer_amount,
                SettlementStatus::Available => summary.available_total += entry.freelancer_amount,
                SettlementStatus::Withdrawn => summary.withdrawn_total += entry.freelancer_amount,
            }
            summary
        })
}

fn not_found(transaction_id: Uuid) -> MarketError {
    MarketError::not_found("Wallet transaction", transaction_id.to_string())
}

/// Owns every wallet transaction. Amounts are fixed at materialization; only
/// the settlement status moves afterwards.
#[derive(Debug, Default)]
pub struct LedgerEngine {
    entries: Vec<WalletTransaction>,
    by_id: HashMap<Uuid, usize>,
    by_job: HashMap<String, usize>,
    scale: u32,
}

impl LedgerEngine {
    /// `scale` is the number of decimal places commission is rounded to.
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Checks that `request` could be credited now without touching the ledger.
    /// Completion calls this before persisting so a doomed entry never
    /// advances the request.
    pub fn check_materialize(
        &self,
        request: &ServiceRequest,
        commission_rate: Decimal,
    ) -> Result<()> {
        if request.status != RequestStatus::Completed {
            return Err(MarketError::InvalidState(format!(
                "request {} is '{}', only completed jobs are paid out",
                request.id, request.status
            )));
        }
        if request.total_amount <= Decimal::ZERO {
            return Err(MarketError::InvalidState(format!(
                "request {} has no agreed price",
                request.id
            )));
        }
        if commission_rate < Decimal::ZERO || commission_rate > Decimal::ONE {
            return Err(MarketError::InvalidCommissionRate(commission_rate));
        }
        if self.by_job.contains_key(&request.id) {
            warn!(job_id = %request.id, "refusing to credit job twice");
            return Err(MarketError::DuplicateLedgerEntry(request.id.clone()));
        }
        Ok(())
    }

    pub fn materialize(
        &mut self,
        request: &ServiceRequest,
        commission_rate: Decimal,
    ) -> Result<WalletTransaction> {
        self.check_materialize(request, commission_rate)?;

        let (commission, freelancer_amount) =
            split_commission(request.total_amount, commission_rate, self.scale);
        let entry = WalletTransaction {
            id: Uuid::new_v4(),
            job_id: request.id.clone(),
            total_amount: request.total_amount,
            commission,
            freelancer_amount,
            status: SettlementStatus::Pending,
            date: Utc::now(),
            settled_at: None,
        };

        let slot = self.entries.len();
        self.by_id.insert(entry.id, slot);
        self.by_job.insert(entry.job_id.clone(), slot);
        self.entries.push(entry.clone());

        info!(
            job_id = %entry.job_id,
            transaction_id = %entry.id,
            total = %entry.total_amount,
            commission = %entry.commission,
            payout = %entry.freelancer_amount,
            "ledger entry materialized"
        );
        Ok(entry)
    }

    pub fn advance_settlement(
        &mut self,
        transaction_id: Uuid,
        target: SettlementStatus,
    ) -> Result<WalletTransaction> {
        let slot = *self
            .by_id
            .get(&transaction_id)
            .ok_or_else(|| not_found(transaction_id))?;
        let entry = &mut self.entries[slot];

        if !entry.status.can_advance_to(target) {
            return Err(MarketError::invalid_transition(entry.status, target));
        }

        let from = entry.status;
        entry.status = target;
        entry.settled_at = Some(Utc::now());
        info!(transaction_id = %transaction_id, %from, to = %target, "settlement advanced");
        Ok(entry.clone())
    }

    pub fn withdraw(&mut self, transaction_id: Uuid) -> Result<WalletTransaction> {
        self.advance_settlement(transaction_id, SettlementStatus::Withdrawn)
    }

    /// Moves every pending payout whose hold has elapsed to `available`.
    pub fn release_due(&mut self, now: DateTime<Utc>, hold: Duration) -> Vec<WalletTransaction> {
        let due: Vec<Uuid> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.status == SettlementStatus::Pending
                    && entry
                        .date
                        .checked_add_signed(hold)
                        .is_some_and(|due| due <= now)
            })
            .map(|entry| entry.id)
            .collect();

        due.into_iter()
            .filter_map(|id| self.advance_settlement(id, SettlementStatus::Available).ok())
            .collect()
    }

    pub fn get(&self, transaction_id: Uuid) -> Result<WalletTransaction> {
        self.by_id
            .get(&transaction_id)
            .map(|&slot| self.entries[slot].clone())
            .ok_or_else(|| not_found(transaction_id))
    }

    pub fn by_job(&self, job_id: &str) -> Option<&WalletTransaction> {
        self.by_job.get(job_id).map(|&slot| &self.entries[slot])
    }

    pub fn list(&self) -> &[WalletTransaction] {
        &self.entries
    }

    pub fn summary(&self) -> WalletSummary {
        aggregate(&self.entries)
    }
}
