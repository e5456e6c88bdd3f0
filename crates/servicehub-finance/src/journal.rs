use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use servicehub_core::{LedgerProfile, WalletTransaction};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalLine {
    pub account: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub reference: String,
    pub memo: String,
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    pub fn is_balanced(&self) -> bool {
        let debits: Decimal = self.lines.iter().map(|line| line.debit).sum();
        let credits: Decimal = self.lines.iter().map(|line| line.credit).sum();
        debits == credits
    }
}

fn debit(account: String, amount: Decimal) -> JournalLine {
    JournalLine {
        account,
        debit: amount,
        credit: Decimal::ZERO,
    }
}

fn credit(account: String, amount: Decimal) -> JournalLine {
    JournalLine {
        account,
        debit: Decimal::ZERO,
        credit: amount,
    }
}

/// Posts a completed job's split: the customer owes the full price, the
/// platform earns the commission and the worker is owed the remainder.
pub fn settlement_journal(entry: &WalletTransaction, profile: &impl LedgerProfile) -> JournalEntry {
    let coa = profile.chart_of_accounts();

    JournalEntry {
        id: Uuid::new_v4(),
        reference: entry.job_id.clone(),
        memo: "Job completed".to_string(),
        lines: vec![
            debit(coa.customer_receivable, entry.total_amount),
            credit(coa.commission_revenue, entry.commission),
            credit(coa.worker_payable, entry.freelancer_amount),
        ],
    }
}

/// Posts a worker withdrawal: the payable is cleared against cash.
pub fn withdrawal_journal(entry: &WalletTransaction, profile: &impl LedgerProfile) -> JournalEntry {
    let coa = profile.chart_of_accounts();

    JournalEntry {
        id: Uuid::new_v4(),
        reference: entry.job_id.clone(),
        memo: "Payout withdrawn".to_string(),
        lines: vec![
            debit(coa.worker_payable, entry.freelancer_amount),
            credit(coa.cash, entry.freelancer_amount),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use servicehub_core::{MarketplaceProfile, SettlementStatus};

    fn entry() -> WalletTransaction {
        WalletTransaction {
            id: Uuid::new_v4(),
            job_id: "job-9".to_string(),
            total_amount: Decimal::new(1999, 0),
            commission: Decimal::new(200, 0),
            freelancer_amount: Decimal::new(1799, 0),
            status: SettlementStatus::Pending,
            date: Utc::now(),
            settled_at: None,
        }
    }

    #[test]
    fn test_settlement_journal_balances() {
        let journal = settlement_journal(&entry(), &MarketplaceProfile);

        assert!(journal.is_balanced());
        assert_eq!(journal.reference, "job-9");
        assert_eq!(
            journal.lines[0],
            JournalLine {
                account: "1100".to_string(),
                debit: Decimal::new(1999, 0),
                credit: Decimal::ZERO,
            }
        );
        assert_eq!(journal.lines[1].credit, Decimal::new(200, 0));
        assert_eq!(journal.lines[2].credit, Decimal::new(1799, 0));
    }

    #[test]
    fn test_withdrawal_journal_clears_payable() {
        let journal = withdrawal_journal(&entry(), &MarketplaceProfile);

        assert!(journal.is_balanced());
        assert_eq!(journal.lines[0].account, "2100");
        assert_eq!(journal.lines[1].account, "1000");
    }
}
