use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartOfAccounts {
    pub cash: String,
    pub customer_receivable: String,
    pub worker_payable: String,
    pub commission_revenue: String,
}

/// Account numbering used when posting a job's payment split.
pub trait LedgerProfile {
    fn name(&self) -> &'static str;
    fn chart_of_accounts(&self) -> ChartOfAccounts;
}

#[derive(Debug, Clone, Default)]
pub struct MarketplaceProfile;

impl LedgerProfile for MarketplaceProfile {
    fn name(&self) -> &'static str {
        "marketplace"
    }

    fn chart_of_accounts(&self) -> ChartOfAccounts {
        ChartOfAccounts {
            cash: "1000".to_string(),
            customer_receivable: "1100".to_string(),
            worker_payable: "2100".to_string(),
            commission_revenue: "4000".to_string(),
        }
    }
}
