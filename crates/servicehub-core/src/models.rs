use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MarketError, Result};

/// Lifecycle of a service request. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    /// Returns true if moving from self to `next` is an edge of the lifecycle graph.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Accepted)
                | (RequestStatus::Pending, RequestStatus::Cancelled)
                | (RequestStatus::Accepted, RequestStatus::InProgress)
                | (RequestStatus::InProgress, RequestStatus::Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Urgent,
}

/// Who issued a lifecycle command.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Customer,
    Worker,
    Platform,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub actor: Actor,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRequest {
    pub id: String,
    pub service_id: String,
    pub service_title: String,
    pub category: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub notes: String,
    pub urgency: Urgency,
    pub tags: Vec<String>,
    pub total_amount: Decimal,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub history: Vec<StatusChange>,
}

/// Fields a customer submits from the booking form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewServiceRequest {
    /// Caller-supplied id; a UUID is generated when absent.
    pub id: Option<String>,
    pub service_id: String,
    pub service_title: String,
    pub category: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub notes: String,
    pub urgency: Urgency,
    pub tags: Vec<String>,
    pub total_amount: Decimal,
}

impl NewServiceRequest {
    /// The caller's id, if one was given. Blank ids count as absent.
    pub fn supplied_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Checks required fields, phone shape and price.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("service_id", &self.service_id),
            ("customer_name", &self.customer_name),
            ("customer_phone", &self.customer_phone),
            ("address", &self.address),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(MarketError::MissingField(name));
            }
        }

        if !is_valid_phone(&self.customer_phone) {
            return Err(MarketError::InvalidPhone(self.customer_phone.clone()));
        }

        if self.total_amount < Decimal::ZERO {
            return Err(MarketError::InvalidAmount(self.total_amount));
        }

        Ok(())
    }

    /// Builds the stored request. Does not validate.
    pub fn into_request(self, created_at: DateTime<Utc>) -> ServiceRequest {
        let id = self
            .supplied_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        ServiceRequest {
            id,
            service_id: self.service_id.trim().to_string(),
            service_title: self.service_title,
            category: self.category,
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
            address: self.address.trim().to_string(),
            preferred_date: self.preferred_date,
            preferred_time: self.preferred_time,
            notes: self.notes,
            urgency: self.urgency,
            tags: self.tags,
            total_amount: self.total_amount,
            status: RequestStatus::Pending,
            created_at,
            history: Vec::new(),
        }
    }
}

/// Accepts 7-15 digits once spaces, dashes, parentheses and a leading `+` are removed.
pub fn is_valid_phone(raw: &str) -> bool {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = body
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Settlement stage of a worker payout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    Available,
    Withdrawn,
}

impl SettlementStatus {
    pub fn can_advance_to(self, next: SettlementStatus) -> bool {
        matches!(
            (self, next),
            (SettlementStatus::Pending, SettlementStatus::Available)
                | (SettlementStatus::Available, SettlementStatus::Withdrawn)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Available => "available",
            SettlementStatus::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub job_id: String,
    pub total_amount: Decimal,
    pub commission: Decimal,
    pub freelancer_amount: Decimal,
    pub status: SettlementStatus,
    pub date: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

/// Wallet figures grouped by settlement status, summed over `freelancer_amount`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletSummary {
    pub pending_total: Decimal,
    pub available_total: Decimal,
    pub withdrawn_total: Decimal,
}

impl WalletSummary {
    pub fn lifetime_earnings(&self) -> Decimal {
        self.pending_total + self.available_total + self.withdrawn_total
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Worker,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub role: UserRole,
    #[serde(default)]
    pub verified: bool,
}
