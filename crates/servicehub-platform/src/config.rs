use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Duration;
use rust_decimal::Decimal;
use servicehub_core::MarketError;
use servicehub_store::DEFAULT_EVENT_CAPACITY;

/// Longest settlement hold the marketplace accepts.
pub const MAX_SETTLEMENT_HOLD_DAYS: i64 = 365;

#[derive(Clone, Debug)]
pub struct MarketplaceConfig {
    /// Platform share of each completed job, as a fraction.
    pub commission_rate: Decimal,
    /// Decimal places the commission is rounded to.
    pub commission_scale: u32,
    /// How long a payout stays `pending` before it can be withdrawn.
    pub settlement_hold: Duration,
    pub event_capacity: usize,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            commission_rate: Decimal::new(1, 1),
            commission_scale: 0,
            settlement_hold: Duration::hours(72),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl MarketplaceConfig {
    pub fn validate(&self) -> servicehub_core::Result<()> {
        if self.commission_rate < Decimal::ZERO || self.commission_rate > Decimal::ONE {
            return Err(MarketError::InvalidCommissionRate(self.commission_rate));
        }
        if self.settlement_hold < Duration::zero()
            || self.settlement_hold > Duration::days(MAX_SETTLEMENT_HOLD_DAYS)
        {
            return Err(MarketError::InvalidSettlementHold(format!(
                "{} hours (expected 0 to {} days)",
                self.settlement_hold.num_hours(),
                MAX_SETTLEMENT_HOLD_DAYS
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct OpsConfig {
    pub marketplace: MarketplaceConfig,
    pub sweep_interval: std::time::Duration,
}

impl OpsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = MarketplaceConfig::default();

        let commission_rate = parse_var(&lookup, "SERVICEHUB_COMMISSION_RATE")?
            .unwrap_or(defaults.commission_rate);
        let hold_hours = parse_var::<i64>(&lookup, "SERVICEHUB_SETTLEMENT_HOLD_HOURS")?;
        let settlement_hold = match hold_hours {
            Some(hours) => Duration::try_hours(hours).with_context(|| {
                format!("SERVICEHUB_SETTLEMENT_HOLD_HOURS is out of range: {hours}")
            })?,
            None => defaults.settlement_hold,
        };
        let sweep_secs =
            parse_var::<u64>(&lookup, "SERVICEHUB_SWEEP_INTERVAL_SECS")?.unwrap_or(60);

        let marketplace = MarketplaceConfig {
            commission_rate,
            settlement_hold,
            ..defaults
        };
        marketplace
            .validate()
            .context("marketplace settings from the environment are out of range")?;

        Ok(Self {
            marketplace,
            sweep_interval: std::time::Duration::from_secs(sweep_secs.max(1)),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} is not valid: {raw:?}"))
        })
        .transpose()
}
