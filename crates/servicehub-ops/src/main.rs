use anyhow::{Context, Result};
use chrono::Utc;
use servicehub_core::{DomainEvent, NewServiceRequest, UserProfile, UserRole};
use servicehub_platform::{DEMO_CATALOG, Marketplace, OpsConfig};
use servicehub_store::{InMemoryKeyValueStore, ProfileStore};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

const DEMO_WORKER_ID: &str = "worker-demo";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "servicehub_ops=info".to_string()),
        )
        .init();

    let config = OpsConfig::from_env()?;
    let mut market = Marketplace::new(config.marketplace.clone())
        .context("marketplace configuration rejected")?;
    let mut events = market.subscribe();

    let profiles = ProfileStore::new(InMemoryKeyValueStore::default());
    profiles
        .save(&UserProfile {
            user_id: DEMO_WORKER_ID.to_string(),
            name: "Demo Worker".to_string(),
            phone: "9000012345".to_string(),
            role: UserRole::Worker,
            verified: true,
        })
        .await
        .context("failed to store demo worker profile")?;

    seed_demo_jobs(&mut market).context("failed to seed demo jobs")?;

    info!(
        "settlement sweeper running every {:?} (hold {}h, commission {})",
        config.sweep_interval,
        config.marketplace.settlement_hold.num_hours(),
        config.marketplace.commission_rate
    );

    let mut ticker = tokio::time::interval(config.sweep_interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let released = market.release_due_settlements(Utc::now());
                if !released.is_empty() {
                    let summary = market.wallet_summary();
                    info!(
                        "released {} payouts; available {} pending {}",
                        released.len(),
                        summary.available_total,
                        summary.pending_total
                    );
                }
            }
            received = events.recv() => match received {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => warn!("event log skipped {skipped} events"),
                Err(RecvError::Closed) => break,
            },
            signal = &mut shutdown => {
                if let Err(err) = signal {
                    error!("failed to listen for shutdown signal: {err}");
                }
                break;
            }
        }
    }

    let summary = market.wallet_summary();
    info!(
        "shutting down; pending {} available {} withdrawn {}",
        summary.pending_total, summary.available_total, summary.withdrawn_total
    );
    Ok(())
}

/// Books every catalog item and pushes every other booking through to completion.
fn seed_demo_jobs(market: &mut Marketplace) -> Result<()> {
    for (n, offering) in DEMO_CATALOG.iter().enumerate() {
        let request = market.create_request(NewServiceRequest {
            customer_name: format!("Demo Customer {}", n + 1),
            customer_phone: format!("98{:08}", n + 1),
            address: format!("{} Demo Street", n + 1),
            notes: format!("Seeded booking for {}", offering.title),
            ..offering.booking_form()
        })?;

        if n % 2 == 0 {
            market.accept(&request.id)?;
            market.start(&request.id)?;
            market.complete(&request.id)?;
        }
    }

    info!(
        "seeded {} requests, {} ledger entries",
        market.requests().len(),
        market.transactions().len()
    );
    Ok(())
}

fn log_event(event: &DomainEvent) {
    info!(
        "{:?} {} {}",
        event.kind, event.aggregate_id, event.payload
    );
}
