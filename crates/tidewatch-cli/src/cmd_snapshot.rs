use std::sync::Arc;

use tidewatch_derive::{activity_lines, alert_headline};
use tidewatch_feed::{
    ApplyOutcome, DashboardSnapshot, FeedClient, FeedConfig, HttpDrainSource, Monitor,
};

use crate::fmt::{event_clock, injection_cells, tank_cells};

/// Drain once and print the resulting views.
pub fn execute(config: &FeedConfig, json: bool) -> anyhow::Result<()> {
    let monitor = Arc::new(Monitor::new());
    let client = FeedClient::new(HttpDrainSource::from_config(config), monitor.clone())
        .with_limit(config.limit);

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(client.poll_once());
    tracing::debug!(?outcome, "snapshot retrieval finished");
    if outcome == ApplyOutcome::Failed {
        eprintln!("Backend offline ({})", config.base_url);
    }

    let snap = monitor.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    } else {
        print_summary(&snap);
    }
    Ok(())
}

fn print_summary(snap: &DashboardSnapshot) {
    println!(
        "{} | {} events retained",
        snap.connectivity.label(),
        snap.retained
    );

    println!("\nTanks ({}):", snap.tanks.len());
    for t in snap.tanks.iter() {
        let [id, origin, mass, pressure, sealed] = tank_cells(t);
        println!("  {id:<14} {origin:<22} {mass:>8} kg {pressure:>8} psi  {sealed}");
    }

    println!("\nInjections ({}):", snap.injections.len());
    for r in snap.injections.iter() {
        let [well, tank, status, mass] = injection_cells(r);
        println!("  {well:<10} {tank:<14} {status:<10} {mass:>6} t");
    }

    println!("\nAlerts ({}):", snap.alerts.len());
    for a in snap.alerts.iter() {
        println!("  {}  {}", event_clock(a), alert_headline(a));
    }

    println!("\nRecent activity:");
    for (ev, line) in snap.recent.iter().zip(activity_lines(&snap.recent)) {
        println!(
            "  {}  {:<10} {}",
            event_clock(ev),
            line.agent.as_str(),
            line.message
        );
    }
}
