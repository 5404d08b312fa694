use std::sync::Arc;
use std::time::Duration;

use tidewatch_core::Connectivity;
use tidewatch_derive::describe;
use tidewatch_feed::{FeedClient, FeedConfig, HttpDrainSource, Monitor};
use tokio_util::sync::CancellationToken;

use crate::fmt::event_clock;

/// Launch the live dashboard.
///
/// With the `tui` feature (default) and without `--plain`: the interactive
/// ratatui dashboard. Otherwise newly merged events are printed as text.
pub fn execute(config: &FeedConfig, plain: bool) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let monitor = Arc::new(Monitor::new());
    let source = HttpDrainSource::from_config(config);
    let endpoint = source.url().to_string();
    let mut client = FeedClient::new(source, monitor.clone()).with_limit(config.limit);
    {
        let _guard = rt.enter();
        client.start(config.poll_interval());
    }

    let result = if plain {
        run_plain(&monitor, &endpoint)
    } else {
        run_interactive(monitor.clone(), endpoint)
    };

    client.stop();
    result
}

#[cfg(feature = "tui")]
fn run_interactive(monitor: Arc<Monitor>, endpoint: String) -> anyhow::Result<()> {
    crate::tui::run(monitor, endpoint)
}

#[cfg(not(feature = "tui"))]
fn run_interactive(monitor: Arc<Monitor>, endpoint: String) -> anyhow::Result<()> {
    eprintln!("tidewatch watch (plain mode; rebuild with the `tui` feature for the interactive UI)");
    run_plain(&monitor, &endpoint)
}

fn run_plain(monitor: &Monitor, endpoint: &str) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    ctrlc_cancel(cancel.clone());

    eprintln!("Polling {endpoint}");
    eprintln!("Press Ctrl-C to stop.\n");

    let mut printed = 0u64;
    let mut last_status: Option<Connectivity> = None;
    while !cancel.is_cancelled() {
        let status = monitor.connectivity();
        if last_status != Some(status) {
            eprintln!("[{}]", status.label());
            last_status = Some(status);
        }

        let (fresh, total) = monitor.events_since(printed);
        for ev in &fresh {
            let line = describe(ev);
            println!(
                "{}  {:<10} {}",
                event_clock(ev),
                line.agent.as_str(),
                line.message
            );
        }
        printed = total;
        std::thread::sleep(Duration::from_millis(250));
    }
    Ok(())
}

/// Cancel `cancel` on Ctrl-C. Returns false when no handler could be installed.
fn ctrlc_cancel(cancel: CancellationToken) -> bool {
    match ctrlc::set_handler(move || cancel.cancel()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "cannot install Ctrl-C handler");
            eprintln!("Warning: Ctrl-C handler unavailable ({e}); stop with a kill signal.");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_ctrlc_handler_is_reported_not_fatal() {
        let first = CancellationToken::new();
        ctrlc_cancel(first.clone());

        let second = CancellationToken::new();
        assert!(!ctrlc_cancel(second.clone()));
        assert!(!first.is_cancelled());
        assert!(!second.is_cancelled());
    }
}
