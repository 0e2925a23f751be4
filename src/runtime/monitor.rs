//! Observer polling task standing in for a display surface.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::core::{LotObserver, ShutdownListener};
use crate::runtime::api::OccupancyView;

/// How the monitor renders each poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// One human-readable line per poll.
    #[default]
    Text,
    /// One JSON object per poll.
    Json,
}

/// Render an occupancy view in the requested format.
pub fn render(view: &OccupancyView, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(view.summary_line()),
        ReportFormat::Json => serde_json::to_string(view),
    }
}

/// Poll `observer` every `every` and log the occupancy until `shutdown` fires.
///
/// Resolves to the number of polls taken.
pub fn spawn_monitor<O>(
    observer: O,
    every: Duration,
    format: ReportFormat,
    mut shutdown: ShutdownListener,
) -> JoinHandle<u64>
where
    O: LotObserver + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls = 0;
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let view = OccupancyView::from(&observer.snapshot());
            polls += 1;
            match render(&view, format) {
                Ok(line) => info!(target: "lot_simulator::monitor", "{line}"),
                Err(e) => error!("failed to render occupancy: {e}"),
            }
        }
        polls
    })
}
