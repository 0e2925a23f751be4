//! Simulation lifecycle: start, cancel, drain, report.

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

use crate::core::{
    spawn_arrivals, ArrivalProcess, DwellPolicy, GeneratorHandle, Lot, LotObserver, LotStats,
    ShutdownSignal, SimError, Spawn,
};

/// Final account of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Run identifier.
    pub run_id: String,
    /// Vehicles emitted by the generator.
    pub emitted: u64,
    /// Vehicles passed to `Lot::enter`, whatever the outcome.
    pub handed_off: u64,
    /// Lot statistics after the run.
    pub stats: LotStats,
}

/// A running simulation: one lot fed by one arrival generator.
pub struct Simulation<S, D> {
    run_id: Uuid,
    span: Span,
    lot: Lot<S, D>,
    shutdown: ShutdownSignal,
    generator: GeneratorHandle,
}

impl<S, D> Simulation<S, D>
where
    S: Spawn + Clone + Send + Sync + 'static,
    D: DwellPolicy,
{
    /// Start feeding `lot` from `arrivals`, stopping after `total` vehicles
    /// (never, if `None`) unless cancelled first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<A: ArrivalProcess>(lot: Lot<S, D>, arrivals: A, total: Option<u64>) -> Self {
        let run_id = Uuid::new_v4();
        let span = info_span!("simulation", %run_id);
        let (shutdown, listener) = ShutdownSignal::channel();
        span.in_scope(|| info!(capacity = lot.capacity(), ?total, "simulation started"));
        let generator = spawn_arrivals(lot.clone(), arrivals, total, listener);
        Self {
            run_id,
            span,
            lot,
            shutdown,
            generator,
        }
    }

    /// Run identifier, also recorded on the `simulation` tracing span.
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The simulated lot.
    pub const fn lot(&self) -> &Lot<S, D> {
        &self.lot
    }

    /// Handle that cancels this run; also used to stop companion tasks.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Stop emitting arrivals. Parked vehicles still finish their dwell.
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    /// Wait for the generator to close, then for every dwell and wake task.
    pub async fn finish(self) -> Result<SimulationReport, SimError> {
        let Self {
            run_id,
            span,
            lot,
            shutdown,
            generator,
        } = self;
        async move {
            let summary = generator.join().await?;
            drop(shutdown);
            info!(
                emitted = summary.emitted,
                "arrivals closed; waiting up to {:?} for parked vehicles",
                lot.dwell_max()
            );
            lot.drained().await;
            let stats = lot.stats();
            info!(
                parked = stats.parked,
                departed = stats.departed,
                dropped = stats.dropped,
                "simulation finished"
            );
            Ok(SimulationReport {
                run_id: run_id.to_string(),
                emitted: summary.emitted,
                handed_off: summary.handed_off,
                stats,
            })
        }
        .instrument(span)
        .await
    }

    /// Cancel, then [`Simulation::finish`].
    pub async fn stop(self) -> Result<SimulationReport, SimError> {
        self.cancel();
        self.finish().await
    }
}
