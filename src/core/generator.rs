//! Arrival generator: an emitter task and a drainer task joined by a
//! one-slot hand-off channel.
//!
//! The emitter sleeps for each inter-arrival gap and sends vehicles numbered
//! 1, 2, ... into the channel. The drainer calls [`Lot::enter`] for each one.
//! Keeping admission off the emitter means a saturated lot never delays the
//! arrival clock.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::core::{
    ArrivalProcess, DwellPolicy, Lot, ShutdownListener, SimError, Spawn, Vehicle, VehicleId,
};

/// Join handles of a running generator.
#[derive(Debug)]
pub struct GeneratorHandle {
    emitter: JoinHandle<u64>,
    drainer: JoinHandle<u64>,
}

/// Counts reported once the generator has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSummary {
    /// Vehicles sent into the hand-off channel.
    pub emitted: u64,
    /// Vehicles passed to `Lot::enter`, whatever the outcome.
    pub handed_off: u64,
}

/// Start the emitter and drainer tasks on the current Tokio runtime.
///
/// The emitter stops after `total` vehicles (never, if `None`), when the
/// arrival process is exhausted, or when `shutdown` fires. In every case it
/// closes the channel, and the drainer exits once the channel is empty.
pub fn spawn_arrivals<S, D, A>(
    lot: Lot<S, D>,
    arrivals: A,
    total: Option<u64>,
    shutdown: ShutdownListener,
) -> GeneratorHandle
where
    S: Spawn + Clone + Send + Sync + 'static,
    D: DwellPolicy,
    A: ArrivalProcess,
{
    let (tx, rx) = mpsc::channel(1);
    let emitter = tokio::spawn(emit(arrivals, total, shutdown, tx));
    let drainer = tokio::spawn(drain(lot, rx));
    GeneratorHandle { emitter, drainer }
}

async fn emit<A: ArrivalProcess>(
    mut arrivals: A,
    total: Option<u64>,
    mut shutdown: ShutdownListener,
    tx: mpsc::Sender<Vehicle>,
) -> u64 {
    let mut next_id: VehicleId = 1;
    loop {
        let emitted = next_id - 1;
        if total.is_some_and(|t| emitted >= t) {
            info!("arrival generator finished after {emitted} vehicles");
            break;
        }
        let Some(gap) = arrivals.next_gap() else {
            info!("arrival process exhausted after {emitted} vehicles");
            break;
        };

        tokio::select! {
            biased;
            () = shutdown.cancelled() => {
                info!("arrival generator cancelled after {emitted} vehicles");
                break;
            }
            () = tokio::time::sleep(gap) => {}
        }

        let vehicle = Vehicle::new(next_id);
        tokio::select! {
            biased;
            () = shutdown.cancelled() => {
                info!("arrival generator cancelled after {emitted} vehicles");
                break;
            }
            sent = tx.send(vehicle) => {
                if sent.is_err() {
                    debug!("hand-off channel closed by the drainer");
                    break;
                }
            }
        }
        debug!("vehicle {next_id} arrived after {gap:?}");
        next_id += 1;
    }
    next_id - 1
}

async fn drain<S, D>(lot: Lot<S, D>, mut rx: mpsc::Receiver<Vehicle>) -> u64
where
    S: Spawn + Clone + Send + Sync + 'static,
    D: DwellPolicy,
{
    let mut handed_off = 0;
    while let Some(vehicle) = rx.recv().await {
        lot.enter(vehicle);
        handed_off += 1;
    }
    debug!("hand-off channel drained after {handed_off} vehicles");
    handed_off
}

impl GeneratorHandle {
    /// Whether both tasks have stopped.
    pub fn is_finished(&self) -> bool {
        self.emitter.is_finished() && self.drainer.is_finished()
    }

    /// Wait for both tasks.
    pub async fn join(self) -> Result<GeneratorSummary, SimError> {
        let emitted = self
            .emitter
            .await
            .map_err(|e| SimError::Runtime(format!("arrival emitter failed: {e}")))?;
        let handed_off = self
            .drainer
            .await
            .map_err(|e| SimError::Runtime(format!("arrival drainer failed: {e}")))?;
        Ok(GeneratorSummary { emitted, handed_off })
    }
}
