//! Concurrent lot model: admission, departure, arrivals and observation.

pub mod audit;
pub mod error;
pub mod generator;
pub mod lot;
pub mod observer;
mod spots;
pub mod shutdown;
pub mod stats;
pub mod timing;
pub mod vehicle;
pub mod wait_queue;

pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, SimError};
pub use generator::{spawn_arrivals, GeneratorHandle, GeneratorSummary};
pub use lot::{Admission, Lot, Spawn};
pub use observer::{LotObserver, Snapshot};
pub use shutdown::{ShutdownListener, ShutdownSignal};
pub use stats::LotStats;
pub use timing::{
    ArrivalProcess, DwellPolicy, ExponentialArrivals, FixedDwell, ScriptedArrivals, UniformDwell,
};
pub use vehicle::{Vehicle, VehicleId, VehicleState};
pub use wait_queue::WaitQueue;
