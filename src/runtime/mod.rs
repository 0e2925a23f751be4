//! Runtime adapters: Tokio spawner, simulation lifecycle and observer monitor.

pub mod api;
pub mod monitor;
pub mod simulation;
pub mod tokio_spawner;

pub use api::{OccupancyView, SpotView};
pub use monitor::{render, spawn_monitor, ReportFormat};
pub use simulation::{Simulation, SimulationReport};
pub use tokio_spawner::TokioSpawner;
