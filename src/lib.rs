//! # Lot Simulator
//!
//! A concurrent simulation of a bounded parking lot fed by a stochastic
//! stream of arriving vehicles.
//!
//! Each vehicle either takes one of `N` spots for a random dwell time, waits
//! in a FIFO queue of depth `N`, or is dropped when that queue is full. An
//! observer can take consistent snapshots of the lot at any time.
//!
//! ## Key Features
//!
//! - **Semaphore Admission**: A counting semaphore of `N` permits gates
//!   every spot assignment; permits always account for every free spot
//! - **Round-Robin Spots**: The spot search starts at a cursor that rotates
//!   past each assigned spot
//! - **FIFO Wake-ups**: Each departure wakes the head of the wait queue on
//!   its own task
//! - **Poisson Arrivals**: Inter-arrival gaps follow `Exponential(λ)`
//!   seconds; dwell times are uniform on `[min, max]`
//! - **Consistent Snapshots**: Spots, holders, permits and waiting ids are
//!   copied under one reader lock
//! - **Deterministic Runs**: Fixed dwell and scripted arrivals for
//!   reproducible scenarios
//!
//! ## Running a simulation
//!
//! ```rust,ignore
//! use lot_simulator::builders::{build_arrivals, build_lot};
//! use lot_simulator::config::SimulationConfig;
//! use lot_simulator::runtime::{Simulation, TokioSpawner};
//!
//! let cfg = SimulationConfig::default();
//! let lot = build_lot(&cfg, TokioSpawner::current()?)?;
//! let sim = Simulation::start(lot, build_arrivals(&cfg)?, cfg.total_cars);
//! let report = sim.finish().await?;
//! println!("{} departed, {} dropped", report.stats.departed, report.stats.dropped);
//! ```
//!
//! ## Driving the lot directly
//!
//! ```rust,ignore
//! use lot_simulator::core::{Admission, FixedDwell, Lot, LotObserver, Vehicle};
//! use lot_simulator::runtime::TokioSpawner;
//! use std::time::Duration;
//!
//! let lot = Lot::new(2, FixedDwell(Duration::from_secs(1)), TokioSpawner::current()?)?;
//! assert_eq!(lot.enter(Vehicle::new(1)), Admission::Parked { spot: 0 });
//! assert_eq!(lot.snapshot().holder, vec![1, 0]);
//! ```
//!
//! For complete scenarios, see `tests/lot_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core lot model, arrival generation and observation.
pub mod core;
/// Configuration models for simulation runs.
pub mod config;
/// Builders to construct lot components from configuration.
pub mod builders;
/// Runtime adapters: spawner, lifecycle and observer monitor.
pub mod runtime;
/// Shared utilities.
pub mod util;
