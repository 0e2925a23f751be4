//! Builders to construct a lot and its arrival process from configuration.

use crate::config::SimulationConfig;
use crate::core::{ExponentialArrivals, Lot, SimError, UniformDwell};

/// Build a lot with uniform dwell times from a validated configuration.
pub fn build_lot<S>(cfg: &SimulationConfig, spawner: S) -> Result<Lot<S, UniformDwell>, SimError> {
    cfg.validate()
        .map_err(|e| SimError::InvalidConfig(format!("config invalid: {e}")))?;

    let dwell = match cfg.seed {
        Some(seed) => UniformDwell::seeded(cfg.dwell_min_secs, cfg.dwell_max_secs, seed)?,
        None => UniformDwell::new(cfg.dwell_min_secs, cfg.dwell_max_secs)?,
    };
    Lot::new(cfg.capacity, dwell, spawner)
}

/// Build the exponential arrival process described by the configuration.
///
/// With a seed, arrivals use a stream distinct from the dwell sampler's.
pub fn build_arrivals(cfg: &SimulationConfig) -> Result<ExponentialArrivals, SimError> {
    match cfg.seed {
        Some(seed) => ExponentialArrivals::seeded(cfg.arrival_rate, seed.wrapping_add(1)),
        None => ExponentialArrivals::new(cfg.arrival_rate),
    }
}
