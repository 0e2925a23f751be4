//! Dwell-time and inter-arrival sampling.
//!
//! Randomised samplers draw from a `rand::rngs::StdRng`, seeded from the OS
//! unless a seed is given. The fixed/scripted variants make end-to-end runs
//! deterministic.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::SimError;

/// Source of dwell times, sampled once per admitted vehicle.
pub trait DwellPolicy: Send + Sync + 'static {
    /// How long the next vehicle stays parked.
    fn sample(&self) -> Duration;

    /// Upper bound of any sample; shutdown drains within this bound.
    fn max(&self) -> Duration;
}

/// Source of inter-arrival gaps for the arrival generator.
pub trait ArrivalProcess: Send + 'static {
    /// Gap before the next arrival, or `None` when the process is exhausted.
    fn next_gap(&mut self) -> Option<Duration>;
}

fn rng_from(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
}

/// Dwell time drawn uniformly from `[min, max]` seconds.
#[derive(Debug)]
pub struct UniformDwell {
    min_secs: f64,
    max_secs: f64,
    rng: Mutex<StdRng>,
}

impl UniformDwell {
    /// Create a sampler over `[min_secs, max_secs]`.
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, SimError> {
        Self::build(min_secs, max_secs, None)
    }

    /// Same as [`UniformDwell::new`] with a fixed PRNG seed.
    pub fn seeded(min_secs: f64, max_secs: f64, seed: u64) -> Result<Self, SimError> {
        Self::build(min_secs, max_secs, Some(seed))
    }

    fn build(min_secs: f64, max_secs: f64, seed: Option<u64>) -> Result<Self, SimError> {
        if !min_secs.is_finite() || !max_secs.is_finite() || min_secs < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "dwell bounds must be finite and non-negative (min={min_secs}, max={max_secs})"
            )));
        }
        if max_secs < min_secs {
            return Err(SimError::InvalidConfig(format!(
                "dwell max {max_secs}s is below dwell min {min_secs}s"
            )));
        }
        Ok(Self {
            min_secs,
            max_secs,
            rng: Mutex::new(rng_from(seed)),
        })
    }
}

impl DwellPolicy for UniformDwell {
    fn sample(&self) -> Duration {
        if self.max_secs <= self.min_secs {
            return secs(self.min_secs);
        }
        let drawn = self.rng.lock().random_range(self.min_secs..=self.max_secs);
        secs(drawn)
    }

    fn max(&self) -> Duration {
        secs(self.max_secs)
    }
}

/// Every vehicle stays for the same duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDwell(pub Duration);

impl DwellPolicy for FixedDwell {
    fn sample(&self) -> Duration {
        self.0
    }

    fn max(&self) -> Duration {
        self.0
    }
}

/// Poisson arrivals: gaps follow `Exponential(rate)` in seconds.
///
/// Each gap is `-ln(U) / rate` with `U` uniform on `(0, 1]`.
#[derive(Debug)]
pub struct ExponentialArrivals {
    rate: f64,
    rng: StdRng,
}

impl ExponentialArrivals {
    /// Arrivals at `rate` vehicles per second on average.
    pub fn new(rate: f64) -> Result<Self, SimError> {
        Self::build(rate, None)
    }

    /// Same as [`ExponentialArrivals::new`] with a fixed PRNG seed.
    pub fn seeded(rate: f64, seed: u64) -> Result<Self, SimError> {
        Self::build(rate, Some(seed))
    }

    fn build(rate: f64, seed: Option<u64>) -> Result<Self, SimError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "arrival rate must be a positive finite number (got {rate})"
            )));
        }
        Ok(Self {
            rate,
            rng: rng_from(seed),
        })
    }

    /// Mean inter-arrival gap, `1 / rate`.
    pub fn mean_gap(&self) -> Duration {
        secs(self.rate.recip())
    }
}

impl ArrivalProcess for ExponentialArrivals {
    fn next_gap(&mut self) -> Option<Duration> {
        let u = 1.0 - self.rng.random::<f64>();
        Some(secs(-u.ln() / self.rate))
    }
}

/// Arrivals after a fixed list of gaps; exhausted when the list is.
#[derive(Debug, Clone, Default)]
pub struct ScriptedArrivals {
    gaps: VecDeque<Duration>,
}

impl ScriptedArrivals {
    /// Arrivals after each of `gaps`, in order.
    pub fn new(gaps: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            gaps: gaps.into_iter().collect(),
        }
    }

    /// Convenience constructor taking gaps in milliseconds.
    pub fn from_millis(gaps: &[u64]) -> Self {
        Self::new(gaps.iter().copied().map(Duration::from_millis))
    }
}

impl ArrivalProcess for ScriptedArrivals {
    fn next_gap(&mut self) -> Option<Duration> {
        self.gaps.pop_front()
    }
}
