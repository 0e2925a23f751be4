//! Simulation configuration structures.

use std::env::{self, VarError};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root simulation configuration.
///
/// `arrival_rate` is λ in vehicles per second: inter-arrival gaps follow
/// `Exponential(λ)` seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of spots (and wait queue depth).
    pub capacity: usize,
    /// Vehicles to emit; `None` runs until cancelled.
    pub total_cars: Option<u64>,
    /// Mean arrivals per second.
    pub arrival_rate: f64,
    /// Shortest dwell time in seconds.
    pub dwell_min_secs: f64,
    /// Longest dwell time in seconds.
    pub dwell_max_secs: f64,
    /// Observer polling period in milliseconds.
    pub poll_interval_ms: u64,
    /// PRNG seed; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            total_cars: Some(100),
            arrival_rate: 4.0,
            dwell_min_secs: 3.0,
            dwell_max_secs: 5.0,
            poll_interval_ms: 700,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.total_cars == Some(0) {
            return Err("total_cars must be greater than 0 (use null for unbounded)".into());
        }
        if !self.arrival_rate.is_finite() || self.arrival_rate <= 0.0 {
            return Err(format!(
                "arrival_rate must be a positive number (got {})",
                self.arrival_rate
            ));
        }
        if !self.dwell_min_secs.is_finite() || self.dwell_min_secs < 0.0 {
            return Err(format!(
                "dwell_min_secs must be non-negative (got {})",
                self.dwell_min_secs
            ));
        }
        if !self.dwell_max_secs.is_finite() || self.dwell_max_secs < self.dwell_min_secs {
            return Err(format!(
                "dwell_max_secs ({}) must be at least dwell_min_secs ({})",
                self.dwell_max_secs, self.dwell_min_secs
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// Missing fields take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg = Self::default().overlay_json(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `LOT_*` environment variables and validate.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Recognised variables: `LOT_CAPACITY`, `LOT_TOTAL_CARS` (a number or
    /// `unbounded`), `LOT_ARRIVAL_RATE`, `LOT_DWELL_MIN_SECS`,
    /// `LOT_DWELL_MAX_SECS`, `LOT_POLL_INTERVAL_MS`, `LOT_SEED`.
    pub fn from_env() -> Result<Self, String> {
        let cfg = Self::env_layer()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults, then the environment, then the fields present in `json`.
    ///
    /// Not validated: callers apply their own overrides first.
    pub fn layered(json: Option<&str>) -> Result<Self, String> {
        let cfg = Self::env_layer()?;
        match json {
            Some(input) => cfg.overlay_json(input),
            None => Ok(cfg),
        }
    }

    /// Replace only the fields `input` sets; the rest keep their current values.
    pub fn overlay_json(self, input: &str) -> Result<Self, String> {
        let patch: Value = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        let Value::Object(fields) = patch else {
            return Err("parse error: expected a JSON object".into());
        };
        let mut merged = serde_json::to_value(&self).map_err(|e| format!("encode error: {e}"))?;
        if let Some(base) = merged.as_object_mut() {
            base.extend(fields);
        }
        serde_json::from_value(merged).map_err(|e| format!("parse error: {e}"))
    }

    fn env_layer() -> Result<Self, String> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(format!(".env: {e}")),
        }
        let mut cfg = Self::default();
        if let Some(v) = env_var("LOT_CAPACITY")? {
            cfg.capacity = v;
        }
        if let Some(raw) = env_raw("LOT_TOTAL_CARS")? {
            cfg.total_cars = parse_total(&raw).map_err(|e| format!("LOT_TOTAL_CARS: {e}"))?;
        }
        if let Some(v) = env_var("LOT_ARRIVAL_RATE")? {
            cfg.arrival_rate = v;
        }
        if let Some(v) = env_var("LOT_DWELL_MIN_SECS")? {
            cfg.dwell_min_secs = v;
        }
        if let Some(v) = env_var("LOT_DWELL_MAX_SECS")? {
            cfg.dwell_max_secs = v;
        }
        if let Some(v) = env_var("LOT_POLL_INTERVAL_MS")? {
            cfg.poll_interval_ms = v;
        }
        if let Some(v) = env_var("LOT_SEED")? {
            cfg.seed = Some(v);
        }
        Ok(cfg)
    }
}

/// Parse a total-cars value: a positive count, or `unbounded`.
pub fn parse_total(raw: &str) -> Result<Option<u64>, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("unbounded") || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    raw.parse::<u64>()
        .map(Some)
        .map_err(|e| format!("expected a count or `unbounded`, got `{raw}`: {e}"))
}

fn env_raw(name: &str) -> Result<Option<String>, String> {
    match env::var(name) {
        Ok(raw) => Ok(Some(raw)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(format!("{name}: {e}")),
    }
}

fn env_var<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_raw(name)?
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| format!("{name}: cannot parse `{raw}`: {e}"))
        })
        .transpose()
}
