//! Builders to construct lots and arrival processes from configuration.

pub mod lot_builder;

pub use lot_builder::{build_arrivals, build_lot};
