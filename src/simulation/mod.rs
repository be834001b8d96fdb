//! Standalone street simulation module
//!
//! This module contains all the simulation logic: the per-tick engine, the
//! network builder, and the demo scenario generator. It has no knowledge of
//! the command session in the binary and can be driven directly from tests.

mod builder;
mod car;
mod crossing;
mod scenario;
mod street;
mod types;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use builder::{build_network, load_network, CARS_FILE, CROSSINGS_FILE, STREETS_FILE};
#[allow(unused_imports)]
pub use car::{Car, MAX_TURN_INDEX};
#[allow(unused_imports)]
pub use crossing::{Crossing, CrossingControl};
#[allow(unused_imports)]
pub use scenario::Scenario;
#[allow(unused_imports)]
pub use street::Street;
#[allow(unused_imports)]
pub use types::{CarId, CarStatus, CrossingId, LaneKind, StreetId, MIN_DISTANCE};
pub use world::SimWorld;
