//! Core types for the street simulation
//!
//! Arena handles, shared constants, and the query record exposed to the
//! command layer.

/// Minimum longitudinal spacing between two cars on the same street, in meters.
pub const MIN_DISTANCE: u32 = 10;

/// A handle into the world's street arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreetId(pub usize);

/// A handle into the world's crossing arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrossingId(pub usize);

/// A handle into the world's car arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CarId(pub usize);

/// Lane capability of a street
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    /// One lane; overtaking is never possible
    SingleLane,
    /// Extra passing lane; overtaking is possible under spacing constraints
    FastLane,
}

/// Snapshot of a single car's observable state, returned by position queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarStatus {
    /// External id of the street the car is currently on
    pub street: u32,
    /// Distance in meters from the street's start
    pub position: u32,
    /// Current speed in meters per tick
    pub speed: u32,
}
