//! Car state for the street simulation
//!
//! A car only owns its kinematic fields and per-tick bookkeeping; movement
//! decisions are made by the world's per-street advancement loop.

use super::types::StreetId;

/// Highest turn index a car may hold before end-of-tick bookkeeping wraps it
/// back to the first exit. Matches the maximum outgoing-street count of a
/// crossing minus one.
pub const MAX_TURN_INDEX: u32 = 3;

/// A car in the simulation
#[derive(Debug, Clone)]
pub struct Car {
    /// External identifier, unique across the loaded network
    pub id: u32,
    /// Street the car is currently on
    pub street: StreetId,
    /// Distance in meters from the street's start
    pub position: u32,
    /// Current speed in meters per tick
    pub speed: u32,
    /// Cruising speed the car accelerates towards
    pub desired_speed: u32,
    /// Speed gained per tick, up to the desired speed and street limit
    pub acceleration: u32,
    /// Cyclic index selecting the exit taken at the next crossing
    pub turn_index: u32,
    /// Set when the car has been advanced this tick (it turned onto a street
    /// whose own advancement runs later in the same tick)
    pub moved_this_tick: bool,
    /// Net displacement accumulated this tick; a car that traveled nothing is
    /// forced to a standstill at the end of its update
    pub traveled: u32,
}

impl Car {
    pub fn new(id: u32, street: StreetId, desired_speed: u32, acceleration: u32) -> Self {
        Self {
            id,
            street,
            position: 0,
            speed: 0,
            desired_speed,
            acceleration,
            turn_index: 0,
            moved_this_tick: false,
            traveled: 0,
        }
    }

    /// Accelerate towards the desired speed, capped by the street's limit.
    /// Runs once per tick before any position change.
    pub fn update_speed(&mut self, speed_limit: u32) {
        self.speed = self
            .desired_speed
            .min(self.speed + self.acceleration)
            .min(speed_limit);
    }

    /// End-of-tick bookkeeping: clear the moved flag and wrap an exhausted
    /// turn index. Wrapping happens only here, never at use time, so the
    /// index stays readable for the whole tick it was incremented in.
    pub fn end_tick(&mut self) {
        self.moved_this_tick = false;
        if self.turn_index > MAX_TURN_INDEX {
            self.turn_index = 0;
        }
    }
}
