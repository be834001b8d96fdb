//! Crossing admission logic
//!
//! A crossing gates the transition of a car from an incoming street onto one
//! of its outgoing streets. Roundabouts admit from any incoming street; light
//! controlled crossings grant right of way to exactly one incoming street at
//! a time, rotating on a fixed dwell.

use super::car::Car;
use super::street::Street;
use super::types::{StreetId, MIN_DISTANCE};

/// Right-of-way regime of a crossing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossingControl {
    /// Roundabout: every incoming street may release cars on every tick
    YieldFree,
    /// Light cycle: one incoming street holds the green at a time
    Cycled {
        /// Dwell of each green phase, in ticks
        green_time: u32,
        /// Index into the incoming list that currently holds the green
        active_incoming: usize,
        /// Ticks left before the green rotates
        ticks_remaining: u32,
    },
}

/// A crossing in the street network
#[derive(Debug, Clone)]
pub struct Crossing {
    /// External identifier from the network description
    pub id: u32,
    pub control: CrossingControl,
    /// Incoming streets in declaration order; the order is the green cycle
    pub incoming: Vec<StreetId>,
    /// Outgoing streets in declaration order; the order is the turn-index
    /// branch numbering
    pub outgoing: Vec<StreetId>,
}

impl Crossing {
    /// A green time of zero declares a roundabout; anything else starts a
    /// light cycle with the first incoming street on green.
    pub fn new(id: u32, green_time: u32) -> Self {
        let control = if green_time == 0 {
            CrossingControl::YieldFree
        } else {
            CrossingControl::Cycled {
                green_time,
                active_incoming: 0,
                ticks_remaining: green_time,
            }
        };
        Self {
            id,
            control,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// Resolve a car's turn index to an outgoing street. An index beyond the
    /// streets this crossing actually has falls back to the first exit; the
    /// index itself is left untouched and wraps only at end-of-tick
    /// bookkeeping.
    pub fn resolve_exit(&self, turn_index: u32) -> StreetId {
        let index = turn_index as usize;
        let index = if index >= self.outgoing.len() { 0 } else { index };
        self.outgoing[index]
    }

    /// Decide whether `car`, waiting at the end of its street, may transition
    /// onto its desired exit this tick.
    pub fn turn_allowed(&self, car: &Car, streets: &[Street], cars: &[Car]) -> bool {
        let exit = self.resolve_exit(car.turn_index);
        let target = &streets[exit.0];

        if let CrossingControl::Cycled {
            active_incoming, ..
        } = self.control
        {
            let lane = self.incoming.iter().position(|&s| s == car.street);
            if lane != Some(active_incoming) {
                return false;
            }
        }

        if target.is_full() {
            return false;
        }
        if !target.is_free() && target.last_car_position(cars) < MIN_DISTANCE {
            return false;
        }

        true
    }

    /// Advance the light cycle by one tick. Roundabouts have no clock.
    pub fn tick(&mut self) {
        if let CrossingControl::Cycled {
            green_time,
            active_incoming,
            ticks_remaining,
        } = &mut self.control
        {
            *ticks_remaining -= 1;
            if *ticks_remaining == 0 {
                *active_incoming += 1;
                if *active_incoming >= self.incoming.len() {
                    *active_incoming = 0;
                }
                *ticks_remaining = *green_time;
            }
        }
    }
}
