//! Street state and spacing queries
//!
//! A street owns the set of cars currently on it and answers the spacing
//! queries the movement rules and crossings are built on. Queries that can
//! come up empty return sentinel distances instead of errors: the street
//! length for "nearest car to the start of an empty street", and
//! `length + MIN_DISTANCE` for "no car ahead".

use super::car::Car;
use super::types::{CarId, CrossingId, LaneKind, StreetId, MIN_DISTANCE};

/// A directed street between two crossings
#[derive(Debug, Clone)]
pub struct Street {
    pub id: StreetId,
    /// Length in meters
    pub length: u32,
    /// Speed limit in meters per tick
    pub speed_limit: u32,
    pub lane: LaneKind,
    /// The crossing this street feeds into
    pub end_crossing: CrossingId,
    /// Cars currently on the street, unordered
    pub cars: Vec<CarId>,
}

impl Street {
    pub fn new(
        id: StreetId,
        end_crossing: CrossingId,
        length: u32,
        lane: LaneKind,
        speed_limit: u32,
    ) -> Self {
        Self {
            id,
            length,
            speed_limit,
            lane,
            end_crossing,
            cars: Vec::new(),
        }
    }

    /// Most cars the street can hold with minimum spacing maintained
    pub fn capacity(&self) -> usize {
        (self.length / MIN_DISTANCE) as usize + 1
    }

    pub fn is_free(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cars.len() == self.capacity()
    }

    pub fn add_car(&mut self, car: CarId) {
        debug_assert!(self.cars.len() < self.capacity());
        self.cars.push(car);
    }

    pub fn remove_car(&mut self, car: CarId) {
        self.cars.retain(|&c| c != car);
    }

    /// Position of the car nearest the street's start, or the street length
    /// if the street is empty. Crossings use this to decide whether an
    /// entering car has room.
    pub fn last_car_position(&self, cars: &[Car]) -> u32 {
        let mut position = self.length;
        for &car in &self.cars {
            position = position.min(cars[car.0].position);
        }
        position
    }

    /// Position of the nearest car strictly ahead of `observed`, or
    /// `length + MIN_DISTANCE` if the road ahead is clear.
    pub fn front_car_position(&self, cars: &[Car], observed: u32) -> u32 {
        let mut front = self.length + MIN_DISTANCE;
        for &car in &self.cars {
            let position = cars[car.0].position;
            if position > observed && position < front {
                front = position;
            }
        }
        front
    }

    /// True when no other car on the street is strictly ahead of `observed`
    pub fn is_leading(&self, cars: &[Car], observed: u32) -> bool {
        self.cars.iter().all(|&car| cars[car.0].position <= observed)
    }
}
