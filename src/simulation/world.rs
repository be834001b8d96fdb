//! Main simulation world that ties everything together
//!
//! The world owns the three entity arenas and drives one tick at a time.
//! Entities are referenced by arena index everywhere inside the engine; the
//! external car identifiers only matter at the query boundary.

use std::collections::HashMap;

use super::car::Car;
use super::crossing::Crossing;
use super::street::Street;
use super::types::{CarId, CarStatus, CrossingId, LaneKind, StreetId, MIN_DISTANCE};

/// The simulation world: all streets, crossings, and cars of one loaded
/// network, plus the tick counter.
pub struct SimWorld {
    pub streets: Vec<Street>,
    pub crossings: Vec<Crossing>,
    pub cars: Vec<Car>,

    /// External car id -> arena handle, for position queries
    car_index: HashMap<u32, CarId>,

    /// Ticks simulated so far
    pub tick_count: u64,
}

impl SimWorld {
    /// Assemble a world from fully-built arenas. The builder is responsible
    /// for every structural invariant; from here on no operation can fail.
    pub fn new(streets: Vec<Street>, crossings: Vec<Crossing>, cars: Vec<Car>) -> Self {
        let car_index = cars
            .iter()
            .enumerate()
            .map(|(index, car)| (car.id, CarId(index)))
            .collect();
        Self {
            streets,
            crossings,
            cars,
            car_index,
            tick_count: 0,
        }
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    pub fn crossing_count(&self) -> usize {
        self.crossings.len()
    }

    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    /// Look up a car's observable state by its external id
    pub fn car_status(&self, car_id: u32) -> Option<CarStatus> {
        self.car_index.get(&car_id).map(|&handle| {
            let car = &self.cars[handle.0];
            CarStatus {
                street: car.street.0 as u32,
                position: car.position,
                speed: car.speed,
            }
        })
    }

    /// External ids of all cars, ascending
    pub fn car_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.cars.iter().map(|car| car.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Advance the whole simulation by one tick: every street moves its
    /// cars, then every crossing advances its light cycle, then every car
    /// clears its per-tick state. The last phase must not start before the
    /// first two have finished for all entities.
    pub fn step(&mut self) {
        for index in 0..self.streets.len() {
            self.advance_street(StreetId(index));
        }
        for crossing in &mut self.crossings {
            crossing.tick();
        }
        for car in &mut self.cars {
            car.end_tick();
        }
        self.tick_count += 1;
    }

    /// One street's worth of car advancement. Cars are processed nearest the
    /// street end first: a follower's decision depends on the position its
    /// leader already reached this tick, so the leader must settle first.
    /// Spacing queries always read the live arena, never a snapshot.
    fn advance_street(&mut self, street_id: StreetId) {
        let mut order = self.streets[street_id.0].cars.clone();
        order.sort_by(|&a, &b| self.cars[b.0].position.cmp(&self.cars[a.0].position));

        for car_id in order {
            if self.cars[car_id.0].moved_this_tick {
                continue;
            }

            let length = self.streets[street_id.0].length;
            let speed_limit = self.streets[street_id.0].speed_limit;
            self.cars[car_id.0].update_speed(speed_limit);

            let start = self.cars[car_id.0].position;
            let speed = self.cars[car_id.0].speed;
            let front = self.streets[street_id.0].front_car_position(&self.cars, start);
            let leading = self.streets[street_id.0].is_leading(&self.cars, start);

            if !leading && front - MIN_DISTANCE == start {
                // Already tailing the front car at the minimum gap
                self.cars[car_id.0].traveled = 0;
            } else if (!leading && start + speed <= front - MIN_DISTANCE)
                || (leading && start + speed <= length)
            {
                // Clear road for the whole step
                let car = &mut self.cars[car_id.0];
                car.position = start + speed;
                car.traveled = speed;
            } else if !leading {
                // Blocked behind the front car: close up to the minimum gap,
                // then spend the leftover on an overtake if one is possible
                let stop = front - MIN_DISTANCE;
                self.cars[car_id.0].position = stop;
                let leftover = start + speed - stop;
                if self.overtake_allowed(street_id, stop, leftover) {
                    self.overtake(street_id, car_id, leftover);
                }
                self.cars[car_id.0].traveled = self.cars[car_id.0].position - start;
            } else {
                // Leading and past the street end: turn if the crossing
                // admits, otherwise queue at the stop line
                let crossing_id = self.streets[street_id.0].end_crossing;
                let allowed = self.crossings[crossing_id.0].turn_allowed(
                    &self.cars[car_id.0],
                    &self.streets,
                    &self.cars,
                );
                if allowed {
                    self.turn(car_id, crossing_id, start + speed);
                } else {
                    let car = &mut self.cars[car_id.0];
                    car.position = length;
                    car.traveled = length - start;
                }
            }

            // A car that went nowhere is standing, not displacement-limited
            if self.cars[car_id.0].traveled == 0 {
                self.cars[car_id.0].speed = 0;
            }
        }
    }

    /// Whether a car sitting at `position` (already closed up to the minimum
    /// gap) may pass its front car with `leftover` meters of this tick's
    /// movement still unspent. Needs a fast lane, enough leftover to clear
    /// the leader, and room beyond the leader to tuck back in.
    fn overtake_allowed(&self, street_id: StreetId, position: u32, leftover: u32) -> bool {
        let street = &self.streets[street_id.0];
        if street.lane == LaneKind::SingleLane {
            return false;
        }
        if leftover < 2 * MIN_DISTANCE {
            return false;
        }

        let front = street.front_car_position(&self.cars, position);
        let next = street.front_car_position(&self.cars, front);

        next >= front + 2 * MIN_DISTANCE
    }

    /// Perform the overtake maneuver: the pass itself costs two minimum
    /// gaps of distance; whatever remains is spent advancing, bounded by the
    /// gap to the car beyond the overtaken one.
    fn overtake(&mut self, street_id: StreetId, car_id: CarId, leftover: u32) {
        let position = self.cars[car_id.0].position;
        let passed = position + 2 * MIN_DISTANCE;
        let remaining = leftover - 2 * MIN_DISTANCE;

        let next = self.streets[street_id.0].front_car_position(&self.cars, passed);

        let ending = if passed + remaining >= next - MIN_DISTANCE {
            next - MIN_DISTANCE
        } else {
            passed + remaining
        };

        self.cars[car_id.0].position = ending;
    }

    /// Relocate a car through a crossing onto its resolved exit street.
    /// `distance` is the unclamped reach of this tick (`start + speed`); the
    /// part past the old street's end carries over onto the new street,
    /// bounded by the new street's length or its rearmost car.
    fn turn(&mut self, car_id: CarId, crossing_id: CrossingId, distance: u32) {
        let old_street = self.cars[car_id.0].street;
        let old_length = self.streets[old_street.0].length;
        let position = self.cars[car_id.0].position;
        let overflow = distance - old_length;

        let exit = self.crossings[crossing_id.0].resolve_exit(self.cars[car_id.0].turn_index);

        let new_position = {
            let target = &self.streets[exit.0];
            if target.is_free() {
                overflow.min(target.length)
            } else {
                let last = target.last_car_position(&self.cars);
                if last - MIN_DISTANCE < overflow {
                    last - MIN_DISTANCE
                } else {
                    overflow
                }
            }
        };

        self.streets[exit.0].add_car(car_id);
        self.streets[old_street.0].remove_car(car_id);

        let car = &mut self.cars[car_id.0];
        car.traveled = (old_length - position) + new_position;
        car.position = new_position;
        car.turn_index += 1;
        car.street = exit;
        car.moved_this_tick = true;
    }
}
