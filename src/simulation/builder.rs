//! Network construction and validation
//!
//! Parses the three-file text description of a network (crossings, streets,
//! cars), validates every structural rule, places the cars, and only then
//! hands back a ready `SimWorld`. Nothing is committed on failure: callers
//! keep their previous world when a load errors out.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::car::Car;
use super::crossing::Crossing;
use super::street::Street;
use super::types::{CarId, CrossingId, LaneKind, StreetId, MIN_DISTANCE};
use super::world::SimWorld;

/// File names expected inside a network directory
pub const CROSSINGS_FILE: &str = "crossings.sim";
pub const STREETS_FILE: &str = "streets.sim";
pub const CARS_FILE: &str = "cars.sim";

const MIN_GREEN_TIME: u32 = 3;
const MAX_GREEN_TIME: u32 = 10;
const MIN_STREETS: usize = 1;
const MAX_STREETS: usize = 4;
const MIN_LENGTH: u32 = 10;
const MAX_LENGTH: u32 = 10_000;
const MIN_SPEED_LIMIT: u32 = 5;
const MAX_SPEED_LIMIT: u32 = 40;
const MIN_DESIRED_SPEED: u32 = 20;
const MAX_DESIRED_SPEED: u32 = 40;
const MIN_ACCELERATION: u32 = 1;
const MAX_ACCELERATION: u32 = 10;

const ARROW: &str = "-->";

/// Load and validate a network from a directory holding `crossings.sim`,
/// `streets.sim`, and `cars.sim`. Returns a fully-placed candidate world.
pub fn load_network(dir: &Path) -> Result<SimWorld> {
    let crossings = read_lines(&dir.join(CROSSINGS_FILE))?;
    let streets = read_lines(&dir.join(STREETS_FILE))?;
    let cars = read_lines(&dir.join(CARS_FILE))?;
    build_network(&crossings, &streets, &cars)
}

/// Build and validate a network from in-memory description lines. The demo
/// scenario generator feeds this directly.
pub fn build_network(
    crossing_lines: &[String],
    street_lines: &[String],
    car_lines: &[String],
) -> Result<SimWorld> {
    let (mut crossings, crossing_ids) = parse_crossings(crossing_lines)?;
    let mut streets = parse_streets(street_lines, &crossing_ids, &mut crossings)?;
    check_street_degrees(&crossings)?;
    let cars = parse_cars(car_lines, &mut streets)?;
    check_capacities(&streets)?;

    let cars = place_cars(&streets, cars);
    Ok(SimWorld::new(streets, crossings, cars))
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read network file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse crossing declarations (`<id>:<green>t`). Returns the crossing arena
/// and the external-id -> handle map the street parser needs.
fn parse_crossings(lines: &[String]) -> Result<(Vec<Crossing>, HashMap<u32, CrossingId>)> {
    let mut crossings = Vec::with_capacity(lines.len());
    let mut ids = HashMap::new();

    for line in lines {
        let (id_text, green_text) = line
            .split_once(':')
            .with_context(|| format!("crossing declaration '{line}' is not of the form ID:TIMEt"))?;
        let green_text = green_text
            .strip_suffix('t')
            .with_context(|| format!("crossing declaration '{line}' is missing the 't' suffix"))?;

        let id: i64 = id_text
            .parse()
            .with_context(|| format!("crossing id '{id_text}' is not an integer"))?;
        if id < 0 {
            bail!("crossing id {id} is negative; ids must be >= 0");
        }
        let id = id as u32;

        let green: u32 = green_text
            .parse()
            .with_context(|| format!("green time '{green_text}' is not an integer"))?;
        if green != 0 && !(MIN_GREEN_TIME..=MAX_GREEN_TIME).contains(&green) {
            bail!(
                "crossing {id} has green time {green}t; it must be 0t or between \
                 {MIN_GREEN_TIME}t and {MAX_GREEN_TIME}t"
            );
        }

        if ids.insert(id, CrossingId(crossings.len())).is_some() {
            bail!("crossing id {id} is declared twice");
        }
        crossings.push(Crossing::new(id, green));
    }

    Ok((crossings, ids))
}

/// Parse street declarations (`START-->END:LENGTHm,LANESx,LIMITmax`), wiring
/// each street into its crossings' incoming/outgoing lists in declaration
/// order. Street ids are the declaration index.
fn parse_streets(
    lines: &[String],
    crossing_ids: &HashMap<u32, CrossingId>,
    crossings: &mut [Crossing],
) -> Result<Vec<Street>> {
    let mut streets = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let id = StreetId(index);
        let malformed =
            || format!("street declaration '{line}' is not of the form A-->B:LENm,TYPEx,LIMITmax");

        let (endpoints, rest) = line.split_once(':').with_context(malformed)?;
        let (start_text, end_text) = endpoints.split_once(ARROW).with_context(malformed)?;

        let mut fields = rest.split(',');
        let length_text = fields.next().and_then(|f| f.strip_suffix('m'));
        let lanes_text = fields.next().and_then(|f| f.strip_suffix('x'));
        let limit_text = fields.next().and_then(|f| f.strip_suffix("max"));
        let (Some(length_text), Some(lanes_text), Some(limit_text), None) =
            (length_text, lanes_text, limit_text, fields.next())
        else {
            bail!(malformed());
        };

        let start: u32 = start_text.parse().with_context(malformed)?;
        let end: u32 = end_text.parse().with_context(malformed)?;
        let length: u32 = length_text.parse().with_context(malformed)?;
        let lanes: u32 = lanes_text.parse().with_context(malformed)?;
        let limit: u32 = limit_text.parse().with_context(malformed)?;

        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            bail!(
                "street {} has length {length}m; it must be between {MIN_LENGTH}m and {MAX_LENGTH}m",
                index
            );
        }
        if !(MIN_SPEED_LIMIT..=MAX_SPEED_LIMIT).contains(&limit) {
            bail!(
                "street {} has speed limit {limit}; it must be between {MIN_SPEED_LIMIT} and \
                 {MAX_SPEED_LIMIT}",
                index
            );
        }
        if start == end {
            bail!("street {} starts and ends at crossing {start}", index);
        }
        let lane = match lanes {
            1 => LaneKind::SingleLane,
            2 => LaneKind::FastLane,
            _ => bail!(
                "street {} has lane type {lanes}; it must be 1 (single lane) or 2 (fast lane)",
                index
            ),
        };
        let (Some(&start_crossing), Some(&end_crossing)) =
            (crossing_ids.get(&start), crossing_ids.get(&end))
        else {
            bail!("street {} references an undeclared crossing", index);
        };

        crossings[start_crossing.0].outgoing.push(id);
        crossings[end_crossing.0].incoming.push(id);
        streets.push(Street::new(id, end_crossing, length, lane, limit));
    }

    Ok(streets)
}

/// Every crossing must be reachable and leavable: between 1 and 4 incoming
/// and outgoing streets each. Checked in ascending external-id order so the
/// first reported offender is deterministic.
fn check_street_degrees(crossings: &[Crossing]) -> Result<()> {
    let mut order: Vec<&Crossing> = crossings.iter().collect();
    order.sort_by_key(|crossing| crossing.id);

    for crossing in order {
        if !(MIN_STREETS..=MAX_STREETS).contains(&crossing.incoming.len()) {
            bail!(
                "crossing {} must have between {MIN_STREETS} and {MAX_STREETS} incoming streets",
                crossing.id
            );
        }
        if !(MIN_STREETS..=MAX_STREETS).contains(&crossing.outgoing.len()) {
            bail!(
                "crossing {} must have between {MIN_STREETS} and {MAX_STREETS} outgoing streets",
                crossing.id
            );
        }
    }
    Ok(())
}

/// Parse car declarations (`<id>,<street>,<speed>,<accel>`), registering each
/// car on its street in declaration order.
fn parse_cars(lines: &[String], streets: &mut [Street]) -> Result<Vec<Car>> {
    let mut cars = Vec::with_capacity(lines.len());
    let mut seen = HashSet::new();

    for line in lines {
        if line.starts_with(',') || line.ends_with(',') {
            bail!("car declaration '{line}' has a dangling comma");
        }
        let fields: Vec<&str> = line.split(',').collect();
        let [id_text, street_text, speed_text, accel_text] = fields.as_slice() else {
            bail!("car declaration '{line}' is not of the form ID,STREET,SPEED,ACCELERATION");
        };

        let id: i64 = id_text
            .parse()
            .with_context(|| format!("car id '{id_text}' is not an integer"))?;
        if id < 0 {
            bail!("car id {id} is negative; ids must be >= 0");
        }
        let id = id as u32;

        let street: usize = street_text
            .parse()
            .with_context(|| format!("street id '{street_text}' is not an integer"))?;
        let speed: u32 = speed_text
            .parse()
            .with_context(|| format!("desired speed '{speed_text}' is not an integer"))?;
        let accel: u32 = accel_text
            .parse()
            .with_context(|| format!("acceleration '{accel_text}' is not an integer"))?;

        if !(MIN_DESIRED_SPEED..=MAX_DESIRED_SPEED).contains(&speed) {
            bail!(
                "car {id} has desired speed {speed}; it must be between {MIN_DESIRED_SPEED} and \
                 {MAX_DESIRED_SPEED}"
            );
        }
        if !(MIN_ACCELERATION..=MAX_ACCELERATION).contains(&accel) {
            bail!(
                "car {id} has acceleration {accel}; it must be between {MIN_ACCELERATION} and \
                 {MAX_ACCELERATION}"
            );
        }
        if street >= streets.len() {
            bail!("car {id} references undeclared street {street}");
        }
        if !seen.insert(id) {
            bail!("car id {id} is declared twice");
        }

        streets[street].cars.push(CarId(cars.len()));
        cars.push(Car::new(id, StreetId(street), speed, accel));
    }

    Ok(cars)
}

fn check_capacities(streets: &[Street]) -> Result<()> {
    for street in streets {
        if street.cars.len() > street.capacity() {
            bail!(
                "street {} holds {} cars but fits at most {}",
                street.id.0,
                street.cars.len(),
                street.capacity()
            );
        }
    }
    Ok(())
}

/// Place each street's cars starting at the far end, stepping back one
/// minimum gap per car, in declaration order.
fn place_cars(streets: &[Street], mut cars: Vec<Car>) -> Vec<Car> {
    for street in streets {
        let mut position = street.length;
        for &car in &street.cars {
            cars[car.0].position = position;
            position = position.saturating_sub(MIN_DISTANCE);
        }
    }
    cars
}
