//! Network loading and validation tests
//!
//! Exercises the text-format parser, every structural validation rule, the
//! initial placement rule, and the demo scenario determinism.

use std::fs;
use std::path::PathBuf;

use street_sim::simulation::{
    build_network, load_network, Scenario, CARS_FILE, CROSSINGS_FILE, STREETS_FILE,
};

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|s| s.to_string()).collect()
}

/// Write a three-file network fixture into a fresh temp directory
fn write_fixture(name: &str, crossings: &str, streets: &str, cars: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("street_sim_test_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("fixture dir");
    fs::write(dir.join(CROSSINGS_FILE), crossings).expect("crossings fixture");
    fs::write(dir.join(STREETS_FILE), streets).expect("streets fixture");
    fs::write(dir.join(CARS_FILE), cars).expect("cars fixture");
    dir
}

#[test]
fn loads_a_network_directory_and_places_cars_from_the_far_end() {
    let dir = write_fixture(
        "load_ok",
        "0:0t\n1:5t\n",
        "0-->1:100m,1x,40max\n1-->0:200m,2x,30max\n",
        "0,0,40,10\n1,0,20,5\n2,1,25,1\n",
    );

    let world = load_network(&dir).expect("fixture should load");
    assert_eq!(world.crossing_count(), 2);
    assert_eq!(world.street_count(), 2);
    assert_eq!(world.car_count(), 3);

    // Declaration order, far end first, one minimum gap apart
    let first = world.car_status(0).unwrap();
    let second = world.car_status(1).unwrap();
    let third = world.car_status(2).unwrap();
    assert_eq!((first.street, first.position), (0, 100));
    assert_eq!((second.street, second.position), (0, 90));
    assert_eq!((third.street, third.position), (1, 200));

    // Everything starts standing
    assert_eq!(first.speed, 0);
    assert_eq!(second.speed, 0);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn load_fails_on_missing_files() {
    let dir = std::env::temp_dir().join(format!("street_sim_test_missing_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("fixture dir");
    assert!(load_network(&dir).is_err());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn rejects_green_time_outside_the_legal_band() {
    for green in ["1t", "2t", "11t"] {
        let declaration = format!("0:{green}");
        let result = build_network(
            &lines(&[declaration.as_str(), "1:0t"]),
            &lines(&["0-->1:100m,1x,40max", "1-->0:100m,1x,40max"]),
            &lines(&[]),
        );
        assert!(result.is_err(), "green time {green} should be rejected");
    }
}

#[test]
fn rejects_duplicate_crossing_ids() {
    let result = build_network(
        &lines(&["0:0t", "0:0t"]),
        &lines(&["0-->0:100m,1x,40max"]),
        &lines(&[]),
    );
    assert!(result.is_err());
}

#[test]
fn rejects_negative_ids() {
    let crossings = build_network(
        &lines(&["-1:0t", "1:0t"]),
        &lines(&[]),
        &lines(&[]),
    );
    assert!(crossings.is_err());

    let cars = build_network(
        &lines(&["0:0t", "1:0t"]),
        &lines(&["0-->1:100m,1x,40max", "1-->0:100m,1x,40max"]),
        &lines(&["-3,0,40,10"]),
    );
    assert!(cars.is_err());
}

#[test]
fn rejects_malformed_street_declarations() {
    let cases = [
        "0->1:100m,1x,40max",      // wrong arrow
        "0-->1:100,1x,40max",      // missing unit
        "0-->1:100m,1x",           // missing field
        "0-->1:100m,1x,40max,9",   // extra field
        "0-->1:100m,3x,40max",     // unknown lane type
        "0-->1:5m,1x,40max",       // too short
        "0-->1:20000m,1x,40max",   // too long
        "0-->1:100m,1x,50max",     // speed limit too high
        "0-->1:100m,1x,2max",      // speed limit too low
        "0-->0:100m,1x,40max",     // loop street
        "0-->7:100m,1x,40max",     // undeclared crossing
    ];
    for case in cases {
        let result = build_network(
            &lines(&["0:0t", "1:0t"]),
            &lines(&[case, "1-->0:100m,1x,40max"]),
            &lines(&[]),
        );
        assert!(result.is_err(), "street '{case}' should be rejected");
    }
}

#[test]
fn rejects_malformed_car_declarations() {
    let cases = [
        ",0,40,10",    // dangling comma
        "0,0,40,10,",  // dangling comma
        "0,0,40",      // missing field
        "0,0,40,10,3", // extra field
        "0,0,10,10",   // desired speed too low
        "0,0,50,10",   // desired speed too high
        "0,0,40,0",    // no acceleration
        "0,0,40,11",   // acceleration too high
        "0,9,40,10",   // undeclared street
        "x,0,40,10",   // non-numeric id
    ];
    for case in cases {
        let result = build_network(
            &lines(&["0:0t", "1:0t"]),
            &lines(&["0-->1:100m,1x,40max", "1-->0:100m,1x,40max"]),
            &lines(&[case]),
        );
        assert!(result.is_err(), "car '{case}' should be rejected");
    }
}

#[test]
fn rejects_duplicate_car_ids() {
    let result = build_network(
        &lines(&["0:0t", "1:0t"]),
        &lines(&["0-->1:100m,1x,40max", "1-->0:100m,1x,40max"]),
        &lines(&["4,0,40,10", "4,1,40,10"]),
    );
    assert!(result.is_err());
}

#[test]
fn rejects_crossings_with_missing_or_excessive_streets() {
    // Crossing 0 has an outgoing street but nothing incoming
    let unreachable = build_network(
        &lines(&["0:0t", "1:0t", "2:0t"]),
        &lines(&[
            "0-->1:100m,1x,40max",
            "1-->2:100m,1x,40max",
            "2-->1:100m,1x,40max",
        ]),
        &lines(&[]),
    );
    assert!(unreachable.is_err());

    // Crossing 0 has five incoming streets
    let crowded = build_network(
        &lines(&["0:0t", "1:0t", "2:0t", "3:0t", "4:0t", "5:0t"]),
        &lines(&[
            "1-->0:100m,1x,40max",
            "2-->0:100m,1x,40max",
            "3-->0:100m,1x,40max",
            "4-->0:100m,1x,40max",
            "5-->0:100m,1x,40max",
            "0-->1:100m,1x,40max",
            "0-->2:100m,1x,40max",
            "0-->3:100m,1x,40max",
            "0-->4:100m,1x,40max",
            "1-->2:100m,1x,40max",
            "2-->3:100m,1x,40max",
            "3-->4:100m,1x,40max",
            "4-->5:100m,1x,40max",
            "5-->1:100m,1x,40max",
        ]),
        &lines(&[]),
    );
    assert!(crowded.is_err());
}

#[test]
fn rejects_more_cars_than_a_street_can_space_out() {
    // Length 10 fits two cars (positions 10 and 0)
    let result = build_network(
        &lines(&["0:0t", "1:0t"]),
        &lines(&["0-->1:10m,1x,40max", "1-->0:100m,1x,40max"]),
        &lines(&["0,0,40,10", "1,0,40,10", "2,0,40,10"]),
    );
    assert!(result.is_err());

    let at_capacity = build_network(
        &lines(&["0:0t", "1:0t"]),
        &lines(&["0-->1:10m,1x,40max", "1-->0:100m,1x,40max"]),
        &lines(&["0,0,40,10", "1,0,40,10"]),
    );
    assert!(at_capacity.is_ok());
}

#[test]
fn demo_scenario_is_deterministic_under_a_seed() {
    let mut first = Scenario::with_seed(7).build(8).expect("demo build");
    let mut second = Scenario::with_seed(7).build(8).expect("demo build");

    for _ in 0..100 {
        first.step();
        second.step();
    }

    for id in first.car_ids() {
        assert_eq!(first.car_status(id), second.car_status(id));
    }
}
