mod simulation;

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::Parser;
use log::info;

use simulation::{CarStatus, Scenario, SimWorld};

#[derive(Parser)]
#[command(name = "street_sim")]
#[command(about = "Discrete-tick street traffic simulation")]
struct Cli {
    /// Run the built-in demo network instead of the interactive session
    #[arg(long)]
    demo: bool,

    /// Number of simulation ticks to run in demo mode
    #[arg(long, default_value = "50")]
    ticks: u64,

    /// Number of cars to generate in demo mode
    #[arg(long, default_value = "8")]
    cars: usize,

    /// RNG seed for demo network generation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.demo {
        run_demo(cli.ticks, cli.cars, cli.seed);
    } else {
        run_session();
    }
}

/// Interactive command session: `load`, `simulate`, `position`, `quit`.
/// Errors never end the session; a failed load keeps the previous network.
fn run_session() {
    let stdin = io::stdin();
    let mut world: Option<SimWorld> = None;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if !handle_line(&mut world, &line) {
            break;
        }
        io::stdout().flush().ok();
    }
}

/// Dispatch one command line. Returns false when the session should end.
fn handle_line(world: &mut Option<SimWorld>, line: &str) -> bool {
    if line.is_empty() || line.ends_with(' ') {
        print_error("invalid command");
        return true;
    }
    let parts: Vec<&str> = line.split(' ').collect();

    match (parts[0], &parts[1..]) {
        ("load", [path]) => {
            match simulation::load_network(Path::new(path)) {
                Ok(candidate) => {
                    info!(
                        "loaded network: {} crossings, {} streets, {} cars",
                        candidate.crossing_count(),
                        candidate.street_count(),
                        candidate.car_count()
                    );
                    // Candidate is fully validated; only now replace the
                    // live world
                    *world = Some(candidate);
                    println!("READY");
                }
                Err(error) => print_error(&format!("{error:#}")),
            }
        }
        ("simulate", [count]) => match world {
            Some(world) => match count.parse::<u64>() {
                Ok(count) => {
                    for _ in 0..count {
                        world.step();
                    }
                    println!("READY");
                }
                Err(_) => print_error("invalid arguments of command simulate"),
            },
            None => print_error("street network is yet to be loaded"),
        },
        ("position", [car_id]) => match world {
            Some(world) => match car_id.parse::<u32>() {
                Ok(id) => match world.car_status(id) {
                    Some(status) => println!("{}", describe_car(id, status)),
                    None => print_error(&format!("there is no car with the identifier {id}")),
                },
                Err(_) => print_error("invalid arguments of command position"),
            },
            None => print_error("street network is yet to be loaded"),
        },
        ("quit", _) => return false,
        _ => print_error("invalid command"),
    }
    true
}

fn print_error(text: &str) {
    println!("Error: {text}.");
}

fn describe_car(id: u32, status: CarStatus) -> String {
    format!(
        "Car {id} on street {} with speed {} and position {}",
        status.street, status.speed, status.position
    )
}

/// Run the generated demo network for a fixed number of ticks, printing a
/// position table periodically
fn run_demo(ticks: u64, cars: usize, seed: Option<u64>) {
    let scenario = match seed {
        Some(seed) => Scenario::with_seed(seed),
        None => Scenario::new(),
    };

    let mut world = match scenario.build(cars) {
        Ok(world) => world,
        Err(error) => {
            eprintln!("Error: {error:#}.");
            std::process::exit(1);
        }
    };

    println!(
        "Demo network: {} crossings, {} streets, {} cars",
        world.crossing_count(),
        world.street_count(),
        world.car_count()
    );
    print_positions(&world);

    for tick in 1..=ticks {
        world.step();
        if tick % 10 == 0 {
            println!("--- After tick {tick} ---");
            print_positions(&world);
        }
    }

    println!("=== SIMULATION COMPLETE ===");
    println!("Ticks simulated: {}", world.tick_count);
    print_positions(&world);
}

fn print_positions(world: &SimWorld) {
    for id in world.car_ids() {
        if let Some(status) = world.car_status(id) {
            println!("{}", describe_car(id, status));
        }
    }
}
