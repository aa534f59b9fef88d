use std::env;
use std::fs;
use std::thread::sleep;
use std::time::Duration;

use anyhow::Context;
use dvsim::concepts::address::RouterId;
use dvsim::concepts::report::{RoundReport, Termination};
use dvsim::concepts::route::RoutingTable;
use dvsim::feedback::RoutingWarning;
use dvsim::framework::{RoundObserver, RoutingSystem, SimulationParams};
use dvsim::simulation::Simulation;
use log::{info, LevelFilter};
use simplelog::*;

// Color codes for terminal output
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const RESET: &str = "\x1b[0m";

const DEFAULT_DELAY_MS: u64 = 2500;

struct Triangle {} // just a type to inform dvsim of the address type
impl RoutingSystem for Triangle {
    type NodeAddress = RouterId;
    fn config() -> SimulationParams<Self> {
        SimulationParams::default().with_link_failure(3, RouterId::Num(1), RouterId::Num(2))
    }
}

/// Prints every round the way a human wants to read it, then waits a bit
struct ConsolePrinter {
    delay: Duration,
}

fn render_table(table: &RoutingTable<Triangle>) -> String {
    let entries: Vec<String> = table
        .iter()
        .map(|(dest, entry)| match &entry.next_hop {
            Some(hop) => format!("{dest}: ({}, {hop})", entry.distance),
            None => format!("{dest}: ({}, None)", entry.distance),
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

impl RoundObserver<Triangle> for ConsolePrinter {
    fn on_round(&mut self, report: &RoundReport<Triangle>) {
        println!("\n=== Iteration {} ===", report.iteration);
        if let Some((a, b)) = &report.link_failure {
            println!("{YELLOW}\n!!! WARNING: Link failure simulated between Router {a} and Router {b} (link cost set to infinity) !!!{RESET}");
        }
        for change in &report.changes {
            println!(
                "{GREEN}  [Router {}] Route to {}: cost {} -> {}, via {}{RESET}",
                change.router, change.destination, change.previous, change.distance, change.via
            );
        }
        for (router, table) in &report.tables {
            println!("Router {router} Table: {}", render_table(table));
        }
        println!(
            "Summary: {} routing table updates performed in Iteration {}.",
            report.update_count, report.iteration
        );

        match report.terminal {
            Some(Termination::Converged) => println!("\nNetwork converged! No further changes."),
            Some(Termination::Exhausted) => println!("\nIteration budget exhausted, the network has not converged."),
            None => sleep(self.delay),
        }
    }

    fn on_warning(&mut self, warning: &RoutingWarning<Triangle>) {
        println!("{YELLOW}{warning}{RESET}");
    }
}

fn load_params(path: Option<String>) -> anyhow::Result<SimulationParams<Triangle>> {
    let Some(path) = path else {
        return Ok(Triangle::config());
    };
    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse simulation parameters from {path}"))
}

fn main() -> anyhow::Result<()> {
    let level = env::var("DVSIM_LOG")
        .ok()
        .and_then(|lvl| lvl.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let delay = match env::var("DVSIM_DELAY_MS") {
        Ok(ms) => ms.parse::<u64>().context("DVSIM_DELAY_MS must be a number of milliseconds")?,
        Err(_) => DEFAULT_DELAY_MS,
    };
    let params = load_params(env::args().nth(1))?;

    println!("{YELLOW}Initializing Distance Vector Routing Simulation...{RESET}");
    let id = RouterId::Num;
    let mut sim = Simulation::<Triangle>::new([
        (id(1), vec![(id(2), 2.0), (id(3), 5.0)]),
        (id(2), vec![(id(1), 2.0), (id(3), 1.0)]),
        (id(3), vec![(id(1), 5.0), (id(2), 1.0)]),
    ])?;

    let state = sim.run(&params, &mut ConsolePrinter {
        delay: Duration::from_millis(delay),
    });
    info!("Simulation finished in state {state:?}");
    Ok(())
}
