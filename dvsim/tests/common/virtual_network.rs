use dvsim::concepts::address::RouterId;
use dvsim::concepts::cost::LinkCost;
use dvsim::framework::{RoundLog, RoutingSystem, SimulationParams};
use dvsim::router::Router;
use dvsim::simulation::{Simulation, SimulationState};

pub struct VirtualSystem;

impl RoutingSystem for VirtualSystem {
    type NodeAddress = RouterId;
}

pub fn id(n: i64) -> RouterId {
    RouterId::Num(n)
}

pub struct VirtualNetwork {
    pub sim: Simulation<VirtualSystem>,
    pub log: RoundLog<VirtualSystem>,
}

impl VirtualNetwork {
    /// Builds a symmetric network from `(a, b, cost)` edges
    pub fn create(nodes: &[i64], links: &[(i64, i64, f64)]) -> VirtualNetwork {
        let roster = nodes.iter().map(|node| {
            let neighbours: Vec<(RouterId, f64)> = links
                .iter()
                .filter(|(a, b, _)| a == node || b == node)
                .map(|(a, b, cost)| (id(if a == node { *b } else { *a }), *cost))
                .collect();
            (id(*node), neighbours)
        });
        VirtualNetwork {
            sim: Simulation::new(roster).unwrap(),
            log: RoundLog::default(),
        }
    }

    pub fn run(&mut self, params: &SimulationParams<VirtualSystem>) -> SimulationState {
        self.sim.run(params, &mut self.log)
    }

    pub fn run_n(&mut self, max_iterations: u32) -> SimulationState {
        self.run(&SimulationParams::new(max_iterations).unwrap())
    }

    pub fn get_metric_to(&self, cur: i64, dest: i64) -> LinkCost {
        let router = self.sim.router(&id(cur)).unwrap_or_else(|| panic!("No node {cur} found"));
        router.get_distance(&id(dest))
    }

    pub fn get_next_hop(&self, cur: i64, dest: i64) -> Option<RouterId> {
        let router = self.sim.router(&id(cur)).unwrap_or_else(|| panic!("No node {cur} found"));
        router
            .route(&id(dest))
            .unwrap_or_else(|| panic!("No route found to {dest}"))
            .next_hop
            .clone()
    }

    pub fn freeze(&self) -> String {
        serde_json::to_string(self.sim.routers()).unwrap()
    }

    pub fn restore(state: &str) -> VirtualNetwork {
        let routers: Vec<Router<VirtualSystem>> = serde_json::from_str(state).unwrap();
        VirtualNetwork {
            sim: Simulation::from_routers(routers).unwrap(),
            log: RoundLog::default(),
        }
    }
}
