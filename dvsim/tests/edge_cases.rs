use dvsim::concepts::address::RouterId;
use dvsim::concepts::cost::LinkCost;
use dvsim::feedback::RoutingError;
use dvsim::framework::{MergePolicy, SimulationParams};
use dvsim::router::Router;
use dvsim::simulation::Simulation;

use crate::common::virtual_network::{id, VirtualNetwork, VirtualSystem};

mod common;

#[test]
fn zero_iterations_rejected() {
    assert_eq!(
        SimulationParams::<VirtualSystem>::new(0).unwrap_err(),
        RoutingError::ZeroIterations
    );
    assert!(serde_json::from_str::<SimulationParams<VirtualSystem>>(r#"{"max_iterations": 0}"#).is_err());
}

#[test]
fn duplicate_router_rejected() {
    let result = Simulation::<VirtualSystem>::new([
        (id(1), vec![(id(2), 1.0)]),
        (id(2), vec![(id(1), 1.0)]),
        (id(1), vec![]),
    ]);
    assert_eq!(result.err(), Some(RoutingError::DuplicateRouter { address: id(1) }));
}

#[test]
fn unknown_neighbour_rejected() {
    let result = Simulation::<VirtualSystem>::new([
        (id(1), vec![(id(2), 1.0), (id(7), 1.0)]),
        (id(2), vec![(id(1), 1.0)]),
    ]);
    assert_eq!(
        result.err(),
        Some(RoutingError::UnknownNeighbour {
            router: id(1),
            neighbour: id(7)
        })
    );
}

#[test]
fn negative_cost_rejected() {
    let result = Simulation::<VirtualSystem>::new([
        (id(1), vec![(id(2), 1.0)]),
        (id(2), vec![(id(1), -3.0)]),
    ]);
    let err = result.err().unwrap();
    assert_eq!(
        err,
        RoutingError::InvalidLinkCost {
            router: id(2),
            neighbour: id(1),
            cost: -3.0
        }
    );
    assert!(err.to_string().contains("-3"));
}

#[test]
fn set_link_cost_checks_roster() {
    let mut network = common::graphs::vnet_triangle();
    assert!(matches!(
        network.sim.set_link_cost(&id(1), id(9), LinkCost::from(1)),
        Err(RoutingError::UnknownNeighbour { .. })
    ));
    assert!(matches!(
        network.sim.set_link_cost(&id(9), id(1), LinkCost::from(1)),
        Err(RoutingError::UnknownRouter { .. })
    ));
    assert_eq!(
        network.sim.set_link_cost(&id(1), id(2), LinkCost::Unreachable),
        Ok(Some(LinkCost::from(2)))
    );
}

#[test]
fn isolated_router_converges_immediately() {
    let mut network = VirtualNetwork::create(&[1], &[]);
    network.run_n(5);
    assert_eq!(network.log.reports.len(), 1);
    assert_eq!(network.log.reports[0].update_count, 0);
    assert_eq!(network.get_metric_to(1, 1), LinkCost::ZERO);
}

#[test]
fn mixed_identifier_styles() {
    let core = RouterId::from("core");
    let mut sim = Simulation::<VirtualSystem>::new([
        (id(1), vec![(core.clone(), 1.5)]),
        (core.clone(), vec![(id(1), 1.5), (id(2), 0.5)]),
        (id(2), vec![(core.clone(), 0.5)]),
    ])
    .unwrap();
    sim.run(&SimulationParams::new(10).unwrap(), &mut dvsim::framework::NoObserver);
    let r1 = sim.router(&id(1)).unwrap();
    assert_eq!(r1.get_distance(&id(2)), LinkCost::new(2.0).unwrap());
    assert_eq!(r1.route(&id(2)).unwrap().next_hop, Some(core));
}

#[test]
fn freeze_and_restore() {
    let mut network = common::graphs::vnet_simple_weighted();
    network.run_n(10);

    let state = network.freeze();
    let mut restored = VirtualNetwork::restore(&state);
    assert_eq!(restored.sim.tables(), network.sim.tables());
    assert_eq!(restored.sim.exchange_round(MergePolicy::StrictImprovement).update_count, 0);
    assert_eq!(restored.get_metric_to(1, 5), LinkCost::from(8));
}

#[test]
fn failed_link_serializes_as_null() {
    let mut router = Router::<VirtualSystem>::new(id(1), [(id(2), 4.0)]).unwrap();
    router.set_link_cost(id(2), LinkCost::Unreachable).unwrap();
    let json = serde_json::to_value(&router).unwrap();
    assert_eq!(json["links"], serde_json::json!([[2, null]]));
    assert_eq!(json["address"], serde_json::json!(1));

    let back: Router<VirtualSystem> = serde_json::from_value(json).unwrap();
    assert_eq!(back.link_cost(&id(2)), LinkCost::Unreachable);
}

#[test]
fn params_from_json() {
    let params: SimulationParams<VirtualSystem> = serde_json::from_str(
        r#"{
            "max_iterations": 4,
            "link_failure": { "iteration": 2, "endpoints": [1, "edge"] },
            "merge_policy": "TrackNextHop"
        }"#,
    )
    .unwrap();
    assert_eq!(params.max_iterations.get(), 4);
    assert_eq!(params.merge_policy, MergePolicy::TrackNextHop);
    let failure = params.link_failure.unwrap();
    assert_eq!(failure.iteration, 2);
    assert_eq!(failure.endpoints, (id(1), RouterId::from("edge")));

    let defaults: SimulationParams<VirtualSystem> = serde_json::from_str(r#"{"max_iterations": 7}"#).unwrap();
    assert!(defaults.link_failure.is_none());
    assert_eq!(defaults.merge_policy, MergePolicy::StrictImprovement);
}

fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> Result<(), RoutingError<VirtualSystem>> {
    let mut network = common::graphs::vnet_triangle();
    network.run_n(10);
    let mut state: serde_json::Value = serde_json::from_str(&network.freeze()).unwrap();
    edit(&mut state);
    let routers: Vec<Router<VirtualSystem>> = serde_json::from_value(state).unwrap();
    Simulation::from_routers(routers).map(|_| ())
}

#[test]
fn restore_rejects_overwritten_self_route() {
    let result = tampered(|state| {
        state[0]["routes"]["entries"][0][1] = serde_json::json!({ "distance": 7.0, "next_hop": 2 });
    });
    assert_eq!(result, Err(RoutingError::CorruptSelfRoute { address: id(1) }));
}

#[test]
fn restore_rejects_missing_self_route() {
    let result = tampered(|state| {
        state[1]["routes"]["entries"] = serde_json::json!([]);
    });
    assert_eq!(result, Err(RoutingError::CorruptSelfRoute { address: id(2) }));
}

#[test]
fn restore_rejects_invalid_address() {
    let result = tampered(|state| {
        state[2]["address"] = serde_json::json!("");
    });
    assert_eq!(result, Err(RoutingError::InvalidAddress { address: RouterId::from("") }));
}

#[test]
fn restore_keeps_numeric_ids() {
    let network = {
        let mut network = common::graphs::vnet_triangle();
        network.run_n(10);
        network
    };
    let restored = VirtualNetwork::restore(&network.freeze());
    let addresses: Vec<_> = restored.sim.routers().iter().map(|r| r.address().clone()).collect();
    assert_eq!(addresses, vec![id(1), id(2), id(3)]);
    assert_eq!(restored.get_next_hop(1, 3), Some(id(2)));
}
