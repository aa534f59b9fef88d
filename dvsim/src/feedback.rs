use educe::Educe;
use thiserror::Error;
use crate::framework::RoutingSystem;

/// Invalid arguments, these reject construction of a router or a simulation
#[derive(Error)]
#[derive(Educe)]
#[educe(Debug(bound()), Clone(bound()), PartialEq(bound()))]
pub enum RoutingError<T: RoutingSystem + ?Sized> {
    #[error("{address} is not a valid router identifier.")]
    InvalidAddress {
        address: T::NodeAddress
    },
    /// Links are created with finite non-negative costs, failures are introduced later
    #[error("Link cost from router {router} to neighbour {neighbour} must be a finite non-negative number, got {cost}.")]
    InvalidLinkCost {
        router: T::NodeAddress,
        neighbour: T::NodeAddress,
        cost: f64
    },
    #[error("Router {address} appears more than once in the roster.")]
    DuplicateRouter {
        address: T::NodeAddress
    },
    /// Every neighbour has to be part of the simulation, otherwise its advertisements cannot be delivered
    #[error("Router {router} lists {neighbour} as a neighbour, but there is no such router.")]
    UnknownNeighbour {
        router: T::NodeAddress,
        neighbour: T::NodeAddress
    },
    /// The route to ourself must be (0, None)
    #[error("Router {address} does not have a zero-cost route to itself.")]
    CorruptSelfRoute {
        address: T::NodeAddress
    },
    #[error("There is no router {address} in the simulation.")]
    UnknownRouter {
        address: T::NodeAddress
    },
    #[error("The iteration budget must be greater than zero.")]
    ZeroIterations
}

/// Although this is an error enum, these should be treated as warnings.
/// The offending event is skipped and the simulation carries on.
#[derive(Error)]
#[derive(Educe)]
#[educe(Debug(bound()), Clone(bound()), PartialEq(bound()))]
pub enum RoutingWarning<T: RoutingSystem + ?Sized>{
    /// The scheduled link failure names a router that is not part of the simulation
    #[error("Link failure skipped, router {address} does not exist.")]
    UnknownRouter{
        address: T::NodeAddress
    },
    /// The scheduled link failure names two routers that do not list each other as neighbours
    #[error("Link failure skipped, routers {a} and {b} are not mutually adjacent.")]
    NotAdjacent{
        a: T::NodeAddress,
        b: T::NodeAddress
    }
}
