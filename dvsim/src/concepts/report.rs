use std::collections::{BTreeMap, BTreeSet};

use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::concepts::cost::LinkCost;
use crate::concepts::route::{RouteChange, RoutingTable};
use crate::framework::RoutingSystem;

/// Why a run stopped
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// a full round went by without a single table change
    Converged,
    /// the iteration budget ran out while tables were still changing
    Exhausted,
}

/// Result of one advertise-then-merge exchange
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct RoundOutcome<T: RoutingSystem + ?Sized> {
    /// number of delivered advertisements that changed the receiving table
    pub update_count: usize,
    pub changed_routers: BTreeSet<T::NodeAddress>,
    /// every accepted route update, in delivery order
    pub changes: Vec<RouteChange<T>>,
}

/// What the observer gets to see after each round
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct RoundReport<T: RoutingSystem + ?Sized> {
    pub iteration: u32,
    /// the routing table of every router at the end of the round
    #[cfg_attr(feature = "serde", serde(with = "serde_with::As::<Vec<(serde_with::Same, serde_with::Same)>>"))]
    pub tables: BTreeMap<T::NodeAddress, RoutingTable<T>>,
    pub update_count: usize,
    pub changed_routers: BTreeSet<T::NodeAddress>,
    pub changes: Vec<RouteChange<T>>,
    /// the link that was failed at the start of this round
    pub link_failure: Option<(T::NodeAddress, T::NodeAddress)>,
    pub terminal: Option<Termination>,
}

impl<T: RoutingSystem + ?Sized> RoundReport<T> {
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn table(&self, router: &T::NodeAddress) -> Option<&RoutingTable<T>> {
        self.tables.get(router)
    }

    /// Distance from `router` to `destination` as of this round
    pub fn distance(&self, router: &T::NodeAddress, destination: &T::NodeAddress) -> LinkCost {
        self.tables
            .get(router)
            .map_or(LinkCost::Unreachable, |table| table.distance(destination))
    }
}
