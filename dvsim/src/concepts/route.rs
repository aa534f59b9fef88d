use std::collections::btree_map;
use std::collections::BTreeMap;

use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::concepts::cost::LinkCost;
use crate::framework::RoutingSystem;

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()), Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct RoutingEntry<T: RoutingSystem + ?Sized> {
    /// the best known distance to the destination
    pub distance: LinkCost,
    /// the neighbour this route was learned from, None for the route to ourself
    pub next_hop: Option<T::NodeAddress>,
}

impl<T: RoutingSystem + ?Sized> RoutingEntry<T> {
    pub fn new(distance: LinkCost, next_hop: Option<T::NodeAddress>) -> Self {
        Self { distance, next_hop }
    }
}

/// Destination -> best known route, ordered by destination
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()), Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct RoutingTable<T: RoutingSystem + ?Sized> {
    #[cfg_attr(feature = "serde", serde(with = "serde_with::As::<Vec<(serde_with::Same, serde_with::Same)>>"))]
    entries: BTreeMap<T::NodeAddress, RoutingEntry<T>>,
}

impl<T: RoutingSystem + ?Sized> RoutingTable<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// A table that only knows the route to `address` itself
    pub fn with_self(address: T::NodeAddress) -> Self {
        let mut table = Self::new();
        table.insert(address, RoutingEntry::new(LinkCost::ZERO, None));
        table
    }

    pub fn get(&self, destination: &T::NodeAddress) -> Option<&RoutingEntry<T>> {
        self.entries.get(destination)
    }

    /// `Unreachable` when there is no entry for the destination
    pub fn distance(&self, destination: &T::NodeAddress) -> LinkCost {
        self.entries
            .get(destination)
            .map_or(LinkCost::Unreachable, |entry| entry.distance)
    }

    pub fn next_hop(&self, destination: &T::NodeAddress) -> Option<&T::NodeAddress> {
        self.entries.get(destination).and_then(|entry| entry.next_hop.as_ref())
    }

    pub fn contains(&self, destination: &T::NodeAddress) -> bool {
        self.entries.contains_key(destination)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, T::NodeAddress, RoutingEntry<T>> {
        self.entries.iter()
    }

    /// Copy of the table without the routes learned from `neighbour` (split horizon)
    pub fn without_next_hop(&self, neighbour: &T::NodeAddress) -> Self {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.next_hop.as_ref() != Some(neighbour))
            .map(|(dest, entry)| (dest.clone(), entry.clone()))
            .collect()
    }

    pub(crate) fn insert(&mut self, destination: T::NodeAddress, entry: RoutingEntry<T>) {
        self.entries.insert(destination, entry);
    }
}

impl<T: RoutingSystem + ?Sized> Default for RoutingTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RoutingSystem + ?Sized> FromIterator<(T::NodeAddress, RoutingEntry<T>)> for RoutingTable<T> {
    fn from_iter<I: IntoIterator<Item = (T::NodeAddress, RoutingEntry<T>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, T: RoutingSystem + ?Sized> IntoIterator for &'a RoutingTable<T> {
    type Item = (&'a T::NodeAddress, &'a RoutingEntry<T>);
    type IntoIter = btree_map::Iter<'a, T::NodeAddress, RoutingEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A single accepted route update
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct RouteChange<T: RoutingSystem + ?Sized> {
    /// the router whose table changed
    pub router: T::NodeAddress,
    pub destination: T::NodeAddress,
    /// the distance before the update, `Unreachable` for a newly learned destination
    pub previous: LinkCost,
    pub distance: LinkCost,
    pub via: T::NodeAddress,
}
