use crate::concepts::cost::LinkCost;
use crate::concepts::route::{RouteChange, RoutingEntry, RoutingTable};
use crate::feedback::RoutingError;
use crate::framework::{MergePolicy, RootAddress, RoutingSystem};
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use educe::Educe;

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Router<T: RoutingSystem + ?Sized> {
    address: T::NodeAddress,
    /// Direct link cost to each neighbour. Unreachable if the link is down, the neighbour stays listed.
    #[cfg_attr(feature = "serde", serde(with = "serde_with::As::<Vec<(serde_with::Same, serde_with::Same)>>"))]
    links: BTreeMap<T::NodeAddress, LinkCost>,
    /// Destination, Route
    routes: RoutingTable<T>,
}

impl<T: RoutingSystem + ?Sized> Router<T> {
    /// Creates a router that only knows the route to itself.
    ///
    /// Every neighbour cost must be finite and non-negative, failed links are introduced later
    /// with [`Router::set_link_cost`].
    pub fn new<I>(address: T::NodeAddress, neighbours: I) -> Result<Self, RoutingError<T>>
    where
        I: IntoIterator<Item = (T::NodeAddress, f64)>,
    {
        if !address.is_valid() {
            return Err(RoutingError::InvalidAddress { address });
        }
        let mut links = BTreeMap::new();
        for (neighbour, cost) in neighbours {
            if !neighbour.is_valid() {
                return Err(RoutingError::InvalidAddress { address: neighbour });
            }
            let Ok(cost) = LinkCost::new(cost) else {
                return Err(RoutingError::InvalidLinkCost {
                    router: address,
                    neighbour,
                    cost,
                });
            };
            links.insert(neighbour, cost);
        }
        Ok(Self {
            routes: RoutingTable::with_self(address.clone()),
            address,
            links,
        })
    }

    pub fn address(&self) -> &T::NodeAddress {
        &self.address
    }

    pub fn routes(&self) -> &RoutingTable<T> {
        &self.routes
    }

    pub fn route(&self, destination: &T::NodeAddress) -> Option<&RoutingEntry<T>> {
        self.routes.get(destination)
    }

    /// The best known distance to `destination`, Unreachable if we have never heard of it
    pub fn get_distance(&self, destination: &T::NodeAddress) -> LinkCost {
        self.routes.distance(destination)
    }

    /// Direct link cost, Unreachable for routers that are not neighbours
    pub fn link_cost(&self, neighbour: &T::NodeAddress) -> LinkCost {
        self.links.get(neighbour).copied().unwrap_or(LinkCost::Unreachable)
    }

    pub fn is_neighbour(&self, address: &T::NodeAddress) -> bool {
        self.links.contains_key(address)
    }

    /// All neighbours, failed links included
    pub fn neighbours(&self) -> impl Iterator<Item = &T::NodeAddress> {
        self.links.keys()
    }

    pub fn links(&self) -> impl Iterator<Item = (&T::NodeAddress, &LinkCost)> {
        self.links.iter()
    }

    /// Changes (or adds) a direct link. The routing table is left untouched, the change only
    /// shows up through later advertisements. Returns the previous cost.
    pub fn set_link_cost(
        &mut self,
        neighbour: T::NodeAddress,
        cost: LinkCost,
    ) -> Result<Option<LinkCost>, RoutingError<T>> {
        if !neighbour.is_valid() {
            return Err(RoutingError::InvalidAddress { address: neighbour });
        }
        let cost = match cost {
            LinkCost::Finite(value) => match LinkCost::new(value) {
                Ok(cost) => cost,
                Err(_) => {
                    return Err(RoutingError::InvalidLinkCost {
                        router: self.address.clone(),
                        neighbour,
                        cost: value,
                    })
                }
            },
            LinkCost::Unreachable => LinkCost::Unreachable,
        };
        Ok(self.links.insert(neighbour, cost))
    }

    /// Checks what [`Router::new`] guarantees, for routers that were built some other way (deserialized)
    pub fn validate(&self) -> Result<(), RoutingError<T>> {
        if !self.address.is_valid() {
            return Err(RoutingError::InvalidAddress {
                address: self.address.clone(),
            });
        }
        for (neighbour, cost) in &self.links {
            if !neighbour.is_valid() {
                return Err(RoutingError::InvalidAddress {
                    address: neighbour.clone(),
                });
            }
            if let LinkCost::Finite(value) = cost {
                if !cost.is_valid() {
                    return Err(RoutingError::InvalidLinkCost {
                        router: self.address.clone(),
                        neighbour: neighbour.clone(),
                        cost: *value,
                    });
                }
            }
        }
        if self.routes.get(&self.address) != Some(&RoutingEntry::new(LinkCost::ZERO, None)) {
            return Err(RoutingError::CorruptSelfRoute {
                address: self.address.clone(),
            });
        }
        Ok(())
    }

    /// marks an existing link as down
    pub(crate) fn fail_link(&mut self, neighbour: &T::NodeAddress) {
        if let Some(cost) = self.links.get_mut(neighbour) {
            *cost = LinkCost::Unreachable;
        }
    }

    /// The table we advertise to `neighbour`: everything except the routes learned from it (split horizon)
    pub fn filtered_advertisement(&self, neighbour: &T::NodeAddress) -> RoutingTable<T> {
        self.routes.without_next_hop(neighbour)
    }

    /// Relaxes our table against an advertisement from `neighbour`, only strictly shorter routes are taken.
    /// Returns true if any entry changed.
    pub fn merge_advertisement(&mut self, neighbour: &T::NodeAddress, advertisement: &RoutingTable<T>) -> bool {
        !self
            .apply_advertisement(neighbour, advertisement, MergePolicy::StrictImprovement)
            .is_empty()
    }

    /// Relaxes our table against an advertisement from `neighbour`, returns the accepted changes.
    pub fn apply_advertisement(
        &mut self,
        neighbour: &T::NodeAddress,
        advertisement: &RoutingTable<T>,
        policy: MergePolicy,
    ) -> Vec<RouteChange<T>> {
        let cost_to_neighbour = self.link_cost(neighbour);
        let mut changes = Vec::new();

        for (dest, advertised) in advertisement {
            if *dest == self.address {
                continue; // the route to ourself is always (0, None)
            }
            let candidate = cost_to_neighbour + advertised.distance;

            let (current, from_next_hop) = match self.routes.get(dest) {
                Some(entry) => (entry.distance, entry.next_hop.as_ref() == Some(neighbour)),
                None => (LinkCost::Unreachable, false),
            };
            let accept = match policy {
                MergePolicy::StrictImprovement => candidate < current,
                MergePolicy::TrackNextHop => candidate < current || (from_next_hop && candidate != current),
            };
            if !accept {
                continue;
            }

            debug!(
                "[Router {}] Route to {}: cost {} -> {}, via {}",
                self.address, dest, current, candidate, neighbour
            );
            self.routes
                .insert(dest.clone(), RoutingEntry::new(candidate, Some(neighbour.clone())));
            changes.push(RouteChange {
                router: self.address.clone(),
                destination: dest.clone(),
                previous: current,
                distance: candidate,
                via: neighbour.clone(),
            });
        }
        changes
    }
}
