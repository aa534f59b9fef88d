use std::collections::{BTreeMap, BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use log::{debug, info, warn};

use crate::concepts::cost::LinkCost;
use crate::concepts::report::{RoundOutcome, RoundReport, Termination};
use crate::concepts::route::RoutingTable;
use crate::feedback::{RoutingError, RoutingWarning};
use crate::framework::{MergePolicy, RoundObserver, RoutingSystem, SimulationParams};
use crate::router::Router;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SimulationState {
    /// the next round to run, starting at 1
    Running(u32),
    Converged,
    Exhausted,
}

impl SimulationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SimulationState::Running(_))
    }
}

/// Drives synchronized exchange rounds over a fixed roster of routers.
///
/// Routers are kept in insertion order, which fixes the order in which advertisements are
/// delivered within a round.
pub struct Simulation<T: RoutingSystem + ?Sized> {
    routers: Vec<Router<T>>,
    index: HashMap<T::NodeAddress, usize>,
    state: SimulationState,
}

impl<T: RoutingSystem + ?Sized> Simulation<T> {
    /// Builds every router from `(address, neighbour costs)` pairs
    pub fn new<R, N>(roster: R) -> Result<Self, RoutingError<T>>
    where
        R: IntoIterator<Item = (T::NodeAddress, N)>,
        N: IntoIterator<Item = (T::NodeAddress, f64)>,
    {
        let routers = roster
            .into_iter()
            .map(|(address, neighbours)| Router::new(address, neighbours))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_routers(routers)
    }

    /// Router addresses must be unique, and every neighbour must be one of the routers.
    /// Each router is validated as [`Router::new`] would. Symmetry of the links is not checked.
    pub fn from_routers(routers: Vec<Router<T>>) -> Result<Self, RoutingError<T>> {
        let mut index = HashMap::with_capacity(routers.len());
        for (i, router) in routers.iter().enumerate() {
            router.validate()?;
            if index.insert(router.address().clone(), i).is_some() {
                return Err(RoutingError::DuplicateRouter {
                    address: router.address().clone(),
                });
            }
        }
        for router in &routers {
            if let Some(neighbour) = router.neighbours().find(|n| !index.contains_key(*n)) {
                return Err(RoutingError::UnknownNeighbour {
                    router: router.address().clone(),
                    neighbour: neighbour.clone(),
                });
            }
        }
        Ok(Self {
            routers,
            index,
            state: SimulationState::Running(1),
        })
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn routers(&self) -> &[Router<T>] {
        &self.routers
    }

    pub fn router(&self, address: &T::NodeAddress) -> Option<&Router<T>> {
        self.index.get(address).map(|i| &self.routers[*i])
    }

    /// Snapshot of every routing table, ordered by router address
    pub fn tables(&self) -> BTreeMap<T::NodeAddress, RoutingTable<T>> {
        self.routers
            .iter()
            .map(|r| (r.address().clone(), r.routes().clone()))
            .collect()
    }

    /// Changes the cost of the link from `router` to `neighbour`, in that direction only
    pub fn set_link_cost(
        &mut self,
        router: &T::NodeAddress,
        neighbour: T::NodeAddress,
        cost: LinkCost,
    ) -> Result<Option<LinkCost>, RoutingError<T>> {
        if !self.index.contains_key(&neighbour) {
            return Err(RoutingError::UnknownNeighbour {
                router: router.clone(),
                neighbour,
            });
        }
        let i = *self
            .index
            .get(router)
            .ok_or_else(|| RoutingError::UnknownRouter { address: router.clone() })?;
        self.routers[i].set_link_cost(neighbour, cost)
    }

    /// Takes the link between `a` and `b` down in both directions.
    /// Nothing changes if either router is missing or they are not neighbours of each other.
    pub fn fail_link(&mut self, a: &T::NodeAddress, b: &T::NodeAddress) -> Result<(), RoutingWarning<T>> {
        let ia = *self
            .index
            .get(a)
            .ok_or_else(|| RoutingWarning::UnknownRouter { address: a.clone() })?;
        let ib = *self
            .index
            .get(b)
            .ok_or_else(|| RoutingWarning::UnknownRouter { address: b.clone() })?;
        if !self.routers[ia].is_neighbour(b) || !self.routers[ib].is_neighbour(a) {
            return Err(RoutingWarning::NotAdjacent {
                a: a.clone(),
                b: b.clone(),
            });
        }
        self.routers[ia].fail_link(b);
        self.routers[ib].fail_link(a);
        Ok(())
    }

    /// One advertise-then-merge exchange, without touching the state machine.
    ///
    /// Every advertisement is computed before the first one is delivered, so all routers see the
    /// tables as they were at the start of the round.
    pub fn exchange_round(&mut self, policy: MergePolicy) -> RoundOutcome<T> {
        let mut advertisements = Vec::new();
        for (sender, router) in self.routers.iter().enumerate() {
            for neighbour in router.neighbours() {
                if let Some(receiver) = self.index.get(neighbour) {
                    advertisements.push((sender, *receiver, router.filtered_advertisement(neighbour)));
                }
            }
        }

        let mut outcome = RoundOutcome {
            update_count: 0,
            changed_routers: BTreeSet::new(),
            changes: Vec::new(),
        };
        for (sender, receiver, advertisement) in advertisements {
            let from = self.routers[sender].address().clone();
            let changes = self.routers[receiver].apply_advertisement(&from, &advertisement, policy);
            if changes.is_empty() {
                continue;
            }
            outcome.update_count += 1;
            outcome
                .changed_routers
                .insert(self.routers[receiver].address().clone());
            outcome.changes.extend(changes);
        }
        outcome
    }

    /// Runs a single round. Returns None once the simulation has terminated.
    pub fn step<O>(&mut self, params: &SimulationParams<T>, observer: &mut O) -> Option<RoundReport<T>>
    where
        O: RoundObserver<T> + ?Sized,
    {
        let SimulationState::Running(iteration) = self.state else {
            return None;
        };

        let mut link_failure = None;
        if let Some(failure) = params.link_failure.as_ref().filter(|f| f.iteration == iteration) {
            let (a, b) = &failure.endpoints;
            match self.fail_link(a, b) {
                Ok(()) => {
                    warn!("Link failure simulated between Router {a} and Router {b} (link cost set to unreachable)");
                    link_failure = Some((a.clone(), b.clone()));
                }
                Err(warning) => {
                    warn!("{warning}");
                    observer.on_warning(&warning);
                }
            }
        }

        let RoundOutcome {
            update_count,
            changed_routers,
            changes,
        } = self.exchange_round(params.merge_policy);
        info!("Iteration {iteration}: {update_count} routing table updates performed");

        let terminal = if update_count == 0 {
            self.state = SimulationState::Converged;
            Some(Termination::Converged)
        } else if iteration >= params.max_iterations.get() {
            self.state = SimulationState::Exhausted;
            Some(Termination::Exhausted)
        } else {
            self.state = SimulationState::Running(iteration + 1);
            None
        };
        match terminal {
            Some(Termination::Converged) => info!("Network converged after {iteration} iterations"),
            Some(Termination::Exhausted) => warn!("Iteration budget exhausted before convergence"),
            None => debug!("Continuing with iteration {}", iteration + 1),
        }

        let report = RoundReport {
            iteration,
            tables: self.tables(),
            update_count,
            changed_routers,
            changes,
            link_failure,
            terminal,
        };
        observer.on_round(&report);
        Some(report)
    }

    /// Runs rounds until the network converges or the iteration budget runs out
    pub fn run<O>(&mut self, params: &SimulationParams<T>, observer: &mut O) -> SimulationState
    where
        O: RoundObserver<T> + ?Sized,
    {
        while self.step(params, observer).is_some() {}
        self.state
    }

    /// [`Simulation::run`] with the parameters of the routing system
    pub fn run_default<O>(&mut self, observer: &mut O) -> SimulationState
    where
        T: Sized,
        O: RoundObserver<T> + ?Sized,
    {
        let params = T::config();
        self.run(&params, observer)
    }
}
