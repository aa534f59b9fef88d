use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::num::NonZeroU32;

use cfg_if::cfg_if;
use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::concepts::report::RoundReport;
use crate::feedback::{RoutingError, RoutingWarning};

pub trait RoutingSystem {
    /// Address of a router in the simulation, MUST be unique within the roster
    type NodeAddress: RootAddress;
    fn config() -> SimulationParams<Self>
    where
        Self: Sized,
    {
        Default::default()
    }
}

cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::de::DeserializeOwned;

        pub trait RootData: Clone + Serialize + DeserializeOwned + Sized {}
        impl<T: Clone + Serialize + DeserializeOwned + Sized> RootData for T {}
    } else {
        pub trait RootData: Clone + Sized {}
        impl<T: Clone + Sized> RootData for T {}
    }
}

pub trait RootKey: Eq + PartialEq + Hash {}
impl<T: Eq + PartialEq + Hash> RootKey for T {}

/// A router identifier. The ordering is used to keep table dumps deterministic.
pub trait RootAddress: Ord + RootKey + RootData + Debug + Display {
    /// Whether this value is a well-formed identifier. Construction rejects invalid identifiers.
    fn is_valid(&self) -> bool {
        true
    }
}

macro_rules! integer_address {
    ($($ty:ty),*) => {
        $(impl RootAddress for $ty {})*
    };
}
integer_address!(u8, u16, u32, u64, usize, i32, i64);

impl RootAddress for String {
    fn is_valid(&self) -> bool {
        !self.is_empty() && !self.chars().any(char::is_whitespace)
    }
}

/// Receives the structured state of every simulated round.
///
/// Rendering, coloring and pacing belong to the implementor. The observer only ever sees
/// shared references, it cannot change the state of the simulation.
pub trait RoundObserver<T: RoutingSystem + ?Sized> {
    fn on_round(&mut self, report: &RoundReport<T>);
    /// Called when a scheduled event could not be applied. The run continues.
    fn on_warning(&mut self, _warning: &RoutingWarning<T>) {}
}

/// Discards everything
#[derive(Default)]
pub struct NoObserver;

impl<T: RoutingSystem + ?Sized> RoundObserver<T> for NoObserver {
    fn on_round(&mut self, _report: &RoundReport<T>) {}
}

/// Keeps a copy of every report and warning, in order of arrival
#[derive(Educe)]
#[educe(Default(bound()), Debug(bound()))]
pub struct RoundLog<T: RoutingSystem + ?Sized> {
    pub reports: Vec<RoundReport<T>>,
    pub warnings: Vec<RoutingWarning<T>>,
}

impl<T: RoutingSystem + ?Sized> RoundLog<T> {
    pub fn last(&self) -> Option<&RoundReport<T>> {
        self.reports.last()
    }
}

impl<T: RoutingSystem + ?Sized> RoundObserver<T> for RoundLog<T> {
    fn on_round(&mut self, report: &RoundReport<T>) {
        self.reports.push(report.clone());
    }

    fn on_warning(&mut self, warning: &RoutingWarning<T>) {
        self.warnings.push(warning.clone());
    }
}

/// How a router decides whether an advertised route replaces its current entry
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MergePolicy {
    /// Only a strictly shorter candidate replaces an entry. Routes through a failed link are
    /// never invalidated and keep their stale distance.
    #[default]
    StrictImprovement,
    /// Like [`MergePolicy::StrictImprovement`], but an advertisement from the current next hop
    /// always overwrites the distance of that route, even when it gets worse.
    TrackNextHop,
}

/// A scripted failure of the link between two routers
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct LinkFailure<T: RoutingSystem + ?Sized> {
    /// the round in which the link goes down, before advertisements are computed
    pub iteration: u32,
    pub endpoints: (T::NodeAddress, T::NodeAddress),
}

/// Parameters of a single simulation run
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct SimulationParams<T: RoutingSystem + ?Sized> {
    pub max_iterations: NonZeroU32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub link_failure: Option<LinkFailure<T>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub merge_policy: MergePolicy,
}

impl<T: RoutingSystem + ?Sized> SimulationParams<T> {
    pub fn new(max_iterations: u32) -> Result<Self, RoutingError<T>> {
        let max_iterations = NonZeroU32::new(max_iterations).ok_or(RoutingError::ZeroIterations)?;
        Ok(Self {
            max_iterations,
            link_failure: None,
            merge_policy: MergePolicy::default(),
        })
    }

    pub fn with_link_failure(mut self, iteration: u32, a: T::NodeAddress, b: T::NodeAddress) -> Self {
        self.link_failure = Some(LinkFailure {
            iteration,
            endpoints: (a, b),
        });
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }
}

impl<T: RoutingSystem + ?Sized> Default for SimulationParams<T> {
    fn default() -> Self {
        Self {
            max_iterations: NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
            link_failure: None,
            merge_policy: MergePolicy::default(),
        }
    }
}
