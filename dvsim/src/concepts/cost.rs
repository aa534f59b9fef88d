use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Add;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cost of a link, or the distance of a route. Lower is better.
///
/// `Unreachable` saturates: adding anything to it yields `Unreachable`, and it compares greater
/// than every finite cost.
///
/// ```
/// use dvsim::concepts::cost::LinkCost;
///
/// let a = LinkCost::from(2);
/// let b = LinkCost::new(1.5).unwrap();
/// assert_eq!(a + b, LinkCost::new(3.5).unwrap());
/// assert_eq!(a + LinkCost::Unreachable, LinkCost::Unreachable);
/// assert!(LinkCost::new(f64::MAX).unwrap() < LinkCost::Unreachable);
/// assert!(LinkCost::new(-1.0).is_err());
/// ```
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Option<f64>", into = "Option<f64>")
)]
pub enum LinkCost {
    /// a finite, non-negative cost
    Finite(f64),
    Unreachable,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("{0} is not a finite non-negative link cost")]
pub struct InvalidCost(pub f64);

impl LinkCost {
    pub const ZERO: LinkCost = LinkCost::Finite(0.0);

    /// Creates a finite cost, rejecting negative, NaN and infinite values
    pub fn new(value: f64) -> Result<Self, InvalidCost> {
        if value.is_finite() && value >= 0.0 {
            // normalizes -0.0
            Ok(LinkCost::Finite(value + 0.0))
        } else {
            Err(InvalidCost(value))
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, LinkCost::Unreachable)
    }

    /// Whether the cost is `Unreachable` or a finite non-negative number
    pub fn is_valid(&self) -> bool {
        match self {
            LinkCost::Finite(v) => v.is_finite() && *v >= 0.0,
            LinkCost::Unreachable => true,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            LinkCost::Finite(v) => Some(*v),
            LinkCost::Unreachable => None,
        }
    }
}

impl Add for LinkCost {
    type Output = LinkCost;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (LinkCost::Finite(a), LinkCost::Finite(b)) => {
                let sum = a + b;
                if sum.is_finite() {
                    LinkCost::Finite(sum)
                } else {
                    LinkCost::Unreachable
                }
            }
            _ => LinkCost::Unreachable,
        }
    }
}

impl Ord for LinkCost {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LinkCost::Finite(a), LinkCost::Finite(b)) => a.total_cmp(b),
            (LinkCost::Finite(_), LinkCost::Unreachable) => Ordering::Less,
            (LinkCost::Unreachable, LinkCost::Finite(_)) => Ordering::Greater,
            (LinkCost::Unreachable, LinkCost::Unreachable) => Ordering::Equal,
        }
    }
}

impl PartialOrd for LinkCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LinkCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LinkCost {}

impl From<u32> for LinkCost {
    fn from(value: u32) -> Self {
        LinkCost::Finite(f64::from(value))
    }
}

impl TryFrom<Option<f64>> for LinkCost {
    type Error = InvalidCost;

    /// `None` is `Unreachable`
    fn try_from(value: Option<f64>) -> Result<Self, Self::Error> {
        match value {
            Some(v) => LinkCost::new(v),
            None => Ok(LinkCost::Unreachable),
        }
    }
}

impl From<LinkCost> for Option<f64> {
    fn from(value: LinkCost) -> Self {
        value.value()
    }
}

impl Display for LinkCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkCost::Finite(v) => write!(f, "{v}"),
            LinkCost::Unreachable => write!(f, "inf"),
        }
    }
}
