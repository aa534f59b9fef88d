use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::framework::RootAddress;

/// A router identifier that is either a number or a name.
///
/// Numbers sort before names. Serialized untagged, so `1` and `"core"` are both valid in JSON.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum RouterId {
    Num(i64),
    Name(String),
}

impl RootAddress for RouterId {
    fn is_valid(&self) -> bool {
        match self {
            RouterId::Num(_) => true,
            RouterId::Name(name) => name.is_valid(),
        }
    }
}

impl From<i64> for RouterId {
    fn from(value: i64) -> Self {
        RouterId::Num(value)
    }
}

impl From<&str> for RouterId {
    fn from(value: &str) -> Self {
        RouterId::Name(value.to_string())
    }
}

impl From<String> for RouterId {
    fn from(value: String) -> Self {
        RouterId::Name(value)
    }
}

impl Display for RouterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterId::Num(n) => write!(f, "{n}"),
            RouterId::Name(name) => write!(f, "{name}"),
        }
    }
}
