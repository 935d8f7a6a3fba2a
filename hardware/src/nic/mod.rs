// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network interfaces reported by introspection and the `nic<N>` naming scheme.
//!
//! Network configurations refer to NICs either by their physical name
//! (`p1p1`, `ens1f0`, ...) or by a logical, position based name `nic<N>`.
//! Logical names index (1-based) into the list of *active* interfaces, ordered
//! with embedded NICs first and with numeric suffixes compared numerically.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// A network interface of the inventory.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Interface {
    pub name: String,
    /// True if the link of the interface is up.
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(deserialize_with = "crate::serdefix::null_as_default")
    )]
    pub has_carrier: bool,
}

impl Interface {
    #[must_use]
    pub fn new(name: impl Into<String>, has_carrier: bool) -> Self {
        Self {
            name: name.into(),
            has_carrier,
        }
    }
}

/// Name prefixes of NICs embedded on the motherboard.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EmbeddedPrefix {
    Em,
    Eth,
    Eno,
}

impl EmbeddedPrefix {
    /// Returns the embedded prefix `name` starts with, if any.
    #[must_use]
    pub fn of(name: &str) -> Option<Self> {
        Self::iter().find(|prefix| {
            let prefix: &'static str = prefix.into();
            name.starts_with(prefix)
        })
    }
}

/// Returns true if `name` designates an embedded NIC.
#[must_use]
pub fn is_embedded(name: &str) -> bool {
    EmbeddedPrefix::of(name).is_some()
}

#[derive(Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Run<'a> {
    Text(&'a str),
    /// A run of decimal digits: (significant length, significant digits).
    Number(usize, &'a str),
}

impl<'a> Run<'a> {
    fn number(digits: &'a str) -> Self {
        let significant = digits.trim_start_matches('0');
        Run::Number(significant.len(), significant)
    }
}

/// Splits a name into alternating text and number runs, always starting with a
/// (possibly empty) text run.
fn natural_key(name: &str) -> Vec<Run<'_>> {
    let mut key = Vec::new();
    let mut rest = name;
    loop {
        let split = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        key.push(Run::Text(&rest[..split]));
        rest = &rest[split..];
        if rest.is_empty() {
            break;
        }
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        key.push(Run::number(&rest[..end]));
        rest = &rest[end..];
        if rest.is_empty() {
            break;
        }
    }
    key
}

/// Compares two names in natural order: runs of digits compare numerically
/// and other runs compare lexically.
///
/// ```
/// # use nfv_tuning_hardware::nic::natural_cmp;
/// # use std::cmp::Ordering;
/// assert_eq!(natural_cmp("eth2", "eth10"), Ordering::Less);
/// assert_eq!(natural_cmp("p2p1", "p10p1"), Ordering::Less);
/// assert_eq!(natural_cmp("em01", "em1"), Ordering::Equal);
/// ```
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Orders interface names the way logical `nic<N>` names are assigned.
///
/// Embedded NICs (`em*`, `eth*`, `eno*`) come first, then every other NIC.
/// Both groups are naturally sorted; names which compare equal keep their
/// input order.
#[must_use]
pub fn ordered_nics<'a, I>(names: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let (mut embedded, mut others): (Vec<&str>, Vec<&str>) =
        names.into_iter().partition(|name| is_embedded(name));
    embedded.sort_by(|a, b| natural_cmp(a, b));
    others.sort_by(|a, b| natural_cmp(a, b));
    embedded.extend(others);
    embedded
}

/// Returns the interfaces whose link is up.
pub fn active_interfaces(interfaces: &[Interface]) -> impl Iterator<Item = &Interface> {
    interfaces.iter().filter(|iface| iface.has_carrier)
}

/// Orders the active interfaces for `nic<N>` resolution.
#[must_use]
pub fn ordered_active_nics(interfaces: &[Interface]) -> Vec<&str> {
    let ordered = ordered_nics(active_interfaces(interfaces).map(|iface| iface.name.as_str()));
    debug!("active nics ordering: {ordered:?}");
    ordered
}

/// A reference to a NIC as written in a network configuration.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum NicName<'a> {
    /// `nic<N>`, the N-th (1-based) active interface.
    Logical { index: usize, name: &'a str },
    /// Any other name, taken as the physical interface name.
    Physical(&'a str),
}

impl<'a> NicName<'a> {
    /// Prefix of logical NIC names.
    pub const LOGICAL_PREFIX: &'static str = "nic";

    /// Classifies a NIC reference.
    ///
    /// Only `nic` followed by a number greater than zero is a logical name.
    #[must_use]
    pub fn parse(name: &'a str) -> Self {
        match name
            .strip_prefix(Self::LOGICAL_PREFIX)
            .and_then(|index| index.parse::<usize>().ok())
        {
            Some(index) if index > 0 => NicName::Logical { index, name },
            _ => NicName::Physical(name),
        }
    }

    /// Returns the name as written in the configuration.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        match self {
            NicName::Logical { name, .. } | NicName::Physical(name) => *name,
        }
    }

    /// Resolves the reference to a physical interface name using the active
    /// NIC `ordering` (see [`ordered_active_nics`]).
    ///
    /// A logical name beyond the end of the ordering can not be resolved and
    /// is returned verbatim.
    #[must_use]
    pub fn resolve(&self, ordering: &[&str]) -> String {
        match self {
            NicName::Logical { index, name } => {
                match index.checked_sub(1).and_then(|i| ordering.get(i)) {
                    Some(physical) => (*physical).to_string(),
                    None => {
                        warn!(
                            "{name} does not match any active interface ({} active)",
                            ordering.len()
                        );
                        (*name).to_string()
                    }
                }
            }
            NicName::Physical(name) => (*name).to_string(),
        }
    }
}

impl Display for NicName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolves a NIC reference (`nic<N>` or a physical name) to a physical name.
#[must_use]
pub fn physical_name(name: &str, ordering: &[&str]) -> String {
    NicName::parse(name).resolve(ordering)
}
