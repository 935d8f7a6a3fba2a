// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The MTU of a network interface, as written in the network configuration.
///
/// No range check is applied: the value is only used to size packet buffers.
#[derive(Copy, Clone, Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Mtu(u32);

impl Mtu {
    pub(crate) const DEFAULT_U32: u32 = 1500;

    /// The typical MTU for an ethernet interface
    pub const DEFAULT: Mtu = Mtu(Self::DEFAULT_U32);

    #[must_use]
    pub const fn new(mtu: u32) -> Self {
        Self(mtu)
    }

    /// Return the `Mtu` represented as a u32
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl Default for Mtu {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for Mtu {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Mtu> for u32 {
    fn from(value: Mtu) -> Self {
        value.0
    }
}

impl Display for Mtu {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
