// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Logical CPU identifiers and CPU lists.

use std::fmt::{Display, Formatter};

/// The id of a logical CPU (a hardware thread) as seen by the operating system.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[repr(transparent)]
pub struct CpuId(u32);

impl CpuId {
    /// Creates a new [`CpuId`].
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for CpuId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<CpuId> for u32 {
    fn from(value: CpuId) -> Self {
        value.0
    }
}

impl Display for CpuId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered list of logical CPUs.
///
/// The list keeps the order in which CPUs were added and may contain
/// duplicates.  Its textual form is the comma separated list of ids
/// (`"2,22,3,23"`), which is the form consumed by deployment templates.
///
/// # Examples
///
/// ```
/// # use nfv_tuning_hardware::cpu::{CpuId, CpuList};
/// let mut list = CpuList::default();
/// list.extend([CpuId::new(1), CpuId::new(21)]);
/// assert_eq!(list.to_string(), "1,21");
/// assert!(list.contains(CpuId::new(21)));
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct CpuList(Vec<CpuId>);

impl CpuList {
    /// Returns the number of CPUs in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list holds no CPU.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `cpu` is in the list.
    #[must_use]
    pub fn contains(&self, cpu: CpuId) -> bool {
        self.0.contains(&cpu)
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, CpuId> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[CpuId] {
        &self.0
    }
}

impl Extend<CpuId> for CpuList {
    fn extend<T: IntoIterator<Item = CpuId>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> Extend<&'a CpuId> for CpuList {
    fn extend<T: IntoIterator<Item = &'a CpuId>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<CpuId> for CpuList {
    fn from_iter<T: IntoIterator<Item = CpuId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<CpuId>> for CpuList {
    fn from(value: Vec<CpuId>) -> Self {
        Self(value)
    }
}

impl<'a> IntoIterator for &'a CpuList {
    type Item = &'a CpuId;
    type IntoIter = std::slice::Iter<'a, CpuId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for CpuList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, cpu) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{cpu}")?;
        }
        Ok(())
    }
}
