// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use serde::Deserialize;

/// Reads an explicit `null` the same way as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
