// JSON decoding helpers shared by the config file and API response types.

use serde::{Deserialize, Deserializer};

/// Read an explicit `null` as the type's default, the same as a missing
/// field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
