use serde::{Deserialize, Deserializer};

/// Decode a field that the dashboard may send as `null`, falling back to the
/// type's default. Empty lists and unset timestamps often arrive this way.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
