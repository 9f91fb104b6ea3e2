//! Serde helpers for payload DTOs

/// Double-option deserializer for PATCH-like payloads.
///
/// Distinguishes a field that is absent from one that is explicitly null:
/// absent ⇒ `None` (keep the stored value), `null` ⇒ `Some(None)` (clear),
/// value ⇒ `Some(Some(v))`. Use with `#[serde(default, deserialize_with =
/// "serde_helpers::double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
