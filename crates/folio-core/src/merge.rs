//! Deep merge of nested configuration values.
//!
//! Customizations are layered onto templates by merging their JSON forms:
//! objects merge key by key, everything else (arrays included) replaces the
//! base value wholesale. An explicit `null` in the partial clears a field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Merge `partial` onto `base`, returning a new value.
///
/// For every key in `partial`: when both sides hold an object the two are
/// merged recursively, otherwise the partial value wins. Neither input is
/// modified, and merging with an empty object returns a copy of `base`.
pub fn merge_deep(base: &Value, partial: &Value) -> Value {
    match (base, partial) {
        (Value::Object(base_map), Value::Object(partial_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in partial_map {
                let next = match merged.get(key) {
                    Some(existing @ Value::Object(_)) if value.is_object() => {
                        merge_deep(existing, value)
                    }
                    _ => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        _ => partial.clone(),
    }
}

/// Merge a typed patch onto a typed facet through their JSON forms.
///
/// Patch fields that are absent are skipped during serialization, so only the
/// leaves the patch actually sets reach [`merge_deep`].
pub fn merge_facet<T, P>(base: &T, patch: &P) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
    P: Serialize,
{
    let base_value = serde_json::to_value(base)?;
    let patch_value = serde_json::to_value(patch)?;
    serde_json::from_value(merge_deep(&base_value, &patch_value))
}

/// A patch for a field that may be left alone, cleared, or replaced.
///
/// Deserializes from an absent key (`Keep`, via `#[serde(default)]`), an
/// explicit `null` (`Clear`) or a value (`Set`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    /// True when the patch leaves the field untouched.
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Borrow the value being set, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Keep | Patch::Clear => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}
