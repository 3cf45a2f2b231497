use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::ValidateLength;

/// Optional field semantics for PATCH request bodies.
///
/// - `Unchanged` → field absent from the body
/// - `SetToNull` → explicit `null`
/// - `SetToValue` → set to the provided value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

// `#[serde(default)]` on the containing struct maps an absent field to
// `Unchanged`; a present field deserializes through `Option<T>`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for OptionField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionField::SetToValue(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            _ => None,
        }
    }

    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            _ => true,
        }
    }
}

impl<T> OptionField<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> OptionField<U> {
        match self {
            Self::Unchanged => OptionField::Unchanged,
            Self::SetToNull => OptionField::SetToNull,
            Self::SetToValue(v) => OptionField::SetToValue(f(v)),
        }
    }

    /// Convert into `Option<T>` for COALESCE-style binds.
    pub fn flatten(self) -> Option<T> {
        match self {
            OptionField::SetToValue(v) => Some(v),
            _ => None
        }
    }

    pub fn flatten_ref(&self) -> Option<&T> {
        match self {
            OptionField::SetToValue(v) => Some(v),
            _ => None
        }
    }
}

impl OptionField<String> {
    pub fn flatten_str(&self) -> Option<&str> {
        self.flatten_ref().map(|s| s.as_str())
    }
}

impl<T> OptionField<Vec<T>> {
    pub fn flatten_slice(&self) -> Option<&[T]> {
        self.flatten_ref().map(|v| v.as_slice())
    }
}

impl OptionField<bool> {
    pub fn flatten_bool(&self) -> Option<bool> {
        self.flatten_ref().copied()
    }
}

impl OptionField<i32> {
    pub fn flatten_i32(&self) -> Option<i32> {
        self.flatten_ref().copied()
    }
}

impl OptionField<DateTime<Utc>> {
    pub fn flatten_datetime(&self) -> Option<&DateTime<Utc>> {
        self.flatten_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Patch {
        name: OptionField<String>,
        icon: OptionField<String>,
    }

    #[test]
    fn absent_field_is_unchanged() {
        let patch: Patch = serde_json::from_str(r#"{"name": "Rust"}"#).unwrap();
        assert_eq!(patch.name, OptionField::SetToValue("Rust".to_string()));
        assert!(patch.icon.is_unchanged());
    }

    #[test]
    fn explicit_null_is_set_to_null() {
        let patch: Patch = serde_json::from_str(r#"{"icon": null}"#).unwrap();
        assert_eq!(patch.icon, OptionField::SetToNull);
    }

    #[test]
    fn flatten_drops_null_and_unchanged() {
        assert_eq!(OptionField::SetToValue(3).flatten(), Some(3));
        assert_eq!(OptionField::<i32>::SetToNull.flatten(), None);
        assert_eq!(OptionField::<i32>::Unchanged.flatten(), None);
    }
}
