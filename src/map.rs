//! The [`Object`] property map.
//!
//! An `Object` maps [`PropertyName`]s to [`Value`]s. Iteration order is the
//! byte-lexicographic order of the keys, independent of insertion order, so
//! encoding the same object always produces the same bytes.
//!
//! Unlike a plain map, the mutating operations distinguish between adding a
//! new member and replacing an existing one:
//!
//! - [`Object::insert`] fails if the key already exists,
//! - [`Object::assign`] fails if the key is missing,
//! - [`Object::insert_or_assign`] always succeeds.
//!
//! ## Examples
//!
//! ```rust
//! use serde_anon::{Object, Value};
//!
//! let mut obj = Object::new();
//! obj.insert("name", "Alice")?.insert("age", 30u32)?;
//!
//! assert_eq!(obj.len(), 2);
//! assert_eq!(obj.get("name").and_then(Value::as_str), Some("Alice"));
//! assert!(obj.insert("age", 31u32).is_err());
//! # Ok::<(), serde_anon::Error>(())
//! ```

use crate::key::IntoPropertyName;
use crate::{Error, PropertyName, Result, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map::{self, BTreeMap, Entry};

/// An ordered map of property names to values.
///
/// # Examples
///
/// ```rust
/// use serde_anon::{Object, Value};
///
/// let mut obj = Object::new();
/// obj.insert_or_assign("second", 2i32)?;
/// obj.insert_or_assign("first", 1i32)?;
///
/// // Iteration follows key order, not insertion order
/// let keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// # Ok::<(), serde_anon::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object(BTreeMap<PropertyName, Value>);

impl Object {
    /// Creates an empty `Object`.
    #[must_use]
    pub fn new() -> Self {
        Object(BTreeMap::new())
    }

    /// Adds a new member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if `key` is not a valid property name,
    /// or [`Error::KeyExists`] if the object already has a member named `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::Object;
    ///
    /// let mut obj = Object::new();
    /// obj.insert("kaka", 12i64)?;
    /// assert!(obj.insert("kaka", 34i64).is_err());
    /// # Ok::<(), serde_anon::Error>(())
    /// ```
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<&mut Self>
    where
        K: IntoPropertyName,
        V: Into<Value>,
    {
        match self.0.entry(key.into_property_name()?) {
            Entry::Occupied(entry) => Err(Error::KeyExists(entry.key().to_string())),
            Entry::Vacant(entry) => {
                entry.insert(value.into());
                Ok(self)
            }
        }
    }

    /// Sets a member, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if `key` is not a valid property name.
    pub fn insert_or_assign<K, V>(&mut self, key: K, value: V) -> Result<&mut Self>
    where
        K: IntoPropertyName,
        V: Into<Value>,
    {
        self.0.insert(key.into_property_name()?, value.into());
        Ok(self)
    }

    /// Replaces the value of an existing member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if there is no member named `key`.
    pub fn assign<V>(&mut self, key: &str, value: V) -> Result<&mut Self>
    where
        V: Into<Value>,
    {
        match self.0.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                Ok(self)
            }
            None => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    /// Builder form of [`Object::insert`] for owned objects.
    ///
    /// # Errors
    ///
    /// Same as [`Object::insert`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::Object;
    ///
    /// let obj = Object::new().with("x", 1i32)?.with("y", 2i32)?;
    /// assert_eq!(obj.len(), 2);
    /// # Ok::<(), serde_anon::Error>(())
    /// ```
    pub fn with<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: IntoPropertyName,
        V: Into<Value>,
    {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Returns a reference to the value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value of `key`, if present.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Returns the value of `key`, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if there is no member named `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::{Error, Object};
    ///
    /// let obj = Object::new();
    /// assert_eq!(obj.try_get("foobar"), Err(Error::KeyNotFound("foobar".to_string())));
    /// ```
    pub fn try_get(&self, key: &str) -> Result<&Value> {
        self.0
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Mutable form of [`Object::try_get`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if there is no member named `key`.
    pub fn try_get_mut(&mut self, key: &str) -> Result<&mut Value> {
        self.0
            .get_mut(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a member, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in key order.
    pub fn keys(&self) -> btree_map::Keys<'_, PropertyName, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in key order.
    pub fn values(&self) -> btree_map::Values<'_, PropertyName, Value> {
        self.0.values()
    }

    /// Returns an iterator over the members, in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, PropertyName, Value> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, PropertyName, Value> {
        self.0.iter_mut()
    }
}

impl IntoIterator for Object {
    type Item = (PropertyName, Value);
    type IntoIter = btree_map::IntoIter<PropertyName, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a PropertyName, &'a Value);
    type IntoIter = btree_map::Iter<'a, PropertyName, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Later entries replace earlier ones with the same key.
impl FromIterator<(PropertyName, Value)> for Object {
    fn from_iter<T: IntoIterator<Item = (PropertyName, Value)>>(iter: T) -> Self {
        Object(BTreeMap::from_iter(iter))
    }
}

impl Extend<(PropertyName, Value)> for Object {
    fn extend<T: IntoIterator<Item = (PropertyName, Value)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k.as_str(), v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(obj) => Ok(obj),
            other => Err(serde::de::Error::custom(Error::NotAnObject(other.kind()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_or_assign() {
        let mut obj = Object::new();
        assert!(!obj.contains_key("foobar"));

        obj.insert_or_assign("foobar", 1i64).unwrap();
        assert_eq!(obj.get("foobar"), Some(&Value::I64(1)));
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("foobar"));

        obj.insert_or_assign("foobar", "kaka").unwrap();
        assert_eq!(obj.get("foobar"), Some(&Value::from("kaka")));
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.keys().next().map(PropertyName::as_str), Some("foobar"));
    }

    #[test]
    fn test_insert_and_assign() {
        let mut obj = Object::new();
        obj.insert("kaka", 12i64).unwrap();
        obj.assign("kaka", "bulle").unwrap();
        assert_eq!(obj.try_get("kaka").unwrap().as_str(), Some("bulle"));
        assert_eq!(obj.len(), 1);

        assert_eq!(
            obj.insert("kaka", 34i64).unwrap_err(),
            Error::KeyExists("kaka".to_string())
        );
        assert_eq!(
            obj.assign("foobar", "nop").unwrap_err(),
            Error::KeyNotFound("foobar".to_string())
        );
        assert_eq!(obj.try_get("kaka").unwrap().as_str(), Some("bulle"));
    }

    #[test]
    fn test_key_access_not_found() {
        let mut obj = Object::new();
        assert!(obj.try_get("foobar").is_err());
        assert!(obj.try_get_mut("foobar").is_err());
        assert!(obj.get("foobar").is_none());
    }

    #[test]
    fn test_malformed_keys_rejected_everywhere() {
        let mut obj = Object::new();
        assert!(matches!(obj.insert("Foo", 1i32), Err(Error::MalformedKey(_))));
        assert!(matches!(
            obj.insert_or_assign("__x", 1i32),
            Err(Error::MalformedKey(_))
        ));
        assert!(matches!(
            Object::new().with("9x", 1i32),
            Err(Error::MalformedKey(_))
        ));
        assert!(obj.is_empty());
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut obj = Object::new();
        for key in ["zeta", "alpha", "mid", "_first", "alpha2"] {
            obj.insert(key, 0i32).unwrap();
        }
        let keys: Vec<&str> = obj.keys().map(PropertyName::as_str).collect();
        assert_eq!(keys, vec!["_first", "alpha", "alpha2", "mid", "zeta"]);
    }

    #[test]
    fn test_remove_and_collect() {
        let mut obj: Object = vec![
            (PropertyName::new("a").unwrap(), Value::I32(1)),
            (PropertyName::new("b").unwrap(), Value::I32(2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(obj.remove("a"), Some(Value::I32(1)));
        assert_eq!(obj.remove("a"), None);
        assert_eq!(obj.len(), 1);
    }
}
