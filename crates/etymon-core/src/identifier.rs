//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for every node and edge in a word
//! graph. Ids are `Copy`, cheap to hash, and compare directly against string
//! slices.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use etymon_core::identifier::Id;
///
/// let part = Id::new("construc");
/// let origin = Id::origin_of(part);
/// assert_eq!(origin, "origin-construc");
///
/// let edge = Id::edge(part, origin);
/// assert_eq!(edge, "edge-construc-origin-construc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the id of the synthetic origin node that belongs to a part.
    ///
    /// The origin node of part `de` is `origin-de`.
    pub fn origin_of(part_id: Id) -> Self {
        let mut interner = interner();
        let part = interner
            .resolve(part_id.0)
            .expect("Part ID should exist in interner");
        let name = format!("origin-{part}");
        Self(interner.get_or_intern(name))
    }

    /// Creates the id of the edge running from `source` to `target`.
    pub fn edge(source: Id, target: Id) -> Self {
        let mut interner = interner();
        let source_str = interner
            .resolve(source.0)
            .expect("Source ID should exist in interner");
        let target_str = interner
            .resolve(target.0)
            .expect("Target ID should exist in interner");
        let name = format!("edge-{source_str}-{target_str}");
        Self(interner.get_or_intern(name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// # Examples
    ///
    /// ```
    /// use etymon_core::identifier::Id;
    ///
    /// let id: Id = "tor".into();
    /// assert_eq!(id, "tor");
    /// ```
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("constructor");
        let id2 = Id::new("constructor");
        let id3 = Id::new("deconstructor");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "constructor");
    }

    #[test]
    fn test_origin_of() {
        let part = Id::new("tor");
        let origin = Id::origin_of(part);

        assert_eq!(origin, "origin-tor");
        assert_ne!(origin, part);
        assert_eq!(Id::origin_of(part), origin);
    }

    #[test]
    fn test_edge() {
        let edge = Id::edge(Id::new("origin-de"), Id::new("deconstructor"));
        assert_eq!(edge, "edge-origin-de-deconstructor");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{id}"), "display_test");
        assert_eq!(id.to_string(), "display_test");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "test_string".into();
        let id2 = Id::new("test_string");

        assert_eq!(id1, id2);
    }

    #[test]
    fn test_hash_and_eq() {
        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("construc");

        assert!(id == "construc");
        assert!(id != "construct");

        let empty = Id::new("");
        assert!(empty == "");
    }

    #[test]
    fn test_serialize_as_string() {
        let id = Id::new("origin-de");
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, "\"origin-de\"");
    }
}
