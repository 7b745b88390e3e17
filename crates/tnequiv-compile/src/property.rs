//! `PropertySet` for pass communication.
//!
//! Passes publish what they did (statistics, analysis verdicts) as typed
//! values keyed by their Rust type. A later pass or the caller reads them
//! back with [`PropertySet::get`].
//!
//! ```
//! use tnequiv_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Rewrites(usize);
//!
//! let mut props = PropertySet::new();
//! props.insert(Rewrites(3));
//! assert_eq!(props.get::<Rewrites>(), Some(&Rewrites(3)));
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

/// Type-keyed storage shared by the passes of one pipeline run.
#[derive(Default)]
pub struct PropertySet {
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a property and return it.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|b| *b)
    }

    /// Check if a property is present.
    pub fn contains<T: Any>(&self) -> bool {
        self.custom.contains_key(&TypeId::of::<T>())
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.custom.len()
    }

    /// Check if no property is stored.
    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }
}

impl std::fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySet")
            .field("properties", &self.custom.len())
            .finish()
    }
}
