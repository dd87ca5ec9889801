//! Per-compilation type map for plugin state

use std::any::{Any, TypeId};

use rustc_hash::FxHashMap;

/// Typed storage scoped to one compilation.
///
/// Plugins park state here between hooks of the same build; at most one
/// value per type.
#[derive(Default)]
pub struct Extensions {
    map: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value of the same type
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|prev| prev.downcast::<T>().ok())
            .map(|prev| *prev)
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn test_insert_get_remove() {
        let mut ext = Extensions::new();
        assert!(ext.is_empty());

        assert_eq!(ext.insert(Marker(1)), None);
        assert_eq!(ext.insert(Marker(2)), Some(Marker(1)));
        assert_eq!(ext.get::<Marker>(), Some(&Marker(2)));
        assert!(ext.contains::<Marker>());

        assert_eq!(ext.remove::<Marker>(), Some(Marker(2)));
        assert_eq!(ext.remove::<Marker>(), None);
        assert!(!ext.contains::<Marker>());
    }

    #[test]
    fn test_types_are_independent() {
        let mut ext = Extensions::new();
        ext.insert(Marker(7));
        ext.insert(String::from("state"));

        assert_eq!(ext.len(), 2);
        assert_eq!(ext.get::<String>().map(String::as_str), Some("state"));
        assert_eq!(ext.get::<u64>(), None);
    }
}
