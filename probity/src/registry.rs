//! Type-keyed generator registry.

use std::any::{Any, TypeId};
use std::collections::{HashMap, hash_map};
use std::rc::Rc;

use crate::generator::BoxedGenerator;

/// How an entry got into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Bound explicitly through `register`
    Registered,
    /// Memoized by adhoc synthesis
    Adhoc,
}

#[derive(Clone)]
struct Entry {
    type_name: &'static str,
    origin: Origin,
    generator: Rc<dyn Any>,
}

/// Type-safe registry for storing and retrieving generators.
///
/// Each type holds at most one generator; inserting again replaces it.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    entries: HashMap<TypeId, Entry>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `generator` to `T`, returning the origin of the entry it replaced.
    pub fn insert<T: 'static>(
        &mut self,
        origin: Origin,
        generator: BoxedGenerator<T>,
    ) -> Option<Origin> {
        let entry = Entry {
            type_name: std::any::type_name::<T>(),
            origin,
            generator: Rc::new(generator),
        };
        self.entries
            .insert(TypeId::of::<T>(), entry)
            .map(|previous| previous.origin)
    }

    /// Get a handle to the generator for `T` together with its origin.
    pub fn get<T: 'static>(&self) -> Option<(Origin, BoxedGenerator<T>)> {
        let entry = self.entries.get(&TypeId::of::<T>())?;
        entry
            .generator
            .downcast_ref::<BoxedGenerator<T>>()
            .map(|generator| (entry.origin, generator.clone()))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn origin<T: 'static>(&self) -> Option<Origin> {
        self.entries.get(&TypeId::of::<T>()).map(|entry| entry.origin)
    }

    /// Remove the generator for `T`
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.entries.remove(&TypeId::of::<T>()).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the bound types, sorted, for diagnostics.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|entry| entry.type_name).collect();
        names.sort_unstable();
        names
    }

    /// Move the entries of `other` that `self` lacks, returning the names of the moved types.
    pub(crate) fn extend(&mut self, other: GeneratorRegistry) -> Vec<&'static str> {
        let mut moved = Vec::new();
        for (type_id, entry) in other.entries {
            if let hash_map::Entry::Vacant(slot) = self.entries.entry(type_id) {
                moved.push(entry.type_name);
                slot.insert(entry);
            }
        }
        moved
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.values().map(|e| (e.type_name, e.origin)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Generator, only};
    use rand::thread_rng;

    #[test]
    fn test_generator_registry_basic_operations() {
        let mut registry = GeneratorRegistry::new();

        assert!(registry.is_empty());
        assert!(!registry.contains::<i32>());

        assert_eq!(registry.insert(Origin::Registered, only(42).boxed()), None);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<i32>());
        assert!(!registry.contains::<u32>());
        assert_eq!(registry.origin::<i32>(), Some(Origin::Registered));

        assert!(registry.remove::<i32>());
        assert!(!registry.remove::<i32>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_insert_wins() {
        let mut registry = GeneratorRegistry::new();
        let mut rng = thread_rng();

        registry.insert(Origin::Adhoc, only(1u8).boxed());
        let replaced = registry.insert(Origin::Registered, only(2u8).boxed());

        assert_eq!(replaced, Some(Origin::Adhoc));
        assert_eq!(registry.len(), 1);

        let (origin, generator) = registry.get::<u8>().unwrap();
        assert_eq!(origin, Origin::Registered);
        assert_eq!(generator.generate(&mut rng), 2);
    }

    #[test]
    fn test_generator_registry_type_safety() {
        let mut registry = GeneratorRegistry::new();
        registry.insert(Origin::Registered, only(42i32).boxed());
        registry.insert(Origin::Registered, only("hello".to_string()).boxed());

        assert!(registry.get::<i64>().is_none());
        assert!(registry.get::<String>().is_some());
        let names = registry.type_names();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"i32"));
    }

    #[test]
    fn test_extend_moves_entries() {
        let mut registry = GeneratorRegistry::new();
        let mut pending = GeneratorRegistry::new();
        pending.insert(Origin::Adhoc, only(true).boxed());

        registry.insert(Origin::Registered, only(1i32).boxed());
        pending.insert(Origin::Adhoc, only(2i32).boxed());

        let moved = registry.extend(pending);
        assert_eq!(moved, vec!["bool"]);
        assert_eq!(registry.origin::<bool>(), Some(Origin::Adhoc));
        assert_eq!(registry.origin::<i32>(), Some(Origin::Registered));
    }
}
