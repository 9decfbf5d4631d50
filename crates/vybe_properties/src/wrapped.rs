use crate::tree::PropertyId;
use crate::variant_manager::VariantPropertyId;
use std::collections::HashMap;

/// Bidirectional facade ↔ internal property map owned by one bridge.
///
/// A facade without an internal counterpart (groups) is stored with `None`.
/// Both directions are always updated together.
#[derive(Debug, Default)]
pub struct WrappedMap {
    wrapped: HashMap<VariantPropertyId, Option<PropertyId>>,
    owners: HashMap<PropertyId, VariantPropertyId>,
}

impl WrappedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `facade` to `internal`, replacing any previous links of either.
    pub fn link(&mut self, facade: VariantPropertyId, internal: Option<PropertyId>) {
        self.unlink(facade);
        if let Some(internal) = internal {
            if let Some(previous) = self.owners.insert(internal, facade) {
                self.wrapped.remove(&previous);
            }
        }
        self.wrapped.insert(facade, internal);
    }

    pub fn wrapped(&self, facade: VariantPropertyId) -> Option<PropertyId> {
        self.wrapped.get(&facade).copied().flatten()
    }

    pub fn owner(&self, internal: PropertyId) -> Option<VariantPropertyId> {
        self.owners.get(&internal).copied()
    }

    pub fn contains(&self, facade: VariantPropertyId) -> bool {
        self.wrapped.contains_key(&facade)
    }

    /// Removes both entries of `facade`, returning the internal it wrapped.
    pub fn unlink(&mut self, facade: VariantPropertyId) -> Option<PropertyId> {
        let internal = self.wrapped.remove(&facade).flatten()?;
        self.owners.remove(&internal);
        Some(internal)
    }

    pub fn len(&self) -> usize {
        self.wrapped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrapped.is_empty()
    }

    pub fn clear(&mut self) {
        self.wrapped.clear();
        self.owners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlink_removes_both_sides() {
        let mut map = WrappedMap::new();
        let facade = VariantPropertyId::new();
        let internal = PropertyId::new();
        map.link(facade, Some(internal));
        assert_eq!(map.wrapped(facade), Some(internal));
        assert_eq!(map.owner(internal), Some(facade));

        assert_eq!(map.unlink(facade), Some(internal));
        assert_eq!(map.wrapped(facade), None);
        assert_eq!(map.owner(internal), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_relink_internal_drops_old_facade() {
        let mut map = WrappedMap::new();
        let first = VariantPropertyId::new();
        let second = VariantPropertyId::new();
        let internal = PropertyId::new();
        map.link(first, Some(internal));
        map.link(second, Some(internal));
        assert!(!map.contains(first));
        assert_eq!(map.owner(internal), Some(second));
    }

    #[test]
    fn test_group_facade_has_no_internal() {
        let mut map = WrappedMap::new();
        let group = VariantPropertyId::new();
        map.link(group, None);
        assert!(map.contains(group));
        assert_eq!(map.wrapped(group), None);
        assert_eq!(map.unlink(group), None);
        assert!(!map.contains(group));
    }
}
