use crate::signal::Signal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Identity of an internal, concretely typed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyId(Uuid);

impl PropertyId {
    pub fn new() -> Self {
        PropertyId(Uuid::new_v4())
    }
}

impl Default for PropertyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an internal manager instance (top-level or sub-manager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManagerId(Uuid);

impl ManagerId {
    pub fn new() -> Self {
        ManagerId(Uuid::new_v4())
    }
}

impl Default for ManagerId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub id: PropertyId,
    pub manager: ManagerId,
    pub name: String,
    pub tool_tip: String,
    pub status_tip: String,
    pub whats_this: String,
    pub enabled: bool,
    pub modified: bool,
    pub parent: Option<PropertyId>,
    pub children: Vec<PropertyId>,
}

/// Arena holding every internal property of one bridge, shared by all of
/// its internal managers.
#[derive(Debug, Default)]
pub struct PropertyTree {
    nodes: HashMap<PropertyId, PropertyNode>,
}

impl PropertyTree {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    pub fn create(&mut self, manager: ManagerId, name: impl Into<String>) -> PropertyId {
        let id = PropertyId::new();
        self.nodes.insert(
            id,
            PropertyNode {
                id,
                manager,
                name: name.into(),
                tool_tip: String::new(),
                status_tip: String::new(),
                whats_this: String::new(),
                enabled: true,
                modified: false,
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    pub fn get(&self, id: PropertyId) -> Option<&PropertyNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: PropertyId) -> Option<&mut PropertyNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn manager_of(&self, id: PropertyId) -> Option<ManagerId> {
        self.nodes.get(&id).map(|n| n.manager)
    }

    pub fn children(&self, id: PropertyId) -> &[PropertyId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: PropertyId) -> Option<PropertyId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn name(&self, id: PropertyId) -> &str {
        self.nodes.get(&id).map(|n| n.name.as_str()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts `child` under `parent` right after `after`, or first when
    /// `after` is `None`. Records a [`Signal::PropertyInserted`].
    pub fn insert_child(
        &mut self,
        parent: PropertyId,
        child: PropertyId,
        after: Option<PropertyId>,
        signals: &mut Vec<Signal>,
    ) -> bool {
        if parent == child || !self.nodes.contains_key(&child) {
            return false;
        }
        if self.nodes.get(&child).and_then(|n| n.parent).is_some() {
            return false;
        }
        let Some(node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        let index = match after {
            Some(after) => match node.children.iter().position(|c| *c == after) {
                Some(pos) => pos + 1,
                None => return false,
            },
            None => 0,
        };
        node.children.insert(index, child);
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
        }
        signals.push(Signal::PropertyInserted { property: child, parent, after });
        true
    }

    /// Appends `child` as the last sub-property of `parent`.
    pub fn append_child(&mut self, parent: PropertyId, child: PropertyId, signals: &mut Vec<Signal>) -> bool {
        let after = self.children(parent).last().copied();
        self.insert_child(parent, child, after, signals)
    }

    /// Removes a node, detaching it from its parent (recorded as
    /// [`Signal::PropertyRemoved`]) and orphaning its children.
    pub fn destroy(&mut self, id: PropertyId, signals: &mut Vec<Signal>) -> Option<PropertyNode> {
        let node = self.nodes.remove(&id)?;
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|c| *c != id);
            }
            signals.push(Signal::PropertyRemoved { property: id, parent });
        }
        for child in &node.children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parent = None;
            }
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_after_and_destroy() {
        let manager = ManagerId::new();
        let mut tree = PropertyTree::new();
        let mut signals = Vec::new();
        let parent = tree.create(manager, "parent");
        let a = tree.create(manager, "a");
        let b = tree.create(manager, "b");
        let c = tree.create(manager, "c");
        assert!(tree.append_child(parent, a, &mut signals));
        assert!(tree.append_child(parent, c, &mut signals));
        assert!(tree.insert_child(parent, b, Some(a), &mut signals));
        assert_eq!(tree.children(parent), &[a, b, c]);
        assert_eq!(signals.len(), 3);

        signals.clear();
        tree.destroy(b, &mut signals);
        assert_eq!(tree.children(parent), &[a, c]);
        assert_eq!(signals, vec![Signal::PropertyRemoved { property: b, parent }]);

        tree.destroy(parent, &mut signals);
        assert_eq!(tree.parent(a), None);
    }

    #[test]
    fn test_cannot_insert_twice() {
        let manager = ManagerId::new();
        let mut tree = PropertyTree::new();
        let mut signals = Vec::new();
        let p = tree.create(manager, "p");
        let q = tree.create(manager, "q");
        let child = tree.create(manager, "child");
        assert!(tree.append_child(p, child, &mut signals));
        assert!(!tree.append_child(q, child, &mut signals));
    }
}
