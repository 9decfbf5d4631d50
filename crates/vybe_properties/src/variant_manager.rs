//! The variant property bridge: boxed-value facade properties backed by the
//! typed internal managers.
//!
//! Every facade wraps exactly one internal property (or nothing, for groups).
//! Values and attributes written through a facade are type-checked against
//! the type registry and forwarded to the owning internal manager; the
//! signals that manager raises are translated back into [`VariantEvent`]s
//! carrying facade ids. Composite internal properties are mirrored as a tree
//! of sub-facades which follows the internal tree as it grows and shrinks.

use crate::managers::{
    attributes, dispatch_write, find_manager, BoolManager, CharManager, ColorManager, CursorManager,
    DateManager, DateTimeManager, DoubleManager, EnumManager, FlagManager, FontManager, IntManager,
    KeySequenceManager, LocaleManager, ManagerKind, PointFManager, PointManager, PropertyManager, RectFManager,
    RectManager, SizeFManager, SizeManager, SizePolicyManager, StringManager, TimeManager,
};
use crate::signal::{ManagerContext, Signal};
use crate::tree::{ManagerId, PropertyId, PropertyTree};
use crate::types::{self, TypeId};
use crate::values::Icon;
use crate::variant::Variant;
use crate::wrapped::WrappedMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Handle of a facade property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantPropertyId(Uuid);

impl VariantPropertyId {
    pub fn new() -> Self {
        VariantPropertyId(Uuid::new_v4())
    }
}

impl Default for VariantPropertyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VariantPropertyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a facade. Only `Live` facades accept writes and raise events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Initializing,
    Live,
    Uninitializing,
}

/// A boxed-value facade property.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantProperty {
    pub id: VariantPropertyId,
    pub property_type: TypeId,
    pub name: String,
    pub tool_tip: String,
    pub status_tip: String,
    pub whats_this: String,
    pub enabled: bool,
    pub modified: bool,
    pub parent: Option<VariantPropertyId>,
    pub children: Vec<VariantPropertyId>,
    pub lifecycle: Lifecycle,
}

impl VariantProperty {
    fn new(id: VariantPropertyId, property_type: TypeId, name: &str) -> Self {
        Self {
            id,
            property_type,
            name: name.to_string(),
            tool_tip: String::new(),
            status_tip: String::new(),
            whats_this: String::new(),
            enabled: true,
            modified: false,
            parent: None,
            children: Vec::new(),
            lifecycle: Lifecycle::Initializing,
        }
    }
}

/// Notifications raised by the bridge, always addressed to facades.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantEvent {
    ValueChanged {
        property: VariantPropertyId,
        value: Variant,
    },
    AttributeChanged {
        property: VariantPropertyId,
        attribute: String,
        value: Variant,
    },
    /// Name, tips, enabled or modified state changed.
    PropertyChanged {
        property: VariantPropertyId,
    },
    PropertyInserted {
        property: VariantPropertyId,
        parent: VariantPropertyId,
        after: Option<VariantPropertyId>,
    },
    PropertyRemoved {
        property: VariantPropertyId,
        parent: VariantPropertyId,
    },
}

impl VariantEvent {
    pub fn property(&self) -> VariantPropertyId {
        match self {
            VariantEvent::ValueChanged { property, .. }
            | VariantEvent::AttributeChanged { property, .. }
            | VariantEvent::PropertyChanged { property }
            | VariantEvent::PropertyInserted { property, .. }
            | VariantEvent::PropertyRemoved { property, .. } => *property,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&VariantEvent)>;

/// How signals raised by the internal managers are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncPhase {
    Idle,
    /// A facade subtree is being built; sub-property insertions are wrapped
    /// by the creating call itself.
    Creating,
}

/// Where a new facade's internal property comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Allocated from the manager registered for the facade's type.
    TopLevel,
    /// An existing internal sub-property.
    Wrapping(PropertyId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Teardown {
    /// Removed by a client; the wrapped internal property is deleted too when
    /// its manager owns it directly.
    Owner,
    /// The wrapped internal property is already gone.
    Cascade,
}

#[derive(Debug)]
struct TypeEntry {
    manager: Option<usize>,
    value_type: TypeId,
    attributes: IndexMap<&'static str, TypeId>,
}

/// The variant property bridge.
pub struct VariantPropertyManager {
    ctx: ManagerContext,
    managers: Vec<Box<dyn PropertyManager>>,
    /// Any manager id, including sub-managers, to the index of its top-level manager.
    manager_roots: HashMap<ManagerId, usize>,
    types: IndexMap<TypeId, TypeEntry>,
    facades: IndexMap<VariantPropertyId, VariantProperty>,
    wrapped: WrappedMap,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for VariantPropertyManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VariantPropertyManager")
            .field("types", &self.types.len())
            .field("facades", &self.facades.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for VariantPropertyManager {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_manager_ids(manager: &dyn PropertyManager, out: &mut Vec<ManagerId>) {
    out.push(manager.id());
    for sub in manager.sub_managers() {
        collect_manager_ids(sub, out);
    }
}

impl VariantPropertyManager {
    pub fn new() -> Self {
        let mut bridge = Self {
            ctx: ManagerContext::new(),
            managers: Vec::new(),
            manager_roots: HashMap::new(),
            types: IndexMap::new(),
            facades: IndexMap::new(),
            wrapped: WrappedMap::new(),
            listeners: Vec::new(),
            next_listener: 0,
        };
        bridge.register_builtin_types();
        bridge
    }

    fn register_builtin_types(&mut self) {
        use attributes::*;

        self.register(
            TypeId::INT,
            TypeId::INT,
            Some(Box::new(IntManager::new())),
            &[(MINIMUM, TypeId::INT), (MAXIMUM, TypeId::INT), (SINGLE_STEP, TypeId::INT)],
        );
        self.register(
            TypeId::DOUBLE,
            TypeId::DOUBLE,
            Some(Box::new(DoubleManager::new())),
            &[
                (MINIMUM, TypeId::DOUBLE),
                (MAXIMUM, TypeId::DOUBLE),
                (SINGLE_STEP, TypeId::DOUBLE),
                (DECIMALS, TypeId::INT),
            ],
        );
        self.register(TypeId::BOOL, TypeId::BOOL, Some(Box::new(BoolManager::new())), &[]);
        self.register(
            TypeId::STRING,
            TypeId::STRING,
            Some(Box::new(StringManager::new())),
            &[(REG_EXP, TypeId::REG_EXP)],
        );
        self.register(
            TypeId::DATE,
            TypeId::DATE,
            Some(Box::new(DateManager::new())),
            &[(MINIMUM, TypeId::DATE), (MAXIMUM, TypeId::DATE)],
        );
        self.register(TypeId::TIME, TypeId::TIME, Some(Box::new(TimeManager::new())), &[]);
        self.register(TypeId::DATE_TIME, TypeId::DATE_TIME, Some(Box::new(DateTimeManager::new())), &[]);
        self.register(
            TypeId::KEY_SEQUENCE,
            TypeId::KEY_SEQUENCE,
            Some(Box::new(KeySequenceManager::new())),
            &[],
        );
        self.register(TypeId::CHAR, TypeId::CHAR, Some(Box::new(CharManager::new())), &[]);
        self.register(TypeId::LOCALE, TypeId::LOCALE, Some(Box::new(LocaleManager::new())), &[]);
        self.register(TypeId::POINT, TypeId::POINT, Some(Box::new(PointManager::new())), &[]);
        self.register(
            TypeId::POINT_F,
            TypeId::POINT_F,
            Some(Box::new(PointFManager::new())),
            &[(DECIMALS, TypeId::INT)],
        );
        self.register(
            TypeId::SIZE,
            TypeId::SIZE,
            Some(Box::new(SizeManager::new())),
            &[(MINIMUM, TypeId::SIZE), (MAXIMUM, TypeId::SIZE)],
        );
        self.register(
            TypeId::SIZE_F,
            TypeId::SIZE_F,
            Some(Box::new(SizeFManager::new())),
            &[(MINIMUM, TypeId::SIZE_F), (MAXIMUM, TypeId::SIZE_F), (DECIMALS, TypeId::INT)],
        );
        self.register(
            TypeId::RECT,
            TypeId::RECT,
            Some(Box::new(RectManager::new())),
            &[(CONSTRAINT, TypeId::RECT)],
        );
        self.register(
            TypeId::RECT_F,
            TypeId::RECT_F,
            Some(Box::new(RectFManager::new())),
            &[(CONSTRAINT, TypeId::RECT_F), (DECIMALS, TypeId::INT)],
        );
        self.register(TypeId::COLOR, TypeId::COLOR, Some(Box::new(ColorManager::new())), &[]);
        self.register(
            types::enum_type_id(),
            TypeId::INT,
            Some(Box::new(EnumManager::new())),
            &[(ENUM_NAMES, TypeId::STRING_LIST), (ENUM_ICONS, types::icon_map_type_id())],
        );
        self.register(
            TypeId::SIZE_POLICY,
            TypeId::SIZE_POLICY,
            Some(Box::new(SizePolicyManager::new())),
            &[],
        );
        self.register(TypeId::FONT, TypeId::FONT, Some(Box::new(FontManager::new())), &[]);
        self.register(TypeId::CURSOR, TypeId::CURSOR, Some(Box::new(CursorManager::new())), &[]);
        self.register(
            types::flag_type_id(),
            TypeId::INT,
            Some(Box::new(FlagManager::new())),
            &[(FLAG_NAMES, TypeId::STRING_LIST)],
        );
        self.register(types::group_type_id(), TypeId::INVALID, None, &[]);
    }

    fn register(
        &mut self,
        property_type: TypeId,
        value_type: TypeId,
        manager: Option<Box<dyn PropertyManager>>,
        attributes: &[(&'static str, TypeId)],
    ) {
        let manager = manager.map(|manager| {
            let index = self.managers.len();
            let mut ids = Vec::new();
            collect_manager_ids(manager.as_ref(), &mut ids);
            for id in ids {
                self.manager_roots.insert(id, index);
            }
            self.managers.push(manager);
            index
        });
        self.types.insert(
            property_type,
            TypeEntry {
                manager,
                value_type,
                attributes: attributes.iter().copied().collect(),
            },
        );
    }

    pub fn enum_type_id() -> TypeId {
        types::enum_type_id()
    }

    pub fn flag_type_id() -> TypeId {
        types::flag_type_id()
    }

    pub fn group_type_id() -> TypeId {
        types::group_type_id()
    }

    pub fn icon_map_type_id() -> TypeId {
        types::icon_map_type_id()
    }

    // ---- type registry ----

    pub fn is_property_type_supported(&self, property_type: TypeId) -> bool {
        self.types.contains_key(&property_type)
    }

    /// Registered property types, in registration order.
    pub fn supported_types(&self) -> Vec<TypeId> {
        self.types.keys().copied().collect()
    }

    /// Value type of `property_type`; `INVALID` for groups and unknown types.
    pub fn value_type(&self, property_type: TypeId) -> TypeId {
        self.types
            .get(&property_type)
            .map(|e| e.value_type)
            .unwrap_or(TypeId::INVALID)
    }

    pub fn attributes(&self, property_type: TypeId) -> Vec<&'static str> {
        self.types
            .get(&property_type)
            .map(|e| e.attributes.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn attribute_type(&self, property_type: TypeId, attribute: &str) -> TypeId {
        self.types
            .get(&property_type)
            .and_then(|e| e.attributes.get(attribute).copied())
            .unwrap_or(TypeId::INVALID)
    }

    // ---- facade lifecycle ----

    /// Creates a facade of `property_type`. Unsupported types yield `None`.
    pub fn add_property(&mut self, property_type: TypeId, name: &str) -> Option<VariantPropertyId> {
        if !self.is_property_type_supported(property_type) {
            tracing::debug!(%property_type, name, "unsupported property type");
            return None;
        }
        let facade = self.create_facade(property_type, name, Origin::TopLevel);
        tracing::trace!(%facade, %property_type, name, "property added");
        Some(facade)
    }

    /// Removes a facade. Its internal property is deleted when the facade's
    /// manager owns it directly; sub-facades of a composite are only unwrapped.
    pub fn remove_property(&mut self, facade: VariantPropertyId) -> bool {
        if !self.facades.contains_key(&facade) {
            return false;
        }
        self.destroy_facade(facade, Teardown::Owner);
        true
    }

    /// Removes every facade.
    pub fn clear(&mut self) {
        let ids: Vec<VariantPropertyId> = self.facades.keys().copied().collect();
        for id in ids {
            if self.facades.contains_key(&id) {
                self.destroy_facade(id, Teardown::Owner);
            }
        }
    }

    pub fn contains(&self, facade: VariantPropertyId) -> bool {
        self.facades.contains_key(&facade)
    }

    /// All facades, in creation order.
    pub fn properties(&self) -> Vec<VariantPropertyId> {
        self.facades.keys().copied().collect()
    }

    pub fn property(&self, facade: VariantPropertyId) -> Option<&VariantProperty> {
        self.facades.get(&facade)
    }

    pub fn property_type(&self, facade: VariantPropertyId) -> TypeId {
        self.facades
            .get(&facade)
            .map(|f| f.property_type)
            .unwrap_or(TypeId::INVALID)
    }

    pub fn property_value_type(&self, facade: VariantPropertyId) -> TypeId {
        self.value_type(self.property_type(facade))
    }

    /// Groups carry no value.
    pub fn has_value(&self, facade: VariantPropertyId) -> bool {
        self.property_value_type(facade).is_valid()
    }

    // ---- values and attributes ----

    pub fn value(&self, facade: VariantPropertyId) -> Variant {
        self.wrapped
            .wrapped(facade)
            .map(|internal| self.internal_value(internal))
            .unwrap_or_default()
    }

    /// Writes `value` converted to the facade's value type. Values that do not
    /// convert are ignored.
    pub fn set_value(&mut self, facade: VariantPropertyId, value: impl Into<Variant>) {
        let value = value.into();
        if !self.is_live(facade) || !value.is_valid() {
            return;
        }
        let value_type = self.property_value_type(facade);
        let Some(converted) = value.convert(value_type) else {
            tracing::debug!(%facade, %value_type, ?value, "value does not convert");
            return;
        };
        let Some(internal) = self.wrapped.wrapped(facade) else {
            return;
        };
        self.write_internal(internal, &mut |m, ctx| m.set_value(ctx, internal, &converted));
    }

    pub fn value_text(&self, facade: VariantPropertyId) -> String {
        self.wrapped
            .wrapped(facade)
            .and_then(|internal| self.manager_for(internal).map(|m| m.value_text(internal)))
            .unwrap_or_default()
    }

    /// Icon shown next to the value, e.g. the enum icon of the current entry.
    pub fn value_icon(&self, facade: VariantPropertyId) -> Option<Icon> {
        let internal = self.wrapped.wrapped(facade)?;
        self.manager_for(internal)?.value_icon(internal)
    }

    /// Attributes not registered for the facade's type read as `Invalid`.
    pub fn attribute_value(&self, facade: VariantPropertyId, attribute: &str) -> Variant {
        if !self.attribute_type(self.property_type(facade), attribute).is_valid() {
            return Variant::Invalid;
        }
        self.wrapped
            .wrapped(facade)
            .map(|internal| self.internal_attribute(internal, attribute))
            .unwrap_or_default()
    }

    /// Writes a named attribute. The current attribute value must be valid
    /// and `value` must convert to the registered attribute type.
    pub fn set_attribute(&mut self, facade: VariantPropertyId, attribute: &str, value: impl Into<Variant>) {
        let value = value.into();
        if !self.is_live(facade) {
            return;
        }
        let old = self.attribute_value(facade, attribute);
        if !old.is_valid() {
            tracing::debug!(%facade, attribute, "unknown attribute");
            return;
        }
        if !value.is_valid() {
            return;
        }
        let attribute_type = self.attribute_type(self.property_type(facade), attribute);
        let Some(converted) = value.convert(attribute_type) else {
            tracing::debug!(%facade, attribute, %attribute_type, "attribute value does not convert");
            return;
        };
        let Some(internal) = self.wrapped.wrapped(facade) else {
            return;
        };
        self.write_internal(internal, &mut |m, ctx| m.set_attribute(ctx, internal, attribute, &converted));
    }

    // ---- facade metadata ----

    pub fn property_name(&self, facade: VariantPropertyId) -> &str {
        self.facades.get(&facade).map(|f| f.name.as_str()).unwrap_or("")
    }

    pub fn set_property_name(&mut self, facade: VariantPropertyId, name: &str) {
        self.update_metadata(facade, |f| {
            if f.name == name {
                return false;
            }
            f.name = name.to_string();
            true
        });
    }

    pub fn tool_tip(&self, facade: VariantPropertyId) -> &str {
        self.facades.get(&facade).map(|f| f.tool_tip.as_str()).unwrap_or("")
    }

    pub fn set_tool_tip(&mut self, facade: VariantPropertyId, text: &str) {
        self.update_metadata(facade, |f| {
            if f.tool_tip == text {
                return false;
            }
            f.tool_tip = text.to_string();
            true
        });
    }

    pub fn status_tip(&self, facade: VariantPropertyId) -> &str {
        self.facades.get(&facade).map(|f| f.status_tip.as_str()).unwrap_or("")
    }

    pub fn set_status_tip(&mut self, facade: VariantPropertyId, text: &str) {
        self.update_metadata(facade, |f| {
            if f.status_tip == text {
                return false;
            }
            f.status_tip = text.to_string();
            true
        });
    }

    pub fn whats_this(&self, facade: VariantPropertyId) -> &str {
        self.facades.get(&facade).map(|f| f.whats_this.as_str()).unwrap_or("")
    }

    pub fn set_whats_this(&mut self, facade: VariantPropertyId, text: &str) {
        self.update_metadata(facade, |f| {
            if f.whats_this == text {
                return false;
            }
            f.whats_this = text.to_string();
            true
        });
    }

    pub fn is_enabled(&self, facade: VariantPropertyId) -> bool {
        self.facades.get(&facade).is_some_and(|f| f.enabled)
    }

    pub fn set_enabled(&mut self, facade: VariantPropertyId, enabled: bool) {
        self.update_metadata(facade, |f| {
            if f.enabled == enabled {
                return false;
            }
            f.enabled = enabled;
            true
        });
    }

    pub fn is_modified(&self, facade: VariantPropertyId) -> bool {
        self.facades.get(&facade).is_some_and(|f| f.modified)
    }

    pub fn set_modified(&mut self, facade: VariantPropertyId, modified: bool) {
        self.update_metadata(facade, |f| {
            if f.modified == modified {
                return false;
            }
            f.modified = modified;
            true
        });
    }

    fn update_metadata(&mut self, facade: VariantPropertyId, update: impl FnOnce(&mut VariantProperty) -> bool) {
        let Some(f) = self.facades.get_mut(&facade) else {
            return;
        };
        if update(f) && f.lifecycle == Lifecycle::Live {
            self.emit(VariantEvent::PropertyChanged { property: facade });
        }
    }

    // ---- facade tree ----

    pub fn sub_properties(&self, facade: VariantPropertyId) -> &[VariantPropertyId] {
        self.facades.get(&facade).map(|f| f.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, facade: VariantPropertyId) -> Option<VariantPropertyId> {
        self.facades.get(&facade).and_then(|f| f.parent)
    }

    pub fn top_level_properties(&self) -> Vec<VariantPropertyId> {
        self.facades
            .values()
            .filter(|f| f.parent.is_none())
            .map(|f| f.id)
            .collect()
    }

    /// Appends `child` under `parent`.
    pub fn add_sub_property(&mut self, parent: VariantPropertyId, child: VariantPropertyId) -> bool {
        let after = self.sub_properties(parent).last().copied();
        self.insert_sub_property(parent, child, after)
    }

    /// Inserts `child` under `parent` after `after`, or first when `after` is
    /// `None`. Refused when `child` already has a parent or is an ancestor of
    /// `parent`.
    pub fn insert_sub_property(
        &mut self,
        parent: VariantPropertyId,
        child: VariantPropertyId,
        after: Option<VariantPropertyId>,
    ) -> bool {
        if !self.facades.contains_key(&parent) || self.parent(child).is_some() {
            return false;
        }
        if !self.facades.contains_key(&child) || self.is_ancestor(child, parent) {
            return false;
        }
        self.attach(parent, child, after, true)
    }

    pub fn remove_sub_property(&mut self, parent: VariantPropertyId, child: VariantPropertyId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    fn is_ancestor(&self, candidate: VariantPropertyId, of: VariantPropertyId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn attach(
        &mut self,
        parent: VariantPropertyId,
        child: VariantPropertyId,
        after: Option<VariantPropertyId>,
        notify: bool,
    ) -> bool {
        let Some(parent_facade) = self.facades.get_mut(&parent) else {
            return false;
        };
        let index = match after {
            Some(after) => match parent_facade.children.iter().position(|c| *c == after) {
                Some(pos) => pos + 1,
                None => return false,
            },
            None => 0,
        };
        parent_facade.children.insert(index, child);
        if let Some(child_facade) = self.facades.get_mut(&child) {
            child_facade.parent = Some(parent);
        }
        if notify {
            self.emit(VariantEvent::PropertyInserted {
                property: child,
                parent,
                after,
            });
        }
        true
    }

    fn detach(&mut self, child: VariantPropertyId) {
        let Some(parent) = self.facades.get_mut(&child).and_then(|f| f.parent.take()) else {
            return;
        };
        if let Some(parent_facade) = self.facades.get_mut(&parent) {
            parent_facade.children.retain(|c| *c != child);
        }
        self.emit(VariantEvent::PropertyRemoved { property: child, parent });
    }

    // ---- bridging ----

    pub fn wrapped_property(&self, facade: VariantPropertyId) -> Option<PropertyId> {
        self.wrapped.wrapped(facade)
    }

    pub fn facade_for(&self, internal: PropertyId) -> Option<VariantPropertyId> {
        self.wrapped.owner(internal)
    }

    /// The internal property tree shared by all internal managers.
    pub fn property_tree(&self) -> &PropertyTree {
        &self.ctx.tree
    }

    pub fn internal_value(&self, internal: PropertyId) -> Variant {
        self.manager_for(internal)
            .map(|m| m.value(internal))
            .unwrap_or_default()
    }

    pub fn internal_attribute(&self, internal: PropertyId, attribute: &str) -> Variant {
        self.manager_for(internal)
            .map(|m| m.attribute(internal, attribute))
            .unwrap_or_default()
    }

    /// Writes an internal property directly, the way an editor bound to it
    /// does. The change surfaces as events on the owning facades.
    pub fn set_internal_value(&mut self, internal: PropertyId, value: &Variant) {
        let value_type = self.internal_value(internal).type_id();
        let Some(converted) = value.convert(value_type) else {
            tracing::debug!(%internal, %value_type, "internal value does not convert");
            return;
        };
        self.write_internal(internal, &mut |m, ctx| m.set_value(ctx, internal, &converted));
    }

    /// The manager that created `internal`, possibly a sub-manager.
    pub fn manager_for(&self, internal: PropertyId) -> Option<&dyn PropertyManager> {
        let owner = self.ctx.tree.manager_of(internal)?;
        self.internal_manager(owner)
    }

    pub fn internal_manager(&self, id: ManagerId) -> Option<&dyn PropertyManager> {
        let root = *self.manager_roots.get(&id)?;
        find_manager(self.managers.get(root)?.as_ref(), id)
    }

    /// Top-level internal managers, in registration order.
    pub fn managers(&self) -> impl Iterator<Item = &dyn PropertyManager> {
        self.managers.iter().map(|m| m.as_ref())
    }

    // ---- events ----

    pub fn connect(&mut self, listener: impl FnMut(&VariantEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: VariantEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    // ---- internals ----

    fn is_live(&self, facade: VariantPropertyId) -> bool {
        self.facades
            .get(&facade)
            .is_some_and(|f| f.lifecycle == Lifecycle::Live)
    }

    fn write_internal(
        &mut self,
        internal: PropertyId,
        op: &mut dyn FnMut(&mut dyn PropertyManager, &mut ManagerContext),
    ) {
        let Some(owner) = self.ctx.tree.manager_of(internal) else {
            return;
        };
        let Some(root) = self.manager_roots.get(&owner).copied() else {
            return;
        };
        let Some(manager) = self.managers.get_mut(root) else {
            return;
        };
        dispatch_write(manager.as_mut(), owner, &mut self.ctx, internal, op);
        self.process_signals(SyncPhase::Idle);
    }

    fn create_facade(&mut self, property_type: TypeId, name: &str, origin: Origin) -> VariantPropertyId {
        let facade = VariantPropertyId::new();
        self.facades
            .insert(facade, VariantProperty::new(facade, property_type, name));
        let internal = match origin {
            Origin::TopLevel => self
                .types
                .get(&property_type)
                .and_then(|e| e.manager)
                .and_then(|index| self.managers.get_mut(index))
                .map(|manager| manager.add_property(&mut self.ctx, name)),
            Origin::Wrapping(internal) => Some(internal),
        };
        // mapping first: signals raised while wrapping must find this facade
        self.wrapped.link(facade, internal);
        if let Some(internal) = internal {
            self.process_signals(SyncPhase::Creating);
            self.wrap_children(facade, internal);
        }
        if let Some(f) = self.facades.get_mut(&facade) {
            f.lifecycle = Lifecycle::Live;
        }
        facade
    }

    fn wrap_children(&mut self, facade: VariantPropertyId, internal: PropertyId) {
        let children = self.ctx.tree.children(internal).to_vec();
        let mut after = None;
        for child in children {
            if let Some(sub) = self.create_sub_property(facade, child, after, false) {
                after = Some(sub);
            }
        }
    }

    /// Wraps an internal sub-property in a new facade attached under `parent`.
    /// Internal properties of kinds with no facade type are skipped.
    fn create_sub_property(
        &mut self,
        parent: VariantPropertyId,
        internal: PropertyId,
        after: Option<VariantPropertyId>,
        notify: bool,
    ) -> Option<VariantPropertyId> {
        let Some(property_type) = self.infer_type(internal) else {
            tracing::trace!(%internal, "no facade type for internal sub-property");
            return None;
        };
        let node = self.ctx.tree.get(internal)?.clone();
        let facade = self.create_facade(property_type, &node.name, Origin::Wrapping(internal));
        if let Some(f) = self.facades.get_mut(&facade) {
            f.tool_tip = node.tool_tip;
            f.status_tip = node.status_tip;
            f.whats_this = node.whats_this;
            f.enabled = node.enabled;
            f.modified = node.modified;
        }
        self.attach(parent, facade, after, notify);
        Some(facade)
    }

    fn infer_type(&self, internal: PropertyId) -> Option<TypeId> {
        match self.manager_for(internal)?.kind() {
            ManagerKind::Int => Some(TypeId::INT),
            ManagerKind::Bool => Some(TypeId::BOOL),
            ManagerKind::Double => Some(TypeId::DOUBLE),
            ManagerKind::Enum => Some(types::enum_type_id()),
            _ => None,
        }
    }

    fn destroy_facade(&mut self, facade: VariantPropertyId, teardown: Teardown) {
        let Some(f) = self.facades.get_mut(&facade) else {
            return;
        };
        if f.lifecycle == Lifecycle::Uninitializing {
            return;
        }
        f.lifecycle = Lifecycle::Uninitializing;
        self.detach(facade);
        let internal = self.wrapped.unlink(facade);
        if let (Teardown::Owner, Some(internal)) = (teardown, internal) {
            self.remove_internal(internal);
        }
        let children = self
            .facades
            .get(&facade)
            .map(|f| f.children.clone())
            .unwrap_or_default();
        for child in children {
            if let Some(c) = self.facades.get_mut(&child) {
                c.parent = None;
            }
        }
        self.facades.shift_remove(&facade);
        tracing::trace!(%facade, ?teardown, "property destroyed");
    }

    /// Asks the top-level manager owning `internal` to delete it. Sub-properties
    /// of composites stay with their composite.
    fn remove_internal(&mut self, internal: PropertyId) {
        let Some(owner) = self.ctx.tree.manager_of(internal) else {
            return;
        };
        let Some(root) = self.manager_roots.get(&owner).copied() else {
            return;
        };
        let Some(manager) = self.managers.get_mut(root) else {
            return;
        };
        if manager.id() != owner || !manager.has_property(internal) {
            return;
        }
        manager.remove_property(&mut self.ctx, internal);
        self.process_signals(SyncPhase::Idle);
    }

    fn process_signals(&mut self, phase: SyncPhase) {
        loop {
            let signals = self.ctx.take_signals();
            if signals.is_empty() {
                break;
            }
            for signal in signals {
                self.handle_signal(signal, phase);
            }
        }
    }

    fn handle_signal(&mut self, signal: Signal, phase: SyncPhase) {
        match signal {
            Signal::PropertyInserted { property, parent, after } => {
                if phase == SyncPhase::Creating {
                    return;
                }
                self.property_inserted(property, parent, after);
            }
            Signal::PropertyRemoved { property, .. } => {
                if let Some(facade) = self.wrapped.owner(property) {
                    self.destroy_facade(facade, Teardown::Cascade);
                }
            }
            Signal::ValueChanged { property, value } => {
                if let Some(facade) = self.live_owner(property) {
                    self.emit(VariantEvent::ValueChanged { property: facade, value });
                }
            }
            Signal::RangeChanged {
                property,
                minimum,
                maximum,
            } => {
                self.attribute_changed(property, attributes::MINIMUM, minimum);
                self.attribute_changed(property, attributes::MAXIMUM, maximum);
            }
            Signal::SingleStepChanged { property, step } => {
                self.attribute_changed(property, attributes::SINGLE_STEP, step);
            }
            Signal::DecimalsChanged { property, decimals } => {
                self.attribute_changed(property, attributes::DECIMALS, Variant::Int(decimals));
            }
            Signal::RegExpChanged { property, reg_exp } => {
                self.attribute_changed(property, attributes::REG_EXP, Variant::RegExp(reg_exp));
            }
            Signal::ConstraintChanged { property, constraint } => {
                self.attribute_changed(property, attributes::CONSTRAINT, constraint);
            }
            Signal::EnumNamesChanged { property, names } => {
                self.attribute_changed(property, attributes::ENUM_NAMES, Variant::StringList(names));
            }
            Signal::EnumIconsChanged { property, icons } => {
                self.attribute_changed(property, attributes::ENUM_ICONS, Variant::IconMap(icons));
            }
            Signal::FlagNamesChanged { property, names } => {
                self.attribute_changed(property, attributes::FLAG_NAMES, Variant::StringList(names));
            }
        }
    }

    fn live_owner(&self, internal: PropertyId) -> Option<VariantPropertyId> {
        let facade = self.wrapped.owner(internal);
        if facade.is_none() {
            tracing::trace!(%internal, "signal for unwrapped property dropped");
        }
        facade.filter(|f| self.is_live(*f))
    }

    fn attribute_changed(&mut self, internal: PropertyId, attribute: &str, value: Variant) {
        if let Some(facade) = self.live_owner(internal) {
            self.emit(VariantEvent::AttributeChanged {
                property: facade,
                attribute: attribute.to_string(),
                value,
            });
        }
    }

    fn property_inserted(&mut self, property: PropertyId, parent: PropertyId, after: Option<PropertyId>) {
        if self.wrapped.owner(property).is_some() {
            return;
        }
        let Some(parent_facade) = self.wrapped.owner(parent) else {
            return;
        };
        let after_facade = match after {
            Some(after) => match self.wrapped.owner(after) {
                Some(facade) => Some(facade),
                None => return,
            },
            None => None,
        };
        self.create_sub_property(parent_facade, property, after_facade, true);
    }
}

impl Drop for VariantPropertyManager {
    fn drop(&mut self) {
        self.listeners.clear();
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_has_no_internal() {
        let mut bridge = VariantPropertyManager::new();
        let group = bridge
            .add_property(VariantPropertyManager::group_type_id(), "Layout")
            .expect("group");
        assert!(!bridge.has_value(group));
        assert_eq!(bridge.wrapped_property(group), None);
        assert_eq!(bridge.value(group), Variant::Invalid);
    }

    #[test]
    fn test_ancestor_cannot_become_child() {
        let mut bridge = VariantPropertyManager::new();
        let group = VariantPropertyManager::group_type_id();
        let a = bridge.add_property(group, "a").expect("a");
        let b = bridge.add_property(group, "b").expect("b");
        assert!(bridge.add_sub_property(a, b));
        assert!(!bridge.add_sub_property(b, a));
        assert!(!bridge.add_sub_property(a, a));
    }
}
