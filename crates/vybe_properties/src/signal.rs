use crate::tree::{PropertyId, PropertyTree};
use crate::values::{IconMap, RegExp};
use crate::variant::Variant;

/// Native change notifications raised by internal managers.
///
/// Values are boxed so one handler can serve every manager; the bridge turns
/// them into [`crate::VariantEvent`]s addressed to facade properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    ValueChanged {
        property: PropertyId,
        value: Variant,
    },
    RangeChanged {
        property: PropertyId,
        minimum: Variant,
        maximum: Variant,
    },
    SingleStepChanged {
        property: PropertyId,
        step: Variant,
    },
    DecimalsChanged {
        property: PropertyId,
        decimals: i32,
    },
    RegExpChanged {
        property: PropertyId,
        reg_exp: RegExp,
    },
    ConstraintChanged {
        property: PropertyId,
        constraint: Variant,
    },
    EnumNamesChanged {
        property: PropertyId,
        names: Vec<String>,
    },
    EnumIconsChanged {
        property: PropertyId,
        icons: IconMap,
    },
    FlagNamesChanged {
        property: PropertyId,
        names: Vec<String>,
    },
    PropertyInserted {
        property: PropertyId,
        parent: PropertyId,
        after: Option<PropertyId>,
    },
    PropertyRemoved {
        property: PropertyId,
        parent: PropertyId,
    },
}

impl Signal {
    pub fn property(&self) -> PropertyId {
        match self {
            Signal::ValueChanged { property, .. }
            | Signal::RangeChanged { property, .. }
            | Signal::SingleStepChanged { property, .. }
            | Signal::DecimalsChanged { property, .. }
            | Signal::RegExpChanged { property, .. }
            | Signal::ConstraintChanged { property, .. }
            | Signal::EnumNamesChanged { property, .. }
            | Signal::EnumIconsChanged { property, .. }
            | Signal::FlagNamesChanged { property, .. }
            | Signal::PropertyInserted { property, .. }
            | Signal::PropertyRemoved { property, .. } => *property,
        }
    }
}

/// Shared state handed to managers on every mutating call: the property
/// tree, and the signals raised during the call.
#[derive(Debug, Default)]
pub struct ManagerContext {
    pub tree: PropertyTree,
    pub signals: Vec<Signal>,
}

impl ManagerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    pub fn value_changed(&mut self, property: PropertyId, value: impl Into<Variant>) {
        self.signals.push(Signal::ValueChanged {
            property,
            value: value.into(),
        });
    }

    pub fn append_sub_property(&mut self, parent: PropertyId, child: PropertyId) -> bool {
        self.tree.append_child(parent, child, &mut self.signals)
    }

    pub fn insert_sub_property(&mut self, parent: PropertyId, child: PropertyId, after: Option<PropertyId>) -> bool {
        self.tree.insert_child(parent, child, after, &mut self.signals)
    }

    pub fn destroy(&mut self, property: PropertyId) {
        self.tree.destroy(property, &mut self.signals);
    }

    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }
}
