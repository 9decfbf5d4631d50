//! Point, size and rect managers. Each is composed of int or double
//! sub-properties, one per coordinate.

use super::{add_sub_property, attributes, DoubleManager, IntManager, ManagerKind, PropertyManager};
use crate::signal::{ManagerContext, Signal};
use crate::tree::{ManagerId, PropertyId};
use crate::values::{Point, PointF, Rect, RectF, Size, SizeF};
use crate::variant::Variant;
use std::collections::HashMap;

const DEFAULT_DECIMALS: i32 = 2;

fn remove_subs(ctx: &mut ManagerContext, manager: &mut dyn PropertyManager, subs: &[PropertyId]) {
    for sub in subs {
        manager.remove_property(ctx, *sub);
    }
}

#[derive(Debug, Clone, Copy)]
struct PointData {
    value: Point,
    x: PropertyId,
    y: PropertyId,
}

#[derive(Debug)]
pub struct PointManager {
    id: ManagerId,
    properties: HashMap<PropertyId, PointData>,
    ints: IntManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for PointManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PointManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            ints: IntManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn int_manager(&self) -> &IntManager {
        &self.ints
    }

    pub fn get(&self, property: PropertyId) -> Option<Point> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: Point) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.value == value {
            return;
        }
        data.value = value;
        self.ints.set(ctx, data.x, value.x);
        self.ints.set(ctx, data.y, value.y);
        ctx.value_changed(property, value);
    }
}

impl PropertyManager for PointManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Point
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let x = add_sub_property(ctx, &mut self.ints, property, "X");
        let y = add_sub_property(ctx, &mut self.ints, property, "Y");
        self.sub_to_parent.insert(x, property);
        self.sub_to_parent.insert(y, property);
        self.properties.insert(
            property,
            PointData {
                value: Point::default(),
                x,
                y,
            },
        );
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        let subs = [data.x, data.y];
        for sub in &subs {
            self.sub_to_parent.remove(sub);
        }
        remove_subs(ctx, &mut self.ints, &subs);
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::Point).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::Point(p) = value {
            self.set(ctx, property, *p);
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property)
            .map(|p| format!("({}, {})", p.x, p.y))
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.ints]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.ints.id() == manager).then_some(&mut self.ints as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let (Some(data), Some(v)) = (self.properties.get(&parent).copied(), self.ints.get(property)) else {
            return;
        };
        let mut value = data.value;
        if property == data.x {
            value.x = v;
        } else {
            value.y = v;
        }
        self.set(ctx, parent, value);
    }
}

#[derive(Debug, Clone, Copy)]
struct PointFData {
    value: PointF,
    decimals: i32,
    x: PropertyId,
    y: PropertyId,
}

#[derive(Debug)]
pub struct PointFManager {
    id: ManagerId,
    properties: HashMap<PropertyId, PointFData>,
    doubles: DoubleManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for PointFManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PointFManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            doubles: DoubleManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn double_manager(&self) -> &DoubleManager {
        &self.doubles
    }

    pub fn get(&self, property: PropertyId) -> Option<PointF> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: PointF) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.value == value {
            return;
        }
        data.value = value;
        self.doubles.set(ctx, data.x, value.x);
        self.doubles.set(ctx, data.y, value.y);
        ctx.value_changed(property, value);
    }

    pub fn set_decimals(&mut self, ctx: &mut ManagerContext, property: PropertyId, decimals: i32) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let decimals = decimals.clamp(0, super::double::MAX_DECIMALS);
        if data.decimals == decimals {
            return;
        }
        data.decimals = decimals;
        self.doubles.set_decimals(ctx, data.x, decimals);
        self.doubles.set_decimals(ctx, data.y, decimals);
        ctx.emit(Signal::DecimalsChanged { property, decimals });
    }
}

impl PropertyManager for PointFManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::PointF
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let x = add_sub_property(ctx, &mut self.doubles, property, "X");
        let y = add_sub_property(ctx, &mut self.doubles, property, "Y");
        self.sub_to_parent.insert(x, property);
        self.sub_to_parent.insert(y, property);
        self.properties.insert(
            property,
            PointFData {
                value: PointF::default(),
                decimals: DEFAULT_DECIMALS,
                x,
                y,
            },
        );
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        let subs = [data.x, data.y];
        for sub in &subs {
            self.sub_to_parent.remove(sub);
        }
        remove_subs(ctx, &mut self.doubles, &subs);
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::PointF).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::PointF(p) = value {
            self.set(ctx, property, *p);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        match (attribute, self.properties.get(&property)) {
            (attributes::DECIMALS, Some(data)) => Variant::Int(data.decimals),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        if let (attributes::DECIMALS, Variant::Int(decimals)) = (attribute, value) {
            self.set_decimals(ctx, property, *decimals);
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.properties
            .get(&property)
            .map(|d| {
                let n = d.decimals as usize;
                format!("({:.*}, {:.*})", n, d.value.x, n, d.value.y)
            })
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.doubles]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.doubles.id() == manager).then_some(&mut self.doubles as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let (Some(data), Some(v)) = (self.properties.get(&parent).copied(), self.doubles.get(property)) else {
            return;
        };
        let mut value = data.value;
        if property == data.x {
            value.x = v;
        } else {
            value.y = v;
        }
        self.set(ctx, parent, value);
    }
}

#[derive(Debug, Clone, Copy)]
struct SizeData {
    value: Size,
    minimum: Size,
    maximum: Size,
    width: PropertyId,
    height: PropertyId,
}

/// Sizes bounded per dimension by `minimum` and `maximum`.
#[derive(Debug)]
pub struct SizeManager {
    id: ManagerId,
    properties: HashMap<PropertyId, SizeData>,
    ints: IntManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for SizeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            ints: IntManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn int_manager(&self) -> &IntManager {
        &self.ints
    }

    pub fn get(&self, property: PropertyId) -> Option<Size> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn minimum(&self, property: PropertyId) -> Option<Size> {
        self.properties.get(&property).map(|d| d.minimum)
    }

    pub fn maximum(&self, property: PropertyId) -> Option<Size> {
        self.properties.get(&property).map(|d| d.maximum)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: Size) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let value = value.bounded_to(data.minimum, data.maximum);
        if data.value == value {
            return;
        }
        data.value = value;
        self.ints.set(ctx, data.width, value.width);
        self.ints.set(ctx, data.height, value.height);
        ctx.value_changed(property, value);
    }

    pub fn set_minimum(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: Size) {
        let Some(data) = self.properties.get(&property) else {
            return;
        };
        let maximum = data.maximum.expanded_to(minimum);
        self.apply_range(ctx, property, minimum, maximum);
    }

    pub fn set_maximum(&mut self, ctx: &mut ManagerContext, property: PropertyId, maximum: Size) {
        let Some(data) = self.properties.get(&property) else {
            return;
        };
        let minimum = data.minimum.bounded_above(maximum);
        self.apply_range(ctx, property, minimum, maximum);
    }

    /// Bounds given in the wrong order are swapped per dimension.
    pub fn set_range(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: Size, maximum: Size) {
        let low = minimum.bounded_above(maximum);
        let high = minimum.expanded_to(maximum);
        self.apply_range(ctx, property, low, high);
    }

    fn apply_range(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: Size, maximum: Size) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.minimum == minimum && data.maximum == maximum {
            return;
        }
        data.minimum = minimum;
        data.maximum = maximum;
        ctx.emit(Signal::RangeChanged {
            property,
            minimum: Variant::Size(minimum),
            maximum: Variant::Size(maximum),
        });
        self.ints.set_range(ctx, data.width, minimum.width, maximum.width);
        self.ints.set_range(ctx, data.height, minimum.height, maximum.height);
        let value = data.value.bounded_to(minimum, maximum);
        if value != data.value {
            data.value = value;
            ctx.value_changed(property, value);
        }
    }
}

impl PropertyManager for SizeManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Size
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let width = add_sub_property(ctx, &mut self.ints, property, "Width");
        let height = add_sub_property(ctx, &mut self.ints, property, "Height");
        self.ints.set_minimum(ctx, width, 0);
        self.ints.set_minimum(ctx, height, 0);
        self.sub_to_parent.insert(width, property);
        self.sub_to_parent.insert(height, property);
        self.properties.insert(
            property,
            SizeData {
                value: Size::default(),
                minimum: Size::new(0, 0),
                maximum: Size::new(i32::MAX, i32::MAX),
                width,
                height,
            },
        );
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        let subs = [data.width, data.height];
        for sub in &subs {
            self.sub_to_parent.remove(sub);
        }
        remove_subs(ctx, &mut self.ints, &subs);
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::Size).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::Size(s) = value {
            self.set(ctx, property, *s);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        let Some(data) = self.properties.get(&property) else {
            return Variant::Invalid;
        };
        match attribute {
            attributes::MINIMUM => Variant::Size(data.minimum),
            attributes::MAXIMUM => Variant::Size(data.maximum),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        let Variant::Size(s) = value else {
            return;
        };
        match attribute {
            attributes::MINIMUM => self.set_minimum(ctx, property, *s),
            attributes::MAXIMUM => self.set_maximum(ctx, property, *s),
            _ => {}
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property)
            .map(|s| format!("{} x {}", s.width, s.height))
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.ints]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.ints.id() == manager).then_some(&mut self.ints as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let (Some(data), Some(v)) = (self.properties.get(&parent).copied(), self.ints.get(property)) else {
            return;
        };
        let mut value = data.value;
        if property == data.width {
            value.width = v;
        } else {
            value.height = v;
        }
        self.set(ctx, parent, value);
    }
}

#[derive(Debug, Clone, Copy)]
struct SizeFData {
    value: SizeF,
    minimum: SizeF,
    maximum: SizeF,
    decimals: i32,
    width: PropertyId,
    height: PropertyId,
}

#[derive(Debug)]
pub struct SizeFManager {
    id: ManagerId,
    properties: HashMap<PropertyId, SizeFData>,
    doubles: DoubleManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for SizeFManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeFManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            doubles: DoubleManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn double_manager(&self) -> &DoubleManager {
        &self.doubles
    }

    pub fn get(&self, property: PropertyId) -> Option<SizeF> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: SizeF) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let value = value.bounded_to(data.minimum, data.maximum);
        if data.value == value {
            return;
        }
        data.value = value;
        self.doubles.set(ctx, data.width, value.width);
        self.doubles.set(ctx, data.height, value.height);
        ctx.value_changed(property, value);
    }

    pub fn set_minimum(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: SizeF) {
        let Some(data) = self.properties.get(&property) else {
            return;
        };
        let maximum = data.maximum.expanded_to(minimum);
        self.apply_range(ctx, property, minimum, maximum);
    }

    pub fn set_maximum(&mut self, ctx: &mut ManagerContext, property: PropertyId, maximum: SizeF) {
        let Some(data) = self.properties.get(&property) else {
            return;
        };
        let minimum = data.minimum.bounded_above(maximum);
        self.apply_range(ctx, property, minimum, maximum);
    }

    pub fn set_range(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: SizeF, maximum: SizeF) {
        let low = minimum.bounded_above(maximum);
        let high = minimum.expanded_to(maximum);
        self.apply_range(ctx, property, low, high);
    }

    pub fn set_decimals(&mut self, ctx: &mut ManagerContext, property: PropertyId, decimals: i32) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let decimals = decimals.clamp(0, super::double::MAX_DECIMALS);
        if data.decimals == decimals {
            return;
        }
        data.decimals = decimals;
        self.doubles.set_decimals(ctx, data.width, decimals);
        self.doubles.set_decimals(ctx, data.height, decimals);
        ctx.emit(Signal::DecimalsChanged { property, decimals });
    }

    fn apply_range(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: SizeF, maximum: SizeF) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.minimum == minimum && data.maximum == maximum {
            return;
        }
        data.minimum = minimum;
        data.maximum = maximum;
        ctx.emit(Signal::RangeChanged {
            property,
            minimum: Variant::SizeF(minimum),
            maximum: Variant::SizeF(maximum),
        });
        self.doubles.set_range(ctx, data.width, minimum.width, maximum.width);
        self.doubles.set_range(ctx, data.height, minimum.height, maximum.height);
        let value = data.value.bounded_to(minimum, maximum);
        if value != data.value {
            data.value = value;
            ctx.value_changed(property, value);
        }
    }
}

impl PropertyManager for SizeFManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::SizeF
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let width = add_sub_property(ctx, &mut self.doubles, property, "Width");
        let height = add_sub_property(ctx, &mut self.doubles, property, "Height");
        self.doubles.set_minimum(ctx, width, 0.0);
        self.doubles.set_minimum(ctx, height, 0.0);
        self.sub_to_parent.insert(width, property);
        self.sub_to_parent.insert(height, property);
        self.properties.insert(
            property,
            SizeFData {
                value: SizeF::default(),
                minimum: SizeF::new(0.0, 0.0),
                maximum: SizeF::new(f64::MAX, f64::MAX),
                decimals: DEFAULT_DECIMALS,
                width,
                height,
            },
        );
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        let subs = [data.width, data.height];
        for sub in &subs {
            self.sub_to_parent.remove(sub);
        }
        remove_subs(ctx, &mut self.doubles, &subs);
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::SizeF).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::SizeF(s) = value {
            self.set(ctx, property, *s);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        let Some(data) = self.properties.get(&property) else {
            return Variant::Invalid;
        };
        match attribute {
            attributes::MINIMUM => Variant::SizeF(data.minimum),
            attributes::MAXIMUM => Variant::SizeF(data.maximum),
            attributes::DECIMALS => Variant::Int(data.decimals),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        match (attribute, value) {
            (attributes::MINIMUM, Variant::SizeF(s)) => self.set_minimum(ctx, property, *s),
            (attributes::MAXIMUM, Variant::SizeF(s)) => self.set_maximum(ctx, property, *s),
            (attributes::DECIMALS, Variant::Int(d)) => self.set_decimals(ctx, property, *d),
            _ => {}
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.properties
            .get(&property)
            .map(|d| {
                let n = d.decimals as usize;
                format!("{:.*} x {:.*}", n, d.value.width, n, d.value.height)
            })
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.doubles]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.doubles.id() == manager).then_some(&mut self.doubles as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let (Some(data), Some(v)) = (self.properties.get(&parent).copied(), self.doubles.get(property)) else {
            return;
        };
        let mut value = data.value;
        if property == data.width {
            value.width = v;
        } else {
            value.height = v;
        }
        self.set(ctx, parent, value);
    }
}

/// Moves and shrinks `rect` until it lies inside `constraint`.
fn fit_rect(rect: Rect, constraint: Rect) -> Rect {
    let mut r = rect;
    r.width = r.width.min(constraint.width);
    r.height = r.height.min(constraint.height);
    if r.x < constraint.x {
        r.x = constraint.x;
    } else if r.right() > constraint.right() {
        r.x = constraint.right().saturating_sub(r.width);
    }
    if r.y < constraint.y {
        r.y = constraint.y;
    } else if r.bottom() > constraint.bottom() {
        r.y = constraint.bottom().saturating_sub(r.height);
    }
    r
}

fn fit_rect_f(rect: RectF, constraint: RectF) -> RectF {
    let mut r = rect;
    r.width = r.width.min(constraint.width);
    r.height = r.height.min(constraint.height);
    if r.x < constraint.x {
        r.x = constraint.x;
    } else if r.right() > constraint.right() {
        r.x = constraint.right() - r.width;
    }
    if r.y < constraint.y {
        r.y = constraint.y;
    } else if r.bottom() > constraint.bottom() {
        r.y = constraint.bottom() - r.height;
    }
    r
}

#[derive(Debug, Clone, Copy)]
struct RectData {
    value: Rect,
    constraint: Rect,
    x: PropertyId,
    y: PropertyId,
    width: PropertyId,
    height: PropertyId,
}

impl RectData {
    fn subs(&self) -> [PropertyId; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

fn sync_rect_subs(ctx: &mut ManagerContext, ints: &mut IntManager, data: &RectData) {
    let c = data.constraint;
    if c.is_null() {
        ints.set_range(ctx, data.x, -i32::MAX, i32::MAX);
        ints.set_range(ctx, data.y, -i32::MAX, i32::MAX);
        ints.set_range(ctx, data.width, 0, i32::MAX);
        ints.set_range(ctx, data.height, 0, i32::MAX);
    } else {
        ints.set_range(ctx, data.x, c.x, c.right());
        ints.set_range(ctx, data.y, c.y, c.bottom());
        ints.set_range(ctx, data.width, 0, c.width);
        ints.set_range(ctx, data.height, 0, c.height);
    }
    ints.set(ctx, data.x, data.value.x);
    ints.set(ctx, data.y, data.value.y);
    ints.set(ctx, data.width, data.value.width);
    ints.set(ctx, data.height, data.value.height);
}

/// Rects optionally confined to a constraint rect. A null constraint means
/// no constraint.
#[derive(Debug)]
pub struct RectManager {
    id: ManagerId,
    properties: HashMap<PropertyId, RectData>,
    ints: IntManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for RectManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RectManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            ints: IntManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn int_manager(&self) -> &IntManager {
        &self.ints
    }

    pub fn get(&self, property: PropertyId) -> Option<Rect> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn constraint(&self, property: PropertyId) -> Option<Rect> {
        self.properties.get(&property).map(|d| d.constraint)
    }

    /// Values reaching outside the constraint are cut to the overlap; values
    /// not overlapping it at all are ignored.
    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: Rect) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let mut value = value.normalized();
        if !data.constraint.is_null() && !data.constraint.contains_rect(&value) {
            match data.constraint.intersected(&value) {
                Some(r) => value = r,
                None => return,
            }
        }
        if data.value == value {
            return;
        }
        data.value = value;
        sync_rect_subs(ctx, &mut self.ints, data);
        ctx.value_changed(property, value);
    }

    pub fn set_constraint(&mut self, ctx: &mut ManagerContext, property: PropertyId, constraint: Rect) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let constraint = constraint.normalized();
        if data.constraint == constraint {
            return;
        }
        let old = data.value;
        data.constraint = constraint;
        if !constraint.is_null() && !constraint.contains_rect(&data.value) {
            data.value = fit_rect(data.value, constraint);
        }
        ctx.emit(Signal::ConstraintChanged {
            property,
            constraint: Variant::Rect(constraint),
        });
        sync_rect_subs(ctx, &mut self.ints, data);
        if data.value != old {
            ctx.value_changed(property, data.value);
        }
    }
}

impl PropertyManager for RectManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Rect
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let x = add_sub_property(ctx, &mut self.ints, property, "X");
        let y = add_sub_property(ctx, &mut self.ints, property, "Y");
        let width = add_sub_property(ctx, &mut self.ints, property, "Width");
        let height = add_sub_property(ctx, &mut self.ints, property, "Height");
        let data = RectData {
            value: Rect::default(),
            constraint: Rect::default(),
            x,
            y,
            width,
            height,
        };
        for sub in data.subs() {
            self.sub_to_parent.insert(sub, property);
        }
        sync_rect_subs(ctx, &mut self.ints, &data);
        self.properties.insert(property, data);
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        let subs = data.subs();
        for sub in &subs {
            self.sub_to_parent.remove(sub);
        }
        remove_subs(ctx, &mut self.ints, &subs);
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::Rect).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::Rect(r) = value {
            self.set(ctx, property, *r);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        match (attribute, self.constraint(property)) {
            (attributes::CONSTRAINT, Some(c)) => Variant::Rect(c),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        if let (attributes::CONSTRAINT, Variant::Rect(c)) = (attribute, value) {
            self.set_constraint(ctx, property, *c);
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property)
            .map(|r| format!("[({}, {}), {} x {}]", r.x, r.y, r.width, r.height))
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.ints]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.ints.id() == manager).then_some(&mut self.ints as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let (Some(data), Some(v)) = (self.properties.get(&parent).copied(), self.ints.get(property)) else {
            return;
        };
        let mut value = data.value;
        if property == data.x {
            value.x = v;
        } else if property == data.y {
            value.y = v;
        } else if property == data.width {
            value.width = v;
        } else {
            value.height = v;
        }
        self.set(ctx, parent, value);
        // a rejected value leaves the sub-property out of sync
        if let Some(data) = self.properties.get(&parent).copied() {
            sync_rect_subs(ctx, &mut self.ints, &data);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RectFData {
    value: RectF,
    constraint: RectF,
    decimals: i32,
    x: PropertyId,
    y: PropertyId,
    width: PropertyId,
    height: PropertyId,
}

impl RectFData {
    fn subs(&self) -> [PropertyId; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

fn sync_rect_f_subs(ctx: &mut ManagerContext, doubles: &mut DoubleManager, data: &RectFData) {
    let c = data.constraint;
    if c.is_null() {
        doubles.set_range(ctx, data.x, -f64::MAX, f64::MAX);
        doubles.set_range(ctx, data.y, -f64::MAX, f64::MAX);
        doubles.set_range(ctx, data.width, 0.0, f64::MAX);
        doubles.set_range(ctx, data.height, 0.0, f64::MAX);
    } else {
        doubles.set_range(ctx, data.x, c.x, c.right());
        doubles.set_range(ctx, data.y, c.y, c.bottom());
        doubles.set_range(ctx, data.width, 0.0, c.width);
        doubles.set_range(ctx, data.height, 0.0, c.height);
    }
    doubles.set(ctx, data.x, data.value.x);
    doubles.set(ctx, data.y, data.value.y);
    doubles.set(ctx, data.width, data.value.width);
    doubles.set(ctx, data.height, data.value.height);
}

#[derive(Debug)]
pub struct RectFManager {
    id: ManagerId,
    properties: HashMap<PropertyId, RectFData>,
    doubles: DoubleManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for RectFManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RectFManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            doubles: DoubleManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn double_manager(&self) -> &DoubleManager {
        &self.doubles
    }

    pub fn get(&self, property: PropertyId) -> Option<RectF> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn constraint(&self, property: PropertyId) -> Option<RectF> {
        self.properties.get(&property).map(|d| d.constraint)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: RectF) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let mut value = value.normalized();
        if !data.constraint.is_null() && !data.constraint.contains_rect(&value) {
            match data.constraint.intersected(&value) {
                Some(r) => value = r,
                None => return,
            }
        }
        if data.value == value {
            return;
        }
        data.value = value;
        sync_rect_f_subs(ctx, &mut self.doubles, data);
        ctx.value_changed(property, value);
    }

    pub fn set_constraint(&mut self, ctx: &mut ManagerContext, property: PropertyId, constraint: RectF) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let constraint = constraint.normalized();
        if data.constraint == constraint {
            return;
        }
        let old = data.value;
        data.constraint = constraint;
        if !constraint.is_null() && !constraint.contains_rect(&data.value) {
            data.value = fit_rect_f(data.value, constraint);
        }
        ctx.emit(Signal::ConstraintChanged {
            property,
            constraint: Variant::RectF(constraint),
        });
        sync_rect_f_subs(ctx, &mut self.doubles, data);
        if data.value != old {
            ctx.value_changed(property, data.value);
        }
    }

    pub fn set_decimals(&mut self, ctx: &mut ManagerContext, property: PropertyId, decimals: i32) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let decimals = decimals.clamp(0, super::double::MAX_DECIMALS);
        if data.decimals == decimals {
            return;
        }
        data.decimals = decimals;
        for sub in data.subs() {
            self.doubles.set_decimals(ctx, sub, decimals);
        }
        ctx.emit(Signal::DecimalsChanged { property, decimals });
    }
}

impl PropertyManager for RectFManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::RectF
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let x = add_sub_property(ctx, &mut self.doubles, property, "X");
        let y = add_sub_property(ctx, &mut self.doubles, property, "Y");
        let width = add_sub_property(ctx, &mut self.doubles, property, "Width");
        let height = add_sub_property(ctx, &mut self.doubles, property, "Height");
        let data = RectFData {
            value: RectF::default(),
            constraint: RectF::default(),
            decimals: DEFAULT_DECIMALS,
            x,
            y,
            width,
            height,
        };
        for sub in data.subs() {
            self.sub_to_parent.insert(sub, property);
        }
        sync_rect_f_subs(ctx, &mut self.doubles, &data);
        self.properties.insert(property, data);
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        let subs = data.subs();
        for sub in &subs {
            self.sub_to_parent.remove(sub);
        }
        remove_subs(ctx, &mut self.doubles, &subs);
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::RectF).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::RectF(r) = value {
            self.set(ctx, property, *r);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        let Some(data) = self.properties.get(&property) else {
            return Variant::Invalid;
        };
        match attribute {
            attributes::CONSTRAINT => Variant::RectF(data.constraint),
            attributes::DECIMALS => Variant::Int(data.decimals),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        match (attribute, value) {
            (attributes::CONSTRAINT, Variant::RectF(c)) => self.set_constraint(ctx, property, *c),
            (attributes::DECIMALS, Variant::Int(d)) => self.set_decimals(ctx, property, *d),
            _ => {}
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.properties
            .get(&property)
            .map(|d| {
                let n = d.decimals as usize;
                let r = d.value;
                format!("[({:.*}, {:.*}), {:.*} x {:.*}]", n, r.x, n, r.y, n, r.width, n, r.height)
            })
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.doubles]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.doubles.id() == manager).then_some(&mut self.doubles as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let (Some(data), Some(v)) = (self.properties.get(&parent).copied(), self.doubles.get(property)) else {
            return;
        };
        let mut value = data.value;
        if property == data.x {
            value.x = v;
        } else if property == data.y {
            value.y = v;
        } else if property == data.width {
            value.width = v;
        } else {
            value.height = v;
        }
        self.set(ctx, parent, value);
        if let Some(data) = self.properties.get(&parent).copied() {
            sync_rect_f_subs(ctx, &mut self.doubles, &data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::dispatch_write;

    #[test]
    fn test_rect_has_four_int_children() {
        let mut ctx = ManagerContext::new();
        let mut manager = RectManager::new();
        let p = manager.add_property(&mut ctx, "Bounds");
        let children = ctx.tree.children(p).to_vec();
        assert_eq!(children.len(), 4);
        let names: Vec<&str> = children.iter().map(|c| ctx.tree.name(*c)).collect();
        assert_eq!(names, vec!["X", "Y", "Width", "Height"]);
        assert!(children.iter().all(|c| manager.int_manager().has_property(*c)));
    }

    #[test]
    fn test_rect_constraint_cuts_value() {
        let mut ctx = ManagerContext::new();
        let mut manager = RectManager::new();
        let p = manager.add_property(&mut ctx, "Bounds");
        manager.set_constraint(&mut ctx, p, Rect::new(0, 0, 100, 100));
        manager.set(&mut ctx, p, Rect::new(50, 50, 100, 100));
        assert_eq!(manager.get(p), Some(Rect::new(50, 50, 50, 50)));

        manager.set(&mut ctx, p, Rect::new(200, 200, 10, 10));
        assert_eq!(manager.get(p), Some(Rect::new(50, 50, 50, 50)));
    }

    #[test]
    fn test_point_child_write_updates_parent() {
        let mut ctx = ManagerContext::new();
        let mut manager = PointManager::new();
        let p = manager.add_property(&mut ctx, "Location");
        let y = ctx.tree.children(p)[1];
        let owner = ctx.tree.manager_of(y).expect("owner");
        dispatch_write(&mut manager, owner, &mut ctx, y, &mut |m, ctx| {
            m.set_value(ctx, y, &Variant::Int(12))
        });
        assert_eq!(manager.get(p), Some(Point::new(0, 12)));
    }

    #[test]
    fn test_size_minimum_raises_value() {
        let mut ctx = ManagerContext::new();
        let mut manager = SizeManager::new();
        let p = manager.add_property(&mut ctx, "MinimumSize");
        manager.set(&mut ctx, p, Size::new(10, 10));
        manager.set_minimum(&mut ctx, p, Size::new(20, 5));
        assert_eq!(manager.get(p), Some(Size::new(20, 10)));
        let width = ctx.tree.children(p)[0];
        assert_eq!(manager.int_manager().minimum(width), Some(20));
    }

    #[test]
    fn test_size_f_decimals_reach_children() {
        let mut ctx = ManagerContext::new();
        let mut manager = SizeFManager::new();
        let p = manager.add_property(&mut ctx, "Scale");
        manager.set_decimals(&mut ctx, p, 4);
        let width = ctx.tree.children(p)[0];
        assert_eq!(manager.double_manager().decimals(width), Some(4));
    }
}
