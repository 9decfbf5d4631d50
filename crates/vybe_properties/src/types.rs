use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Identifies the type of a boxed value or of a property.
///
/// Built-in value kinds have fixed ids. Additional types (the enum, flag and
/// group marker types, the icon map attribute type) are handed out at runtime
/// by [`TypeId::register`] and stay stable for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(u32);

const FIRST_USER_TYPE: u32 = 1024;

struct UserTypes {
    by_name: HashMap<&'static str, TypeId>,
    names: HashMap<TypeId, &'static str>,
    next: u32,
}

static USER_TYPES: LazyLock<Mutex<UserTypes>> = LazyLock::new(|| {
    Mutex::new(UserTypes {
        by_name: HashMap::new(),
        names: HashMap::new(),
        next: FIRST_USER_TYPE,
    })
});

impl TypeId {
    /// "No value". Group properties report this as their value type.
    pub const INVALID: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const INT: TypeId = TypeId(2);
    pub const DOUBLE: TypeId = TypeId(3);
    pub const CHAR: TypeId = TypeId(4);
    pub const STRING: TypeId = TypeId(5);
    pub const STRING_LIST: TypeId = TypeId(6);
    pub const DATE: TypeId = TypeId(7);
    pub const TIME: TypeId = TypeId(8);
    pub const DATE_TIME: TypeId = TypeId(9);
    pub const KEY_SEQUENCE: TypeId = TypeId(10);
    pub const LOCALE: TypeId = TypeId(11);
    pub const POINT: TypeId = TypeId(12);
    pub const POINT_F: TypeId = TypeId(13);
    pub const SIZE: TypeId = TypeId(14);
    pub const SIZE_F: TypeId = TypeId(15);
    pub const RECT: TypeId = TypeId(16);
    pub const RECT_F: TypeId = TypeId(17);
    pub const COLOR: TypeId = TypeId(18);
    pub const SIZE_POLICY: TypeId = TypeId(19);
    pub const FONT: TypeId = TypeId(20);
    pub const CURSOR: TypeId = TypeId(21);
    pub const REG_EXP: TypeId = TypeId(22);

    /// Registers a user type under `name`, returning the existing id when the
    /// name was registered before.
    pub fn register(name: &'static str) -> TypeId {
        let mut types = USER_TYPES.lock();
        if let Some(id) = types.by_name.get(name) {
            return *id;
        }
        let id = TypeId(types.next);
        types.next += 1;
        types.by_name.insert(name, id);
        types.names.insert(id, name);
        tracing::trace!(name, id = id.0, "registered user type");
        id
    }

    pub fn from_raw(raw: u32) -> TypeId {
        TypeId(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != TypeId::INVALID
    }

    pub fn is_user_type(self) -> bool {
        self.0 >= FIRST_USER_TYPE
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            TypeId::BOOL => "bool",
            TypeId::INT => "int",
            TypeId::DOUBLE => "double",
            TypeId::CHAR => "char",
            TypeId::STRING => "string",
            TypeId::STRING_LIST => "string_list",
            TypeId::DATE => "date",
            TypeId::TIME => "time",
            TypeId::DATE_TIME => "date_time",
            TypeId::KEY_SEQUENCE => "key_sequence",
            TypeId::LOCALE => "locale",
            TypeId::POINT => "point",
            TypeId::POINT_F => "point_f",
            TypeId::SIZE => "size",
            TypeId::SIZE_F => "size_f",
            TypeId::RECT => "rect",
            TypeId::RECT_F => "rect_f",
            TypeId::COLOR => "color",
            TypeId::SIZE_POLICY => "size_policy",
            TypeId::FONT => "font",
            TypeId::CURSOR => "cursor",
            TypeId::REG_EXP => "reg_exp",
            other if other.is_user_type() => return USER_TYPES.lock().names.get(&other).copied(),
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

/// Marker type of enum properties. Their value type is [`TypeId::INT`].
pub fn enum_type_id() -> TypeId {
    TypeId::register("vybe::EnumPropertyType")
}

/// Marker type of flag properties. Their value type is [`TypeId::INT`].
pub fn flag_type_id() -> TypeId {
    TypeId::register("vybe::FlagPropertyType")
}

/// Marker type of group properties, which hold no value.
pub fn group_type_id() -> TypeId {
    TypeId::register("vybe::GroupPropertyType")
}

/// Type of the `enumIcons` attribute.
pub fn icon_map_type_id() -> TypeId {
    TypeId::register("vybe::IconMap")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let a = TypeId::register("tests::Idempotent");
        let b = TypeId::register("tests::Idempotent");
        assert_eq!(a, b);
        assert!(a.is_user_type());
        assert_eq!(a.name(), Some("tests::Idempotent"));
    }

    #[test]
    fn test_marker_types_are_distinct() {
        let ids = [enum_type_id(), flag_type_id(), group_type_id(), icon_map_type_id()];
        for (i, a) in ids.iter().enumerate() {
            assert!(a.is_valid());
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
