use crate::types::{icon_map_type_id, TypeId};
use crate::values::*;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A boxed, self-describing property value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Invalid,
    Bool(bool),
    Int(i32),
    Double(f64),
    Char(char),
    String(String),
    StringList(Vec<String>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    KeySequence(KeySequence),
    Locale(Locale),
    Point(Point),
    PointF(PointF),
    Size(Size),
    SizeF(SizeF),
    Rect(Rect),
    RectF(RectF),
    Color(Color),
    SizePolicy(SizePolicy),
    Font(Font),
    Cursor(CursorShape),
    RegExp(RegExp),
    IconMap(IconMap),
}

impl Variant {
    pub fn type_id(&self) -> TypeId {
        match self {
            Variant::Invalid => TypeId::INVALID,
            Variant::Bool(_) => TypeId::BOOL,
            Variant::Int(_) => TypeId::INT,
            Variant::Double(_) => TypeId::DOUBLE,
            Variant::Char(_) => TypeId::CHAR,
            Variant::String(_) => TypeId::STRING,
            Variant::StringList(_) => TypeId::STRING_LIST,
            Variant::Date(_) => TypeId::DATE,
            Variant::Time(_) => TypeId::TIME,
            Variant::DateTime(_) => TypeId::DATE_TIME,
            Variant::KeySequence(_) => TypeId::KEY_SEQUENCE,
            Variant::Locale(_) => TypeId::LOCALE,
            Variant::Point(_) => TypeId::POINT,
            Variant::PointF(_) => TypeId::POINT_F,
            Variant::Size(_) => TypeId::SIZE,
            Variant::SizeF(_) => TypeId::SIZE_F,
            Variant::Rect(_) => TypeId::RECT,
            Variant::RectF(_) => TypeId::RECT_F,
            Variant::Color(_) => TypeId::COLOR,
            Variant::SizePolicy(_) => TypeId::SIZE_POLICY,
            Variant::Font(_) => TypeId::FONT,
            Variant::Cursor(_) => TypeId::CURSOR,
            Variant::RegExp(_) => TypeId::REG_EXP,
            Variant::IconMap(_) => icon_map_type_id(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Variant::Invalid)
    }

    /// Whether this value can be converted to `target`. The check looks at the
    /// value itself, so `"12"` converts to an int while `"twelve"` does not.
    pub fn can_convert(&self, target: TypeId) -> bool {
        self.convert(target).is_some()
    }

    /// Converts to `target`, `None` if the conversion is not possible.
    pub fn convert(&self, target: TypeId) -> Option<Variant> {
        if !self.is_valid() || !target.is_valid() {
            return None;
        }
        if self.type_id() == target {
            return Some(self.clone());
        }
        match target {
            TypeId::BOOL => self.to_bool().map(Variant::Bool),
            TypeId::INT => self.to_int().map(Variant::Int),
            TypeId::DOUBLE => self.to_double().map(Variant::Double),
            TypeId::CHAR => self.to_char().map(Variant::Char),
            TypeId::STRING => self.to_string_value().map(Variant::String),
            TypeId::STRING_LIST => self.to_string_list().map(Variant::StringList),
            TypeId::DATE => self.to_date().map(Variant::Date),
            TypeId::TIME => self.to_time().map(Variant::Time),
            TypeId::DATE_TIME => self.to_date_time().map(Variant::DateTime),
            TypeId::KEY_SEQUENCE => self.to_key_sequence().map(Variant::KeySequence),
            TypeId::POINT => self.to_point().map(Variant::Point),
            TypeId::POINT_F => self.to_point_f().map(Variant::PointF),
            TypeId::SIZE => self.to_size().map(Variant::Size),
            TypeId::SIZE_F => self.to_size_f().map(Variant::SizeF),
            TypeId::RECT => self.to_rect().map(Variant::Rect),
            TypeId::RECT_F => self.to_rect_f().map(Variant::RectF),
            TypeId::COLOR => self.to_color().map(Variant::Color),
            TypeId::REG_EXP => self.to_reg_exp().map(Variant::RegExp),
            _ => None,
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(b) => Some(*b),
            Variant::Int(i) => Some(*i != 0),
            Variant::Double(d) => Some(*d != 0.0),
            Variant::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn to_int(&self) -> Option<i32> {
        match self {
            Variant::Int(i) => Some(*i),
            Variant::Bool(b) => Some(*b as i32),
            Variant::Double(d) => {
                let r = d.round();
                if r.is_finite() && r >= i32::MIN as f64 && r <= i32::MAX as f64 {
                    Some(r as i32)
                } else {
                    None
                }
            }
            Variant::Char(c) => i32::try_from(*c as u32).ok(),
            Variant::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn to_double(&self) -> Option<f64> {
        match self {
            Variant::Double(d) => Some(*d),
            Variant::Int(i) => Some(*i as f64),
            Variant::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Variant::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn to_char(&self) -> Option<char> {
        match self {
            Variant::Char(c) => Some(*c),
            Variant::Int(i) => u32::try_from(*i).ok().and_then(char::from_u32),
            Variant::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// String form of scalar values. Named to stay clear of `ToString`.
    pub fn to_string_value(&self) -> Option<String> {
        match self {
            Variant::String(s) => Some(s.clone()),
            Variant::Bool(b) => Some(b.to_string()),
            Variant::Int(i) => Some(i.to_string()),
            Variant::Double(d) => Some(d.to_string()),
            Variant::Char(c) => Some(c.to_string()),
            Variant::KeySequence(k) => Some(k.0.clone()),
            Variant::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
            Variant::Time(t) => Some(t.format(TIME_FORMAT).to_string()),
            Variant::DateTime(dt) => Some(dt.format(DATE_TIME_FORMAT).to_string()),
            Variant::Color(c) => Some(c.name()),
            Variant::StringList(list) if list.len() == 1 => Some(list[0].clone()),
            _ => None,
        }
    }

    pub fn to_string_list(&self) -> Option<Vec<String>> {
        match self {
            Variant::StringList(list) => Some(list.clone()),
            Variant::String(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Variant::Date(d) => Some(*d),
            Variant::DateTime(dt) => Some(dt.date()),
            Variant::String(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok(),
            _ => None,
        }
    }

    pub fn to_time(&self) -> Option<NaiveTime> {
        match self {
            Variant::Time(t) => Some(*t),
            Variant::DateTime(dt) => Some(dt.time()),
            Variant::String(s) => NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(s.trim(), "%H:%M"))
                .ok(),
            _ => None,
        }
    }

    pub fn to_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Variant::DateTime(dt) => Some(*dt),
            Variant::Date(d) => d.and_hms_opt(0, 0, 0),
            Variant::String(s) => NaiveDateTime::parse_from_str(s.trim(), DATE_TIME_FORMAT).ok(),
            _ => None,
        }
    }

    pub fn to_key_sequence(&self) -> Option<KeySequence> {
        match self {
            Variant::KeySequence(k) => Some(k.clone()),
            Variant::String(s) => Some(KeySequence::new(s.clone())),
            _ => None,
        }
    }

    pub fn to_point(&self) -> Option<Point> {
        match self {
            Variant::Point(p) => Some(*p),
            Variant::PointF(p) => Some(Point::new(p.x.round() as i32, p.y.round() as i32)),
            _ => None,
        }
    }

    pub fn to_point_f(&self) -> Option<PointF> {
        match self {
            Variant::PointF(p) => Some(*p),
            Variant::Point(p) => Some(PointF::new(p.x as f64, p.y as f64)),
            _ => None,
        }
    }

    pub fn to_size(&self) -> Option<Size> {
        match self {
            Variant::Size(s) => Some(*s),
            Variant::SizeF(s) => Some(Size::new(s.width.round() as i32, s.height.round() as i32)),
            _ => None,
        }
    }

    pub fn to_size_f(&self) -> Option<SizeF> {
        match self {
            Variant::SizeF(s) => Some(*s),
            Variant::Size(s) => Some(SizeF::new(s.width as f64, s.height as f64)),
            _ => None,
        }
    }

    pub fn to_rect(&self) -> Option<Rect> {
        match self {
            Variant::Rect(r) => Some(*r),
            Variant::RectF(r) => Some(Rect::new(
                r.x.round() as i32,
                r.y.round() as i32,
                r.width.round() as i32,
                r.height.round() as i32,
            )),
            _ => None,
        }
    }

    pub fn to_rect_f(&self) -> Option<RectF> {
        match self {
            Variant::RectF(r) => Some(*r),
            Variant::Rect(r) => Some(RectF::new(r.x as f64, r.y as f64, r.width as f64, r.height as f64)),
            _ => None,
        }
    }

    pub fn to_color(&self) -> Option<Color> {
        match self {
            Variant::Color(c) => Some(*c),
            Variant::String(s) => Color::from_name(s),
            _ => None,
        }
    }

    pub fn to_reg_exp(&self) -> Option<RegExp> {
        match self {
            Variant::RegExp(r) => Some(r.clone()),
            Variant::String(s) => RegExp::new(s).ok(),
            _ => None,
        }
    }

    pub fn as_locale(&self) -> Option<&Locale> {
        match self {
            Variant::Locale(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_size_policy(&self) -> Option<SizePolicy> {
        match self {
            Variant::SizePolicy(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&Font> {
        match self {
            Variant::Font(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_cursor(&self) -> Option<CursorShape> {
        match self {
            Variant::Cursor(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_icon_map(&self) -> Option<&IconMap> {
        match self {
            Variant::IconMap(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Variant::Invalid => Ok(()),
            Variant::StringList(list) => write!(f, "{}", list.join(", ")),
            Variant::Locale(l) => write!(f, "{}", l),
            Variant::Point(p) => write!(f, "({}, {})", p.x, p.y),
            Variant::PointF(p) => write!(f, "({}, {})", p.x, p.y),
            Variant::Size(s) => write!(f, "{} x {}", s.width, s.height),
            Variant::SizeF(s) => write!(f, "{} x {}", s.width, s.height),
            Variant::Rect(r) => write!(f, "[({}, {}), {} x {}]", r.x, r.y, r.width, r.height),
            Variant::RectF(r) => write!(f, "[({}, {}), {} x {}]", r.x, r.y, r.width, r.height),
            Variant::SizePolicy(p) => write!(
                f,
                "[{}, {}, {}, {}]",
                p.horizontal.as_str(),
                p.vertical.as_str(),
                p.horizontal_stretch,
                p.vertical_stretch
            ),
            Variant::Font(font) => write!(f, "[{}, {}]", font.family, font.point_size),
            Variant::Cursor(c) => write!(f, "{}", c.as_str()),
            Variant::RegExp(r) => write!(f, "{}", r.pattern()),
            Variant::IconMap(m) => write!(f, "{} icons", m.len()),
            other => write!(f, "{}", other.to_string_value().unwrap_or_default()),
        }
    }
}

impl From<bool> for Variant {
    fn from(b: bool) -> Self {
        Variant::Bool(b)
    }
}

impl From<i32> for Variant {
    fn from(i: i32) -> Self {
        Variant::Int(i)
    }
}

impl From<f64> for Variant {
    fn from(d: f64) -> Self {
        Variant::Double(d)
    }
}

impl From<char> for Variant {
    fn from(c: char) -> Self {
        Variant::Char(c)
    }
}

impl From<String> for Variant {
    fn from(s: String) -> Self {
        Variant::String(s)
    }
}

impl From<&str> for Variant {
    fn from(s: &str) -> Self {
        Variant::String(s.to_string())
    }
}

impl From<Vec<String>> for Variant {
    fn from(list: Vec<String>) -> Self {
        Variant::StringList(list)
    }
}

impl From<NaiveDate> for Variant {
    fn from(d: NaiveDate) -> Self {
        Variant::Date(d)
    }
}

impl From<NaiveTime> for Variant {
    fn from(t: NaiveTime) -> Self {
        Variant::Time(t)
    }
}

impl From<NaiveDateTime> for Variant {
    fn from(dt: NaiveDateTime) -> Self {
        Variant::DateTime(dt)
    }
}

impl From<Point> for Variant {
    fn from(p: Point) -> Self {
        Variant::Point(p)
    }
}

impl From<PointF> for Variant {
    fn from(p: PointF) -> Self {
        Variant::PointF(p)
    }
}

impl From<Size> for Variant {
    fn from(s: Size) -> Self {
        Variant::Size(s)
    }
}

impl From<SizeF> for Variant {
    fn from(s: SizeF) -> Self {
        Variant::SizeF(s)
    }
}

impl From<Rect> for Variant {
    fn from(r: Rect) -> Self {
        Variant::Rect(r)
    }
}

impl From<RectF> for Variant {
    fn from(r: RectF) -> Self {
        Variant::RectF(r)
    }
}

impl From<Color> for Variant {
    fn from(c: Color) -> Self {
        Variant::Color(c)
    }
}

impl From<Font> for Variant {
    fn from(f: Font) -> Self {
        Variant::Font(f)
    }
}

impl From<Locale> for Variant {
    fn from(l: Locale) -> Self {
        Variant::Locale(l)
    }
}

impl From<SizePolicy> for Variant {
    fn from(p: SizePolicy) -> Self {
        Variant::SizePolicy(p)
    }
}

impl From<CursorShape> for Variant {
    fn from(c: CursorShape) -> Self {
        Variant::Cursor(c)
    }
}

impl From<KeySequence> for Variant {
    fn from(k: KeySequence) -> Self {
        Variant::KeySequence(k)
    }
}

impl From<RegExp> for Variant {
    fn from(r: RegExp) -> Self {
        Variant::RegExp(r)
    }
}

impl From<IconMap> for Variant {
    fn from(m: IconMap) -> Self {
        Variant::IconMap(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_int_depends_on_content() {
        assert_eq!(Variant::from("12").convert(TypeId::INT), Some(Variant::Int(12)));
        assert!(!Variant::from("not an int").can_convert(TypeId::INT));
    }

    #[test]
    fn test_invalid_converts_to_nothing() {
        assert!(!Variant::Invalid.can_convert(TypeId::INT));
        assert!(!Variant::Int(1).can_convert(TypeId::INVALID));
    }

    #[test]
    fn test_rect_f_rounds_to_rect() {
        let v = Variant::RectF(RectF::new(0.4, 0.6, 9.5, 2.2));
        assert_eq!(v.to_rect(), Some(Rect::new(0, 1, 10, 2)));
    }
}
