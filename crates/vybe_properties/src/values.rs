use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Clamps each dimension into `[minimum, maximum]`.
    pub fn bounded_to(&self, minimum: Size, maximum: Size) -> Size {
        Size {
            width: self.width.max(minimum.width).min(maximum.width),
            height: self.height.max(minimum.height).min(maximum.height),
        }
    }

    pub fn expanded_to(&self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    pub fn bounded_above(&self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

impl SizeF {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn bounded_to(&self, minimum: SizeF, maximum: SizeF) -> SizeF {
        SizeF {
            width: self.width.max(minimum.width).min(maximum.width),
            height: self.height.max(minimum.height).min(maximum.height),
        }
    }

    pub fn expanded_to(&self, other: SizeF) -> SizeF {
        SizeF::new(self.width.max(other.width), self.height.max(other.height))
    }

    pub fn bounded_above(&self, other: SizeF) -> SizeF {
        SizeF::new(self.width.min(other.width), self.height.min(other.height))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Edges saturate at the `i32` range.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// A rect with zero width and height, used as "no constraint".
    pub fn is_null(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Flips negative width/height so the rect covers the same area.
    pub fn normalized(&self) -> Rect {
        let mut r = *self;
        if r.width < 0 {
            r.x = r.x.saturating_add(r.width);
            r.width = r.width.saturating_neg();
        }
        if r.height < 0 {
            r.y = r.y.saturating_add(r.height);
            r.height = r.height.saturating_neg();
        }
        r
    }

    /// Overlap of two rects, `None` when they do not overlap.
    pub fn intersected(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y)))
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectF {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_null(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn contains_rect(&self, other: &RectF) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn normalized(&self) -> RectF {
        let mut r = *self;
        if r.width < 0.0 {
            r.x += r.width;
            r.width = -r.width;
        }
        if r.height < 0.0 {
            r.y += r.height;
            r.height = -r.height;
        }
        r
    }

    pub fn intersected(&self, other: &RectF) -> Option<RectF> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(RectF::new(x, y, right - x, bottom - y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(0, 0, 0)
    }
}

impl Color {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue, alpha: 255 }
    }

    pub fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }

    /// `#rrggbb` for opaque colors, `#aarrggbb` otherwise.
    pub fn name(&self) -> String {
        if self.alpha == 255 {
            format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.alpha, self.red, self.green, self.blue)
        }
    }

    pub fn from_name(name: &str) -> Option<Color> {
        let hex = name.trim().strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub point_size: i32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub kerning: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: FONT_FAMILIES[0].to_string(),
            point_size: 9,
            bold: false,
            italic: false,
            underline: false,
            strike_out: false,
            kerning: true,
        }
    }
}

/// Families offered by the font property's family sub-enum.
pub const FONT_FAMILIES: &[&str] = &[
    "Sans Serif",
    "Serif",
    "Monospace",
    "Arial",
    "Courier New",
    "Microsoft Sans Serif",
    "Segoe UI",
    "Tahoma",
    "Times New Roman",
    "Verdana",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    Fixed,
    Minimum,
    Maximum,
    #[default]
    Preferred,
    MinimumExpanding,
    Expanding,
    Ignored,
}

impl Policy {
    pub const ALL: [Policy; 7] = [
        Policy::Fixed,
        Policy::Minimum,
        Policy::Maximum,
        Policy::Preferred,
        Policy::MinimumExpanding,
        Policy::Expanding,
        Policy::Ignored,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Fixed => "Fixed",
            Policy::Minimum => "Minimum",
            Policy::Maximum => "Maximum",
            Policy::Preferred => "Preferred",
            Policy::MinimumExpanding => "MinimumExpanding",
            Policy::Expanding => "Expanding",
            Policy::Ignored => "Ignored",
        }
    }

    pub fn index(&self) -> i32 {
        Policy::ALL.iter().position(|p| p == self).unwrap_or(0) as i32
    }

    pub fn from_index(index: i32) -> Option<Policy> {
        usize::try_from(index).ok().and_then(|i| Policy::ALL.get(i).copied())
    }

    pub fn names() -> Vec<String> {
        Policy::ALL.iter().map(|p| p.as_str().to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizePolicy {
    pub horizontal: Policy,
    pub vertical: Policy,
    pub horizontal_stretch: u8,
    pub vertical_stretch: u8,
}

/// Portable key sequence text such as `Ctrl+S`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySequence(pub String);

impl KeySequence {
    pub fn new(text: impl Into<String>) -> Self {
        KeySequence(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Languages known to the locale property, each with its territories.
pub const LOCALES: &[(&str, &[&str])] = &[
    ("C", &["AnyTerritory"]),
    ("English", &["UnitedStates", "UnitedKingdom", "Canada", "Australia"]),
    ("French", &["France", "Belgium", "Canada", "Switzerland"]),
    ("German", &["Germany", "Austria", "Switzerland"]),
    ("Italian", &["Italy", "Switzerland"]),
    ("Japanese", &["Japan"]),
    ("Polish", &["Poland"]),
    ("Spanish", &["Spain", "Mexico", "Argentina"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub territory: String,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::c()
    }
}

impl Locale {
    pub fn c() -> Self {
        Locale {
            language: LOCALES[0].0.to_string(),
            territory: LOCALES[0].1[0].to_string(),
        }
    }

    /// Builds a locale, falling back to the language's first territory when
    /// `territory` is not used with `language`. Unknown languages yield `None`.
    pub fn new(language: &str, territory: &str) -> Option<Locale> {
        let (lang, territories) = LOCALES.iter().find(|(l, _)| *l == language)?;
        let territory = territories
            .iter()
            .find(|t| **t == territory)
            .unwrap_or(&territories[0]);
        Some(Locale {
            language: lang.to_string(),
            territory: territory.to_string(),
        })
    }

    pub fn language_names() -> Vec<String> {
        LOCALES.iter().map(|(l, _)| l.to_string()).collect()
    }

    pub fn territory_names(language: &str) -> Vec<String> {
        LOCALES
            .iter()
            .find(|(l, _)| *l == language)
            .map(|(_, ts)| ts.iter().map(|t| t.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn language_index(&self) -> i32 {
        LOCALES
            .iter()
            .position(|(l, _)| *l == self.language)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    pub fn territory_index(&self) -> i32 {
        Locale::territory_names(&self.language)
            .iter()
            .position(|t| *t == self.territory)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.language, self.territory)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorShape {
    #[default]
    Arrow,
    UpArrow,
    Cross,
    Wait,
    IBeam,
    SizeVer,
    SizeHor,
    SizeBDiag,
    SizeFDiag,
    SizeAll,
    Blank,
    SplitV,
    SplitH,
    PointingHand,
    Forbidden,
    WhatsThis,
    Busy,
    OpenHand,
    ClosedHand,
}

impl CursorShape {
    pub const ALL: [CursorShape; 19] = [
        CursorShape::Arrow,
        CursorShape::UpArrow,
        CursorShape::Cross,
        CursorShape::Wait,
        CursorShape::IBeam,
        CursorShape::SizeVer,
        CursorShape::SizeHor,
        CursorShape::SizeBDiag,
        CursorShape::SizeFDiag,
        CursorShape::SizeAll,
        CursorShape::Blank,
        CursorShape::SplitV,
        CursorShape::SplitH,
        CursorShape::PointingHand,
        CursorShape::Forbidden,
        CursorShape::WhatsThis,
        CursorShape::Busy,
        CursorShape::OpenHand,
        CursorShape::ClosedHand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CursorShape::Arrow => "Arrow",
            CursorShape::UpArrow => "Up Arrow",
            CursorShape::Cross => "Cross",
            CursorShape::Wait => "Wait",
            CursorShape::IBeam => "IBeam",
            CursorShape::SizeVer => "Size Vertical",
            CursorShape::SizeHor => "Size Horizontal",
            CursorShape::SizeBDiag => "Size Backslash",
            CursorShape::SizeFDiag => "Size Slash",
            CursorShape::SizeAll => "Size All",
            CursorShape::Blank => "Blank",
            CursorShape::SplitV => "Split Vertical",
            CursorShape::SplitH => "Split Horizontal",
            CursorShape::PointingHand => "Pointing Hand",
            CursorShape::Forbidden => "Forbidden",
            CursorShape::WhatsThis => "Whats This",
            CursorShape::Busy => "Busy",
            CursorShape::OpenHand => "Open Hand",
            CursorShape::ClosedHand => "Closed Hand",
        }
    }
}

/// Validation pattern of string properties. A value is accepted when the
/// whole text matches. Compared by pattern text.
#[derive(Debug, Clone, Default)]
pub struct RegExp {
    pattern: String,
    anchored: Option<regex::Regex>,
}

impl RegExp {
    pub fn new(pattern: &str) -> Result<RegExp, regex::Error> {
        let anchored = if pattern.is_empty() {
            None
        } else {
            Some(regex::Regex::new(&format!("^(?:{pattern})$"))?)
        };
        Ok(RegExp {
            pattern: pattern.to_string(),
            anchored,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// An empty pattern accepts everything.
    pub fn accepts(&self, text: &str) -> bool {
        self.anchored.as_ref().is_none_or(|re| re.is_match(text))
    }
}

impl PartialEq for RegExp {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern()
    }
}

impl Serialize for RegExp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.pattern())
    }
}

impl<'de> Deserialize<'de> for RegExp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        RegExp::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// Icon reference (a resource path); the property model never loads pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Icon(pub String);

/// Enum value index → icon.
pub type IconMap = BTreeMap<i32, Icon>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_name_roundtrip() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.name(), "#78123456");
        assert_eq!(Color::from_name(&c.name()), Some(c));
        assert_eq!(Color::from_name("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_name("red"), None);
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersected(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersected(&Rect::new(20, 20, 1, 1)), None);
        assert_eq!(Rect::new(10, 10, -4, -6).normalized(), Rect::new(6, 4, 4, 6));
    }

    #[test]
    fn test_locale_falls_back_to_first_territory() {
        let l = Locale::new("German", "Japan").expect("German is known");
        assert_eq!(l.territory, "Germany");
        assert!(Locale::new("Klingon", "Qo'noS").is_none());
    }
}
