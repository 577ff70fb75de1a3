//! Display items and their wire schema.
//!
//! Every item renders into one entry of a `Draw/SendHttpItemList` item list.
//! Wire keys are the device's own (`TextId`, `type`, `TextWidth`,
//! `Textheight`, ...); each variant emits only the keys its type code uses.

use super::Color;
use serde_json::{Map, Value};

/// Date source polled by the device for date/time widgets.
pub const DEFAULT_DATE_URL: &str = "http://appin.divoom-gz.com/Device/ReturnCurrentDate?test=0";

/// Default widget width in pixels.
const DEFAULT_WIDTH: u16 = 64;

/// Default widget height in pixels.
const DEFAULT_HEIGHT: u16 = 16;

/// Default device polling interval for URL-driven items, in seconds.
const DEFAULT_UPDATE_SECS: u32 = 60;

/// Device item type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ItemType {
    /// Weather condition widget.
    Weather = 6,
    /// Date/time widget fed from a URL.
    DateTime = 14,
    /// Caller-supplied text.
    CustomText = 22,
    /// Text fetched from a URL by the device.
    UrlText = 23,
}

impl ItemType {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Built-in font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FontSize {
    /// 5px
    Tiny = 0,
    /// 8px
    Small = 1,
    /// 11px
    #[default]
    Medium = 2,
    /// 14px
    Large = 3,
    /// 16px
    Huge = 4,
}

impl From<FontSize> for u8 {
    fn from(font: FontSize) -> Self {
        font as u8
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextAlignment {
    Left = 0,
    #[default]
    Center = 1,
    Right = 2,
}

/// Marquee direction. Only meaningful when the scroll speed is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ScrollDirection {
    #[default]
    Left = 0,
    Right = 1,
}

/// Static or scrolling text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub slot_id: u8,
    pub x: u16,
    pub y: u16,
    pub direction: ScrollDirection,
    pub font: u8,
    pub width: u16,
    pub height: u16,
    /// 0 renders static text; anything else scrolls.
    pub scroll_speed: u8,
    pub alignment: TextAlignment,
    pub text: String,
    pub color: Color,
}

impl TextItem {
    pub fn new(slot_id: u8, text: impl Into<String>) -> Self {
        Self {
            slot_id,
            x: 0,
            y: 0,
            direction: ScrollDirection::default(),
            font: FontSize::default().into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scroll_speed: 0,
            alignment: TextAlignment::default(),
            text: text.into(),
            color: Color::default(),
        }
    }

    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn font(mut self, font: impl Into<u8>) -> Self {
        self.font = font.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Enables marquee scrolling. A speed of 0 keeps the text static.
    pub fn scroll(mut self, speed: u8, direction: ScrollDirection) -> Self {
        self.scroll_speed = speed;
        self.direction = direction;
        self
    }

    fn to_wire(&self) -> Map<String, Value> {
        WireEntry::new(self.slot_id, ItemType::CustomText)
            .set("x", self.x)
            .set("y", self.y)
            .set("dir", self.direction as u8)
            .set("font", self.font)
            .set("TextWidth", self.width)
            .set("Textheight", self.height)
            .set("speed", self.scroll_speed)
            .set("align", self.alignment as u8)
            .set("TextString", self.text.as_str())
            .set("color", self.color.to_string())
            .finish()
    }
}

/// Date/time widget. The device polls `source_url` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeItem {
    pub slot_id: u8,
    pub x: u16,
    pub y: u16,
    pub font: u8,
    pub width: u16,
    pub height: u16,
    pub update_interval_secs: u32,
    pub alignment: TextAlignment,
    pub source_url: String,
    pub color: Color,
}

impl DateTimeItem {
    pub fn new(slot_id: u8) -> Self {
        Self {
            slot_id,
            x: 0,
            y: 0,
            font: FontSize::default().into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            update_interval_secs: DEFAULT_UPDATE_SECS,
            alignment: TextAlignment::default(),
            source_url: DEFAULT_DATE_URL.to_string(),
            color: Color::default(),
        }
    }

    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn font(mut self, font: impl Into<u8>) -> Self {
        self.font = font.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn update_every(mut self, secs: u32) -> Self {
        self.update_interval_secs = secs;
        self
    }

    pub fn source(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    fn to_wire(&self) -> Map<String, Value> {
        WireEntry::new(self.slot_id, ItemType::DateTime)
            .set("x", self.x)
            .set("y", self.y)
            .set("font", self.font)
            .set("TextWidth", self.width)
            .set("Textheight", self.height)
            .set("update_time", self.update_interval_secs)
            .set("align", self.alignment as u8)
            .set("TextString", self.source_url.as_str())
            .set("color", self.color.to_string())
            .finish()
    }
}

/// Current weather condition, rendered from the device's own weather data.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherItem {
    pub slot_id: u8,
    pub x: u16,
    pub y: u16,
    pub font: u8,
    pub width: u16,
    pub height: u16,
    pub alignment: TextAlignment,
    pub color: Color,
}

impl WeatherItem {
    pub fn new(slot_id: u8) -> Self {
        Self {
            slot_id,
            x: 0,
            y: 0,
            font: FontSize::default().into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            alignment: TextAlignment::default(),
            color: Color::default(),
        }
    }

    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn font(mut self, font: impl Into<u8>) -> Self {
        self.font = font.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn to_wire(&self) -> Map<String, Value> {
        WireEntry::new(self.slot_id, ItemType::Weather)
            .set("x", self.x)
            .set("y", self.y)
            .set("font", self.font)
            .set("TextWidth", self.width)
            .set("Textheight", self.height)
            .set("align", self.alignment as u8)
            .set("color", self.color.to_string())
            .finish()
    }
}

/// A value the device fetches from `source_url` and shows as text, such as
/// a visitor count or a score feed.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterItem {
    pub slot_id: u8,
    pub x: u16,
    pub y: u16,
    pub direction: ScrollDirection,
    pub font: u8,
    pub width: u16,
    pub height: u16,
    pub scroll_speed: u8,
    pub update_interval_secs: u32,
    pub alignment: TextAlignment,
    pub source_url: String,
    pub color: Color,
}

impl CounterItem {
    pub fn new(slot_id: u8, source_url: impl Into<String>) -> Self {
        Self {
            slot_id,
            x: 0,
            y: 0,
            direction: ScrollDirection::default(),
            font: FontSize::default().into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scroll_speed: 0,
            update_interval_secs: DEFAULT_UPDATE_SECS,
            alignment: TextAlignment::default(),
            source_url: source_url.into(),
            color: Color::default(),
        }
    }

    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn font(mut self, font: impl Into<u8>) -> Self {
        self.font = font.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn scroll(mut self, speed: u8, direction: ScrollDirection) -> Self {
        self.scroll_speed = speed;
        self.direction = direction;
        self
    }

    pub fn update_every(mut self, secs: u32) -> Self {
        self.update_interval_secs = secs;
        self
    }

    fn to_wire(&self) -> Map<String, Value> {
        WireEntry::new(self.slot_id, ItemType::UrlText)
            .set("x", self.x)
            .set("y", self.y)
            .set("dir", self.direction as u8)
            .set("font", self.font)
            .set("TextWidth", self.width)
            .set("Textheight", self.height)
            .set("speed", self.scroll_speed)
            .set("update_time", self.update_interval_secs)
            .set("align", self.alignment as u8)
            .set("TextString", self.source_url.as_str())
            .set("color", self.color.to_string())
            .finish()
    }
}

/// One renderable element of a display list.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    Text(TextItem),
    DateTime(DateTimeItem),
    Weather(WeatherItem),
    Counter(CounterItem),
}

impl DisplayItem {
    /// Returns the slot (`TextId`) of this item.
    pub fn slot_id(&self) -> u8 {
        match self {
            DisplayItem::Text(item) => item.slot_id,
            DisplayItem::DateTime(item) => item.slot_id,
            DisplayItem::Weather(item) => item.slot_id,
            DisplayItem::Counter(item) => item.slot_id,
        }
    }

    /// Returns the device type code of this item.
    pub fn item_type(&self) -> ItemType {
        match self {
            DisplayItem::Text(_) => ItemType::CustomText,
            DisplayItem::DateTime(_) => ItemType::DateTime,
            DisplayItem::Weather(_) => ItemType::Weather,
            DisplayItem::Counter(_) => ItemType::UrlText,
        }
    }

    /// Renders the item-list entry for this item.
    pub fn to_wire(&self) -> Map<String, Value> {
        match self {
            DisplayItem::Text(item) => item.to_wire(),
            DisplayItem::DateTime(item) => item.to_wire(),
            DisplayItem::Weather(item) => item.to_wire(),
            DisplayItem::Counter(item) => item.to_wire(),
        }
    }
}

impl From<TextItem> for DisplayItem {
    fn from(item: TextItem) -> Self {
        DisplayItem::Text(item)
    }
}

impl From<DateTimeItem> for DisplayItem {
    fn from(item: DateTimeItem) -> Self {
        DisplayItem::DateTime(item)
    }
}

impl From<WeatherItem> for DisplayItem {
    fn from(item: WeatherItem) -> Self {
        DisplayItem::Weather(item)
    }
}

impl From<CounterItem> for DisplayItem {
    fn from(item: CounterItem) -> Self {
        DisplayItem::Counter(item)
    }
}

/// Item-list entry under construction. Keys keep insertion order.
struct WireEntry(Map<String, Value>);

impl WireEntry {
    fn new(slot_id: u8, item_type: ItemType) -> Self {
        Self(Map::new())
            .set("TextId", slot_id)
            .set("type", item_type.code())
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    fn finish(self) -> Map<String, Value> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(map: &Map<String, Value>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_text_item_schema() {
        let item = TextItem::new(2, "Hello")
            .at(16, 16)
            .size(48, 16)
            .color(Color::RED)
            .scroll(100, ScrollDirection::Left);
        let wire = DisplayItem::from(item).to_wire();
        assert_eq!(
            keys(&wire),
            [
                "TextId",
                "type",
                "x",
                "y",
                "dir",
                "font",
                "TextWidth",
                "Textheight",
                "speed",
                "align",
                "TextString",
                "color"
            ]
        );
        assert_eq!(wire["type"], 22);
        assert_eq!(wire["TextString"], "Hello");
        assert_eq!(wire["color"], "#FF0000");
        assert_eq!(wire["speed"], 100);
    }

    #[test]
    fn test_static_text_keeps_direction() {
        // Speed gates scrolling on the device; direction is sent as-is.
        let wire = TextItem::new(1, "static")
            .scroll(0, ScrollDirection::Right)
            .to_wire();
        assert_eq!(wire["speed"], 0);
        assert_eq!(wire["dir"], 1);
    }

    #[test]
    fn test_date_time_schema_omits_scroll_fields() {
        let wire = DisplayItem::from(DateTimeItem::new(3).update_every(30)).to_wire();
        assert_eq!(wire["type"], 14);
        assert_eq!(wire["update_time"], 30);
        assert_eq!(wire["TextString"], DEFAULT_DATE_URL);
        assert!(!wire.contains_key("speed"));
        assert!(!wire.contains_key("dir"));
    }

    #[test]
    fn test_weather_schema() {
        let wire = DisplayItem::from(WeatherItem::new(4).font(FontSize::Large)).to_wire();
        assert_eq!(wire["type"], 6);
        assert_eq!(wire["font"], 3);
        assert!(!wire.contains_key("TextString"));
        assert!(!wire.contains_key("update_time"));
    }

    #[test]
    fn test_counter_schema() {
        let item = CounterItem::new(5, "http://example.com/count").update_every(5);
        let wire = DisplayItem::from(item).to_wire();
        assert_eq!(wire["type"], 23);
        assert_eq!(wire["update_time"], 5);
        assert_eq!(wire["TextString"], "http://example.com/count");
        assert!(wire.contains_key("speed"));
    }

    #[test]
    fn test_every_item_leads_with_slot_and_type() {
        let items: [DisplayItem; 4] = [
            TextItem::new(0, "a").into(),
            DateTimeItem::new(1).into(),
            WeatherItem::new(2).into(),
            CounterItem::new(3, "http://example.com/n").into(),
        ];
        for item in items {
            let wire = item.to_wire();
            assert_eq!(keys(&wire)[..2], ["TextId", "type"]);
            assert_eq!(wire["TextId"], item.slot_id());
            assert_eq!(wire["type"], item.item_type().code());
            assert!(wire.contains_key("color"));
        }
    }

    #[test]
    fn test_item_type_tags() {
        assert_eq!(
            DisplayItem::from(TextItem::new(0, "")).item_type(),
            ItemType::CustomText
        );
        assert_eq!(
            DisplayItem::from(DateTimeItem::new(0)).item_type(),
            ItemType::DateTime
        );
        assert_eq!(DisplayItem::from(WeatherItem::new(9)).slot_id(), 9);
    }
}
