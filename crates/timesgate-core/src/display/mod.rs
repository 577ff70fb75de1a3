//! Display composition.
//!
//! Items (text, date/time, weather, counters) are placed into a
//! [`DisplayList`] bound to one panel and sent as a single
//! `Draw/SendHttpItemList` command.

mod color;
mod item;
mod list;

pub use color::Color;
pub use item::{
    CounterItem, DateTimeItem, DisplayItem, FontSize, ItemType, ScrollDirection, TextAlignment,
    TextItem, WeatherItem, DEFAULT_DATE_URL,
};
pub use list::DisplayList;
