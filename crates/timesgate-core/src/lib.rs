//! Times Gate Client Library
//!
//! Controls Divoom Times Gate displays over their local JSON-over-HTTP
//! command interface: typed commands, five-panel addressing and composed
//! display lists.
//!
//! The library emits `tracing` events but never installs a subscriber; pass a
//! span to [`DeviceSession::builder`] to route a session's logging.

pub mod catalog;
pub mod device;
pub mod discovery;
pub mod display;
pub mod error;
pub mod panel;
pub mod protocol;
pub mod transport;

pub use device::TimesGateDevice;
pub use discovery::{discover_devices, DeviceInfo, Discovery};
pub use display::{
    Color, CounterItem, DateTimeItem, DisplayItem, DisplayList, FontSize, ItemType,
    ScrollDirection, TextAlignment, TextItem, WeatherItem,
};
pub use error::{Error, ErrorKind, Result};
pub use panel::{DisplayPanel, PanelField, PanelSet};
pub use protocol::{Command, Response, Verb};
pub use transport::{DeviceSession, SessionBuilder, SessionConfig, Transport};

use std::time::Duration;

/// Default HTTP port of the device.
pub const DEFAULT_PORT: u16 = 80;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of LCD panels.
pub const PANEL_COUNT: usize = 5;

/// Item slots per display list (`TextId` 0-19).
pub const MAX_DISPLAY_ITEMS: usize = 20;
