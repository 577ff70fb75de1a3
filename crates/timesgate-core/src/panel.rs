//! Panel addressing.
//!
//! The Times Gate has five independently controllable LCD panels. Panels are
//! logical identifiers only: which physical segment answers to which code has
//! to be confirmed per device by the integrating application.
//!
//! Command families encode the panel differently on the wire, so each
//! encoding is named explicitly by [`PanelField`] instead of being normalized.

use crate::{Error, Result, PANEL_COUNT};
use serde_json::{Map, Value};
use std::str::FromStr;

/// One of the five LCD panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayPanel {
    Left = 1,
    Top = 2,
    Right = 3,
    Bottom = 4,
    Center = 5,
}

impl DisplayPanel {
    /// All panels in wire-code order.
    pub const ALL: [DisplayPanel; PANEL_COUNT] = [
        DisplayPanel::Left,
        DisplayPanel::Top,
        DisplayPanel::Right,
        DisplayPanel::Bottom,
        DisplayPanel::Center,
    ];

    /// Returns the wire code (1-5).
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Converts a wire code (1-5) to a panel.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(DisplayPanel::Left),
            2 => Ok(DisplayPanel::Top),
            3 => Ok(DisplayPanel::Right),
            4 => Ok(DisplayPanel::Bottom),
            5 => Ok(DisplayPanel::Center),
            _ => Err(Error::invalid(format!(
                "panel code must be between 1 and 5, got {}",
                code
            ))),
        }
    }
}

impl FromStr for DisplayPanel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "left" | "1" => Ok(DisplayPanel::Left),
            "top" | "2" => Ok(DisplayPanel::Top),
            "right" | "3" => Ok(DisplayPanel::Right),
            "bottom" | "4" => Ok(DisplayPanel::Bottom),
            "center" | "centre" | "5" => Ok(DisplayPanel::Center),
            _ => Err(Error::invalid(format!("unknown panel: {}", s))),
        }
    }
}

impl std::fmt::Display for DisplayPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayPanel::Left => write!(f, "left"),
            DisplayPanel::Top => write!(f, "top"),
            DisplayPanel::Right => write!(f, "right"),
            DisplayPanel::Bottom => write!(f, "bottom"),
            DisplayPanel::Center => write!(f, "center"),
        }
    }
}

/// Wire encoding of a single-panel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelField {
    /// `LcdId`: per-panel tools and individual dial selection.
    LcdId,
    /// `LcdIndex`: display lists, HTTP text, sub-dial and visualizer selection.
    LcdIndex,
}

impl PanelField {
    /// Returns the JSON key for this encoding.
    pub fn key(&self) -> &'static str {
        match self {
            PanelField::LcdId => "LcdId",
            PanelField::LcdIndex => "LcdIndex",
        }
    }

    /// Writes the panel selector into a parameter map.
    pub fn apply(&self, panel: DisplayPanel, params: &mut Map<String, Value>) {
        params.insert(self.key().to_string(), Value::from(panel.code()));
    }
}

/// A set of panels, encoded on the wire as an `LcdArray` of five 0/1 flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelSet {
    flags: [bool; PANEL_COUNT],
}

impl PanelSet {
    /// No panels selected.
    pub fn none() -> Self {
        Self::default()
    }

    /// All five panels selected.
    pub fn all() -> Self {
        Self {
            flags: [true; PANEL_COUNT],
        }
    }

    /// Adds a panel to the set.
    pub fn with(mut self, panel: DisplayPanel) -> Self {
        self.flags[panel.code() as usize - 1] = true;
        self
    }

    /// Returns true if the panel is selected.
    pub fn contains(&self, panel: DisplayPanel) -> bool {
        self.flags[panel.code() as usize - 1]
    }

    /// Returns true if no panel is selected.
    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|&f| f)
    }

    /// Returns the `LcdArray` wire value.
    pub fn to_lcd_array(&self) -> Value {
        Value::from(
            self.flags
                .iter()
                .map(|&f| u8::from(f))
                .collect::<Vec<_>>(),
        )
    }
}

impl From<DisplayPanel> for PanelSet {
    fn from(panel: DisplayPanel) -> Self {
        PanelSet::none().with(panel)
    }
}

impl FromIterator<DisplayPanel> for PanelSet {
    fn from_iter<I: IntoIterator<Item = DisplayPanel>>(iter: I) -> Self {
        iter.into_iter().fold(PanelSet::none(), PanelSet::with)
    }
}
