//! Display lists: the full item set for one panel, sent as one command.

use super::DisplayItem;
use crate::panel::{DisplayPanel, PanelField};
use crate::protocol::{Command, Response, Verb};
use crate::transport::Transport;
use crate::{Error, Result, MAX_DISPLAY_ITEMS};
use serde_json::Value;

/// Items for one panel, in insertion order.
///
/// Submitting a list overwrites the panel's targeted item set on the device;
/// nothing is diffed or cached locally.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    panel: DisplayPanel,
    replace: bool,
    background: Option<String>,
    items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Creates an empty list for a panel that replaces the current content.
    pub fn new(panel: DisplayPanel) -> Self {
        Self {
            panel,
            replace: true,
            background: None,
            items: Vec::new(),
        }
    }

    /// Sets whether the list replaces the panel's content (`NewFlag`).
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Sets a background GIF URL.
    pub fn background(mut self, url: impl Into<String>) -> Self {
        self.background = Some(url.into());
        self
    }

    /// Appends an item.
    pub fn item(mut self, item: impl Into<DisplayItem>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Appends an item in place.
    pub fn push(&mut self, item: impl Into<DisplayItem>) {
        self.items.push(item.into());
    }

    pub fn panel(&self) -> DisplayPanel {
        self.panel
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks item count and slot ids.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(Error::invalid("display list has no items"));
        }
        if self.items.len() > MAX_DISPLAY_ITEMS {
            return Err(Error::invalid(format!(
                "display list has {} items, at most {} are allowed",
                self.items.len(),
                MAX_DISPLAY_ITEMS
            )));
        }
        let mut seen = [false; MAX_DISPLAY_ITEMS];
        for item in &self.items {
            let slot = item.slot_id() as usize;
            if slot >= MAX_DISPLAY_ITEMS {
                return Err(Error::invalid(format!(
                    "slot id {} out of range 0-{}",
                    slot,
                    MAX_DISPLAY_ITEMS - 1
                )));
            }
            if seen[slot] {
                return Err(Error::invalid(format!("duplicate slot id {}", slot)));
            }
            seen[slot] = true;
        }
        Ok(())
    }

    /// Builds the `Draw/SendHttpItemList` command.
    pub fn to_command(&self) -> Result<Command> {
        self.validate()?;
        let items: Vec<Value> = self
            .items
            .iter()
            .map(|item| Value::Object(item.to_wire()))
            .collect();

        let mut command = Command::new(Verb::SendItemList);
        PanelField::LcdIndex.apply(self.panel, command.parameters_mut());
        Ok(command
            .with("NewFlag", u8::from(self.replace))
            // Key spelling is the device's.
            .with("BackgroudGif", self.background.clone().unwrap_or_default())
            .with("ItemList", items))
    }

    /// Validates, serializes and sends the list.
    pub async fn submit<T: Transport + ?Sized>(&self, transport: &T) -> Result<Response> {
        transport.send(self.to_command()?).await
    }
}
