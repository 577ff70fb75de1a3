//! Times Gate device controller.

use crate::catalog::{self, BuzzerPattern, StopwatchAction, TemperatureMode, TimeFormat};
use crate::display::{DisplayList, TextItem};
use crate::panel::{DisplayPanel, PanelSet};
use crate::protocol::{Command, Response};
use crate::transport::{DeviceSession, Transport};
use crate::Result;

/// High-level controller for one Times Gate.
///
/// Every method builds one command from the catalog and sends it through the
/// transport. Nothing is retried: connection failures are surfaced as-is
/// because the device documents no idempotency for any command.
pub struct TimesGateDevice<T: Transport = DeviceSession> {
    transport: T,
}

impl TimesGateDevice<DeviceSession> {
    /// Creates a controller for a device on the default port.
    pub fn connect(host: impl Into<String>) -> Self {
        Self::new(DeviceSession::new(host))
    }

    /// Releases the HTTP session.
    pub fn close(&self) {
        self.transport.close();
    }
}

impl<T: Transport> TimesGateDevice<T> {
    /// Creates a controller over any transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, command: Command) -> Result<Response> {
        self.transport.send(command).await
    }

    async fn apply(&self, command: Command) -> Result<()> {
        self.send(command).await.map(|_| ())
    }

    // System settings

    /// Sets display brightness (0-100).
    pub async fn set_brightness(&self, level: u8) -> Result<()> {
        self.apply(catalog::build_brightness_command(level)?).await
    }

    /// Returns all device settings.
    pub async fn get_settings(&self) -> Result<Response> {
        self.send(catalog::build_get_settings_command()).await
    }

    /// Sets the device clock. Defaults to the current time.
    pub async fn set_device_time(&self, timestamp: Option<i64>) -> Result<()> {
        let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());
        self.apply(catalog::build_set_utc_command(timestamp)).await
    }

    /// Returns the device's UTC and local time.
    pub async fn get_device_time(&self) -> Result<Response> {
        self.send(catalog::build_get_device_time_command()).await
    }

    /// Sets the timezone, e.g. `GMT-5`.
    pub async fn set_timezone(&self, timezone: &str) -> Result<()> {
        self.apply(catalog::build_timezone_command(timezone)?).await
    }

    pub async fn set_temperature_mode(&self, mode: TemperatureMode) -> Result<()> {
        self.apply(catalog::build_temperature_mode_command(mode))
            .await
    }

    pub async fn set_mirror_mode(&self, enabled: bool) -> Result<()> {
        self.apply(catalog::build_mirror_mode_command(enabled)).await
    }

    pub async fn set_time_format(&self, format: TimeFormat) -> Result<()> {
        self.apply(catalog::build_hour_format_command(format)).await
    }

    /// Turns all panels on or off.
    pub async fn set_screen_power(&self, on: bool) -> Result<()> {
        self.apply(catalog::build_screen_power_command(on)).await
    }

    pub async fn set_weather_location(&self, latitude: f64, longitude: f64) -> Result<()> {
        self.apply(catalog::build_weather_location_command(
            latitude, longitude,
        )?)
        .await
    }

    /// Returns the weather the device currently shows.
    pub async fn get_weather(&self) -> Result<Response> {
        self.send(catalog::build_get_weather_command()).await
    }

    pub async fn reboot(&self) -> Result<()> {
        self.apply(catalog::build_reboot_command()).await
    }

    // Channels and dials

    pub async fn get_channel_info(&self) -> Result<Response> {
        self.send(catalog::build_get_channel_info_command()).await
    }

    pub async fn get_lcd_info(&self, device_id: u64) -> Result<Response> {
        self.send(catalog::build_get_lcd_info_command(device_id))
            .await
    }

    pub async fn get_dial_types(&self) -> Result<Response> {
        self.send(catalog::build_get_dial_types_command()).await
    }

    pub async fn get_dial_list(&self, dial_type: &str, page: u32) -> Result<Response> {
        self.send(catalog::build_get_dial_list_command(dial_type, page)?)
            .await
    }

    pub async fn get_whole_dial_list(&self, page: u32) -> Result<Response> {
        self.send(catalog::build_get_whole_dial_list_command(page)?)
            .await
    }

    /// Shows one clock face across all panels.
    pub async fn select_whole_dial(&self, clock_id: u32) -> Result<()> {
        self.apply(catalog::build_select_whole_dial_command(clock_id))
            .await
    }

    pub async fn set_channel_type(
        &self,
        channel_type: u8,
        lcd_independence: Option<u64>,
    ) -> Result<()> {
        self.apply(catalog::build_channel_type_command(
            channel_type,
            lcd_independence,
        ))
        .await
    }

    /// Sets the clock face of one panel.
    pub async fn set_individual_dial(&self, panel: DisplayPanel, clock_id: u32) -> Result<()> {
        self.apply(catalog::build_individual_dial_command(panel, clock_id))
            .await
    }

    pub async fn select_sub_dial(
        &self,
        panel: DisplayPanel,
        clock_id: u32,
        lcd_independence: u64,
    ) -> Result<()> {
        self.apply(catalog::build_sub_dial_command(
            panel,
            clock_id,
            lcd_independence,
        ))
        .await
    }

    pub async fn select_visualizer(
        &self,
        panel: DisplayPanel,
        eq_position: u8,
        lcd_independence: u64,
    ) -> Result<()> {
        self.apply(catalog::build_visualizer_command(
            panel,
            eq_position,
            lcd_independence,
        ))
        .await
    }

    // Text and animation

    /// Draws a standalone text slot, on one panel or device-wide.
    pub async fn send_text(&self, item: &TextItem, panel: Option<DisplayPanel>) -> Result<()> {
        self.apply(catalog::build_text_command(item, panel)?).await
    }

    /// Clears one text slot, or all of them.
    pub async fn clear_text(&self, slot: Option<u8>) -> Result<()> {
        self.apply(catalog::build_clear_text_command(slot)?).await
    }

    /// Replaces a panel's content with a single text item.
    pub async fn show_text(&self, panel: DisplayPanel, item: TextItem) -> Result<Response> {
        self.send_display_list(&DisplayList::new(panel).item(item))
            .await
    }

    pub async fn play_gif(&self, files: &[String], panels: PanelSet) -> Result<()> {
        self.apply(catalog::build_play_gif_command(files, panels)?)
            .await
    }

    pub async fn play_remote_gif(&self, file_id: &str, panels: PanelSet) -> Result<()> {
        self.apply(catalog::build_remote_gif_command(file_id, panels)?)
            .await
    }

    pub async fn use_command_source(&self, url: &str) -> Result<()> {
        self.apply(catalog::build_command_source_command(url)).await
    }

    pub async fn get_font_list(&self) -> Result<Response> {
        self.send(catalog::build_get_font_list_command()).await
    }

    pub async fn get_liked_images(
        &self,
        device_id: u64,
        device_mac: &str,
        page: u32,
    ) -> Result<Response> {
        self.send(catalog::build_liked_images_command(
            device_id, device_mac, page,
        )?)
        .await
    }

    pub async fn get_uploaded_images(
        &self,
        device_id: u64,
        device_mac: &str,
        page: u32,
    ) -> Result<Response> {
        self.send(catalog::build_uploaded_images_command(
            device_id, device_mac, page,
        )?)
        .await
    }

    // Tools

    pub async fn set_countdown(&self, minutes: u8, seconds: u8, start: bool) -> Result<()> {
        self.apply(catalog::build_countdown_command(minutes, seconds, start)?)
            .await
    }

    pub async fn set_panel_countdown(
        &self,
        panel: DisplayPanel,
        minutes: u8,
        seconds: u8,
        start: bool,
    ) -> Result<()> {
        self.apply(catalog::build_panel_countdown_command(
            panel, minutes, seconds, start,
        )?)
        .await
    }

    pub async fn set_stopwatch(&self, action: StopwatchAction) -> Result<()> {
        self.apply(catalog::build_stopwatch_command(action)).await
    }

    pub async fn set_scoreboard(&self, red_score: u16, blue_score: u16) -> Result<()> {
        self.apply(catalog::build_scoreboard_command(red_score, blue_score)?)
            .await
    }

    pub async fn set_panel_scoreboard(
        &self,
        panel: DisplayPanel,
        red_score: u16,
        blue_score: u16,
    ) -> Result<()> {
        self.apply(catalog::build_panel_scoreboard_command(
            panel, red_score, blue_score,
        )?)
        .await
    }

    pub async fn set_noise_meter(&self, enabled: bool) -> Result<()> {
        self.apply(catalog::build_noise_meter_command(enabled)).await
    }

    pub async fn play_buzzer(&self, pattern: BuzzerPattern) -> Result<()> {
        self.apply(catalog::build_buzzer_command(pattern)).await
    }

    // Display lists and batches

    /// Sends a display list to its panel.
    pub async fn send_display_list(&self, list: &DisplayList) -> Result<Response> {
        list.submit(&self.transport).await
    }

    /// Sends several commands as one request, executed in order by the device.
    pub async fn send_command_list(&self, commands: &[Command]) -> Result<Response> {
        self.send(catalog::build_command_list(commands)?).await
    }

    /// Sends any command without catalog validation.
    pub async fn send_raw_command(&self, command: Command) -> Result<Response> {
        self.send(command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records commands instead of sending them.
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<Command>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, command: Command) -> Result<Response> {
            self.sent.lock().unwrap().push(command);
            Ok(Response::default())
        }
    }

    fn sent(device: &TimesGateDevice<RecordingTransport>) -> Vec<Command> {
        device.transport().sent.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_invalid_arguments_send_nothing() {
        let device = TimesGateDevice::new(RecordingTransport::default());
        assert!(matches!(
            device.set_brightness(150).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(device.set_countdown(0, 75, true).await.is_err());
        assert!(device.send_command_list(&[]).await.is_err());
        assert!(device
            .send_display_list(&DisplayList::new(DisplayPanel::Center))
            .await
            .is_err());
        assert!(sent(&device).is_empty());
    }

    #[tokio::test]
    async fn test_show_text_targets_panel() {
        let device = TimesGateDevice::new(RecordingTransport::default());
        device
            .show_text(DisplayPanel::Bottom, TextItem::new(1, "Panel 4"))
            .await
            .unwrap();
        let commands = sent(&device);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name(), "Draw/SendHttpItemList");
        assert_eq!(commands[0].get("LcdIndex"), Some(&serde_json::json!(4)));
    }

    #[tokio::test]
    async fn test_set_device_time_defaults_to_now() {
        let device = TimesGateDevice::new(RecordingTransport::default());
        let before = chrono::Utc::now().timestamp();
        device.set_device_time(None).await.unwrap();
        let utc = sent(&device)[0].get("Utc").and_then(|v| v.as_i64()).unwrap();
        assert!(utc >= before);
    }

    #[tokio::test]
    async fn test_raw_command_passthrough() {
        let device = TimesGateDevice::new(RecordingTransport::default());
        let raw = Command::raw("Channel/GetIndex", Default::default());
        device.send_raw_command(raw.clone()).await.unwrap();
        assert_eq!(sent(&device), vec![raw]);
    }
}
