//! Command catalog.
//!
//! Typed constructors for every protocol verb the library knows. Constructors
//! that take bounded values validate them here, so an out-of-range request
//! fails before anything reaches the network.
//!
//! Panel selectors are encoded per command family (`LcdId`, `LcdIndex` or
//! `LcdArray`) exactly as the firmware expects them. Tool commands are only
//! panel-scoped through the `build_panel_*` constructors.

use crate::display::TextItem;
use crate::panel::{DisplayPanel, PanelField, PanelSet};
use crate::protocol::{Command, Verb};
use crate::{Error, Result, MAX_DISPLAY_ITEMS};
use serde_json::Value;

/// Highest brightness level.
pub const MAX_BRIGHTNESS: u8 = 100;

/// Highest countdown minute value.
pub const MAX_TIMER_MINUTES: u8 = 99;

/// Highest countdown second value.
pub const MAX_TIMER_SECONDS: u8 = 59;

/// Highest score the scoreboard can show.
pub const MAX_SCORE: u16 = 999;

/// `TextId` value that clears every HTTP text slot.
const CLEAR_ALL_TEXT: i32 = -1;

/// Temperature display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TemperatureMode {
    Celsius = 0,
    Fahrenheit = 1,
}

/// Clock hour format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimeFormat {
    Hour12 = 0,
    Hour24 = 1,
}

/// Stopwatch control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StopwatchAction {
    Stop = 0,
    Start = 1,
    Reset = 2,
}

/// Buzzer pattern, all times in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuzzerPattern {
    pub on_ms: u32,
    pub off_ms: u32,
    pub total_ms: u32,
}

impl Default for BuzzerPattern {
    fn default() -> Self {
        Self {
            on_ms: 500,
            off_ms: 500,
            total_ms: 2000,
        }
    }
}

// System settings

pub fn build_brightness_command(level: u8) -> Result<Command> {
    if level > MAX_BRIGHTNESS {
        return Err(Error::invalid(format!(
            "brightness must be between 0 and {}, got {}",
            MAX_BRIGHTNESS, level
        )));
    }
    Ok(Command::new(Verb::SetBrightness).with("Brightness", level))
}

pub fn build_get_settings_command() -> Command {
    Command::new(Verb::GetAllConf)
}

/// Sets the device clock from a Unix timestamp in seconds.
pub fn build_set_utc_command(timestamp: i64) -> Command {
    Command::new(Verb::SetUtc).with("Utc", timestamp)
}

pub fn build_get_device_time_command() -> Command {
    Command::new(Verb::GetDeviceTime)
}

/// Sets the timezone, e.g. `GMT-5` or `GMT+8`.
pub fn build_timezone_command(timezone: &str) -> Result<Command> {
    if timezone.trim().is_empty() {
        return Err(Error::invalid("timezone must not be empty"));
    }
    Ok(Command::new(Verb::SetTimeZone).with("TimeZoneValue", timezone))
}

pub fn build_temperature_mode_command(mode: TemperatureMode) -> Command {
    Command::new(Verb::SetTemperatureMode).with("Mode", mode as u8)
}

pub fn build_mirror_mode_command(enabled: bool) -> Command {
    Command::new(Verb::SetMirrorMode).with("Mode", u8::from(enabled))
}

pub fn build_hour_format_command(format: TimeFormat) -> Command {
    Command::new(Verb::SetHourMode).with("Mode", format as u8)
}

pub fn build_screen_power_command(on: bool) -> Command {
    Command::new(Verb::SetScreenPower).with("OnOff", u8::from(on))
}

/// Sets the weather location. The device takes coordinates as strings.
pub fn build_weather_location_command(latitude: f64, longitude: f64) -> Result<Command> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::invalid(format!("latitude out of range: {}", latitude)));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::invalid(format!(
            "longitude out of range: {}",
            longitude
        )));
    }
    Ok(Command::new(Verb::SetWeatherLocation)
        .with("Longitude", longitude.to_string())
        .with("Latitude", latitude.to_string()))
}

pub fn build_get_weather_command() -> Command {
    Command::new(Verb::GetWeatherInfo)
}

pub fn build_reboot_command() -> Command {
    Command::new(Verb::Reboot)
}

// Channels and dials

pub fn build_get_channel_info_command() -> Command {
    Command::new(Verb::GetChannelInfo)
}

/// Queries per-LCD channel state for a device id obtained from discovery.
pub fn build_get_lcd_info_command(device_id: u64) -> Command {
    Command::new(Verb::GetLcdInfo)
        .with("DeviceId", device_id)
        .with("DeviceType", "LCD")
}

pub fn build_get_dial_types_command() -> Command {
    Command::new(Verb::GetDialTypes)
}

pub fn build_get_dial_list_command(dial_type: &str, page: u32) -> Result<Command> {
    check_page(page)?;
    Ok(Command::new(Verb::GetDialList)
        .with("DialType", dial_type)
        .with("Page", page))
}

pub fn build_get_whole_dial_list_command(page: u32) -> Result<Command> {
    check_page(page)?;
    Ok(Command::new(Verb::GetWholeDialList).with("Page", page))
}

/// Shows one clock face across all five panels.
pub fn build_select_whole_dial_command(clock_id: u32) -> Command {
    Command::new(Verb::SelectWholeDial).with("ClockId", clock_id)
}

pub fn build_channel_type_command(channel_type: u8, lcd_independence: Option<u64>) -> Command {
    let command = Command::new(Verb::SetChannelType).with("ChannelType", channel_type);
    match lcd_independence {
        Some(independence) => command.with("LcdIndependence", independence),
        None => command,
    }
}

/// Sets the clock face of one panel. Addressed by `LcdId`.
pub fn build_individual_dial_command(panel: DisplayPanel, clock_id: u32) -> Command {
    panel_command(Verb::SetIndividualDial, PanelField::LcdId, panel).with("ClockId", clock_id)
}

/// Selects a sub dial for one panel. Addressed by `LcdIndex`.
pub fn build_sub_dial_command(
    panel: DisplayPanel,
    clock_id: u32,
    lcd_independence: u64,
) -> Command {
    Command::new(Verb::SelectSubDial)
        .with("ClockId", clock_id)
        .with(PanelField::LcdIndex.key(), panel.code())
        .with("LcdIndependence", lcd_independence)
}

/// Selects a visualizer position for one panel. Addressed by `LcdIndex`.
pub fn build_visualizer_command(
    panel: DisplayPanel,
    eq_position: u8,
    lcd_independence: u64,
) -> Command {
    Command::new(Verb::SelectVisualizer)
        .with("EqPosition", eq_position)
        .with(PanelField::LcdIndex.key(), panel.code())
        .with("LcdIndependence", lcd_independence)
}

// Text and animation

/// Draws a standalone HTTP text slot, optionally on one panel (`LcdIndex`).
pub fn build_text_command(item: &TextItem, panel: Option<DisplayPanel>) -> Result<Command> {
    check_slot(item.slot_id)?;
    let mut command = Command::new(Verb::SendText);
    if let Some(panel) = panel {
        PanelField::LcdIndex.apply(panel, command.parameters_mut());
    }
    Ok(command
        .with("TextId", item.slot_id)
        .with("x", item.x)
        .with("y", item.y)
        .with("dir", item.direction as u8)
        .with("font", item.font)
        .with("TextWidth", item.width)
        .with("TextString", item.text.as_str())
        .with("speed", item.scroll_speed)
        .with("color", item.color.to_string())
        .with("align", item.alignment as u8))
}

/// Clears one HTTP text slot, or all of them when `slot` is `None`.
pub fn build_clear_text_command(slot: Option<u8>) -> Result<Command> {
    let text_id = match slot {
        Some(slot) => {
            check_slot(slot)?;
            i32::from(slot)
        }
        None => CLEAR_ALL_TEXT,
    };
    Ok(Command::new(Verb::ClearText).with("TextId", text_id))
}

/// Plays GIF files (URLs or device paths) on the selected panels.
pub fn build_play_gif_command(files: &[String], panels: PanelSet) -> Result<Command> {
    if files.is_empty() {
        return Err(Error::invalid("at least one GIF file is required"));
    }
    check_panels(panels)?;
    Ok(Command::new(Verb::PlayGif)
        .with("FileName", files.to_vec())
        .with("LcdArray", panels.to_lcd_array()))
}

/// Plays a GIF from the Divoom gallery on the selected panels.
pub fn build_remote_gif_command(file_id: &str, panels: PanelSet) -> Result<Command> {
    check_panels(panels)?;
    Ok(Command::new(Verb::PlayRemoteGif)
        .with("FileId", file_id)
        .with("LcdArray", panels.to_lcd_array()))
}

/// Points the device at a URL serving a command file.
pub fn build_command_source_command(url: &str) -> Command {
    Command::new(Verb::UseCommandSource).with("CommandUrl", url)
}

pub fn build_get_font_list_command() -> Command {
    Command::new(Verb::GetFontList)
}

pub fn build_liked_images_command(device_id: u64, device_mac: &str, page: u32) -> Result<Command> {
    check_page(page)?;
    Ok(Command::new(Verb::GetLikedImages)
        .with("DeviceId", device_id)
        .with("DeviceMac", device_mac)
        .with("Page", page))
}

pub fn build_uploaded_images_command(
    device_id: u64,
    device_mac: &str,
    page: u32,
) -> Result<Command> {
    check_page(page)?;
    Ok(Command::new(Verb::GetUploadedImages)
        .with("DeviceId", device_id)
        .with("DeviceMac", device_mac)
        .with("Page", page))
}

// Tools

/// Whole-device countdown timer.
pub fn build_countdown_command(minutes: u8, seconds: u8, start: bool) -> Result<Command> {
    check_timer(minutes, seconds)?;
    Ok(Command::new(Verb::SetTimer)
        .with("Minute", minutes)
        .with("Second", seconds)
        .with("Status", u8::from(start)))
}

/// Countdown timer on one panel. Addressed by `LcdId`.
pub fn build_panel_countdown_command(
    panel: DisplayPanel,
    minutes: u8,
    seconds: u8,
    start: bool,
) -> Result<Command> {
    let mut command = build_countdown_command(minutes, seconds, start)?;
    PanelField::LcdId.apply(panel, command.parameters_mut());
    Ok(command)
}

pub fn build_stopwatch_command(action: StopwatchAction) -> Command {
    Command::new(Verb::SetStopwatch).with("Status", action as u8)
}

/// Whole-device scoreboard. Red is sent before blue.
pub fn build_scoreboard_command(red_score: u16, blue_score: u16) -> Result<Command> {
    for score in [red_score, blue_score] {
        if score > MAX_SCORE {
            return Err(Error::invalid(format!(
                "score must be between 0 and {}, got {}",
                MAX_SCORE, score
            )));
        }
    }
    Ok(Command::new(Verb::SetScoreboard)
        .with("RedScore", red_score)
        .with("BlueScore", blue_score))
}

/// Scoreboard on one panel. Addressed by `LcdId`.
pub fn build_panel_scoreboard_command(
    panel: DisplayPanel,
    red_score: u16,
    blue_score: u16,
) -> Result<Command> {
    let mut command = build_scoreboard_command(red_score, blue_score)?;
    PanelField::LcdId.apply(panel, command.parameters_mut());
    Ok(command)
}

pub fn build_noise_meter_command(enabled: bool) -> Command {
    Command::new(Verb::SetNoiseMeter).with("NoiseStatus", u8::from(enabled))
}

pub fn build_buzzer_command(pattern: BuzzerPattern) -> Command {
    Command::new(Verb::PlayBuzzer)
        .with("ActiveTimeInCycle", pattern.on_ms)
        .with("OffTimeInCycle", pattern.off_ms)
        .with("PlayTotalTime", pattern.total_ms)
}

// Batches

/// Wraps commands into one `Draw/CommandList` request, executed in order by
/// the device under a single `error_code`.
pub fn build_command_list(commands: &[Command]) -> Result<Command> {
    if commands.is_empty() {
        return Err(Error::invalid("command list is empty"));
    }
    let list: Vec<Value> = commands.iter().map(Command::to_json).collect();
    Ok(Command::new(Verb::CommandList).with("CommandList", list))
}

fn panel_command(verb: Verb, field: PanelField, panel: DisplayPanel) -> Command {
    let mut command = Command::new(verb);
    field.apply(panel, command.parameters_mut());
    command
}

fn check_slot(slot: u8) -> Result<()> {
    if slot as usize >= MAX_DISPLAY_ITEMS {
        return Err(Error::invalid(format!(
            "text slot must be between 0 and {}, got {}",
            MAX_DISPLAY_ITEMS - 1,
            slot
        )));
    }
    Ok(())
}

fn check_page(page: u32) -> Result<()> {
    if page == 0 {
        return Err(Error::invalid("page numbers start at 1"));
    }
    Ok(())
}

fn check_panels(panels: PanelSet) -> Result<()> {
    if panels.is_empty() {
        return Err(Error::invalid("no panel selected"));
    }
    Ok(())
}

fn check_timer(minutes: u8, seconds: u8) -> Result<()> {
    if minutes > MAX_TIMER_MINUTES {
        return Err(Error::invalid(format!(
            "minutes must be between 0 and {}, got {}",
            MAX_TIMER_MINUTES, minutes
        )));
    }
    if seconds > MAX_TIMER_SECONDS {
        return Err(Error::invalid(format!(
            "seconds must be between 0 and {}, got {}",
            MAX_TIMER_SECONDS, seconds
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Color, ScrollDirection};
    use serde_json::json;

    #[test]
    fn test_brightness_range() {
        for level in 0..=MAX_BRIGHTNESS {
            let command = build_brightness_command(level).unwrap();
            assert_eq!(command.name(), "Channel/SetBrightness");
            assert_eq!(command.get("Brightness"), Some(&json!(level)));
        }
        for level in (MAX_BRIGHTNESS + 1)..=u8::MAX {
            assert!(matches!(
                build_brightness_command(level),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_settings_commands() {
        assert_eq!(
            build_screen_power_command(false).to_json(),
            json!({"Command": "Channel/OnOffScreen", "OnOff": 0})
        );
        assert_eq!(
            build_hour_format_command(TimeFormat::Hour24).to_json(),
            json!({"Command": "Device/SetTime24Flag", "Mode": 1})
        );
        assert_eq!(
            build_temperature_mode_command(TemperatureMode::Fahrenheit).to_json(),
            json!({"Command": "Device/SetDisTempMode", "Mode": 1})
        );
        assert_eq!(
            build_set_utc_command(1_700_000_000).get("Utc"),
            Some(&json!(1_700_000_000))
        );
        assert!(build_timezone_command("  ").is_err());
        assert_eq!(
            build_timezone_command("GMT+8").unwrap().get("TimeZoneValue"),
            Some(&json!("GMT+8"))
        );
    }

    #[test]
    fn test_weather_location_strings() {
        let command = build_weather_location_command(37.7749, -122.4194).unwrap();
        assert_eq!(command.get("Latitude"), Some(&json!("37.7749")));
        assert_eq!(command.get("Longitude"), Some(&json!("-122.4194")));
        assert!(build_weather_location_command(91.0, 0.0).is_err());
        assert!(build_weather_location_command(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_panel_field_per_family() {
        let dial = build_individual_dial_command(DisplayPanel::Top, 42);
        assert_eq!(dial.get("LcdId"), Some(&json!(2)));
        assert!(dial.get("LcdIndex").is_none());

        let sub = build_sub_dial_command(DisplayPanel::Top, 42, 7);
        assert_eq!(sub.get("LcdIndex"), Some(&json!(2)));
        assert!(sub.get("LcdId").is_none());

        let eq = build_visualizer_command(DisplayPanel::Center, 1, 7);
        assert_eq!(eq.get("LcdIndex"), Some(&json!(5)));
    }

    #[test]
    fn test_tools_whole_device_have_no_panel() {
        let timer = build_countdown_command(1, 30, true).unwrap();
        assert!(timer.get("LcdId").is_none());
        let score = build_scoreboard_command(3, 2).unwrap();
        assert!(score.get("LcdId").is_none());
    }

    #[test]
    fn test_panel_tools_carry_lcd_id() {
        let timer = build_panel_countdown_command(DisplayPanel::Right, 0, 10, true).unwrap();
        assert_eq!(
            timer.to_json(),
            json!({
                "Command": "Tools/SetTimer",
                "Minute": 0,
                "Second": 10,
                "Status": 1,
                "LcdId": 3
            })
        );
        let score = build_panel_scoreboard_command(DisplayPanel::Left, 98, 95).unwrap();
        assert_eq!(score.get("LcdId"), Some(&json!(1)));
        let keys: Vec<&str> = score.parameters().keys().map(String::as_str).collect();
        assert_eq!(keys, ["RedScore", "BlueScore", "LcdId"]);
    }

    #[test]
    fn test_tool_ranges() {
        assert!(build_countdown_command(100, 0, true).is_err());
        assert!(build_countdown_command(0, 60, true).is_err());
        assert!(build_countdown_command(99, 59, false).is_ok());
        assert!(build_scoreboard_command(1000, 0).is_err());
        assert!(build_panel_scoreboard_command(DisplayPanel::Top, 0, 1000).is_err());
    }

    #[test]
    fn test_text_command() {
        let item = TextItem::new(1, "Hi")
            .at(0, 24)
            .color(Color::GREEN)
            .scroll(50, ScrollDirection::Left);
        let command = build_text_command(&item, Some(DisplayPanel::Bottom)).unwrap();
        let keys: Vec<&str> = command.parameters().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "LcdIndex",
                "TextId",
                "x",
                "y",
                "dir",
                "font",
                "TextWidth",
                "TextString",
                "speed",
                "color",
                "align"
            ]
        );
        assert_eq!(command.get("color"), Some(&json!("#00FF00")));

        let whole = build_text_command(&item, None).unwrap();
        assert!(whole.get("LcdIndex").is_none());
        assert!(build_text_command(&TextItem::new(20, "x"), None).is_err());
    }

    #[test]
    fn test_clear_text() {
        assert_eq!(
            build_clear_text_command(None).unwrap().get("TextId"),
            Some(&json!(-1))
        );
        assert_eq!(
            build_clear_text_command(Some(4)).unwrap().get("TextId"),
            Some(&json!(4))
        );
        assert!(build_clear_text_command(Some(20)).is_err());
    }

    #[test]
    fn test_gif_commands() {
        let files = vec!["http://f.divoom-gz.com/64_64.gif".to_string()];
        let command = build_play_gif_command(&files, DisplayPanel::Top.into()).unwrap();
        assert_eq!(command.get("LcdArray"), Some(&json!([0, 1, 0, 0, 0])));
        assert_eq!(command.get("FileName"), Some(&json!(files)));
        assert!(build_play_gif_command(&[], PanelSet::all()).is_err());
        assert!(build_remote_gif_command("group1/M00/1B/1C", PanelSet::none()).is_err());
    }

    #[test]
    fn test_noise_and_buzzer() {
        assert_eq!(
            build_noise_meter_command(false).to_json(),
            json!({"Command": "Tools/SetNoiseStatus", "NoiseStatus": 0})
        );
        assert_eq!(
            build_buzzer_command(BuzzerPattern::default()).to_json(),
            json!({
                "Command": "Device/PlayBuzzer",
                "ActiveTimeInCycle": 500,
                "OffTimeInCycle": 500,
                "PlayTotalTime": 2000
            })
        );
        assert_eq!(
            build_stopwatch_command(StopwatchAction::Reset).get("Status"),
            Some(&json!(2))
        );
    }

    #[test]
    fn test_paging() {
        assert!(build_get_whole_dial_list_command(0).is_err());
        assert_eq!(
            build_get_dial_list_command("Social", 2).unwrap().to_json(),
            json!({"Command": "Channel/GetDialList", "DialType": "Social", "Page": 2})
        );
        assert!(build_liked_images_command(300000020, "a1b2c3", 0).is_err());
    }

    #[test]
    fn test_command_list() {
        let commands = vec![
            build_screen_power_command(true),
            build_brightness_command(80).unwrap(),
        ];
        let batch = build_command_list(&commands).unwrap();
        assert_eq!(batch.name(), "Draw/CommandList");
        assert_eq!(
            batch.get("CommandList"),
            Some(&json!([
                {"Command": "Channel/OnOffScreen", "OnOff": 1},
                {"Command": "Channel/SetBrightness", "Brightness": 80}
            ]))
        );
        assert!(build_command_list(&[]).is_err());
    }

    #[test]
    fn test_channel_type_optional_independence() {
        assert!(build_channel_type_command(0, None)
            .get("LcdIndependence")
            .is_none());
        assert_eq!(
            build_channel_type_command(1, Some(7)).get("LcdIndependence"),
            Some(&json!(7))
        );
    }
}
