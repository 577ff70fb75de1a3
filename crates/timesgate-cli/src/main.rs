//! Times Gate Control Tool
//!
//! CLI for controlling a Divoom Times Gate over its local HTTP interface.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use timesgate_core::catalog::{BuzzerPattern, StopwatchAction, TemperatureMode, TimeFormat};
use timesgate_core::{
    discover_devices, Color, Command, DateTimeItem, DeviceSession, DisplayList, DisplayPanel,
    PanelSet, Response, ScrollDirection, TextItem, TimesGateDevice,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timesgatectl")]
#[command(about = "Control tool for Divoom Times Gate displays")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Device address (overrides the config file)
    #[arg(long, env = "DIVOOM_TIMES_GATE_IP")]
    host: Option<String>,

    /// Device HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Configuration file (default: $XDG_CONFIG_HOME/timesgate/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find devices on the local network
    Discover,
    /// Set display brightness
    Brightness {
        /// Brightness level (0-100)
        level: u8,
    },
    /// Turn the screens on or off
    Screen {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Weather information and location
    Weather {
        #[command(subcommand)]
        action: WeatherCommands,
    },
    /// Send a display list to one panel
    Display(DisplayArgs),
    /// Sound the buzzer
    Beep {
        /// Buzzer on time per cycle in milliseconds
        #[arg(long, default_value = "500")]
        on_ms: u32,
        /// Buzzer off time per cycle in milliseconds
        #[arg(long, default_value = "500")]
        off_ms: u32,
        /// Total duration in milliseconds
        #[arg(long, default_value = "2000")]
        total_ms: u32,
    },
    /// Draw or clear HTTP text slots
    Text {
        #[command(subcommand)]
        action: TextCommands,
    },
    /// Show all device settings
    Settings,
    /// Clock, timezone and hour format
    Time {
        #[command(subcommand)]
        action: TimeCommands,
    },
    /// Clock face selection
    Dial {
        #[command(subcommand)]
        action: DialCommands,
    },
    /// Countdown, stopwatch, scoreboard and noise meter
    Tool {
        #[command(subcommand)]
        action: ToolCommands,
    },
    /// Play GIF files on panels
    Gif {
        /// GIF URLs or device paths
        #[arg(required = true)]
        files: Vec<String>,
        /// Panels to play on (default: all)
        #[arg(long, value_delimiter = ',')]
        panels: Vec<DisplayPanel>,
    },
    /// Send a raw JSON command, e.g. '{"Command":"Channel/GetIndex"}'
    Raw {
        /// Command object
        json: String,
    },
    /// Reboot the device
    Reboot,
    /// Configuration file commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        matches!(toggle, Toggle::On)
    }
}

#[derive(Subcommand)]
enum WeatherCommands {
    /// Show the weather the device knows about
    Show,
    /// Set the weather location
    Location {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Set the temperature unit
    Unit {
        #[arg(value_enum)]
        unit: CliTemperature,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CliTemperature {
    Celsius,
    Fahrenheit,
}

impl From<CliTemperature> for TemperatureMode {
    fn from(unit: CliTemperature) -> Self {
        match unit {
            CliTemperature::Celsius => TemperatureMode::Celsius,
            CliTemperature::Fahrenheit => TemperatureMode::Fahrenheit,
        }
    }
}

#[derive(clap::Args)]
struct DisplayArgs {
    /// Panel: left, top, right, bottom, center or 1-5
    #[arg(long, default_value = "center")]
    panel: DisplayPanel,

    /// Text to show
    #[arg(long, default_value = "hello, divoom")]
    text: String,

    /// Text color (#RRGGBB)
    #[arg(long, default_value = "#FFFFFF")]
    text_color: Color,

    /// Text scroll speed (0 = static)
    #[arg(long, default_value = "0")]
    speed: u8,

    /// Text font id
    #[arg(long, default_value = "2")]
    font: u8,

    /// Text position
    #[arg(long, default_value = "0")]
    x: u16,
    #[arg(long, default_value = "16")]
    y: u16,

    /// Also show the date below the text
    #[arg(long)]
    date: bool,

    /// Date color (#RRGGBB)
    #[arg(long, default_value = "#FFF000")]
    date_color: Color,

    /// Date refresh interval in seconds
    #[arg(long, default_value = "60")]
    date_update: u32,

    /// Background GIF URL
    #[arg(long)]
    background: Option<String>,

    /// Keep existing items instead of replacing them
    #[arg(long)]
    keep: bool,
}

#[derive(Subcommand)]
enum TextCommands {
    /// Draw a text slot
    Send {
        text: String,
        /// Slot id (0-19)
        #[arg(long, default_value = "1")]
        slot: u8,
        /// Panel (omit for device-wide text)
        #[arg(long)]
        panel: Option<DisplayPanel>,
        #[arg(long, default_value = "#FFFFFF")]
        color: Color,
        /// Scroll speed (0 = static)
        #[arg(long, default_value = "0")]
        speed: u8,
        #[arg(long, default_value = "2")]
        font: u8,
        #[arg(long, default_value = "0")]
        x: u16,
        #[arg(long, default_value = "0")]
        y: u16,
    },
    /// Clear a text slot, or all slots
    Clear {
        #[arg(long)]
        slot: Option<u8>,
    },
}

#[derive(Subcommand)]
enum TimeCommands {
    /// Show the device time
    Show,
    /// Set the device clock (default: now)
    Sync {
        /// Unix timestamp in seconds
        #[arg(long)]
        timestamp: Option<i64>,
    },
    /// Set the timezone, e.g. GMT+8
    Zone { timezone: String },
    /// Set the hour format
    Format {
        #[arg(value_enum)]
        format: CliTimeFormat,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CliTimeFormat {
    #[value(name = "12")]
    Hour12,
    #[value(name = "24")]
    Hour24,
}

impl From<CliTimeFormat> for TimeFormat {
    fn from(format: CliTimeFormat) -> Self {
        match format {
            CliTimeFormat::Hour12 => TimeFormat::Hour12,
            CliTimeFormat::Hour24 => TimeFormat::Hour24,
        }
    }
}

#[derive(Subcommand)]
enum DialCommands {
    /// List whole-device clock faces
    List {
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Show one clock face across all panels
    Whole { clock_id: u32 },
    /// Set the clock face of one panel
    Panel { panel: DisplayPanel, clock_id: u32 },
    /// Show current channel information
    Info,
}

#[derive(Subcommand)]
enum ToolCommands {
    /// Countdown timer
    Timer {
        minutes: u8,
        seconds: u8,
        /// Panel (omit for device-wide timer)
        #[arg(long)]
        panel: Option<DisplayPanel>,
        /// Stop instead of start
        #[arg(long)]
        stop: bool,
    },
    /// Stopwatch control
    Stopwatch {
        #[arg(value_enum)]
        action: CliStopwatch,
    },
    /// Scoreboard
    Score {
        red: u16,
        blue: u16,
        /// Panel (omit for device-wide scoreboard)
        #[arg(long)]
        panel: Option<DisplayPanel>,
    },
    /// Noise meter
    Noise {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CliStopwatch {
    Start,
    Stop,
    Reset,
}

impl From<CliStopwatch> for StopwatchAction {
    fn from(action: CliStopwatch) -> Self {
        match action {
            CliStopwatch::Start => StopwatchAction::Start,
            CliStopwatch::Stop => StopwatchAction::Stop,
            CliStopwatch::Reset => StopwatchAction::Reset,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Save device settings to the configuration file
    Set {
        #[arg(long)]
        host: String,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<timesgate_core::Error>())
                .map(|err| err.kind().to_string())
                .unwrap_or_else(|| "error".to_string());
            eprintln!("error [{}]: {:#}", kind, e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Discover => return handle_discover().await,
        Commands::Config { action } => {
            return handle_config(action, config, cli.config);
        }
        _ => {}
    }

    let host = cli
        .host
        .or_else(|| config.device.host.clone())
        .context("No device address. Pass --host, set DIVOOM_TIMES_GATE_IP or run `timesgatectl config set`")?;
    let port = cli.port.unwrap_or(config.device.port);
    let timeout_ms = cli.timeout_ms.unwrap_or(config.device.timeout_ms);
    debug!("Using device {}:{} (timeout {}ms)", host, port, timeout_ms);
    let session = DeviceSession::builder(host)
        .port(port)
        .timeout(Duration::from_millis(timeout_ms))
        .build();
    let device = TimesGateDevice::new(session);

    let result = dispatch(cli.command, &device).await;
    device.close();
    result
}

async fn dispatch(command: Commands, device: &TimesGateDevice) -> Result<()> {
    match command {
        Commands::Brightness { level } => {
            device.set_brightness(level).await?;
            println!("Brightness set to: {}", level);
        }
        Commands::Screen { state } => {
            device.set_screen_power(state.into()).await?;
            println!("Screen turned {:?}", state);
        }
        Commands::Weather { action } => handle_weather(action, device).await?,
        Commands::Display(args) => handle_display(args, device).await?,
        Commands::Beep {
            on_ms,
            off_ms,
            total_ms,
        } => {
            device
                .play_buzzer(BuzzerPattern {
                    on_ms,
                    off_ms,
                    total_ms,
                })
                .await?;
            println!("Buzzer played for {}ms", total_ms);
        }
        Commands::Text { action } => handle_text(action, device).await?,
        Commands::Settings => print_response(&device.get_settings().await?)?,
        Commands::Time { action } => handle_time(action, device).await?,
        Commands::Dial { action } => handle_dial(action, device).await?,
        Commands::Tool { action } => handle_tool(action, device).await?,
        Commands::Gif { files, panels } => {
            let panels = if panels.is_empty() {
                PanelSet::all()
            } else {
                panels.into_iter().collect()
            };
            device.play_gif(&files, panels).await?;
            println!("Playing {} GIF file(s)", files.len());
        }
        Commands::Raw { json } => {
            let command: Command = serde_json::from_str(&json)
                .context("Raw command must be a JSON object with a \"Command\" field")?;
            print_response(&device.send_raw_command(command).await?)?;
        }
        Commands::Reboot => {
            device.reboot().await?;
            println!("Reboot requested");
        }
        Commands::Discover | Commands::Config { .. } => unreachable!("handled before connecting"),
    }

    Ok(())
}

async fn handle_discover() -> Result<()> {
    let devices = discover_devices().await?;
    if devices.is_empty() {
        println!("No devices found");
    }
    for device in devices {
        println!(
            "{}  {}  id={}  mac={}",
            device.private_ip, device.name, device.id, device.mac
        );
    }
    Ok(())
}

fn handle_config(action: ConfigCommands, mut config: Config, path: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize configuration")?
            );
        }
        ConfigCommands::Set { host, port } => {
            let path = path
                .or_else(Config::default_path)
                .context("No configuration path available; pass --config")?;
            config.device.host = Some(host);
            if let Some(port) = port {
                config.device.port = port;
            }
            config.save(&path)?;
            println!("Configuration saved to: {}", path.display());
        }
    }

    Ok(())
}

async fn handle_weather(action: WeatherCommands, device: &TimesGateDevice) -> Result<()> {
    match action {
        WeatherCommands::Show => print_response(&device.get_weather().await?)?,
        WeatherCommands::Location {
            latitude,
            longitude,
        } => {
            device.set_weather_location(latitude, longitude).await?;
            println!("Weather location set to: {}, {}", latitude, longitude);
        }
        WeatherCommands::Unit { unit } => {
            device.set_temperature_mode(unit.into()).await?;
            println!("Temperature unit set to: {:?}", unit);
        }
    }

    Ok(())
}

async fn handle_display(args: DisplayArgs, device: &TimesGateDevice) -> Result<()> {
    let text = TextItem::new(1, args.text)
        .at(args.x, args.y)
        .font(args.font)
        .color(args.text_color)
        .scroll(args.speed, ScrollDirection::Left);

    let mut list = DisplayList::new(args.panel).replace(!args.keep).item(text);
    if args.date {
        list.push(
            DateTimeItem::new(2)
                .at(0, 48)
                .color(args.date_color)
                .update_every(args.date_update),
        );
    }
    if let Some(background) = args.background {
        list = list.background(background);
    }

    device.send_display_list(&list).await?;
    println!("Display updated on {} panel", args.panel);
    Ok(())
}

async fn handle_text(action: TextCommands, device: &TimesGateDevice) -> Result<()> {
    match action {
        TextCommands::Send {
            text,
            slot,
            panel,
            color,
            speed,
            font,
            x,
            y,
        } => {
            let item = TextItem::new(slot, text)
                .at(x, y)
                .font(font)
                .color(color)
                .scroll(speed, ScrollDirection::Left);
            device.send_text(&item, panel).await?;
            println!("Text sent to slot {}", slot);
        }
        TextCommands::Clear { slot } => {
            device.clear_text(slot).await?;
            match slot {
                Some(slot) => println!("Cleared text slot {}", slot),
                None => println!("Cleared all text"),
            }
        }
    }

    Ok(())
}

async fn handle_time(action: TimeCommands, device: &TimesGateDevice) -> Result<()> {
    match action {
        TimeCommands::Show => print_response(&device.get_device_time().await?)?,
        TimeCommands::Sync { timestamp } => {
            device.set_device_time(timestamp).await?;
            println!("Device clock set");
        }
        TimeCommands::Zone { timezone } => {
            device.set_timezone(&timezone).await?;
            println!("Timezone set to: {}", timezone);
        }
        TimeCommands::Format { format } => {
            device.set_time_format(format.into()).await?;
            println!("Hour format set to: {:?}", format);
        }
    }

    Ok(())
}

async fn handle_dial(action: DialCommands, device: &TimesGateDevice) -> Result<()> {
    match action {
        DialCommands::List { page } => print_response(&device.get_whole_dial_list(page).await?)?,
        DialCommands::Whole { clock_id } => {
            device.select_whole_dial(clock_id).await?;
            println!("Clock face {} selected on all panels", clock_id);
        }
        DialCommands::Panel { panel, clock_id } => {
            device.set_individual_dial(panel, clock_id).await?;
            println!("Clock face {} selected on {} panel", clock_id, panel);
        }
        DialCommands::Info => print_response(&device.get_channel_info().await?)?,
    }

    Ok(())
}

async fn handle_tool(action: ToolCommands, device: &TimesGateDevice) -> Result<()> {
    match action {
        ToolCommands::Timer {
            minutes,
            seconds,
            panel,
            stop,
        } => {
            match panel {
                Some(panel) => {
                    device
                        .set_panel_countdown(panel, minutes, seconds, !stop)
                        .await?
                }
                None => device.set_countdown(minutes, seconds, !stop).await?,
            }
            let state = if stop { "stopped" } else { "started" };
            println!("Timer {:02}:{:02} {}", minutes, seconds, state);
        }
        ToolCommands::Stopwatch { action } => {
            device.set_stopwatch(action.into()).await?;
            println!("Stopwatch: {:?}", action);
        }
        ToolCommands::Score { red, blue, panel } => {
            match panel {
                Some(panel) => device.set_panel_scoreboard(panel, red, blue).await?,
                None => device.set_scoreboard(red, blue).await?,
            }
            println!("Score: red {} - blue {}", red, blue);
        }
        ToolCommands::Noise { state } => {
            device.set_noise_meter(state.into()).await?;
            println!("Noise meter turned {:?}", state);
        }
    }

    Ok(())
}

fn print_response(response: &Response) -> Result<()> {
    let json = serde_json::to_string_pretty(response).context("Failed to format response")?;
    println!("{}", json);
    Ok(())
}
