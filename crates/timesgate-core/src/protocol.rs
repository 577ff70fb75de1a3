//! Wire protocol definitions.
//!
//! Protocol structure:
//! - HTTP POST to `http://<host>:<port>/post`
//! - Request body: flat JSON object, `{"Command": "<Verb/Path>", ...params}`
//! - Response body: JSON object `{"error_code": int, ...fields}`, usually
//!   delivered with a `text/html` content type
//! - `error_code == 0` means success

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Path of the command endpoint on the device.
pub const COMMAND_PATH: &str = "/post";

/// Longest body excerpt carried in a malformed response error.
const BODY_EXCERPT_LEN: usize = 120;

/// Protocol verbs known to the command catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    SetBrightness,
    GetAllConf,
    SetUtc,
    GetDeviceTime,
    SetTimeZone,
    SetTemperatureMode,
    SetMirrorMode,
    SetHourMode,
    SetScreenPower,
    SetWeatherLocation,
    GetWeatherInfo,
    Reboot,
    GetChannelInfo,
    GetLcdInfo,
    GetDialTypes,
    GetDialList,
    GetWholeDialList,
    SelectWholeDial,
    SetChannelType,
    SetIndividualDial,
    SelectSubDial,
    SelectVisualizer,
    SendText,
    ClearText,
    PlayGif,
    PlayRemoteGif,
    UseCommandSource,
    GetFontList,
    GetLikedImages,
    GetUploadedImages,
    SetTimer,
    SetStopwatch,
    SetScoreboard,
    SetNoiseMeter,
    PlayBuzzer,
    SendItemList,
    CommandList,
}

impl Verb {
    /// Returns the protocol verb string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::SetBrightness => "Channel/SetBrightness",
            Verb::GetAllConf => "Channel/GetAllConf",
            Verb::SetUtc => "Device/SetUTC",
            Verb::GetDeviceTime => "Device/GetDeviceTime",
            Verb::SetTimeZone => "Sys/TimeZone",
            Verb::SetTemperatureMode => "Device/SetDisTempMode",
            Verb::SetMirrorMode => "Device/SetMirrorMode",
            Verb::SetHourMode => "Device/SetTime24Flag",
            Verb::SetScreenPower => "Channel/OnOffScreen",
            Verb::SetWeatherLocation => "Sys/LogAndLat",
            Verb::GetWeatherInfo => "Device/GetWeatherInfo",
            Verb::Reboot => "Device/Reboot",
            Verb::GetChannelInfo => "Channel/GetCurChannelInfo",
            Verb::GetLcdInfo => "Channel/Get5LcdInfoV2",
            Verb::GetDialTypes => "Channel/GetDialType",
            Verb::GetDialList => "Channel/GetDialList",
            Verb::GetWholeDialList => "Channel/Get5LcdClockListForCommon",
            Verb::SelectWholeDial => "Channel/Set5LcdWholeClockId",
            Verb::SetChannelType => "Channel/Set5LcdChannelType",
            Verb::SetIndividualDial => "Channel/SetIndividualDial",
            Verb::SelectSubDial => "Channel/SetClockSelectId",
            Verb::SelectVisualizer => "Channel/SetEqPosition",
            Verb::SendText => "Draw/SendHttpText",
            Verb::ClearText => "Draw/ClearHttpText",
            Verb::PlayGif => "Device/PlayGif",
            Verb::PlayRemoteGif => "Draw/SendRemote",
            Verb::UseCommandSource => "Draw/UseHTTPCommandSource",
            Verb::GetFontList => "Device/GetTimeDialFontList",
            Verb::GetLikedImages => "Device/GetImgLikeList",
            Verb::GetUploadedImages => "Device/GetImgUploadList",
            Verb::SetTimer => "Tools/SetTimer",
            Verb::SetStopwatch => "Tools/SetStopWatch",
            Verb::SetScoreboard => "Tools/SetScoreBoard",
            Verb::SetNoiseMeter => "Tools/SetNoiseStatus",
            Verb::PlayBuzzer => "Device/PlayBuzzer",
            Verb::SendItemList => "Draw/SendHttpItemList",
            Verb::CommandList => "Draw/CommandList",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One protocol verb plus its parameters.
///
/// Serializes as a flat object with `"Command"` first, followed by the
/// parameters in insertion order. Commands built through [`crate::catalog`]
/// always carry a [`Verb`]; any other name can only enter through
/// [`Command::raw`] or deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "Command")]
    name: String,
    #[serde(flatten)]
    parameters: Map<String, Value>,
}

impl Command {
    pub(crate) fn new(verb: Verb) -> Self {
        Self {
            name: verb.as_str().to_string(),
            parameters: Map::new(),
        }
    }

    /// Builds an unchecked command from any verb and parameter set.
    pub fn raw(name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    pub(crate) fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.parameters
    }

    /// Returns the protocol verb.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameters, excluding the verb.
    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    /// Returns a single parameter.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Returns the full request body.
    pub fn to_json(&self) -> Value {
        let mut body = Map::with_capacity(self.parameters.len() + 1);
        body.insert("Command".to_string(), Value::from(self.name.as_str()));
        body.extend(self.parameters.clone());
        Value::Object(body)
    }
}

/// A decoded device response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Zero on success. A missing code is treated as success.
    #[serde(default)]
    pub error_code: i64,
    /// Operation-specific fields; none are guaranteed present.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Response {
    /// Decodes a response body, regardless of its declared content type.
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(body).map_err(|_| Error::MalformedResponse(excerpt(body)))?;
        if !value.is_object() {
            return Err(Error::MalformedResponse(excerpt(body)));
        }
        serde_json::from_value(value).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// Returns true if the device reported success.
    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }

    /// Converts a nonzero error code into [`Error::CommandRejected`].
    pub fn into_result(self, command: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::CommandRejected {
                command: command.to_string(),
                code: self.error_code,
            })
        }
    }

    /// Returns a single response field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_LEN {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(BODY_EXCERPT_LEN).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_serialization_order() {
        let command = Command::new(Verb::SetTimer)
            .with("Minute", 1)
            .with("Second", 30)
            .with("Status", 1);
        let body = serde_json::to_string(&command).unwrap();
        assert_eq!(
            body,
            r#"{"Command":"Tools/SetTimer","Minute":1,"Second":30,"Status":1}"#
        );
        assert_eq!(command.to_json(), serde_json::from_str::<Value>(&body).unwrap());
    }

    #[test]
    fn test_raw_command() {
        let mut params = Map::new();
        params.insert("LcdIndex".into(), json!(2));
        let command = Command::raw("Channel/SetLcdIndex", params);
        assert_eq!(command.name(), "Channel/SetLcdIndex");
        assert_eq!(command.get("LcdIndex"), Some(&json!(2)));
    }

    #[test]
    fn test_command_deserialize() {
        let command: Command =
            serde_json::from_value(json!({"Command": "Channel/GetIndex", "Foo": 1})).unwrap();
        assert_eq!(command.name(), "Channel/GetIndex");
        assert_eq!(command.parameters().len(), 1);
    }

    #[test]
    fn test_success_with_extra_fields() {
        let response = Response::parse(r#"{"error_code":0,"Brightness":80,"Extra":[1,2]}"#)
            .unwrap()
            .into_result("Channel/GetAllConf")
            .unwrap();
        assert_eq!(response.get("Brightness"), Some(&json!(80)));
        assert_eq!(response.fields.len(), 2);
    }

    #[test]
    fn test_missing_error_code_is_success() {
        let response = Response::parse(r#"{"LocalTime":"12:00"}"#).unwrap();
        assert!(response.is_success());
    }

    #[test]
    fn test_rejected_code_preserved() {
        let err = Response::parse(r#"{"error_code":7}"#)
            .unwrap()
            .into_result("Channel/SetBrightness")
            .unwrap_err();
        match err {
            Error::CommandRejected { command, code } => {
                assert_eq!(command, "Channel/SetBrightness");
                assert_eq!(code, 7);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_json_is_malformed() {
        assert!(matches!(
            Response::parse("OK"),
            Err(Error::MalformedResponse(body)) if body == "OK"
        ));
        assert!(matches!(
            Response::parse("[1,2,3]"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            Response::parse(r#"{"error_code":"bad"}"#),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_long_body_excerpt() {
        let body = "x".repeat(500);
        match Response::parse(&body) {
            Err(Error::MalformedResponse(excerpt)) => {
                assert_eq!(excerpt.len(), BODY_EXCERPT_LEN + 3)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
