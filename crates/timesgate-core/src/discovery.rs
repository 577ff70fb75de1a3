//! LAN device discovery through the Divoom cloud service.
//!
//! The service returns the devices registered from the caller's public
//! address. Only the address fields are used; the core never keeps them.

use crate::{Error, Result, DEFAULT_TIMEOUT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Cloud endpoint listing devices on the caller's LAN.
pub const DISCOVERY_URL: &str = "https://app.divoom-gz.com/Device/ReturnSameLANDevice";

/// A device reported by the discovery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "DeviceName", default)]
    pub name: String,
    #[serde(rename = "DeviceId", default)]
    pub id: u64,
    #[serde(rename = "DevicePrivateIP", default)]
    pub private_ip: String,
    #[serde(rename = "DeviceMac", default)]
    pub mac: String,
}

impl DeviceInfo {
    /// Returns true if the name looks like a Times Gate.
    pub fn is_times_gate(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("timegate") || name.contains("times gate")
    }
}

/// Code reported when the service omits `ReturnCode` entirely.
const MISSING_RETURN_CODE: i64 = -1;

#[derive(Debug, Deserialize)]
struct DiscoveryReply {
    #[serde(rename = "ReturnCode", default)]
    return_code: Option<i64>,
    #[serde(rename = "ReturnMessage", default)]
    return_message: Option<String>,
    #[serde(rename = "DeviceList", default)]
    device_list: Vec<DeviceInfo>,
}

/// Discovery client.
#[derive(Debug, Clone)]
pub struct Discovery {
    endpoint: String,
    timeout: Duration,
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}

impl Discovery {
    pub fn new() -> Self {
        Self::with_endpoint(DISCOVERY_URL)
    }

    /// Uses a different discovery endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Queries the service. Returns Times Gate devices if any are listed,
    /// otherwise every device the service reported.
    pub async fn discover(&self) -> Result<Vec<DeviceInfo>> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Error::ConnectionFailure)?;

        debug!("Querying discovery service at {}", self.endpoint);
        let body = client
            .post(&self.endpoint)
            .send()
            .await
            .map_err(Error::ConnectionFailure)?
            .text()
            .await
            .map_err(Error::ConnectionFailure)?;

        let devices = parse_discovery_reply(&body)?;
        info!("Found {} devices", devices.len());
        Ok(devices)
    }
}

/// Discovers devices through the default endpoint.
pub async fn discover_devices() -> Result<Vec<DeviceInfo>> {
    Discovery::new().discover().await
}

fn parse_discovery_reply(body: &str) -> Result<Vec<DeviceInfo>> {
    let reply: DiscoveryReply =
        serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;

    match reply.return_code {
        Some(0) => {}
        Some(code) => {
            return Err(Error::Discovery {
                code,
                message: reply
                    .return_message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        None => {
            return Err(Error::Discovery {
                code: MISSING_RETURN_CODE,
                message: "reply carried no ReturnCode".to_string(),
            });
        }
    }

    let (gates, others): (Vec<_>, Vec<_>) = reply
        .device_list
        .into_iter()
        .partition(DeviceInfo::is_times_gate);
    Ok(if gates.is_empty() { others } else { gates })
}
