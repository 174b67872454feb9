use serde::Deserialize;
use serde_json::{Map, Value};

/// A station as cached by the API client.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeviceRecord {
    #[serde(rename = "DeviceID")]
    pub device_id: String,
    #[serde(rename = "DeviceName")]
    pub device_name: String,
    #[serde(rename = "Data", default)]
    pub data: Map<String, Value>,
    #[serde(rename = "Storm", default)]
    pub storm: Option<Map<String, Value>>,
}

impl DeviceRecord {
    /// Reading from sky data overlaid with storm data. Storm supersedes sky on shared keys.
    pub fn reading(&self, key: &str) -> Option<Value> {
        self.storm
            .as_ref()
            .and_then(|storm| storm.get(key))
            .or_else(|| self.data.get(key))
            .cloned()
    }
}
