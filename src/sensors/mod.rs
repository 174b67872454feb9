use crate::client::ClientError;
use crate::models::SensorKind;
use serde_json::Value;
use thiserror::Error;

pub mod weather;

pub use weather::WeatherSensor;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Failed to refresh devices: {0}")]
    Refresh(#[from] ClientError),

    #[error("Device {0} is not known to the client")]
    UnknownDevice(String),

    #[error("Device {device_id} reported no {sensor} reading")]
    MissingReading { device_id: String, sensor: SensorKind },

    #[error("{sensor} reading is not numeric: {value}")]
    NotNumeric { sensor: SensorKind, value: Value },
}

/// What the host needs from a polled entity.
pub trait Entity: Send {
    fn unique_id(&self) -> &str;

    fn name(&self) -> &str;

    /// Last observed value, `None` until the first successful update.
    fn state(&self) -> Option<&Value>;

    fn unit_of_measurement(&self) -> Option<&'static str>;

    /// Fetch fresh data. On error the previous state is kept.
    fn update(&mut self) -> Result<(), UpdateError>;
}
