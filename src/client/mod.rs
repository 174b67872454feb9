use crate::models::DeviceRecord;
use thiserror::Error;

pub mod snapshot;

#[cfg(test)]
pub(crate) mod fake;

pub use snapshot::SnapshotClient;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to read device data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed device payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Device cache lock poisoned")]
    Poisoned,
}

/// Source of BloomSky device state shared by every sensor entity.
///
/// Implementations own I/O and caching. `refresh_devices` may be called once
/// per entity per poll, so throttling belongs here too.
pub trait DataProvider: Send + Sync {
    /// Global unit mode. Readings are expected in the matching units.
    fn is_metric(&self) -> bool;

    fn refresh_devices(&self) -> Result<(), ClientError>;

    /// Cached devices in the order the API reported them.
    fn devices(&self) -> Vec<DeviceRecord>;

    fn device(&self, device_id: &str) -> Option<DeviceRecord>;
}
