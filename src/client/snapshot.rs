use crate::client::{ClientError, DataProvider};
use crate::models::DeviceRecord;
use indexmap::IndexMap;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Default minimum time between two reloads, matching the API client's throttle.
pub const DEFAULT_MIN_REFRESH: Duration = Duration::from_secs(300);

#[derive(Debug, Default)]
struct Cache {
    devices: IndexMap<String, DeviceRecord>,
    last_refresh: Option<Instant>,
}

/// Serves device state from a saved `/api/skydata` response on disk.
///
/// The file holds a JSON array of device records and is re-read on refresh,
/// at most once per `min_refresh`.
#[derive(Debug)]
pub struct SnapshotClient {
    path: PathBuf,
    is_metric: bool,
    min_refresh: Duration,
    cache: Mutex<Cache>,
}

impl SnapshotClient {
    /// Builds the client and performs the first load. Fails if the data can't be read.
    pub fn new<P: AsRef<Path>>(
        path: P,
        is_metric: bool,
        min_refresh: Duration,
    ) -> Result<Self, ClientError> {
        let client = Self {
            path: path.as_ref().to_path_buf(),
            is_metric,
            min_refresh,
            cache: Mutex::new(Cache::default()),
        };
        client.refresh_devices()?;

        info!(
            "BloomSky: loaded {} device(s) from {}",
            client.devices().len(),
            client.path.display()
        );
        Ok(client)
    }

    fn load(&self) -> Result<IndexMap<String, DeviceRecord>, ClientError> {
        let start = Instant::now();
        let contents = fs::read_to_string(&self.path).map_err(|source| ClientError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let devices: Vec<DeviceRecord> = serde_json::from_str(&contents)?;

        let result = devices
            .into_iter()
            .map(|device| (device.device_id.clone(), device))
            .collect();
        debug!("load took: {} ms", start.elapsed().as_millis());
        Ok(result)
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DataProvider for SnapshotClient {
    fn is_metric(&self) -> bool {
        self.is_metric
    }

    fn refresh_devices(&self) -> Result<(), ClientError> {
        let mut cache = self.cache.lock().map_err(|_| ClientError::Poisoned)?;

        if let Some(last) = cache.last_refresh {
            if last.elapsed() < self.min_refresh {
                debug!("Skipping refresh, last one was {} ms ago", last.elapsed().as_millis());
                return Ok(());
            }
        }

        // Keep the previous cache if the reload fails
        cache.devices = self.load()?;
        cache.last_refresh = Some(Instant::now());
        Ok(())
    }

    fn devices(&self) -> Vec<DeviceRecord> {
        self.cache().devices.values().cloned().collect()
    }

    fn device(&self, device_id: &str) -> Option<DeviceRecord> {
        self.cache().devices.get(device_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn payload(temperature: f64) -> String {
        json!([
            {
                "DeviceID": "442C05954A59",
                "DeviceName": "Backyard",
                "Data": {"Temperature": temperature, "Humidity": 40},
                "Storm": {"WindDirection": "NW"}
            },
            {
                "DeviceID": "94A1A2730A11",
                "DeviceName": "Roof",
                "Data": {"Temperature": 65.0}
            }
        ])
        .to_string()
    }

    fn snapshot_file(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file
    }

    fn temperature(client: &SnapshotClient) -> serde_json::Value {
        client
            .device("442C05954A59")
            .and_then(|device| device.reading("Temperature"))
            .unwrap()
    }

    #[test]
    fn test_loads_devices_in_order() {
        let temp_file = snapshot_file(&payload(72.5));
        let client = SnapshotClient::new(temp_file.path(), true, DEFAULT_MIN_REFRESH).unwrap();

        let ids: Vec<String> = client.devices().into_iter().map(|d| d.device_id).collect();
        assert_eq!(ids, vec!["442C05954A59", "94A1A2730A11"]);
        assert!(client.is_metric());
        assert_eq!(client.device("94A1A2730A11").unwrap().device_name, "Roof");
        assert!(client.device("missing").is_none());
    }

    #[test]
    fn test_new_fails_when_file_is_missing() {
        let result = SnapshotClient::new("/nonexistent/devices.json", false, DEFAULT_MIN_REFRESH);
        assert!(matches!(result, Err(ClientError::Io { .. })));
    }

    #[test]
    fn test_new_fails_on_malformed_payload() {
        let temp_file = snapshot_file("{\"not\": \"a list\"}");
        let result = SnapshotClient::new(temp_file.path(), false, DEFAULT_MIN_REFRESH);
        assert!(matches!(result, Err(ClientError::Payload(_))));
    }

    #[test]
    fn test_refresh_is_throttled() {
        let temp_file = snapshot_file(&payload(72.5));
        let client =
            SnapshotClient::new(temp_file.path(), false, Duration::from_secs(3600)).unwrap();

        fs::write(temp_file.path(), payload(80.0)).unwrap();
        client.refresh_devices().unwrap();

        assert_eq!(temperature(&client), json!(72.5));
    }

    #[test]
    fn test_refresh_reloads_after_interval() {
        let temp_file = snapshot_file(&payload(72.5));
        let client = SnapshotClient::new(temp_file.path(), false, Duration::ZERO).unwrap();

        fs::write(temp_file.path(), payload(80.0)).unwrap();
        client.refresh_devices().unwrap();

        assert_eq!(temperature(&client), json!(80.0));
    }

    #[test]
    fn test_failed_refresh_keeps_previous_cache() {
        let temp_file = snapshot_file(&payload(72.5));
        let client = SnapshotClient::new(temp_file.path(), false, Duration::ZERO).unwrap();

        fs::write(temp_file.path(), "not json").unwrap();
        assert!(client.refresh_devices().is_err());

        assert_eq!(client.devices().len(), 2);
        assert_eq!(temperature(&client), json!(72.5));
    }
}
