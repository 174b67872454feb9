use crate::client::{ClientError, DataProvider};
use crate::models::DeviceRecord;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory provider for tests.
pub(crate) struct FakeProvider {
    is_metric: AtomicBool,
    fail: AtomicBool,
    refreshes: AtomicUsize,
    devices: Mutex<IndexMap<String, DeviceRecord>>,
}

impl FakeProvider {
    pub(crate) fn new(is_metric: bool, devices: Vec<DeviceRecord>) -> Self {
        Self {
            is_metric: AtomicBool::new(is_metric),
            fail: AtomicBool::new(false),
            refreshes: AtomicUsize::new(0),
            devices: Mutex::new(
                devices
                    .into_iter()
                    .map(|device| (device.device_id.clone(), device))
                    .collect(),
            ),
        }
    }

    pub(crate) fn set_metric(&self, is_metric: bool) {
        self.is_metric.store(is_metric, Ordering::SeqCst);
    }

    pub(crate) fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub(crate) fn put_device(&self, device: DeviceRecord) {
        self.devices
            .lock()
            .unwrap()
            .insert(device.device_id.clone(), device);
    }

    pub(crate) fn remove_device(&self, device_id: &str) {
        self.devices.lock().unwrap().shift_remove(device_id);
    }
}

impl DataProvider for FakeProvider {
    fn is_metric(&self) -> bool {
        self.is_metric.load(Ordering::SeqCst)
    }

    fn refresh_devices(&self) -> Result<(), ClientError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::Io {
                path: "https://api.bloomsky.com/api/skydata/".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "offline"),
            });
        }
        Ok(())
    }

    fn devices(&self) -> Vec<DeviceRecord> {
        self.devices.lock().unwrap().values().cloned().collect()
    }

    fn device(&self, device_id: &str) -> Option<DeviceRecord> {
        self.devices.lock().unwrap().get(device_id).cloned()
    }
}

/// Builds a device record from JSON groups.
pub(crate) fn device(id: &str, name: &str, data: Value, storm: Option<Value>) -> DeviceRecord {
    DeviceRecord {
        device_id: id.to_string(),
        device_name: name.to_string(),
        data: data.as_object().cloned().unwrap_or_default(),
        storm: storm.and_then(|storm| storm.as_object().cloned()),
    }
}
