use crate::client::DataProvider;
use crate::models::{DeviceRecord, SensorKind};
use crate::sensors::{Entity, UpdateError};
use log::debug;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// A single reading of a single BloomSky device.
pub struct WeatherSensor {
    provider: Arc<dyn DataProvider>,
    device_id: String,
    kind: SensorKind,
    name: String,
    unique_id: String,
    state: Option<Value>,
}

impl WeatherSensor {
    pub fn new(provider: Arc<dyn DataProvider>, device: &DeviceRecord, kind: SensorKind) -> Self {
        Self {
            provider,
            device_id: device.device_id.clone(),
            kind,
            name: format!("{} {}", device.device_name, kind),
            unique_id: format!("{}-{}", device.device_id, kind),
            state: None,
        }
    }

    fn render(&self, value: Value) -> Result<Value, UpdateError> {
        if !self.kind.is_formatted_number() {
            return Ok(value);
        }
        // Booleans format as 0 or 1
        let number = match &value {
            Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            other => other.as_f64(),
        };
        match number {
            Some(number) => Ok(Value::String(format!("{:.2}", number))),
            None => Err(UpdateError::NotNumeric {
                sensor: self.kind,
                value,
            }),
        }
    }
}

impl Entity for WeatherSensor {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> Option<&Value> {
        self.state.as_ref()
    }

    fn unit_of_measurement(&self) -> Option<&'static str> {
        self.kind.unit(self.provider.is_metric())
    }

    fn update(&mut self) -> Result<(), UpdateError> {
        let start = Instant::now();
        self.provider.refresh_devices()?;

        let device = self
            .provider
            .device(&self.device_id)
            .ok_or_else(|| UpdateError::UnknownDevice(self.device_id.clone()))?;
        let value = device
            .reading(self.kind.as_str())
            .ok_or_else(|| UpdateError::MissingReading {
                device_id: self.device_id.clone(),
                sensor: self.kind,
            })?;

        self.state = Some(self.render(value)?);
        debug!("{} update took: {} ms", self.unique_id, start.elapsed().as_millis());
        Ok(())
    }
}
