use crate::client::DataProvider;
use crate::config::SensorConfig;
use crate::models::SensorKind;
use crate::sensors::{Entity, WeatherSensor};
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub const PLATFORM: &str = "bloomsky";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid monitored condition '{name}', expected one of: {known}")]
    UnknownSensor { name: String, known: String },
}

/// Sensor section after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub monitored_conditions: Vec<SensorKind>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            monitored_conditions: SensorKind::ALL.to_vec(),
        }
    }
}

impl SensorConfig {
    /// Checks every configured name against the sensor catalog.
    ///
    /// An unset list means every known sensor. Repeated names are kept once.
    pub fn validate(&self) -> Result<PlatformConfig, ConfigError> {
        let Some(names) = &self.monitored_conditions else {
            return Ok(PlatformConfig::default());
        };

        let mut monitored_conditions = Vec::with_capacity(names.len());
        for name in names {
            let kind = name.parse::<SensorKind>().map_err(|_| ConfigError::UnknownSensor {
                name: name.clone(),
                known: SensorKind::ALL.map(|kind| kind.as_str()).join(", "),
            })?;
            if !monitored_conditions.contains(&kind) {
                monitored_conditions.push(kind);
            }
        }

        Ok(PlatformConfig {
            monitored_conditions,
        })
    }
}

/// Creates one sensor per device and monitored condition and hands them to the host.
///
/// Discovery has nothing to add: the static configuration already created every entity.
/// Returns the number of entities registered.
pub fn setup_platform<F>(
    config: &PlatformConfig,
    provider: Arc<dyn DataProvider>,
    mut add_entities: F,
    discovery_info: Option<&Value>,
) -> usize
where
    F: FnMut(Vec<Box<dyn Entity>>, bool),
{
    if discovery_info.is_some() {
        debug!("Ignoring {} discovery, entities come from configuration", PLATFORM);
        return 0;
    }

    let devices = provider.devices();
    let mut entities: Vec<Box<dyn Entity>> = Vec::new();
    for device in &devices {
        for kind in &config.monitored_conditions {
            entities.push(Box::new(WeatherSensor::new(provider.clone(), device, *kind)));
        }
    }

    info!(
        "Setting up {} {} sensor(s) for {} device(s)",
        entities.len(),
        PLATFORM,
        devices.len()
    );

    let count = entities.len();
    if count > 0 {
        add_entities(entities, true);
    }
    count
}
