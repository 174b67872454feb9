use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use log::{debug, info, LevelFilter};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.ini";

fn default_devices_file() -> String {
    "devices.json".to_string()
}

fn default_min_refresh_secs() -> u64 {
    300
}

fn default_scan_interval() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<String>),
    One(String),
}

/// Accepts a list, a single name or a comma separated string.
///
/// Blank names are kept so validation rejects them.
fn deserialize_sensor_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;

    let names = value.map(|value| {
        let raw = match value {
            OneOrMany::Many(names) => names,
            OneOrMany::One(names) => names.split(',').map(String::from).collect(),
        };
        raw.iter().map(|name| name.trim().to_string()).collect()
    });
    Ok(names)
}

#[derive(Debug, Deserialize, Clone)]
pub struct BloomSkyConfig {
    #[serde(default = "default_devices_file")]
    pub devices_file: String,
    #[serde(default)]
    pub is_metric: bool,
    #[serde(default = "default_min_refresh_secs")]
    pub min_refresh_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SensorConfig {
    #[serde(default, deserialize_with = "deserialize_sensor_list")]
    pub monitored_conditions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(rename = "BLOOMSKY", alias = "bloomsky", default)]
    pub bloomsky: BloomSkyConfig,
    #[serde(rename = "SENSOR", alias = "sensor", default)]
    pub sensor: SensorConfig,
    #[serde(rename = "POLLING", alias = "polling", default)]
    pub polling: PollingConfig,
    #[serde(rename = "LOGGING", alias = "logging", default)]
    pub logging: LoggingConfig,
}

impl Default for BloomSkyConfig {
    fn default() -> Self {
        Self {
            devices_file: default_devices_file(),
            is_metric: false,
            min_refresh_secs: default_min_refresh_secs(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            scan_interval: default_scan_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Loads `path` if it exists. Otherwise writes the defaults there and returns them.
    ///
    /// An existing but invalid file is an error, never replaced by defaults.
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        if config_path.exists() {
            return Self::from_file(config_path);
        }

        eprintln!("{} not found, writing defaults", config_path.display());
        let config = Self::default();
        if let Err(e) = config.save(config_path) {
            eprintln!("Failed to write {}: {:#}", config_path.display(), e);
        }
        Ok(config)
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    /// Loads and validates the configuration. Unknown sensor names fail here.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Ini))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize config")?;

        app_config
            .sensor
            .validate()
            .context("Invalid [SENSOR] section")?;

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        let mut config_str = String::new();

        config_str.push_str(&format!(
            "[BLOOMSKY]\ndevices_file = {}\nis_metric = {}\nmin_refresh_secs = {}\n\n",
            self.bloomsky.devices_file, self.bloomsky.is_metric, self.bloomsky.min_refresh_secs
        ));

        config_str.push_str("[SENSOR]\n");
        if let Some(names) = &self.sensor.monitored_conditions {
            config_str.push_str(&format!("monitored_conditions = \"{}\"\n", names.join(", ")));
        }
        config_str.push('\n');

        config_str.push_str(&format!(
            "[POLLING]\nscan_interval = {}\n\n",
            self.polling.scan_interval
        ));

        config_str.push_str(&format!("[LOGGING]\nlevel = {}\n", self.logging.level));

        fs::write(config_path, config_str)
            .context(format!("Failed to save config to {}", config_path.display()))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}
