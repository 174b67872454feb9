use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Units of measurement
const TEMP_CELSIUS: &str = "°C";
const TEMP_FAHRENHEIT: &str = "°F";
const PERCENTAGE: &str = "%";
const PRESSURE_INHG: &str = "inHg";
const PRESSURE_MBAR: &str = "mbar";
const LUMINANCE: &str = "cd/m²";
const MILLIVOLT: &str = "mV";
const LENGTH_INCHES: &str = "in";
const LENGTH_MILLIMETERS: &str = "mm";
const SPEED_MILES_PER_HOUR: &str = "mph";
const SPEED_METERS_PER_SECOND: &str = "m/s";
const SPEED_INCHES_PER_HOUR: &str = "in/h";
const PRECIPITATION_MILLIMETERS_PER_HOUR: &str = "mm/h";

/// One of the readings a BloomSky station reports.
///
/// The first six come from the SKY unit, the rest from the STORM unit.
/// See http://weatherlution.com/bloomsky-api/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Pressure,
    Luminance,
    UvIndex,
    Voltage,
    WindDirection,
    RainDaily,
    WindGust,
    SustainedWindSpeed,
    RainRate,
    Rain24h,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sensor type: {0}")]
pub struct UnknownSensor(pub String);

impl SensorKind {
    /// Every known sensor, in catalog order.
    pub const ALL: [SensorKind; 12] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::Pressure,
        SensorKind::Luminance,
        SensorKind::UvIndex,
        SensorKind::Voltage,
        SensorKind::WindDirection,
        SensorKind::RainDaily,
        SensorKind::WindGust,
        SensorKind::SustainedWindSpeed,
        SensorKind::RainRate,
        SensorKind::Rain24h,
    ];

    /// Key used by the API payload and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Humidity => "Humidity",
            SensorKind::Pressure => "Pressure",
            SensorKind::Luminance => "Luminance",
            SensorKind::UvIndex => "UVIndex",
            SensorKind::Voltage => "Voltage",
            SensorKind::WindDirection => "WindDirection",
            SensorKind::RainDaily => "RainDaily",
            SensorKind::WindGust => "WindGust",
            SensorKind::SustainedWindSpeed => "SustainedWindSpeed",
            SensorKind::RainRate => "RainRate",
            SensorKind::Rain24h => "24hRain",
        }
    }

    /// Unit for this sensor in the given unit mode.
    ///
    /// UVIndex and WindDirection carry no unit in either mode.
    pub fn unit(&self, is_metric: bool) -> Option<&'static str> {
        if is_metric {
            self.metric_unit()
        } else {
            self.imperial_unit()
        }
    }

    // These do not currently align with the API documentation
    fn imperial_unit(&self) -> Option<&'static str> {
        match self {
            SensorKind::Temperature => Some(TEMP_FAHRENHEIT),
            SensorKind::Humidity => Some(PERCENTAGE),
            SensorKind::Pressure => Some(PRESSURE_INHG),
            SensorKind::Luminance => Some(LUMINANCE),
            SensorKind::Voltage => Some(MILLIVOLT),
            SensorKind::RainDaily => Some(LENGTH_INCHES),
            SensorKind::WindGust => Some(SPEED_MILES_PER_HOUR),
            SensorKind::SustainedWindSpeed => Some(SPEED_MILES_PER_HOUR),
            SensorKind::RainRate => Some(SPEED_INCHES_PER_HOUR),
            SensorKind::Rain24h => Some(LENGTH_INCHES),
            SensorKind::UvIndex | SensorKind::WindDirection => None,
        }
    }

    fn metric_unit(&self) -> Option<&'static str> {
        match self {
            SensorKind::Temperature => Some(TEMP_CELSIUS),
            SensorKind::Humidity => Some(PERCENTAGE),
            SensorKind::Pressure => Some(PRESSURE_MBAR),
            SensorKind::Luminance => Some(LUMINANCE),
            SensorKind::Voltage => Some(MILLIVOLT),
            SensorKind::RainDaily => Some(LENGTH_MILLIMETERS),
            SensorKind::WindGust => Some(SPEED_METERS_PER_SECOND),
            SensorKind::SustainedWindSpeed => Some(SPEED_METERS_PER_SECOND),
            SensorKind::RainRate => Some(PRECIPITATION_MILLIMETERS_PER_HOUR),
            SensorKind::Rain24h => Some(LENGTH_MILLIMETERS),
            SensorKind::UvIndex | SensorKind::WindDirection => None,
        }
    }

    /// Whether readings are rendered as a two-decimal string.
    pub fn is_formatted_number(&self) -> bool {
        matches!(
            self,
            SensorKind::Temperature
                | SensorKind::Pressure
                | SensorKind::Voltage
                | SensorKind::RainDaily
                | SensorKind::WindGust
                | SensorKind::SustainedWindSpeed
                | SensorKind::RainRate
                | SensorKind::Rain24h
        )
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = UnknownSensor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownSensor(s.to_string()))
    }
}
