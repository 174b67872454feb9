pub mod device;
pub mod sensor;

pub use device::DeviceRecord;
pub use sensor::{SensorKind, UnknownSensor};
