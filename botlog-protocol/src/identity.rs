use std::fmt;

/// A device identity, as it appears in MQTT topics (e.g. `device_123`)
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DeviceIdentity {
    /// The Device ID
    pub device_id: String,
}

impl DeviceIdentity {
    /// Creates a Device Identity from the specified device_id
    pub fn from_device_id(device_id: &str) -> DeviceIdentity {
        DeviceIdentity {
            device_id: device_id.to_owned(),
        }
    }
}

impl From<String> for DeviceIdentity {
    fn from(device_id: String) -> Self {
        DeviceIdentity { device_id }
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.device_id)
    }
}
