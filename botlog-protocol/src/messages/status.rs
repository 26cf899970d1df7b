use crate::identity::DeviceIdentity;

/// A status snapshot published by the device.
/// The body is passed along as-is; this crate does not model the device state tree
#[derive(Clone, Debug)]
pub struct StatusMsg {
    /// The publishing device
    pub device: DeviceIdentity,

    /// The status document
    pub body: serde_json::Value,
}
