/// Device log records
pub mod logs;

/// Device status snapshots
pub mod status;

pub use crate::messages::logs::*;
pub use crate::messages::status::*;

use crate::identity::DeviceIdentity;
use std::fmt::{self, Display};


/// Represents a single message published by a device
#[derive(Clone, Debug)]
pub enum MsgFromBot {
    /// The codec did not recognize the topic.
    /// Example: an RPC response or a sync notification multiplexed on the same broker
    UnknownMessage(),

    /// A payload published on the device's log topic.
    /// The payload is not guaranteed to be log-shaped
    Log(LogMsg),

    /// A payload published on the device's status topic
    Status(StatusMsg),
}

impl MsgFromBot {
    /// The publishing device, if known
    pub fn device(&self) -> Option<&DeviceIdentity> {
        match self {
            MsgFromBot::UnknownMessage() => None,
            MsgFromBot::Log(msg) => Some(&msg.device),
            MsgFromBot::Status(msg) => Some(&msg.device),
        }
    }
}

impl Display for MsgFromBot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            MsgFromBot::Log(msg) => write!(f, "Log from {}", msg.device),
            MsgFromBot::Status(msg) => write!(f, "Status from {}", msg.device),
            MsgFromBot::UnknownMessage() => write!(f, "Unknown msg"),
        }
    }
}

impl From<LogMsg> for MsgFromBot {
    fn from(msg: LogMsg) -> Self {
        return MsgFromBot::Log(msg);
    }
}

impl From<StatusMsg> for MsgFromBot {
    fn from(msg: StatusMsg) -> Self {
        return MsgFromBot::Status(msg);
    }
}
