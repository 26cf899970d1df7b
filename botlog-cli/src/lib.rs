use std::error::Error;
use std::fmt;
use std::time::Duration;

use botlog_handler::{HandlerSettings, SpeechSettings};
use botlog_protocol::DeviceIdentity;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
pub struct Options {
    /// Only handle logs published by this device (e.g. device_123)
    #[structopt(short = "d", long = "device")]
    pub device_id: Option<String>,

    #[structopt(long = "flush-interval", default_value = "250")]
    pub flush_interval_ms: u64,

    #[structopt(long = "queue-capacity", default_value = "1000")]
    pub queue_capacity: usize,

    /// Do not speak logs sent to the espeak channel
    #[structopt(long = "mute")]
    pub mute: bool,

    #[structopt(long = "lang", default_value = "en")]
    pub lang: String,

    #[structopt(long = "offline-throttle", default_value = "1000")]
    pub offline_throttle_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsError {
    ZeroQueueCapacity,
    ZeroFlushInterval,
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::ZeroQueueCapacity => write!(f, "Queue capacity must be positive"),
            OptionsError::ZeroFlushInterval => write!(f, "Flush interval must be positive"),
        }
    }
}

impl Error for OptionsError {}

impl Options {
    pub fn from_cmd_line() -> Options {
        Options::from_args()
    }

    pub fn get_handler_settings(&self) -> Result<HandlerSettings, OptionsError> {
        if self.queue_capacity == 0 {
            return Err(OptionsError::ZeroQueueCapacity);
        }
        if self.flush_interval_ms == 0 {
            return Err(OptionsError::ZeroFlushInterval);
        }

        Ok(HandlerSettings {
            device: self
                .device_id
                .as_ref()
                .map(|id| DeviceIdentity::from_device_id(id)),
            speech: SpeechSettings {
                enabled: !self.mute,
                lang: self.lang.clone(),
            },
            flush_interval: Duration::from_millis(self.flush_interval_ms),
            queue_capacity: self.queue_capacity,
            offline_throttle: Duration::from_millis(self.offline_throttle_ms),
        })
    }
}
