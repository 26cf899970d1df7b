//! The Botlog-Handler Crate

#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    missing_debug_implementations,
    non_ascii_idents,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    variant_size_differences
)]

#[macro_use]
extern crate log;

pub mod channels;
pub mod connectivity;
pub mod log_handler;
pub mod sink;
pub mod state;
pub mod ui;

pub use channels::{act_on_channel_name, ChannelAction, ChannelActions};
pub use connectivity::{Connectivity, ConnectivityTracker, Edge, EdgeStatus, NetworkState};
pub use log_handler::{
    is_offline_signal, make_handler, Collaborators, HandleOutcome, LogHandler, OFFLINE_MARKER,
    OFFLINE_REASON,
};
pub use sink::{Normalizer, PayloadSink, SharedQueue};
pub use state::{AppState, GetState, SpeechSettings};
pub use ui::{show_log_on_screen, speak_log_aloud, LogUi, ToastLevel};

use std::time::Duration;

use botlog_protocol::DeviceIdentity;

#[derive(Clone, Debug)]
pub struct HandlerSettings {
    /// Only logs from this device are handled. None handles every device.
    pub device: Option<DeviceIdentity>,
    pub speech: SpeechSettings,
    pub flush_interval: Duration,
    pub queue_capacity: usize,
    pub offline_throttle: Duration,
}

impl HandlerSettings {
    /// TRUE if logs from the specified device should be handled
    pub fn accepts(&self, device: &DeviceIdentity) -> bool {
        match &self.device {
            Some(expected) => expected == device,
            None => true,
        }
    }

    pub fn initial_state(&self) -> AppState {
        AppState {
            speech: self.speech.clone(),
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        HandlerSettings {
            device: None,
            speech: SpeechSettings::default(),
            flush_interval: botlog_queue::DEFAULT_FLUSH_INTERVAL,
            queue_capacity: 1000,
            offline_throttle: connectivity::DEFAULT_THROTTLE,
        }
    }
}
