use std::rc::Rc;

use botlog_protocol::{Log, LogChannel, LogType};
use serde_json::Value;

use crate::channels::ChannelActions;
use crate::connectivity::{Connectivity, Edge};
use crate::sink::{Normalizer, PayloadSink};
use crate::state::GetState;
use crate::ui::{show_log_on_screen, speak_log_aloud, LogUi};

/// Text the device puts in an error log when it loses its connection.
// TODO: replace with a per-device last will topic (bot/<device>/offline) once the firmware publishes one.
pub const OFFLINE_MARKER: &str = "is offline";

pub const OFFLINE_REASON: &str = "Got offline message";

/// TRUE if the log reports that the device went offline
pub fn is_offline_signal(log: &Log) -> bool {
    log.kind() == Some(LogType::Error) && log.message.contains(OFFLINE_MARKER)
}

/// The external collaborators of the log handler
pub struct Collaborators {
    pub ui: Rc<dyn LogUi>,
    pub connectivity: Rc<dyn Connectivity>,
    pub normalizer: Box<dyn Normalizer>,
    pub sink: Box<dyn PayloadSink>,
}

/// What the handler did with a payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleOutcome {
    /// The payload is not a log
    Skipped,

    Handled {
        /// Number of channel actions run
        channel_actions: usize,
        /// The normalized log was pushed to the batch queue
        queued: bool,
        /// The log reported the device offline
        went_offline: bool,
    },
}

/// Routes the payloads of a device's log topic
pub struct LogHandler {
    channel_actions: ChannelActions,
    normalizer: Box<dyn Normalizer>,
    sink: Box<dyn PayloadSink>,
    connectivity: Rc<dyn Connectivity>,
}

/// Creates a log handler: toasts and speech go to the UI, logs to the sink,
/// and offline reports to the connectivity collaborator.
pub fn make_handler(collaborators: Collaborators, get_state: GetState) -> LogHandler {
    let Collaborators {
        ui,
        connectivity,
        normalizer,
        sink,
    } = collaborators;

    let mut channel_actions = ChannelActions::new();

    let toast_ui = ui.clone();
    channel_actions.register(
        LogChannel::Toast,
        Box::new(move |log: &Log| show_log_on_screen(toast_ui.as_ref(), log)),
    );

    channel_actions.register(
        LogChannel::Espeak,
        Box::new(move |log: &Log| speak_log_aloud(ui.as_ref(), log, &get_state())),
    );

    LogHandler {
        channel_actions,
        normalizer,
        sink,
        connectivity,
    }
}

impl LogHandler {
    /// Handles a single payload. Payloads which are not logs are ignored.
    pub fn handle(&self, msg: &Value) -> HandleOutcome {
        let log = match Log::from_value(msg) {
            Some(log) => log.backfill_legacy_fields(),
            None => {
                trace!("Ignoring non-log payload");
                return HandleOutcome::Skipped;
            }
        };

        let channel_actions = self.channel_actions.dispatch(&log);

        let resource = self.normalizer.normalize(&log);
        let queued = resource.is_log();
        if queued {
            self.sink.push(resource);
        } else {
            debug!("Not queueing resource of kind {}", resource.kind);
        }

        let went_offline = is_offline_signal(&log);
        if went_offline {
            self.connectivity
                .network_down(Edge::BotMqtt, None, OFFLINE_REASON);
        }

        HandleOutcome::Handled {
            channel_actions,
            queued,
            went_offline,
        }
    }

    /// The handler as a plain delivery callback
    pub fn into_callback(self) -> impl Fn(&Value) {
        move |msg: &Value| {
            let _outcome = self.handle(msg);
        }
    }
}

impl std::fmt::Debug for LogHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogHandler {{ {:?} }}", self.channel_actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log(value: Value) -> Log {
        Log::from_value(&value).unwrap()
    }

    #[test]
    fn test_offline_signal() {
        assert!(is_offline_signal(&log(
            json!({ "type": "error", "message": "Device is offline right now" })
        )));
        assert!(!is_offline_signal(&log(
            json!({ "type": "info", "message": "Device is offline right now" })
        )));
        assert!(!is_offline_signal(&log(
            json!({ "type": "error", "message": "Device is online" })
        )));
        assert!(!is_offline_signal(&log(
            json!({ "message": "Device is offline" })
        )));
    }
}
