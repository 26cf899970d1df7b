use botlog_protocol::{Log, LogChannel};

/// A side effect bound to a channel
pub type ChannelAction = Box<dyn Fn(&Log)>;

/// Runs the action iff the channel is listed in the log's channels.
/// Returns TRUE if the action ran.
pub fn act_on_channel_name<F>(log: &Log, channel: LogChannel, action: F) -> bool
where
    F: FnOnce(&Log),
{
    if log.has_channel(channel.name()) {
        action(log);
        true
    } else {
        false
    }
}

/// Maps channels to the side effects they trigger.
/// Each channel has at most one action, so a channel listed twice in a log still fires once.
#[derive(Default)]
pub struct ChannelActions {
    actions: Vec<(LogChannel, ChannelAction)>,
}

impl ChannelActions {
    pub fn new() -> ChannelActions {
        ChannelActions {
            actions: Vec::new(),
        }
    }

    /// Binds an action to a channel, replacing any previous binding
    pub fn register(&mut self, channel: LogChannel, action: ChannelAction) {
        match self.actions.iter_mut().find(|(c, _)| *c == channel) {
            Some(entry) => entry.1 = action,
            None => self.actions.push((channel, action)),
        }
    }

    pub fn channels(&self) -> Vec<LogChannel> {
        self.actions.iter().map(|(c, _)| *c).collect()
    }

    /// Runs the action of every registered channel the log lists. Returns the number of actions run.
    pub fn dispatch(&self, log: &Log) -> usize {
        self.actions
            .iter()
            .filter(|(channel, action)| act_on_channel_name(log, *channel, |l| action(l)))
            .count()
    }
}

impl std::fmt::Debug for ChannelActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChannelActions {:?}", self.channels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn log_with_channels(channels: serde_json::Value) -> Log {
        Log::from_value(&json!({ "message": "hi", "channels": channels })).unwrap()
    }

    fn counting(counter: &Rc<Cell<u32>>) -> ChannelAction {
        let counter = counter.clone();
        Box::new(move |_log: &Log| counter.set(counter.get() + 1))
    }

    #[test]
    fn test_act_on_channel_name() {
        let log = log_with_channels(json!(["toast"]));
        let mut ran = false;
        assert!(act_on_channel_name(&log, LogChannel::Toast, |_| ran = true));
        assert!(ran);

        let mut ran = false;
        assert!(!act_on_channel_name(&log, LogChannel::Espeak, |_| ran = true));
        assert!(!ran);
    }

    #[test]
    fn test_dispatch_fires_once_per_channel() {
        let toasts = Rc::new(Cell::new(0));
        let speech = Rc::new(Cell::new(0));
        let mut sut = ChannelActions::new();
        sut.register(LogChannel::Toast, counting(&toasts));
        sut.register(LogChannel::Espeak, counting(&speech));

        let fired = sut.dispatch(&log_with_channels(json!(["toast", "toast", "email"])));

        assert_eq!(fired, 1);
        assert_eq!(toasts.get(), 1);
        assert_eq!(speech.get(), 0);
    }

    #[test]
    fn test_dispatch_without_channels() {
        let toasts = Rc::new(Cell::new(0));
        let mut sut = ChannelActions::new();
        sut.register(LogChannel::Toast, counting(&toasts));

        let log = Log::from_value(&json!({ "message": "hi" })).unwrap();
        assert_eq!(sut.dispatch(&log), 0);
        assert_eq!(toasts.get(), 0);
    }

    #[test]
    fn test_register_replaces() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut sut = ChannelActions::new();
        sut.register(LogChannel::Toast, counting(&first));
        sut.register(LogChannel::Toast, counting(&second));
        assert_eq!(sut.channels(), vec![LogChannel::Toast]);

        sut.dispatch(&log_with_channels(json!(["toast"])));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }
}
