use botlog_protocol::{Log, LogType};

use crate::state::AppState;

/// Severity of an on-screen notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Busy,
    Warning,
    Error,
    Info,
}

impl ToastLevel {
    /// The toast severity matching the log's type. Unknown types are shown as info
    pub fn for_log(log: &Log) -> ToastLevel {
        match log.kind() {
            Some(LogType::Success) => ToastLevel::Success,
            Some(LogType::Busy) => ToastLevel::Busy,
            Some(LogType::Warn) => ToastLevel::Warning,
            Some(LogType::Error) => ToastLevel::Error,
            _other => ToastLevel::Info,
        }
    }
}

/// UI side effects triggered by log channels.
/// Both calls are fire-and-forget: implementations deal with their own failures.
pub trait LogUi {
    fn toast(&self, log: &Log, level: ToastLevel);

    fn speak(&self, text: &str, lang: &str);
}

pub fn show_log_on_screen(ui: &dyn LogUi, log: &Log) {
    ui.toast(log, ToastLevel::for_log(log));
}

/// Speaks the log's message, unless the user muted speech
pub fn speak_log_aloud(ui: &dyn LogUi, log: &Log, state: &AppState) {
    if !state.speech.enabled {
        trace!("Speech disabled, not speaking: {}", log.message);
        return;
    }
    ui.speak(&log.message, &state.speech.lang);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Spy {
        toasts: RefCell<Vec<ToastLevel>>,
        spoken: RefCell<Vec<(String, String)>>,
    }

    impl LogUi for Spy {
        fn toast(&self, _log: &Log, level: ToastLevel) {
            self.toasts.borrow_mut().push(level);
        }

        fn speak(&self, text: &str, lang: &str) {
            self.spoken.borrow_mut().push((text.to_owned(), lang.to_owned()));
        }
    }

    fn log_of_type(log_type: &str) -> Log {
        Log::from_value(&json!({ "message": "watering", "type": log_type })).unwrap()
    }

    #[test]
    fn test_toast_level_for_log() {
        assert_eq!(ToastLevel::for_log(&log_of_type("success")), ToastLevel::Success);
        assert_eq!(ToastLevel::for_log(&log_of_type("busy")), ToastLevel::Busy);
        assert_eq!(ToastLevel::for_log(&log_of_type("warn")), ToastLevel::Warning);
        assert_eq!(ToastLevel::for_log(&log_of_type("error")), ToastLevel::Error);
        assert_eq!(ToastLevel::for_log(&log_of_type("fun")), ToastLevel::Info);
        assert_eq!(ToastLevel::for_log(&log_of_type("whatever")), ToastLevel::Info);
    }

    #[test]
    fn test_show_log_on_screen() {
        let spy = Spy::default();
        show_log_on_screen(&spy, &log_of_type("warn"));
        assert_eq!(*spy.toasts.borrow(), vec![ToastLevel::Warning]);
    }

    #[test]
    fn test_speak_uses_language() {
        let spy = Spy::default();
        let mut state = AppState::default();
        state.speech.lang = "de".to_owned();
        speak_log_aloud(&spy, &log_of_type("info"), &state);
        assert_eq!(
            *spy.spoken.borrow(),
            vec![("watering".to_owned(), "de".to_owned())]
        );
    }

    #[test]
    fn test_speak_muted() {
        let spy = Spy::default();
        let mut state = AppState::default();
        state.speech.enabled = false;
        speak_log_aloud(&spy, &log_of_type("info"), &state);
        assert!(spy.spoken.borrow().is_empty());
    }
}
