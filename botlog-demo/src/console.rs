use botlog_handler::{LogUi, ToastLevel};
use botlog_protocol::Log;

/// Shows toasts and speech as log lines on stderr
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl LogUi for ConsoleUi {
    fn toast(&self, log: &Log, level: ToastLevel) {
        match level {
            ToastLevel::Error => error!("[toast] {}", log.message),
            ToastLevel::Warning => warn!("[toast] {}", log.message),
            other => info!("[toast:{:?}] {}", other, log.message),
        }
    }

    fn speak(&self, text: &str, lang: &str) {
        info!("[espeak:{}] {}", lang, text);
    }
}
