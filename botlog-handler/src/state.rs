use std::rc::Rc;

/// Speech preferences of the current user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechSettings {
    pub enabled: bool,

    /// Language code passed to the speech synthesizer
    pub lang: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        SpeechSettings {
            enabled: true,
            lang: "en".to_owned(),
        }
    }
}

/// The slice of application state the log handler reads
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    pub speech: SpeechSettings,
}

/// Read-only accessor into the application state store
pub type GetState = Rc<dyn Fn() -> AppState>;
