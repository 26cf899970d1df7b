use std::error::Error;
use std::fmt;

use botlog_cli::OptionsError;

#[derive(Debug)]
pub enum DemoError {
    /// Reading stdin or writing stdout failed
    Io(std::io::Error),

    /// The command line options are invalid
    Options(OptionsError),

    /// A batch could not be serialized
    Serialization(serde_json::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Io(e) => write!(f, "I/O error: {}", e),
            DemoError::Options(e) => write!(f, "Invalid options: {}", e),
            DemoError::Serialization(e) => write!(f, "Serialization failed: {}", e),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DemoError::Io(e) => Some(e),
            DemoError::Options(e) => Some(e),
            DemoError::Serialization(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for DemoError {
    fn from(e: std::io::Error) -> Self {
        DemoError::Io(e)
    }
}

impl From<OptionsError> for DemoError {
    fn from(e: OptionsError) -> Self {
        DemoError::Options(e)
    }
}

impl From<serde_json::Error> for DemoError {
    fn from(e: serde_json::Error) -> Self {
        DemoError::Serialization(e)
    }
}
