use std::fmt;

/// Errors raised while talking to a sound card's mixer
#[derive(Debug)]
pub enum Error {
    /// The ALSA library refused an open, read or write
    Alsa(alsa::Error),
    /// The element does not expose the volume or switch a control needs
    Unsupported(String),
    /// The element id no longer resolves on the mixer
    ElementGone(String),
}

impl From<alsa::Error> for Error {
    fn from(e: alsa::Error) -> Self {
        Self::Alsa(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alsa(e) => write!(f, "alsa: {}", e),
            Self::Unsupported(name) => {
                write!(f, "no idea what to do for mixer element \"{}\"", name)
            }
            Self::ElementGone(name) => write!(f, "mixer element \"{}\" has gone away", name),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// No home directory to put the configuration in
    NoHome,
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "settings i/o: {}", e),
            Self::Json(e) => write!(f, "settings json: {}", e),
            Self::NoHome => write!(f, "could not determine a configuration directory"),
        }
    }
}

impl std::error::Error for SettingsError {}
