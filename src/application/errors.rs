//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors raised while wiring commands and listeners.
///
/// Both variants are programmer errors surfaced synchronously to the caller.
/// Messages that fail a dispatch check are never reported through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Command {0} already exists.")]
    DuplicateCommand(String),

    #[error("attempted to add unknown listener \"{0}\"")]
    UnknownEventKind(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_errors_name_the_offender() {
        assert_eq!(
            DispatchError::DuplicateCommand("ping".into()).to_string(),
            "Command ping already exists."
        );
        assert_eq!(
            DispatchError::UnknownEventKind("typingStart".into()).to_string(),
            "attempted to add unknown listener \"typingStart\""
        );
    }

    #[test]
    fn dispatch_error_converts_into_bot_error() {
        let err: BotError = DispatchError::DuplicateCommand("ban".into()).into();
        assert!(matches!(err, BotError::Dispatch(DispatchError::DuplicateCommand(_))));
    }
}
