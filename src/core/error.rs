// src/core/error.rs

use thiserror::Error;

/// Everything that can go wrong while parsing an argument sequence or dispatching its actions.
#[derive(Error, Debug)]
pub enum CmdError {
    /// `parse` was handed an empty sequence. A programming error, returned directly to the caller.
    #[error("Invalid arguments: command.parse")]
    InvalidArguments,
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The parse succeeded but no action was eligible and no help text is configured.
    #[error("No processing")]
    NoProcessing,
    /// An alias was registered for a second option on the same command.
    #[error("Repeated option: {0}")]
    RepeatedOption(String),
    /// A handler returned an error.
    #[error("Action failed: {0}")]
    Action(#[source] anyhow::Error),
}

impl CmdError {
    /// Whether this error came out of the parse phase (as opposed to dispatch or setup).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCommand(_) | Self::InvalidOption(_) | Self::InvalidArgument(_)
        )
    }
}
