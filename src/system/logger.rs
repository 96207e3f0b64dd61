// src/system/logger.rs

//! The output side of a command tree: a pluggable logger and the error sink.

use crate::core::error::CmdError;
use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

/// Where built-in actions print and where the default error sink reports.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes to stdout / stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Which stream a recorded line went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Log,
    Error,
}

/// Records every line in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    lines: Arc<Mutex<Vec<(Stream, String)>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.filtered(Stream::Log)
    }

    pub fn errors(&self) -> Vec<String> {
        self.filtered(Stream::Error)
    }

    fn filtered(&self, stream: Stream) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line)
            .collect()
    }

    fn push(&self, stream: Stream, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((stream, message.to_string()));
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        self.push(Stream::Log, message);
    }

    fn error(&self, message: &str) {
        self.push(Stream::Error, message);
    }
}

/// A user-supplied error callback.
pub type ErrorHandler = Arc<dyn Fn(&CmdError) + Send + Sync>;

/// Receives every parse and dispatch failure of a command.
#[derive(Clone, Default)]
pub enum ErrorSink {
    /// Print the message through the command's logger.
    #[default]
    Log,
    Custom(ErrorHandler),
}

impl ErrorSink {
    pub fn emit(&self, error: &CmdError, logger: &dyn Logger) {
        match self {
            Self::Log => logger.error(&error.to_string()),
            Self::Custom(handler) => handler(error),
        }
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log => f.write_str("ErrorSink::Log"),
            Self::Custom(_) => f.write_str("ErrorSink::Custom(..)"),
        }
    }
}
