// src/models.rs

use crate::core::command::Command;
use std::fmt;

// --- TOKENS ---

/// How a raw string was classified by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A plain word: a positional value or the command-name slot.
    Normal,
    /// A string with leading dashes, e.g. `-t` or `--tab`.
    OptionName,
    /// The right-hand side of `--name=value`. It is never re-read as an option name.
    OptionValue,
}

/// One classified unit of the raw argument sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(value: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn normal(value: impl Into<String>) -> Self {
        Self::new(value, TokenKind::Normal)
    }

    pub fn option_name(value: impl Into<String>) -> Self {
        Self::new(value, TokenKind::OptionName)
    }

    pub fn option_value(value: impl Into<String>) -> Self {
        Self::new(value, TokenKind::OptionValue)
    }

    pub fn is_option_name(&self) -> bool {
        self.kind == TokenKind::OptionName
    }
}

// --- VALUES ---

/// A converted option value, positional, or reserved parameter.
#[derive(Clone)]
pub enum Value {
    Str(String),
    Number(f64),
    Bool(bool),
    /// The positional list (`argv`).
    List(Vec<Value>),
    /// The command node that produced the parameters (`self`).
    Command(Command),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Command(a), Self::Command(b)) => a.same_node(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Command(cmd) => write!(f, "{cmd:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(" "))
            }
            Self::Command(cmd) => f.write_str(&cmd.name().unwrap_or_default()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

// --- DISPATCH FLOW ---

/// What a handler asks the dispatcher to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Let the next eligible action run.
    #[default]
    Continue,
    /// Skip every remaining action for this parse.
    Stop,
}
