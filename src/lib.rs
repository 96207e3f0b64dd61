//! Declarative command-line parsing: a tree of commands with typed options, typed
//! positionals and actions selected by the parameters they need.

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;

pub use crate::core::{
    action::{Action, Handler, HandlerResult, Injected, Required},
    command::{Command, CommandName},
    error::CmdError,
    types::{Type, TypeRegistry, TypeSpec},
};
pub use crate::models::{Flow, Token, TokenKind, Value};
pub use crate::system::logger::{ConsoleLogger, Logger, MemoryLogger};
