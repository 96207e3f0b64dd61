// src/core/action.rs

use crate::{
    core::{command::Command, params::ParsedState},
    models::{Flow, Value},
};
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// What a handler hands back to the dispatcher.
pub type HandlerResult = anyhow::Result<Flow>;

/// A boxed, sendable future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type SyncHandler = Arc<dyn Fn(Injected) -> HandlerResult + Send + Sync>;
type AsyncHandler = Arc<dyn Fn(Injected) -> BoxFuture<HandlerResult> + Send + Sync>;

/// When an action is eligible to run. Resolved once, at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Required {
    /// Always eligible.
    Any,
    /// Eligible only when no positionals and no options were parsed.
    Nothing,
    /// Eligible when every listed parameter is present.
    Names(Vec<String>),
}

impl Required {
    pub fn names(names: &[&str]) -> Self {
        Self::Names(names.iter().map(|name| (*name).to_string()).collect())
    }

    pub fn is_met(&self, state: &ParsedState) -> bool {
        match self {
            Self::Any => true,
            Self::Nothing => state.argc() == 0 && state.options().is_empty(),
            Self::Names(names) => names.iter().all(|name| state.has(name)),
        }
    }
}

/// The callable part of an action.
#[derive(Clone)]
pub enum Handler {
    Sync(SyncHandler),
    Async(AsyncHandler),
    /// Print a (string-or-file) text through the command's logger, then stop.
    Text(String),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Handler::Sync(..)"),
            Self::Async(_) => f.write_str("Handler::Async(..)"),
            Self::Text(text) => f.debug_tuple("Handler::Text").field(text).finish(),
        }
    }
}

/// A handler, the parameter names it wants injected, and its eligibility rule.
#[derive(Debug, Clone)]
pub struct Action {
    params: Vec<String>,
    required: Required,
    handler: Handler,
}

impl Action {
    /// A synchronous action. Unless overridden with [`Action::required`], it is eligible
    /// when every name in `params` is present.
    pub fn new<F>(params: &[&str], handler: F) -> Self
    where
        F: Fn(Injected) -> HandlerResult + Send + Sync + 'static,
    {
        Self::with_handler(params, Handler::Sync(Arc::new(handler)))
    }

    /// An asynchronous action; dispatch awaits it before moving on.
    pub fn new_async<F, Fut>(params: &[&str], handler: F) -> Self
    where
        F: Fn(Injected) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let boxed: AsyncHandler =
            Arc::new(move |args: Injected| -> BoxFuture<HandlerResult> { Box::pin(handler(args)) });
        Self::with_handler(params, Handler::Async(boxed))
    }

    /// Prints `text` and stops dispatch. Always eligible unless overridden.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            params: Vec::new(),
            required: Required::Any,
            handler: Handler::Text(text.into()),
        }
    }

    fn with_handler(params: &[&str], handler: Handler) -> Self {
        let params: Vec<String> = params.iter().map(|name| (*name).to_string()).collect();
        Self {
            required: Required::Names(params.clone()),
            params,
            handler,
        }
    }

    pub fn required(mut self, required: Required) -> Self {
        self.required = required;
        self
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn requirement(&self) -> &Required {
        &self.required
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn is_eligible(&self, state: &ParsedState) -> bool {
        self.required.is_met(state)
    }
}

/// The values injected into a handler, in the order of its declared parameter names.
/// A name with no value in the parameter map is injected as `None`.
#[derive(Debug, Clone, Default)]
pub struct Injected {
    entries: Vec<(String, Option<Value>)>,
}

impl Injected {
    pub fn new(entries: Vec<(String, Option<Value>)>) -> Self {
        Self { entries }
    }

    /// Value by declared name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(declared, _)| declared == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Value by declared position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).and_then(|(_, value)| value.as_ref())
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The injected `self` (or `$self`/`$this`), if one was declared.
    pub fn command(&self) -> Option<&Command> {
        self.entries
            .iter()
            .find_map(|(_, value)| value.as_ref().and_then(Value::as_command))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }
}
