// src/core/option.rs

use crate::{core::types::Type, models::Value};
use std::sync::Arc;

/// A named flag with one or more aliases (`-t`, `--tab`) bound to a type.
#[derive(Debug, Clone)]
pub struct OptionDef {
    names: Vec<String>,
    kind: Arc<Type>,
}

impl OptionDef {
    pub fn new<I, S>(names: I, kind: Arc<Type>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn kind(&self) -> &Type {
        &self.kind
    }

    /// Exact alias match, dashes included.
    pub fn has(&self, name: &str) -> bool {
        self.names.iter().any(|alias| alias == name)
    }

    pub fn accepts(&self, candidate: Option<&str>) -> bool {
        self.kind.accepts(candidate)
    }

    pub fn convert(&self, raw: &str) -> Value {
        self.kind.convert(raw)
    }
}

/// The options declared on one command. An alias resolves to at most one option.
#[derive(Debug, Clone, Default)]
pub struct OptionList {
    items: Vec<OptionDef>,
}

impl OptionList {
    pub fn get(&self, name: &str) -> Option<&OptionDef> {
        self.items.iter().find(|option| option.has(name))
    }

    /// The first alias of `option` already claimed by a registered option.
    pub fn conflict<'a>(&self, option: &'a OptionDef) -> Option<&'a str> {
        option
            .names()
            .iter()
            .find(|name| self.get(name).is_some())
            .map(String::as_str)
    }

    pub fn push(&mut self, option: OptionDef) {
        self.items.push(option);
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDef> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
