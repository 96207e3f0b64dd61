// src/core/argument.rs

use crate::core::types::Type;
use std::sync::Arc;

/// A type bound to a positional slot.
#[derive(Debug, Clone)]
pub struct Argument {
    kind: Arc<Type>,
}

impl Argument {
    pub fn new(kind: Arc<Type>) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &Type {
        &self.kind
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.kind.accepts(Some(value))
    }
}

/// Declared positional types; slot `i` validates the i-th positional value.
#[derive(Debug, Clone, Default)]
pub struct ArgumentList {
    items: Vec<Argument>,
}

impl ArgumentList {
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Argument> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
