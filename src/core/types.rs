// src/core/types.rs

//! Named value kinds that options and positional arguments are validated against.

use crate::{
    constants::{TYPE_BOOLEAN, TYPE_GREEDY_STRING, TYPE_NUMBER, TYPE_STRING, TYPE_SWITCH},
    models::Value,
};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::{fmt, sync::Arc};

lazy_static! {
    static ref ANY_RE: Regex = Regex::new(r"^[\s\S]*$").expect("valid built-in pattern");
    static ref NUMBER_RE: Regex = Regex::new(r"^[0-9]*$").expect("valid built-in pattern");
    static ref BOOLEAN_RE: Regex =
        Regex::new(r"(?i)^(1|0|true|false|yes|no)$").expect("valid built-in pattern");
    static ref SWITCH_RE: Regex = Regex::new(r"^$").expect("valid built-in pattern");
    static ref BUILTIN_TYPES: TypeRegistry = TypeRegistry::with_builtins();
}

/// Turns an accepted raw string into its typed value.
pub type Converter = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// A value kind: what raw strings it accepts, what it defaults to, and how it converts.
///
/// Types are immutable once built and shared by `Arc` between every option and
/// argument that uses them.
#[derive(Clone)]
pub struct Type {
    name: String,
    pattern: Regex,
    default: Value,
    convert: Converter,
    greedy: bool,
}

impl Type {
    /// A string-like type: accepts anything, defaults to `""`, converts by identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: ANY_RE.clone(),
            default: Value::Str(String::new()),
            convert: Arc::new(|raw| Value::Str(raw.to_string())),
            greedy: false,
        }
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    pub fn converter<F>(mut self, convert: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.convert = Arc::new(convert);
        self
    }

    pub fn greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    /// Pure predicate. An absent candidate never matches, which forces the default.
    pub fn accepts(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|raw| self.pattern.is_match(raw))
    }

    pub fn convert(&self, raw: &str) -> Value {
        (self.convert)(raw)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("default", &self.default)
            .field("greedy", &self.greedy)
            .finish()
    }
}

/// How an option or argument names its type: by registry name, or with a type in hand.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    Named(String),
    Custom(Arc<Type>),
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for TypeSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Type> for TypeSpec {
    fn from(kind: Type) -> Self {
        Self::Custom(Arc::new(kind))
    }
}

impl From<Arc<Type>> for TypeSpec {
    fn from(kind: Arc<Type>) -> Self {
        Self::Custom(kind)
    }
}

/// A name-indexed collection of types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Arc<Type>>,
}

impl TypeRegistry {
    /// A registry holding `string`, `string*`, `number`, `boolean` and `switch`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.register(Type::new(TYPE_STRING));
        registry.register(Type::new(TYPE_GREEDY_STRING).greedy(true));
        registry.register(
            Type::new(TYPE_NUMBER)
                .pattern(NUMBER_RE.clone())
                .with_default(0)
                .converter(|raw| Value::Number(raw.parse::<f64>().unwrap_or(0.0))),
        );
        registry.register(
            Type::new(TYPE_BOOLEAN)
                .pattern(BOOLEAN_RE.clone())
                .with_default(true)
                .converter(|raw| {
                    let raw = raw.to_ascii_lowercase();
                    Value::Bool(matches!(raw.as_str(), "1" | "true" | "yes"))
                }),
        );
        registry.register(
            Type::new(TYPE_SWITCH)
                .pattern(SWITCH_RE.clone())
                .with_default(true)
                .converter(|_| Value::Bool(true)),
        );
        registry
    }

    /// The process-wide built-in registry.
    pub fn builtins() -> &'static Self {
        &BUILTIN_TYPES
    }

    /// Adds (or replaces) a type under its own name.
    pub fn register(&mut self, kind: Type) -> Arc<Type> {
        let kind = Arc::new(kind);
        self.types.insert(kind.name().to_string(), Arc::clone(&kind));
        kind
    }

    pub fn get(&self, name: &str) -> Option<Arc<Type>> {
        self.types.get(name).cloned()
    }

    /// Looks a name up here, then among the built-ins, then falls back to `string`.
    pub fn resolve(&self, name: &str) -> Arc<Type> {
        self.get(name)
            .or_else(|| BUILTIN_TYPES.get(name))
            .unwrap_or_else(string_type)
    }

    pub fn resolve_spec(&self, spec: &TypeSpec) -> Arc<Type> {
        match spec {
            TypeSpec::Named(name) => self.resolve(name),
            TypeSpec::Custom(kind) => Arc::clone(kind),
        }
    }
}

/// The fallback type for unknown names.
pub fn string_type() -> Arc<Type> {
    BUILTIN_TYPES
        .types
        .get(TYPE_STRING)
        .cloned()
        .unwrap_or_else(|| Arc::new(Type::new(TYPE_STRING)))
}
