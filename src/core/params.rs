// src/core/params.rs

//! The per-parse state of a command: its label, positionals, options, and the
//! parameter map handlers are injected from.

use crate::{
    constants::{ARGC_KEYS, ARGV_KEYS, COMMAND_KEYS, MAX_POSITIONAL_PADDING, SELF_KEYS},
    core::tokenizer::trim_option_name,
    models::Value,
};
use indexmap::IndexMap;

/// Whether `key` is one of the reserved parameter names (`command`, `argv`, `self`, ...).
pub fn is_reserved(key: &str) -> bool {
    COMMAND_KEYS
        .iter()
        .chain(SELF_KEYS)
        .chain(ARGV_KEYS)
        .chain(ARGC_KEYS)
        .any(|reserved| *reserved == key)
}

/// Parsed state held on the command that performed the parse.
///
/// `params` is the live view: `set` keeps it consistent with `argv` and `options`.
/// The `self` keys are not stored; the owning command answers them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedState {
    parsed: bool,
    name: Option<String>,
    argv: Vec<Value>,
    options: IndexMap<String, Value>,
    params: IndexMap<String, Value>,
}

impl ParsedState {
    /// Builds the parameter map. Reserved keys are written first and never overwritten
    /// by an option of the same name.
    pub fn assemble(name: String, argv: Vec<Value>, options: IndexMap<String, Value>) -> Self {
        let mut state = Self {
            parsed: true,
            name: Some(name.clone()),
            argv,
            options,
            params: IndexMap::new(),
        };
        for key in COMMAND_KEYS {
            state.params.insert((*key).to_string(), Value::Str(name.clone()));
        }
        state.refresh_positionals();
        for (key, value) in &state.options {
            if is_reserved(key) {
                log::debug!("Option '{}' shadows a reserved parameter and is not injectable", key);
                continue;
            }
            state
                .params
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        state
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn argv(&self) -> &[Value] {
        &self.argv
    }

    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    pub fn options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }

    /// Leading dashes are ignored: `has("--tab")` is `has("tab")`.
    pub fn has(&self, name: &str) -> bool {
        let key = trim_option_name(name);
        if SELF_KEYS.contains(&key) {
            return self.parsed;
        }
        self.params.contains_key(key)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(trim_option_name(name))
    }

    /// Writes a parameter through to the view it belongs to.
    ///
    /// `$N` (1-indexed) replaces a positional, padding with empty strings when `N` is past
    /// the end; a slot more than `MAX_POSITIONAL_PADDING` past the end is refused. Other
    /// `$` names and reserved names only touch the parameter map. Anything else is an
    /// option and is written under every alias in `aliases` as well.
    pub fn set(&mut self, name: &str, value: Value, aliases: &[String]) {
        let key = trim_option_name(name);
        if let Some(slot) = positional_slot(key) {
            if slot - self.argv.len().min(slot) > MAX_POSITIONAL_PADDING {
                log::warn!(
                    "Refusing to set '{}': {} positional(s) parsed, at most {} may be padded",
                    key,
                    self.argv.len(),
                    MAX_POSITIONAL_PADDING
                );
                return;
            }
            if self.argv.len() <= slot {
                self.argv.resize(slot + 1, Value::Str(String::new()));
            }
            if let Some(current) = self.argv.get_mut(slot) {
                *current = value;
            }
            self.refresh_positionals();
            return;
        }
        if is_reserved(key) || key.starts_with('$') {
            self.params.insert(key.to_string(), value);
            return;
        }
        let mut keys: Vec<&str> = vec![key];
        keys.extend(aliases.iter().map(|alias| trim_option_name(alias)));
        for alias in keys {
            self.options.insert(alias.to_string(), value.clone());
            self.params.insert(alias.to_string(), value.clone());
        }
    }

    fn refresh_positionals(&mut self) {
        let list = Value::List(self.argv.clone());
        for key in ARGV_KEYS {
            self.params.insert((*key).to_string(), list.clone());
        }
        let count = Value::Number(self.argv.len() as f64);
        for key in ARGC_KEYS {
            self.params.insert((*key).to_string(), count.clone());
        }
        for (index, value) in self.argv.iter().enumerate() {
            self.params.insert(format!("${}", index + 1), value.clone());
        }
    }
}

/// `$3` -> `Some(2)`. `$0` and non-numeric names are not positional slots.
fn positional_slot(key: &str) -> Option<usize> {
    key.strip_prefix('$')
        .and_then(|rest| rest.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
}
