// src/core/config_loader.rs

//! # Config Loader
//!
//! Declares a command tree in TOML instead of builder calls. A file looks like:
//!
//! ```toml
//! version = "1.0.0"
//! help = "@docs/help.txt"
//! arguments = ["string"]
//!
//! [[options]]
//! names = ["-t", "--tab"]
//! type = "number"
//!
//! [[actions]]
//! params = ["$1"]
//! print = "opening {$1} with tab={tab}"
//!
//! [[commands]]
//! names = ["start", "/^run\\d+$/"]
//! ```
//!
//! Names wrapped in slashes are regular expressions. Each `[[actions]]` entry prints its
//! `print` template through the command's logger; `{name}` placeholders are filled from
//! the injected parameters.

use crate::{
    core::{
        action::{Action, Injected, Required},
        command::{Command, CommandName},
        types::Type,
    },
    models::{Flow, Value},
};
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::{fs, path::Path};

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\{([^{}\s]+)\}").expect("valid placeholder pattern");
}

/// One node of a declared command tree.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    #[serde(default)]
    pub names: Vec<String>,
    pub version: Option<String>,
    pub help: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeConfig>,
    #[serde(default)]
    pub options: Vec<OptionConfig>,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
    #[serde(default)]
    pub commands: Vec<TreeConfig>,
}

/// A custom named type.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TypeConfig {
    pub name: String,
    pub pattern: Option<String>,
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub greedy: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<DefaultValue> for Value {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Bool(b) => Self::Bool(b),
            DefaultValue::Number(n) => Self::Number(n),
            DefaultValue::Text(s) => Self::Str(s),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct OptionConfig {
    pub names: Vec<String>,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
}

fn default_type() -> String {
    crate::constants::TYPE_STRING.to_string()
}

/// `required = "*"`, `required = false`, or `required = ["a", "b"]`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RequiredConfig {
    Flag(bool),
    Name(String),
    Names(Vec<String>),
}

impl RequiredConfig {
    fn resolve(&self) -> Required {
        match self {
            Self::Flag(true) => Required::Any,
            Self::Flag(false) => Required::Nothing,
            Self::Name(name) if name == "*" => Required::Any,
            Self::Name(name) => Required::Names(vec![name.clone()]),
            Self::Names(names) => Required::Names(names.clone()),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ActionConfig {
    /// Parameters the action needs; also its requirement when `required` is omitted.
    #[serde(default)]
    pub params: Vec<String>,
    pub required: Option<RequiredConfig>,
    pub print: Option<String>,
    /// Stop dispatch after this action.
    #[serde(default)]
    pub stop: bool,
}

/// Reads and deserializes a tree file.
pub fn read_config(path: &Path) -> Result<TreeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read command tree file '{}'", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse command tree file '{}'", path.display()))
}

/// Reads `path` and builds a fresh tree from it, printing to the console.
pub fn load_tree(path: &Path) -> Result<Command> {
    build_tree(&read_config(path)?)
}

/// Builds a fresh root command from `config`.
pub fn build_tree(config: &TreeConfig) -> Result<Command> {
    let root = Command::named(parse_names(&config.names)?);
    apply(&root, config)?;
    Ok(root)
}

/// Declares everything in `config` on an existing command. Configure its logger and error
/// sink first: sub-commands copy them when they are created here.
pub fn apply(cmd: &Command, config: &TreeConfig) -> Result<()> {
    for kind in &config.types {
        cmd.register_type(build_type(kind)?);
    }
    for option in &config.options {
        cmd.option(option.names.iter().cloned(), option.kind.as_str());
    }
    if !config.arguments.is_empty() {
        cmd.arguments(config.arguments.iter().map(String::as_str));
    }
    if let Some(version) = &config.version {
        cmd.version(version.as_str());
    }
    if let Some(help) = &config.help {
        cmd.help(help.as_str());
    }
    for action in &config.actions {
        cmd.action(build_action(action));
    }
    for sub in &config.commands {
        let names = parse_names(&sub.names)?;
        log::debug!("Declaring sub-command {:?}", sub.names);
        let child = cmd.command(names);
        apply(&child, sub)?;
    }
    Ok(())
}

fn parse_names(names: &[String]) -> Result<Vec<CommandName>> {
    names
        .iter()
        .map(|name| {
            match name
                .strip_prefix('/')
                .and_then(|rest| rest.strip_suffix('/'))
            {
                Some(pattern) => Regex::new(pattern)
                    .map(CommandName::Pattern)
                    .with_context(|| format!("Invalid command name pattern '{}'", name)),
                None => Ok(CommandName::Exact(name.clone())),
            }
        })
        .collect()
}

fn build_type(config: &TypeConfig) -> Result<Type> {
    let mut kind = Type::new(config.name.as_str()).greedy(config.greedy);
    if let Some(pattern) = &config.pattern {
        let re = Regex::new(pattern)
            .with_context(|| format!("Invalid pattern for type '{}'", config.name))?;
        kind = kind.pattern(re);
    }
    if let Some(default) = &config.default {
        kind = kind.with_default(default.clone());
    }
    Ok(kind)
}

fn build_action(config: &ActionConfig) -> Action {
    let template = config.print.clone().unwrap_or_default();
    let flow = if config.stop { Flow::Stop } else { Flow::Continue };
    let required = config
        .required
        .as_ref()
        .map_or_else(|| Required::Names(config.params.clone()), RequiredConfig::resolve);

    // Inject what the template mentions, plus the command to print through.
    let mut params: Vec<String> = config.params.clone();
    for caps in PLACEHOLDER_RE.captures_iter(&template) {
        if let Some(name) = caps.get(1) {
            params.push(name.as_str().to_string());
        }
    }
    params.push("self".to_string());
    let params: Vec<&str> = params.iter().map(String::as_str).collect();

    Action::new(&params, move |args| {
        if !template.is_empty() {
            let line = render(&template, &args);
            match args.command() {
                Some(cmd) => cmd.log(&line),
                None => log::warn!("No command injected; dropping output '{}'", line),
            }
        }
        Ok(flow)
    })
    .required(required)
}

/// Replaces `{name}` with the injected value of `name`; absent values render empty.
pub fn render(template: &str, args: &Injected) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            caps.get(1)
                .and_then(|name| args.get(name.as_str()))
                .map(ToString::to_string)
                .unwrap_or_default()
        })
        .into_owned()
}
