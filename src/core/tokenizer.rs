// src/core/tokenizer.rs

//! Splits raw strings into a typed token stream and expands short-option clusters.

use crate::{
    constants::OPTION_PATTERN,
    core::option::OptionList,
    models::Token,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref OPTION_RE: Regex = Regex::new(OPTION_PATTERN).expect("valid option pattern");
}

/// Whether a raw string starts with one or more dashes.
pub fn looks_like_option(raw: &str) -> bool {
    OPTION_RE.is_match(raw)
}

/// Strips the leading dashes of an option name: `--tab` -> `tab`.
/// Strings that don't look like options are returned unchanged.
pub fn trim_option_name(name: &str) -> &str {
    OPTION_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map_or(name, |m| m.as_str())
}

/// Classifies each raw string independently.
///
/// - no leading dash: one `Normal` token
/// - leading dash with `=`: split at the first `=` into `OptionName` + `OptionValue`
/// - leading dash otherwise: one `OptionName` token
pub fn tokenize<S: AsRef<str>>(raw: &[S]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(raw.len());
    for item in raw {
        let item = item.as_ref();
        if !looks_like_option(item) {
            tokens.push(Token::normal(item));
            continue;
        }
        match item.split_once('=') {
            Some((name, value)) => {
                tokens.push(Token::option_name(name));
                tokens.push(Token::option_value(value));
            }
            None => tokens.push(Token::option_name(item)),
        }
    }
    tokens
}

/// Replaces `-xyz` with `-x -y -z` when `-xyz` itself is not registered, the cluster has
/// at least two distinct characters, and every `-<char>` is a registered option.
/// Anything else is left untouched so it fails later as an invalid option.
pub fn expand_short_options(tokens: Vec<Token>, options: &OptionList) -> Vec<Token> {
    let mut expanded = Vec::with_capacity(tokens.len());
    for token in tokens {
        match split_cluster(&token, options) {
            Some(names) => {
                log::debug!("Expanded short option cluster '{}' into {:?}", token.value, names);
                expanded.extend(names.into_iter().map(Token::option_name));
            }
            None => expanded.push(token),
        }
    }
    expanded
}

fn split_cluster(token: &Token, options: &OptionList) -> Option<Vec<String>> {
    if !token.is_option_name() || options.get(&token.value).is_some() {
        return None;
    }
    let cluster = trim_option_name(&token.value);
    let chars: Vec<char> = cluster.chars().collect();
    if chars.len() < 2 {
        return None;
    }
    let unique: HashSet<char> = chars.iter().copied().collect();
    if unique.len() != chars.len() {
        return None;
    }
    let names: Vec<String> = chars.iter().map(|c| format!("-{c}")).collect();
    names
        .iter()
        .all(|name| options.get(name).is_some())
        .then_some(names)
}
