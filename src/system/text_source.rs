// src/system/text_source.rs

use std::{borrow::Cow, fs};

/// Resolves help/version text. `@path` reads the file at `path`; if it can't be read
/// the original string, `@` included, is used as-is.
pub fn text_or_file(text: &str) -> Cow<'_, str> {
    let Some(path) = text.strip_prefix('@') else {
        return Cow::Borrowed(text);
    };
    match fs::read_to_string(path) {
        Ok(content) => Cow::Owned(content),
        Err(e) => {
            log::debug!("Could not read text file '{}': {}. Using the literal text.", path, e);
            Cow::Borrowed(text)
        }
    }
}
