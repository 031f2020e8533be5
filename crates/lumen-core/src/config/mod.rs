// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! File-backed, string-keyed configuration storage.
//!
//! The on-disk format is a small line-oriented text grammar:
//!
//! ```text
//! # comments run to the end of the line
//! Render {
//!     Width = 1280
//!     Scale = 1.5
//!     VSync = true
//! }
//! Title = "Lumen Sandbox"
//! ```
//!
//! Brace groups nest and prefix the keys they contain, joined with `.`, so
//! the example above produces `Render.Width`, `Render.Scale`,
//! `Render.VSync` and `Title`. Values are type-inferred in the order
//! bool → float → int → string; quotes wrapping a string are stripped.
//! Keys are case-sensitive and a duplicate key overwrites the earlier one.

use crate::options::OptionValue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// An error raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be opened or read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// The resolved path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A flat, string-keyed map of typed configuration values.
///
/// Not internally synchronized; load once from the composition root and
/// hand out reads. Reloading clears all prior state first, so a store never
/// mixes keys from two files.
#[derive(Debug, Default)]
pub struct ConfigStore {
    values: HashMap<String, OptionValue>,
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Loads `path`, replacing the store's contents.
    ///
    /// A relative path is resolved against the running executable's
    /// directory. On success returns the number of keys loaded; on an open
    /// failure the store is left empty and the error is returned for the
    /// caller to downgrade (see [`load_or_default`](Self::load_or_default)).
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, ConfigError> {
        self.values.clear();

        let resolved = resolve_path(path.as_ref());
        let text = std::fs::read_to_string(&resolved).map_err(|source| ConfigError::Io {
            path: resolved.clone(),
            source,
        })?;

        self.parse(&text);
        log::info!(
            "Loaded {} config key(s) from '{}'.",
            self.values.len(),
            resolved.display()
        );
        Ok(self.values.len())
    }

    /// Best-effort variant of [`load`](Self::load): an open failure is
    /// logged and leaves the store empty, so callers keep whatever defaults
    /// they apply on reads.
    pub fn load_or_default(&mut self, path: impl AsRef<Path>) {
        if let Err(e) = self.load(path) {
            log::warn!("Config unavailable, continuing with defaults: {e}");
        }
    }

    /// Parses `text` into the store without touching prior contents.
    ///
    /// Malformed lines and unbalanced braces are warned about and skipped;
    /// parsing never fails.
    pub fn parse(&mut self, text: &str) {
        let mut groups: Vec<String> = Vec::new();

        for (line_no, raw) in text.lines().enumerate() {
            let line = strip_comment(raw);
            self.parse_line(line.trim(), line_no + 1, &mut groups);
        }

        if !groups.is_empty() {
            log::warn!(
                "Config ended with {} unclosed group(s): '{}'.",
                groups.len(),
                groups.join(".")
            );
        }
    }

    fn parse_line(&mut self, line: &str, line_no: usize, groups: &mut Vec<String>) {
        if line.is_empty() {
            return;
        }

        // A closing brace may trail an assignment on the same line; peel
        // trailing braces off and apply them after the rest of the line.
        let mut closes = 0usize;
        let mut body = line;
        while let Some(rest) = body.strip_suffix('}') {
            closes += 1;
            body = rest.trim_end();
        }

        if !body.is_empty() {
            if let Some((name, remainder)) = body.split_once('{') {
                let name = name.trim();
                if name.is_empty() {
                    log::warn!("Config line {line_no}: group with no name, skipping.");
                } else {
                    groups.push(name.to_string());
                    // Allow `name { key = value` on a single line.
                    self.parse_line(remainder.trim(), line_no, groups);
                }
            } else if let Some((key, value)) = body.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    log::warn!("Config line {line_no}: assignment with no key, skipping.");
                } else {
                    let full_key = if groups.is_empty() {
                        key.to_string()
                    } else {
                        format!("{}.{}", groups.join("."), key)
                    };
                    // Last write wins on duplicate keys.
                    self.values.insert(full_key, infer_value(value.trim()));
                }
            } else {
                log::warn!("Config line {line_no}: not a group or assignment, skipping: '{body}'");
            }
        }

        for _ in 0..closes {
            if groups.pop().is_none() {
                log::warn!("Config line {line_no}: unmatched '}}', ignoring.");
            }
        }
    }

    /// Returns the raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Returns the bool stored under `key`, or `default` on a miss or a
    /// differently-typed value (reported, never fatal).
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(OptionValue::Bool(v)) => *v,
            Some(other) => {
                log::warn!(
                    "Config key '{key}' holds a {} value, expected bool. Using default.",
                    other.type_name()
                );
                default
            }
            None => default,
        }
    }

    /// Returns the integer stored under `key`, or `default`.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(OptionValue::Int(v)) => *v,
            Some(other) => {
                log::warn!(
                    "Config key '{key}' holds a {} value, expected int. Using default.",
                    other.type_name()
                );
                default
            }
            None => default,
        }
    }

    /// Returns the float stored under `key`, or `default`.
    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(OptionValue::Float(v)) => *v,
            Some(other) => {
                log::warn!(
                    "Config key '{key}' holds a {} value, expected float. Using default.",
                    other.type_name()
                );
                default
            }
            None => default,
        }
    }

    /// Returns the string stored under `key`, or `default`.
    pub fn get_str(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(OptionValue::Text(v)) => v.clone(),
            Some(other) => {
                log::warn!(
                    "Config key '{key}' holds a {} value, expected text. Using default.",
                    other.type_name()
                );
                default.to_string()
            }
            None => default.to_string(),
        }
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes every stored key.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Resolves a relative config path against the executable's directory.
fn resolve_path(path: &Path) -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => resolve_with_base(path, exe.parent()),
        Err(e) => {
            log::warn!("Could not determine executable path ({e}); using '{}' as-is.", path.display());
            path.to_path_buf()
        }
    }
}

/// Joins a relative `path` onto `base`; absolute paths pass through.
fn resolve_with_base(path: &Path, base: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match base {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

/// Strips a `#` comment, leaving quoted `#` characters alone.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => return &line[..i],
            None => {}
        }
    }
    line
}

/// Infers a value's type in the priority order bool → float → int → string.
fn infer_value(raw: &str) -> OptionValue {
    let lowered = raw.to_ascii_lowercase();
    match lowered.as_str() {
        "true" | "1" | "on" => return OptionValue::Bool(true),
        "false" | "0" | "off" => return OptionValue::Bool(false),
        _ => {}
    }

    let unsigned = raw
        .strip_prefix('+')
        .or_else(|| raw.strip_prefix('-'))
        .unwrap_or(raw);
    // Exactly one decimal point, everything else digits: a float. Bare
    // leading/trailing dots (".5", "5.") qualify; a lone "." fails the
    // parse below and lands as text.
    let dot_count = unsigned.matches('.').count();
    if dot_count == 1 && unsigned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        if let Ok(v) = raw.parse::<f64>() {
            return OptionValue::Float(v);
        }
    }

    if !unsigned.is_empty() && unsigned.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(v) = raw.parse::<i64>() {
            return OptionValue::Int(v);
        }
    }

    OptionValue::Text(strip_quotes(raw).to_string())
}

/// Strips one pair of matching wrapping quotes, if present.
fn strip_quotes(raw: &str) -> &str {
    for q in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(q) && raw.ends_with(q) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}
