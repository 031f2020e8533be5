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

//! Typed key/value option storage.
//!
//! An [`OptionsRegistry`] is parameterized by a caller-supplied key
//! enumeration, so unrelated option sets live in isolated instances and
//! their ordinals can never collide. Values are [`OptionValue`] variants;
//! a read that asks for a type other than the stored one reports the
//! mismatch and hands back the caller's default instead of failing.

use std::collections::HashMap;
use std::marker::PhantomData;

/// A tagged value holding exactly one of the supported option types.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A text value.
    Text(String),
}

impl OptionValue {
    /// Returns a short name for the active variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::Text(_) => "text",
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Text(v)
    }
}

/// Contract for enumerations used as option keys.
///
/// The ordinal is the storage key, so it must be stable for the lifetime of
/// the registry. Deriving it from a field-less enum discriminant (`self as
/// u32`) is the expected implementation.
pub trait OptionKey: Copy + std::fmt::Debug {
    /// Returns the integral ordinal identifying this key.
    fn ordinal(self) -> u32;
}

/// Extraction of a concrete Rust type out of an [`OptionValue`].
///
/// Implemented for the four supported value types; [`OptionsRegistry::get`]
/// uses it to keep typed reads total (mismatch falls back to the default).
pub trait FromOptionValue: Sized {
    /// Returns the contained value if the active variant matches `Self`.
    fn from_value(value: &OptionValue) -> Option<Self>;
}

impl FromOptionValue for bool {
    fn from_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromOptionValue for i64 {
    fn from_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromOptionValue for f64 {
    fn from_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromOptionValue for String {
    fn from_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Variant value storage keyed by a caller enumeration.
///
/// Not internally synchronized; the composition root decides which thread
/// writes and adds a lock only where the registry is genuinely shared.
#[derive(Debug)]
pub struct OptionsRegistry<K: OptionKey> {
    values: HashMap<u32, OptionValue>,
    _key: PhantomData<K>,
}

impl<K: OptionKey> OptionsRegistry<K> {
    /// Creates an empty registry for the key enumeration `K`.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            _key: PhantomData,
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: K, value: impl Into<OptionValue>) {
        self.values.insert(key.ordinal(), value.into());
    }

    /// Returns the value stored under `key` as `T`, or `default`.
    ///
    /// Both an absent key and a stored variant of a different type resolve
    /// to `default`; the type mismatch is reported via `log::warn!` but is
    /// never an error.
    pub fn get<T: FromOptionValue>(&self, key: K, default: T) -> T {
        match self.values.get(&key.ordinal()) {
            Some(value) => match T::from_value(value) {
                Some(v) => v,
                None => {
                    log::warn!(
                        "Option {key:?} holds a {} value; requested type differs. Using default.",
                        value.type_name()
                    );
                    default
                }
            },
            None => default,
        }
    }

    /// Returns the raw stored value for `key`, if any.
    pub fn get_raw(&self, key: K) -> Option<&OptionValue> {
        self.values.get(&key.ordinal())
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains(&self, key: K) -> bool {
        self.values.contains_key(&key.ordinal())
    }

    /// Removes the value stored under `key`, returning it if present.
    pub fn remove(&mut self, key: K) -> Option<OptionValue> {
        self.values.remove(&key.ordinal())
    }

    /// Returns the number of stored options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no options are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: OptionKey> Default for OptionsRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
