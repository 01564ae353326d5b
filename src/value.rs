// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::any::type_name;
use std::fmt;
use std::slice;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Separator used when the stored strings are presented as a single text.
pub const VALUE_SEPARATOR: &str = "\n";

/// The raw strings recorded for an option (or for the positional
/// arguments), in command line order.
///
/// Values are always recorded as strings. Use [Value::as_type()] and
/// friends to convert them.
///
/// # Example
///
/// ```rust
/// use usageopt::Value;
///
/// let mut value = Value::new();
/// value.add("3");
///
/// assert_eq!(value.as_type::<u32>().unwrap(), 3);
/// assert_eq!(value.value_or(7.5f64), 3.0);
///
/// value.add("4");
/// assert_eq!(value.as_vec::<u32>().unwrap(), vec![3, 4]);
/// assert_eq!(value.text(), "3\n4");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Value {
    items: Vec<String>,
}

impl Value {
    /// Create a new empty value.
    pub fn new() -> Self {
        Value::default()
    }

    /// Record another string.
    pub fn add(&mut self, value: &str) {
        self.items.push(value.into());
    }

    /// Returns the number of strings recorded.
    ///
    /// For a flag option, this is the number of times the option was
    /// specified (`-v -v -v` gives 3).
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if at least one string has been recorded.
    pub fn is_set(&self) -> bool {
        !self.items.is_empty()
    }

    /// All recorded strings joined with [VALUE_SEPARATOR].
    pub fn text(&self) -> String {
        self.items.join(VALUE_SEPARATOR)
    }

    /// The recorded strings.
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Iterate over the recorded strings.
    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.items.iter()
    }

    /// Interpret the value as type `T`.
    ///
    /// All recorded strings are converted as a single text (see
    /// [Value::text()]), so this only succeeds for an option specified
    /// more than once if `T` can represent the joined text (for example
    /// [String]).
    ///
    /// # Errors
    ///
    /// - [Error::NullValue] if nothing was recorded.
    /// - [Error::InvalidConversion] if the text is not a valid `T`.
    pub fn as_type<T>(&self) -> Result<T>
    where
        T: FromStr,
    {
        if !self.is_set() {
            return Err(Error::NullValue);
        }

        convert(&self.text())
    }

    /// Interpret each recorded string as type `T`.
    ///
    /// # Errors
    ///
    /// - [Error::NullValue] if nothing was recorded.
    /// - [Error::InvalidConversion] if any string is not a valid `T`.
    pub fn as_vec<T>(&self) -> Result<Vec<T>>
    where
        T: FromStr,
    {
        if !self.is_set() {
            return Err(Error::NullValue);
        }

        self.items.iter().map(|s| convert(s)).collect()
    }

    /// Short hand for `as_type::<String>()`.
    pub fn str(&self) -> Result<String> {
        self.as_type()
    }

    /// Interpret the value as type `T`, or return `default` if nothing was
    /// recorded or the conversion fails.
    pub fn value_or<T>(&self, default: T) -> T
    where
        T: FromStr,
    {
        self.as_type().unwrap_or(default)
    }
}

fn convert<T>(text: &str) -> Result<T>
where
    T: FromStr,
{
    text.parse::<T>().map_err(|_| Error::InvalidConversion {
        value: text.into(),
        type_name: type_name::<T>(),
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        let mut v = Value::new();
        v.add(value);
        v
    }
}

impl<'a> IntoIterator for &'a Value {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
