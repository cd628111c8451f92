use crate::log::{Error, ErrorKind};
use serde::Serialize;
use serde_json::{to_value, Value};
use std::{collections::HashMap, fmt::Display};

/// Provides storage for data that templates can be rendered against.
///
/// Values of any serializable type may be inserted, and are stored as
/// [`Value`] instances. Templates address them with dotted identifiers
/// such as `person.name`, where every segment but the last must resolve
/// to an object.
pub struct Store {
    data: HashMap<String, Value>,
}

impl Store {
    /// Create a new [`Store`].
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert the value into the [`Store`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the serialization fails.
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize + Display,
    {
        let key = key.into();
        let serialized = to_value(&value).map_err(|_| {
            Error::build(
                ErrorKind::Type {
                    identifier: key.clone(),
                },
                format!("value `{value}` is unserializable"),
            )
        })?;

        self.data.insert(key, serialized);
        Ok(())
    }

    /// Insert the value into the [`Store`].
    ///
    /// # Panics
    ///
    /// Will panic if the serialization fails.
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Serialize,
    {
        self.data.insert(key.into(), to_value(value).unwrap());
    }

    /// Insert the value into the [`Store`].
    ///
    /// Returns the [`Store`], so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the serialization fails.
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize + Display,
    {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Insert the value into the [`Store`].
    ///
    /// Returns the [`Store`], so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Will panic if the serialization fails.
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert_must(key, value);
        self
    }

    /// Get the value of the given top-level key, if any.
    #[inline]
    pub fn get(&self, index: &str) -> Option<&Value> {
        self.data.get(index)
    }

    /// Resolve a dotted identifier path against the [`Store`].
    ///
    /// The path is split on `.` and each segment descends one object
    /// level. Returns `None` when any segment is absent, when a value
    /// other than an object is found before the final segment, or when
    /// the resolved value is null.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.data.get(segments.next()?)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        match current {
            Value::Null => None,
            found => Some(found),
        }
    }

    /// Bind an already-serialized [`Value`] to a top-level key.
    ///
    /// Used by the renderer to rebind loop variables; the binding
    /// remains after the render call.
    pub(crate) fn bind(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
