use std::fmt;
use std::ops::Deref;

use toml::Value;

use crate::context::BindContext;
use crate::schema::SchemaError;

/// An ordered sequence of lines that prints as one newline-joined block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultilineString(Vec<String>);

impl MultilineString {
    /// Builds from lines given in order.
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(lines.into_iter().map(Into::into).collect())
    }

    /// The lines, without separators.
    pub fn lines(&self) -> &[String] {
        &self.0
    }

    /// Element transform: a sequence of lines, or one string split on newlines.
    pub fn from_value(raw: &Value, _: &BindContext<'_>) -> Result<Self, SchemaError> {
        match raw {
            Value::String(s) => Ok(Self::new(s.lines())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        SchemaError::InvalidValue(format!(
                            "expected a line of text, found {}",
                            item.type_str()
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self),
            other => Err(SchemaError::InvalidValue(format!(
                "expected a sequence of lines, found {}",
                other.type_str()
            ))),
        }
    }
}

impl Deref for MultilineString {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for MultilineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("\n"))
    }
}
