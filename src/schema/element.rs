//! Declarative binding of document paths onto record fields.
//!
//! A record type describes itself as an ordered list of [`Element`]s. Each
//! element names an attribute, the path leading to its raw value in the
//! document and, optionally, a transform applied before assignment. A
//! single generic [`bind`] walks that list once and fills in the record's
//! fields struct.

use std::fmt;

use toml::{Table, Value};
use tracing::trace;

use super::SchemaError;
use crate::context::BindContext;

/// Converts a raw document value into the attribute's bound type.
pub type Transform<T> = fn(&Value, &BindContext<'_>) -> Result<T, SchemaError>;

type Apply<F> = Box<dyn Fn(&mut F, &Value, &BindContext<'_>) -> Result<(), SchemaError>>;

/// One `(attribute, path, transform)` entry of a record's descriptor list.
pub struct Element<F> {
    name: &'static str,
    path: &'static [&'static str],
    transformed: bool,
    required: bool,
    apply: Apply<F>,
}

impl<F: 'static> Element<F> {
    /// Assigns the raw value found at `path` unchanged.
    pub fn verbatim(
        name: &'static str,
        path: &'static [&'static str],
        set: fn(&mut F, Value),
    ) -> Self {
        Self::new(
            name,
            path,
            false,
            apply(move |fields, raw, _| {
                set(fields, raw.clone());
                Ok(())
            }),
        )
    }

    /// Assigns a scalar value as text.
    ///
    /// Strings are taken as they are; numbers, booleans and datetimes are
    /// rendered. Tables and arrays are rejected.
    pub fn text(
        name: &'static str,
        path: &'static [&'static str],
        set: fn(&mut F, String),
    ) -> Self {
        Self::new(
            name,
            path,
            false,
            apply(move |fields, raw, _| {
                set(fields, scalar_text(raw)?);
                Ok(())
            }),
        )
    }

    /// Passes the raw value through `transform` before assigning it.
    pub fn transformed<T: 'static>(
        name: &'static str,
        path: &'static [&'static str],
        transform: Transform<T>,
        set: fn(&mut F, T),
    ) -> Self {
        Self::new(
            name,
            path,
            true,
            apply(move |fields, raw, ctx| {
                set(fields, transform(raw, ctx)?);
                Ok(())
            }),
        )
    }

    fn new(
        name: &'static str,
        path: &'static [&'static str],
        transformed: bool,
        apply: Apply<F>,
    ) -> Self {
        debug_assert!(!path.is_empty(), "element '{name}' has an empty path");
        Self {
            name,
            path,
            transformed,
            required: false,
            apply,
        }
    }
}

impl<F> Element<F> {
    /// Marks the element as required: a missing value fails the binding.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attribute name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key path from the document root.
    pub fn path(&self) -> &'static [&'static str] {
        self.path
    }

    /// Whether the raw value goes through a transform.
    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    /// Whether a missing value fails the binding.
    pub fn is_required(&self) -> bool {
        self.required
    }

    fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    /// Attaches this element's context to a failure.
    ///
    /// `DefaultKeyMissing` already names the malformed collection and is
    /// passed through as is.
    fn invalid(&self, error: SchemaError) -> SchemaError {
        match error {
            SchemaError::DefaultKeyMissing => error,
            source => SchemaError::SchemaElementInvalid {
                attribute: self.name,
                path: self.dotted_path(),
                source: Box::new(source),
            },
        }
    }
}

impl<F> fmt::Debug for Element<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("transformed", &self.transformed)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

fn apply<F, C>(closure: C) -> Apply<F>
where
    C: Fn(&mut F, &Value, &BindContext<'_>) -> Result<(), SchemaError> + 'static,
{
    Box::new(closure)
}

/// Walks `path` key by key from the document root.
///
/// Returns `None` when any key is absent or an intermediate value is not a
/// table.
pub fn lookup<'v>(root: &'v Table, path: &[&str]) -> Option<&'v Value> {
    let (first, rest) = path.split_first()?;
    let mut current = root.get(*first)?;

    for part in rest {
        current = current.as_table().and_then(|t| t.get(*part))?;
    }

    Some(current)
}

/// Populates a fresh `F` from `document`, one element at a time in list order.
pub fn bind<F: Default>(
    elements: &[Element<F>],
    document: &Table,
    ctx: &BindContext<'_>,
) -> Result<F, SchemaError> {
    debug_assert!(
        unique_names(elements),
        "descriptor list contains duplicate attribute names"
    );

    let mut fields = F::default();

    for element in elements {
        match lookup(document, element.path) {
            Some(raw) => {
                trace!(attribute = element.name, path = %element.dotted_path(), "binding element");
                (element.apply)(&mut fields, raw, ctx).map_err(|e| element.invalid(e))?;
            }
            None if element.required => {
                return Err(element.invalid(SchemaError::MissingValue));
            }
            None => {
                trace!(attribute = element.name, path = %element.dotted_path(), "element absent");
            }
        }
    }

    Ok(fields)
}

pub(crate) fn unique_names<F>(elements: &[Element<F>]) -> bool {
    let mut seen = std::collections::HashSet::new();
    elements.iter().all(|e| seen.insert(e.name))
}

fn scalar_text(value: &Value) -> Result<String, SchemaError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) | Value::Table(_) => Err(SchemaError::InvalidValue(format!(
            "expected a scalar, found {}",
            value.type_str()
        ))),
    }
}
