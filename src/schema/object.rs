//! Records bound from versioned documents.

use std::fmt;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use super::element::{bind, lookup, Element};
use super::version::{SchemaSupport, SchemaVersion};
use super::SchemaError;
use crate::context::BindContext;

pub const SCHEMA_NAME_PATH: &[&str] = &["schema", "name"];
pub const SCHEMA_VERSION_PATH: &[&str] = &["schema", "version"];

/// The schema name and version a document declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaHeader {
    pub name: String,
    pub version: Option<SchemaVersion>,
}

/// The fields struct of a record type, together with its descriptor list.
///
/// `Self` is the binding target: every attribute starts at its default and
/// is filled in by [`bind`]. Once binding succeeds, [`finish`] turns it into
/// the [`Ready`] record, where required attributes are no longer optional.
///
/// [`finish`]: SchemaFields::finish
/// [`Ready`]: SchemaFields::Ready
pub trait SchemaFields: Default + 'static {
    /// The record produced once every element is bound.
    type Ready: fmt::Debug;

    /// The schema name and version range this record type binds.
    fn support() -> SchemaSupport;

    /// The full descriptor list, starting with [`base_elements`].
    fn elements() -> Vec<Element<Self>>;

    /// Header slot written by the base elements.
    fn header_mut(&mut self) -> &mut SchemaHeader;

    /// Converts the bound fields into the ready record.
    fn finish(self) -> Result<Self::Ready, SchemaError>;
}

/// Descriptor entries shared by every record type.
///
/// Concrete types start from this list and append their own entries.
pub fn base_elements<F: SchemaFields>() -> Vec<Element<F>> {
    vec![
        Element::text("schema_name", SCHEMA_NAME_PATH, |f: &mut F, v| {
            f.header_mut().name = v;
        })
        .required(),
        Element::transformed(
            "schema_version",
            SCHEMA_VERSION_PATH,
            schema_version,
            |f: &mut F, v| f.header_mut().version = Some(v),
        )
        .required(),
    ]
}

fn schema_version(raw: &Value, _: &BindContext<'_>) -> Result<SchemaVersion, SchemaError> {
    SchemaVersion::from_value(raw)
}

/// A fully constructed record: its source document, header and ready fields.
///
/// There is no way to observe a partially bound object; [`construct`] either
/// returns a complete one or fails.
///
/// [`construct`]: SchemaObject::construct
#[derive(Debug)]
pub struct SchemaObject<F: SchemaFields> {
    document: Table,
    source: Option<PathBuf>,
    header: SchemaHeader,
    fields: F::Ready,
}

impl<F: SchemaFields> SchemaObject<F> {
    /// Checks the declared schema against `F::support()`, binds every element,
    /// then finishes the bound fields into the ready record.
    pub fn construct(
        document: Table,
        source: Option<PathBuf>,
        ctx: &BindContext<'_>,
    ) -> Result<Self, SchemaError> {
        let support = F::support();
        check_declared(&support, &document)?;

        let mut bound = bind(&F::elements(), &document, ctx)?;
        let header = std::mem::take(bound.header_mut());
        let fields = bound.finish()?;
        debug!(schema = support.name(), source = ?source, "bound schema object");

        Ok(Self {
            document,
            source,
            header,
            fields,
        })
    }

    /// The document this object was bound from.
    pub fn document(&self) -> &Table {
        &self.document
    }

    /// Where the document came from, if the loader said.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The schema name and version the document declared.
    pub fn header(&self) -> &SchemaHeader {
        &self.header
    }

    /// The ready record.
    pub fn fields(&self) -> &F::Ready {
        &self.fields
    }
}

/// Reads the declared schema name and version and runs the version gate.
pub fn check_declared(support: &SchemaSupport, document: &Table) -> Result<(), SchemaError> {
    let name = lookup(document, SCHEMA_NAME_PATH).and_then(Value::as_str);
    if name != Some(support.name()) {
        return support.check(name, None);
    }

    let version = lookup(document, SCHEMA_VERSION_PATH)
        .map(|raw| {
            SchemaVersion::from_value(raw).map_err(|_| SchemaError::SchemaVersionUnsupported {
                name: support.name().to_owned(),
                found: raw.to_string(),
                range: support.range(),
            })
        })
        .transpose()?;

    support.check(name, version.as_ref())
}
