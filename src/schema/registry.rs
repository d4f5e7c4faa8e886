//! Dispatch of documents to record types by declared schema name.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use toml::{Table, Value};
use tracing::{debug, warn};

use super::element::lookup;
use super::object::SCHEMA_NAME_PATH;
use super::SchemaError;
use crate::context::BindContext;

/// A record type that can be built from a whole document.
pub trait SchemaBound: fmt::Debug + Sized + 'static {
    /// Binds a whole document that declared this type's schema.
    fn from_document(document: Table, ctx: &BindContext<'_>) -> Result<Self, SchemaError>;
}

type LoadFn = fn(Table, &BindContext<'_>) -> Result<Box<dyn Any>, SchemaError>;

struct Registration {
    description: Option<String>,
    load: LoadFn,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A record produced by [`SchemaRegistry::load`].
#[derive(Debug)]
pub struct LoadedSchema {
    name: String,
    record: Box<dyn Any>,
}

impl LoadedSchema {
    /// The schema name the document declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrows the concrete record, if it is a `T`.
    pub fn downcast_ref<T: SchemaBound>(&self) -> Option<&T> {
        self.record.downcast_ref()
    }

    /// Recovers the concrete record, or gives `self` back if it is of another type.
    pub fn downcast<T: SchemaBound>(self) -> Result<T, Self> {
        match self.record.downcast::<T>() {
            Ok(record) => Ok(*record),
            Err(record) => Err(Self {
                name: self.name,
                record,
            }),
        }
    }
}

/// Maps schema names to the record types that bind them.
///
/// ```
/// use schema_fnd::{persona, BindContext, InstanceRoot, Persona, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// persona::register(&mut registry);
///
/// let document: toml::Table = toml::from_str(r#"
///     [schema]
///     name = "TendrilPersona"
///     version = "1.0"
///
///     [identity]
///     ident = "acme"
///
///     [identity.signatories]
///     default = "ceo"
///     ceo = { name = "A. Person", designation = "CEO" }
/// "#).unwrap();
///
/// let root = InstanceRoot::new("/srv/acme");
/// let loaded = registry.load(document, &BindContext::new(&root))?;
/// let persona = loaded.downcast::<Persona>().unwrap();
/// assert_eq!(persona.ident(), "acme");
/// # Ok::<(), schema_fnd::SchemaError>(())
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Registration>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` as the binder for documents declaring `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<T: SchemaBound>(&mut self, name: impl Into<String>, description: Option<&str>) {
        let name = name.into();
        let registration = Registration {
            description: description.map(str::to_owned),
            load: load_boxed::<T>,
        };

        if self.schemas.insert(name.clone(), registration).is_some() {
            warn!(schema = %name, "replacing existing schema registration");
        } else {
            debug!(schema = %name, record = std::any::type_name::<T>(), "registered schema");
        }
    }

    /// Whether a binder is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// The description given at registration, if any.
    pub fn description(&self, name: &str) -> Option<&str> {
        self.schemas.get(name)?.description.as_deref()
    }

    /// Registered schema names with their descriptions, in no particular order.
    pub fn schemas(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.schemas
            .iter()
            .map(|(name, r)| (name.as_str(), r.description.as_deref()))
    }

    /// Builds the record type registered for the document's declared schema name.
    pub fn load(&self, document: Table, ctx: &BindContext<'_>) -> Result<LoadedSchema, SchemaError> {
        let name = lookup(&document, SCHEMA_NAME_PATH)
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::SchemaNameMismatch {
                expected: "a registered schema".to_owned(),
                found: None,
            })?
            .to_owned();

        let registration = self
            .schemas
            .get(&name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.clone()))?;

        debug!(schema = %name, "dispatching document");
        let record = (registration.load)(document, ctx)?;
        Ok(LoadedSchema { name, record })
    }
}

fn load_boxed<T: SchemaBound>(
    document: Table,
    ctx: &BindContext<'_>,
) -> Result<Box<dyn Any>, SchemaError> {
    Ok(Box::new(T::from_document(document, ctx)?))
}
