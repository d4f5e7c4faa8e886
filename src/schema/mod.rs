//! Binding of versioned, nested documents into typed records.

pub mod collection;
pub mod element;
mod error;
pub mod object;
pub mod registry;
pub mod version;

pub use collection::{ObjectSet, SelectableObjectSet, Selector, SetMember, DEFAULT_KEY};
pub use element::{bind, lookup, Element, Transform};
pub use error::SchemaError;
pub use object::{base_elements, SchemaFields, SchemaHeader, SchemaObject};
pub use registry::{LoadedSchema, SchemaBound, SchemaRegistry};
pub use version::{SchemaSupport, SchemaVersion, VersionRange};
