pub mod context;
mod error;
pub mod persona;
pub mod resolve;
pub mod schema;

pub use context::BindContext;
pub use error::Error;
pub use persona::{MultilineString, Persona, Signatories, Signatory};
pub use resolve::{InstanceRoot, PathResolver};
pub use schema::{SchemaError, SchemaRegistry};
