use crate::schema::SchemaError;
use thiserror::Error;

/// Top-level error type for the schema-fnd library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("record construction requires a document")]
    MissingDocument,

    #[error("record construction requires a path resolver")]
    MissingResolver,
}
