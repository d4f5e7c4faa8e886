use thiserror::Error;

use super::version::VersionRange;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("schema name mismatch: expected '{expected}', document declares {found:?}")]
    SchemaNameMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("schema '{name}' version {found} is outside the supported range {range}")]
    SchemaVersionUnsupported {
        name: String,
        found: String,
        range: VersionRange,
    },

    #[error("invalid schema element '{attribute}' at '{path}': {source}")]
    SchemaElementInvalid {
        attribute: &'static str,
        path: String,
        source: Box<SchemaError>,
    },

    #[error("collection has no 'default' key")]
    DefaultKeyMissing,

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("'{value}' is not a legal value for selector '{selector}'")]
    InvalidSelector {
        selector: &'static str,
        value: String,
    },

    #[error("required value missing")]
    MissingValue,

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("invalid version range: min {min} exceeds max {max}")]
    InvalidRange { min: String, max: String },

    #[error("no schema registered under '{0}'")]
    UnknownSchema(String),
}
