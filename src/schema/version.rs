//! Schema name and version compatibility checks.
//!
//! Versions are exact decimals: `1.0`, `1.00` and `1` all compare equal,
//! and no binary floating point rounding ever reaches a comparison.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use toml::Value;
use tracing::debug;

use super::SchemaError;

/// A declared or supported schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion(Decimal);

impl SchemaVersion {
    /// Builds a version from a mantissa and a decimal scale, so `new(10, 1)` is `1.0`.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    /// Reads a version from a document value.
    ///
    /// Strings are parsed as decimals, integers are taken as is and floats
    /// go through their shortest round-trip rendering first.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::String(s) => s.parse(),
            Value::Integer(i) => Ok(Self(Decimal::from(*i))),
            Value::Float(f) => f.to_string().parse(),
            other => Err(SchemaError::InvalidValue(format!(
                "expected a version number, found {}",
                other.type_str()
            ))),
        }
    }

    /// The exact decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|e| SchemaError::InvalidValue(format!("invalid version '{s}': {e}")))
    }
}

impl From<Decimal> for SchemaVersion {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An inclusive `[min, max]` version range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    min: SchemaVersion,
    max: SchemaVersion,
}

impl VersionRange {
    /// Builds an inclusive range, rejecting `min > max`.
    pub fn new(min: SchemaVersion, max: SchemaVersion) -> Result<Self, SchemaError> {
        if min > max {
            return Err(SchemaError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    /// A range admitting exactly one version.
    pub fn exactly(version: SchemaVersion) -> Self {
        Self {
            min: version,
            max: version,
        }
    }

    /// Lowest admitted version.
    pub fn min(&self) -> SchemaVersion {
        self.min
    }

    /// Highest admitted version.
    pub fn max(&self) -> SchemaVersion {
        self.max
    }

    /// Whether `version` lies within the range, bounds included.
    pub fn contains(&self, version: &SchemaVersion) -> bool {
        self.min <= *version && *version <= self.max
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// The schema name and version range a record type can bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSupport {
    name: String,
    range: VersionRange,
}

impl SchemaSupport {
    /// Supports schema `name` over `range`.
    pub fn new(name: impl Into<String>, range: VersionRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    /// The schema name documents must declare.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The admitted version range.
    pub fn range(&self) -> VersionRange {
        self.range
    }

    /// Decides whether a document declaring `name` and `version` can be bound.
    pub fn check(
        &self,
        name: Option<&str>,
        version: Option<&SchemaVersion>,
    ) -> Result<(), SchemaError> {
        if name != Some(self.name.as_str()) {
            debug!(expected = %self.name, found = ?name, "schema name rejected");
            return Err(SchemaError::SchemaNameMismatch {
                expected: self.name.clone(),
                found: name.map(str::to_owned),
            });
        }

        match version {
            Some(v) if self.range.contains(v) => Ok(()),
            _ => {
                debug!(schema = %self.name, found = ?version, range = %self.range, "schema version rejected");
                Err(SchemaError::SchemaVersionUnsupported {
                    name: self.name.clone(),
                    found: version.map_or_else(|| "<none>".to_owned(), ToString::to_string),
                    range: self.range,
                })
            }
        }
    }
}
