//! Keyed collections of sub-objects built from document mappings.

use std::collections::HashMap;

use toml::{Table, Value};
use tracing::debug;

use super::SchemaError;
use crate::context::BindContext;

/// Key naming the default entry of a [`SelectableObjectSet`].
pub const DEFAULT_KEY: &str = "default";

/// A sub-object constructed from one entry of a document mapping.
pub trait SetMember: Sized {
    /// Builds the member listed under `key` from its raw entry.
    fn from_entry(key: &str, raw: &Value, ctx: &BindContext<'_>) -> Result<Self, SchemaError>;
}

/// A plain mapping from key to constructed sub-object.
#[derive(Debug)]
pub struct ObjectSet<T> {
    content: HashMap<String, T>,
}

impl<T: SetMember> ObjectSet<T> {
    /// Constructs one member per entry of `table`, keyed by the entry's key.
    pub fn from_table(table: &Table, ctx: &BindContext<'_>) -> Result<Self, SchemaError> {
        let content = table
            .iter()
            .map(|(key, raw)| T::from_entry(key, raw, ctx).map(|member| (key.clone(), member)))
            .collect::<Result<HashMap<_, _>, SchemaError>>()?;
        Ok(Self { content })
    }
}

impl<T> ObjectSet<T> {
    /// Returns the member under `key`, or `UnknownKey`.
    pub fn get(&self, key: &str) -> Result<&T, SchemaError> {
        self.content
            .get(key)
            .ok_or_else(|| SchemaError::UnknownKey(key.to_owned()))
    }

    /// Whether a member is listed under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.content.contains_key(key)
    }

    /// Member keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.content.keys().map(String::as_str)
    }

    /// Members with their keys, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.content.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A keyed collection with a mandatory default entry.
///
/// The source mapping carries a `default` key whose value names one of the
/// other entries. Lookups with an absent or empty key resolve to that entry.
///
/// ```
/// use schema_fnd::{BindContext, InstanceRoot, Signatories};
///
/// let table: toml::Table = toml::from_str(r#"
///     default = "treasurer"
///     [treasurer]
///     name = "A. Person"
///     designation = "Treasurer"
/// "#).unwrap();
/// let root = InstanceRoot::new("/srv/acme");
/// let signatories = Signatories::from_table(&table, &BindContext::new(&root))?;
///
/// assert_eq!(signatories.get(None)?.name(), "A. Person");
/// assert_eq!(signatories.get(Some(""))?.name(), "A. Person");
/// # Ok::<(), schema_fnd::SchemaError>(())
/// ```
#[derive(Debug)]
pub struct SelectableObjectSet<T> {
    default_key: String,
    default: T,
    others: ObjectSet<T>,
}

impl<T: SetMember> SelectableObjectSet<T> {
    /// Builds the set from a mapping carrying a `default` key.
    pub fn from_table(table: &Table, ctx: &BindContext<'_>) -> Result<Self, SchemaError> {
        let default_key = table
            .get(DEFAULT_KEY)
            .ok_or(SchemaError::DefaultKeyMissing)?
            .as_str()
            .ok_or_else(|| {
                SchemaError::InvalidValue("'default' must name one of the entries".to_owned())
            })?
            .to_owned();

        let mut rest = table.clone();
        rest.remove(DEFAULT_KEY);
        let raw_default = rest
            .remove(&default_key)
            .ok_or_else(|| SchemaError::UnknownKey(default_key.clone()))?;

        let default = T::from_entry(&default_key, &raw_default, ctx)?;
        let others = ObjectSet::from_table(&rest, ctx)?;

        debug!(default = %default_key, entries = others.len() + 1, "built selectable set");

        Ok(Self {
            default_key,
            default,
            others,
        })
    }
}

impl<T> SelectableObjectSet<T> {
    /// Returns the default entry for an absent or empty key, the key's entry otherwise.
    pub fn get(&self, key: Option<&str>) -> Result<&T, SchemaError> {
        match key {
            None | Some("") => Ok(&self.default),
            Some(k) if k == self.default_key => Ok(&self.default),
            Some(k) => self.others.get(k),
        }
    }

    /// The entry named by `default`.
    pub fn default_entry(&self) -> &T {
        &self.default
    }

    /// Key of the default entry.
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Whether `key` names a constructed entry.
    pub fn contains(&self, key: &str) -> bool {
        key == self.default_key || self.others.contains(key)
    }

    /// All constructed keys, the default entry's key included, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.default_key.as_str()).chain(self.others.keys())
    }

    /// Number of entries, the default one included.
    pub fn len(&self) -> usize {
        self.others.len() + 1
    }
}

/// A mutable choice among the keys of a [`SelectableObjectSet`].
///
/// An unset selector stands for the collection's default entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    name: &'static str,
    key: Option<String>,
}

impl Selector {
    /// An unset selector; `name` labels it in errors.
    pub fn new(name: &'static str) -> Self {
        Self { name, key: None }
    }

    /// The selected key, or `None` for the default entry.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Selects `key`, which must be one of `set`'s keys.
    pub fn set<T>(
        &mut self,
        key: impl Into<String>,
        set: &SelectableObjectSet<T>,
    ) -> Result<(), SchemaError> {
        let key = key.into();
        if !set.contains(&key) {
            return Err(SchemaError::InvalidSelector {
                selector: self.name,
                value: key,
            });
        }
        self.key = Some(key);
        Ok(())
    }

    /// Goes back to the default entry.
    pub fn clear(&mut self) {
        self.key = None;
    }

    /// Resolves the current choice against `set`.
    pub fn resolve<'s, T>(&self, set: &'s SelectableObjectSet<T>) -> Result<&'s T, SchemaError> {
        set.get(self.key())
    }
}
