use std::fmt;

use serde::Deserialize;
use toml::Value;

use crate::context::BindContext;
use crate::schema::{SchemaError, SelectableObjectSet, SetMember};

/// A person authorized to sign on behalf of the persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signatory {
    key: String,
    name: String,
    designation: String,
}

#[derive(Deserialize)]
struct RawSignatory {
    name: String,
    designation: String,
}

impl Signatory {
    /// The key this signatory is listed under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Full name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Title the signatory signs under.
    pub fn designation(&self) -> &str {
        &self.designation
    }
}

impl SetMember for Signatory {
    fn from_entry(key: &str, raw: &Value, _: &BindContext<'_>) -> Result<Self, SchemaError> {
        let RawSignatory { name, designation } = raw
            .clone()
            .try_into::<RawSignatory>()
            .map_err(|e| {
                SchemaError::InvalidValue(format!("signatory '{key}': {}", e.to_string().trim_end()))
            })?;

        Ok(Self {
            key: key.to_owned(),
            name,
            designation,
        })
    }
}

impl fmt::Display for Signatory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Signatory {}, {}>", self.name, self.designation)
    }
}

/// The persona's signatories, with a mandatory default.
pub type Signatories = SelectableObjectSet<Signatory>;

impl fmt::Display for SelectableObjectSet<Signatory> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort_unstable();
        write!(f, "<Signatories {}>", keys.join(","))
    }
}

pub(crate) fn signatories(raw: &Value, ctx: &BindContext<'_>) -> Result<Signatories, SchemaError> {
    let table = raw.as_table().ok_or_else(|| {
        SchemaError::InvalidValue(format!(
            "expected a mapping of signatories, found {}",
            raw.type_str()
        ))
    })?;
    Signatories::from_table(table, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::InstanceRoot;

    #[test]
    fn test_summary_format() {
        let root = InstanceRoot::new("/");
        let raw: Value = toml::from_str("name = \"A. Person\"\ndesignation = \"Treasurer\"").unwrap();
        let signatory = Signatory::from_entry("treasurer", &raw, &BindContext::new(&root)).unwrap();

        assert_eq!(signatory.key(), "treasurer");
        assert_eq!(signatory.to_string(), "<Signatory A. Person, Treasurer>");
    }

    #[test]
    fn test_collection_summary_format() {
        let root = InstanceRoot::new("/");
        let raw: Value = toml::from_str(
            r#"
            default = "treasurer"
            treasurer = { name = "A. Person", designation = "Treasurer" }
            director = { name = "B. Person", designation = "Director" }
            "#,
        )
        .unwrap();
        let set = signatories(&raw, &BindContext::new(&root)).unwrap();

        assert_eq!(set.to_string(), "<Signatories director,treasurer>");
    }

    #[test]
    fn test_missing_designation() {
        let root = InstanceRoot::new("/");
        let raw: Value = toml::from_str("name = \"A. Person\"").unwrap();
        let result = Signatory::from_entry("treasurer", &raw, &BindContext::new(&root));
        assert!(matches!(
            result,
            Err(SchemaError::InvalidValue(ref m))
                if m.contains("treasurer") && m.contains("designation") && !m.ends_with('\n')
        ));
    }

    #[test]
    fn test_signatories_must_be_a_mapping() {
        let root = InstanceRoot::new("/");
        let result = signatories(&Value::Integer(1), &BindContext::new(&root));
        assert!(matches!(result, Err(SchemaError::InvalidValue(_))));
    }
}
