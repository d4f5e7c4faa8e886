//! Organizational persona records.
//!
//! A persona document declares schema `TendrilPersona` and carries an
//! `identity` section:
//!
//! ```toml
//! [schema]
//! name = "TendrilPersona"
//! version = "1.0"
//!
//! [identity]
//! ident = "acme"
//! name = "Acme Widgets Pvt. Ltd."
//! address = ["Street 1", "City", "Country"]
//! logo = "images/logo.png"
//!
//! [identity.signatories]
//! default = "treasurer"
//! treasurer = { name = "A. Person", designation = "Treasurer" }
//! ```

mod multiline;
mod signatory;

use std::fmt;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::context::BindContext;
use crate::resolve::PathResolver;
use crate::schema::{
    base_elements, Element, SchemaBound, SchemaError, SchemaFields, SchemaHeader, SchemaObject,
    SchemaRegistry, SchemaSupport, SchemaVersion, Selector, VersionRange,
};
use crate::Error;

pub use multiline::MultilineString;
pub use signatory::{Signatories, Signatory};

/// Schema name persona documents declare.
pub const SCHEMA_NAME: &str = "TendrilPersona";

/// Registers the persona record type with `registry`.
pub fn register(registry: &mut SchemaRegistry) {
    debug!("registering persona schema");
    registry.register::<Persona>(
        SCHEMA_NAME,
        Some("Schema for Tendril Persona Definition Files"),
    );
}

/// Fields bound from a persona document.
#[derive(Debug, Default)]
pub struct PersonaFields {
    header: SchemaHeader,
    details: Details,
    signatories: Option<Signatories>,
}

#[derive(Debug, Default)]
struct Details {
    ident: String,
    name: Option<String>,
    name_short: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<MultilineString>,
    address_line: Option<String>,
    iec: Option<String>,
    pan: Option<String>,
    cin: Option<String>,
    gstin: Option<String>,
    logo: Option<PathBuf>,
    black_logo: Option<PathBuf>,
    square_logo: Option<PathBuf>,
}

/// A bound persona identity, with its signatories in place.
#[derive(Debug)]
pub struct Identity {
    details: Details,
    signatories: Signatories,
}

impl SchemaFields for PersonaFields {
    type Ready = Identity;

    fn support() -> SchemaSupport {
        let version = SchemaVersion::new(10, 1);
        SchemaSupport::new(SCHEMA_NAME, VersionRange::exactly(version))
    }

    fn elements() -> Vec<Element<Self>> {
        let mut e = base_elements();
        e.extend([
            Element::text("ident", &["identity", "ident"], |f: &mut Self, v| f.details.ident = v)
                .required(),
            Element::text("name", &["identity", "name"], |f: &mut Self, v| f.details.name = Some(v)),
            Element::text("name_short", &["identity", "name_short"], |f: &mut Self, v| {
                f.details.name_short = Some(v)
            }),
            Element::text("phone", &["identity", "phone"], |f: &mut Self, v| f.details.phone = Some(v)),
            Element::text("email", &["identity", "email"], |f: &mut Self, v| f.details.email = Some(v)),
            Element::transformed(
                "address",
                &["identity", "address"],
                MultilineString::from_value,
                |f: &mut Self, v| f.details.address = Some(v),
            ),
            Element::text("address_line", &["identity", "address_line"], |f: &mut Self, v| {
                f.details.address_line = Some(v)
            }),
            Element::text("iec", &["identity", "iec"], |f: &mut Self, v| f.details.iec = Some(v)),
            Element::text("pan", &["identity", "pan"], |f: &mut Self, v| f.details.pan = Some(v)),
            Element::text("cin", &["identity", "cin"], |f: &mut Self, v| f.details.cin = Some(v)),
            Element::text("gstin", &["identity", "gstin"], |f: &mut Self, v| f.details.gstin = Some(v)),
            Element::transformed("logo", &["identity", "logo"], instance_path, |f: &mut Self, v| {
                f.details.logo = Some(v)
            }),
            Element::transformed(
                "black_logo",
                &["identity", "black_logo"],
                instance_path,
                |f: &mut Self, v| f.details.black_logo = Some(v),
            ),
            Element::transformed(
                "square_logo",
                &["identity", "square_logo"],
                instance_path,
                |f: &mut Self, v| f.details.square_logo = Some(v),
            ),
            Element::transformed(
                "signatories",
                &["identity", "signatories"],
                signatory::signatories,
                |f: &mut Self, v| f.signatories = Some(v),
            )
            .required(),
        ]);
        e
    }

    fn header_mut(&mut self) -> &mut SchemaHeader {
        &mut self.header
    }

    fn finish(self) -> Result<Identity, SchemaError> {
        let signatories = self
            .signatories
            .ok_or_else(|| SchemaError::SchemaElementInvalid {
                attribute: "signatories",
                path: "identity.signatories".to_owned(),
                source: Box::new(SchemaError::MissingValue),
            })?;
        Ok(Identity {
            details: self.details,
            signatories,
        })
    }
}

fn instance_path(raw: &Value, ctx: &BindContext<'_>) -> Result<PathBuf, SchemaError> {
    match raw.as_str() {
        Some(reference) if !reference.is_empty() => Ok(ctx.resolve(reference)),
        Some(_) => Err(SchemaError::InvalidValue("empty file reference".to_owned())),
        None => Err(SchemaError::InvalidValue(format!(
            "expected a file reference, found {}",
            raw.type_str()
        ))),
    }
}

/// An organization's identity, as declared in a persona document.
///
/// Everything except the active signatory is fixed at construction.
#[derive(Debug)]
pub struct Persona {
    object: SchemaObject<PersonaFields>,
    signatory: Selector,
}

impl Persona {
    /// Creates a new builder for constructing a `Persona`.
    pub fn builder<'a>() -> PersonaBuilder<'a> {
        PersonaBuilder::default()
    }

    fn construct(
        document: Table,
        source: Option<PathBuf>,
        signatory: Option<String>,
        ctx: &BindContext<'_>,
    ) -> Result<Self, SchemaError> {
        let object = SchemaObject::<PersonaFields>::construct(document, source, ctx)?;

        let mut selector = Selector::new("signatory");
        if let Some(key) = signatory {
            selector.set(key, &object.fields().signatories)?;
        }

        Ok(Self {
            object,
            signatory: selector,
        })
    }

    fn details(&self) -> &Details {
        &self.object.fields().details
    }

    /// The persona's identifier.
    pub fn ident(&self) -> &str {
        &self.details().ident
    }

    /// The schema name and version the document declared.
    pub fn header(&self) -> &SchemaHeader {
        self.object.header()
    }

    /// The document this persona was bound from.
    pub fn document(&self) -> &Table {
        self.object.document()
    }

    /// Where the document came from, if the loader said.
    pub fn source(&self) -> Option<&Path> {
        self.object.source()
    }

    /// Full registered name.
    pub fn name(&self) -> Option<&str> {
        self.details().name.as_deref()
    }

    /// Short display name.
    pub fn name_short(&self) -> Option<&str> {
        self.details().name_short.as_deref()
    }

    /// Contact phone number.
    pub fn phone(&self) -> Option<&str> {
        self.details().phone.as_deref()
    }

    /// Contact email address.
    pub fn email(&self) -> Option<&str> {
        self.details().email.as_deref()
    }

    /// Postal address, one entry per line.
    pub fn address(&self) -> Option<&MultilineString> {
        self.details().address.as_ref()
    }

    /// Postal address on a single line.
    pub fn address_line(&self) -> Option<&str> {
        self.details().address_line.as_deref()
    }

    /// Import/export code.
    pub fn iec(&self) -> Option<&str> {
        self.details().iec.as_deref()
    }

    /// Permanent account number.
    pub fn pan(&self) -> Option<&str> {
        self.details().pan.as_deref()
    }

    /// Corporate identification number.
    pub fn cin(&self) -> Option<&str> {
        self.details().cin.as_deref()
    }

    /// Goods and services tax identification number.
    pub fn gstin(&self) -> Option<&str> {
        self.details().gstin.as_deref()
    }

    /// Resolved location of the logo.
    pub fn logo(&self) -> Option<&Path> {
        self.details().logo.as_deref()
    }

    /// Resolved location of the monochrome logo.
    pub fn black_logo(&self) -> Option<&Path> {
        self.details().black_logo.as_deref()
    }

    /// Resolved location of the square logo.
    pub fn square_logo(&self) -> Option<&Path> {
        self.details().square_logo.as_deref()
    }

    /// Every authorized signatory, with the default among them.
    pub fn signatories(&self) -> &Signatories {
        &self.object.fields().signatories
    }

    /// The active signatory, or the default one when none has been selected.
    pub fn signatory(&self) -> Result<&Signatory, SchemaError> {
        self.signatory.resolve(self.signatories())
    }

    /// Key of the explicitly selected signatory, if any.
    pub fn signatory_key(&self) -> Option<&str> {
        self.signatory.key()
    }

    /// Selects the active signatory; `key` must be one of the signatory keys.
    pub fn set_signatory(&mut self, key: impl Into<String>) -> Result<(), SchemaError> {
        self.signatory.set(key, &self.object.fields().signatories)
    }

    /// Returns to the default signatory.
    pub fn clear_signatory(&mut self) {
        self.signatory.clear();
    }
}

impl SchemaBound for Persona {
    fn from_document(document: Table, ctx: &BindContext<'_>) -> Result<Self, SchemaError> {
        Self::construct(document, None, None, ctx)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source() {
            Some(source) => write!(f, "<Persona {} {}>", self.ident(), source.display()),
            None => write!(f, "<Persona {}>", self.ident()),
        }
    }
}

/// Builder for constructing a [`Persona`].
///
/// ## Example
///
/// ```
/// use schema_fnd::{InstanceRoot, Persona};
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
///     cfo = { name = "B. Person", designation = "CFO" }
/// "#).unwrap();
///
/// let root = InstanceRoot::new("/srv/acme");
/// let persona = Persona::builder()
///     .with_document(document)
///     .with_resolver(&root)
///     .with_signatory("cfo")
///     .build()?;
///
/// assert_eq!(persona.signatory()?.designation(), "CFO");
/// # Ok::<(), schema_fnd::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct PersonaBuilder<'a> {
    document: Option<Table>,
    source: Option<PathBuf>,
    resolver: Option<&'a dyn PathResolver>,
    signatory: Option<String>,
}

impl<'a> PersonaBuilder<'a> {
    /// Sets the parsed persona document.
    pub fn with_document(mut self, document: Table) -> Self {
        self.document = Some(document);
        self
    }

    /// Records where the document came from, for diagnostics.
    pub fn with_source(mut self, source: impl AsRef<Path>) -> Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    /// Sets the resolver used for file references.
    pub fn with_resolver(mut self, resolver: &'a dyn PathResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Selects the initial signatory; it must be one of the document's signatory keys.
    pub fn with_signatory(mut self, key: impl Into<String>) -> Self {
        self.signatory = Some(key.into());
        self
    }

    /// Builds the persona.
    ///
    /// Fails if no document or resolver was provided, or if the document does
    /// not bind.
    pub fn build(self) -> Result<Persona, Error> {
        let document = self.document.ok_or(Error::MissingDocument)?;
        let resolver = self.resolver.ok_or(Error::MissingResolver)?;
        let ctx = BindContext::new(resolver);
        Ok(Persona::construct(document, self.source, self.signatory, &ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::InstanceRoot;
    use crate::schema::element::unique_names;

    const DOCUMENT: &str = r#"
        [schema]
        name = "TendrilPersona"
        version = "1.0"

        [identity]
        ident = "acme"
        name = "Acme Widgets Pvt. Ltd."
        name_short = "Acme"
        phone = 5551234
        email = "office@acme.example"
        address = ["Street 1", "City", "Country"]
        address_line = "Street 1, City, Country"
        pan = "ABCDE1234F"
        gstin = "22ABCDE1234F1Z5"
        logo = "images/logo.png"
        square_logo = "/opt/brand/square.png"

        [identity.signatories]
        default = "treasurer"
        treasurer = { name = "A. Person", designation = "Treasurer" }
        director = { name = "B. Person", designation = "Director" }
    "#;

    fn document(toml_str: &str) -> Table {
        toml::from_str(toml_str).unwrap()
    }

    fn build(toml_str: &str) -> Result<Persona, Error> {
        let root = InstanceRoot::new("/srv/acme");
        Persona::builder()
            .with_document(document(toml_str))
            .with_resolver(&root)
            .build()
    }

    #[test]
    fn test_descriptor_names_unique() {
        let elements = PersonaFields::elements();
        assert!(unique_names(&elements));
        assert_eq!(elements[0].name(), "schema_name");
        assert_eq!(elements[1].name(), "schema_version");
    }

    #[test]
    fn test_binds_identity() {
        let persona = build(DOCUMENT).unwrap();

        assert_eq!(persona.ident(), "acme");
        assert_eq!(persona.name(), Some("Acme Widgets Pvt. Ltd."));
        assert_eq!(persona.name_short(), Some("Acme"));
        assert_eq!(persona.phone(), Some("5551234"));
        assert_eq!(persona.email(), Some("office@acme.example"));
        assert_eq!(persona.address().unwrap().to_string(), "Street 1\nCity\nCountry");
        assert_eq!(persona.address_line(), Some("Street 1, City, Country"));
        assert_eq!(persona.pan(), Some("ABCDE1234F"));
        assert_eq!(persona.gstin(), Some("22ABCDE1234F1Z5"));
        assert_eq!(persona.iec(), None);
        assert_eq!(persona.cin(), None);
        assert_eq!(persona.header().name, SCHEMA_NAME);
    }

    #[test]
    fn test_logos_resolved() {
        let persona = build(DOCUMENT).unwrap();

        assert_eq!(persona.logo(), Some(Path::new("/srv/acme/images/logo.png")));
        assert_eq!(persona.square_logo(), Some(Path::new("/opt/brand/square.png")));
        assert_eq!(persona.black_logo(), None);
    }

    #[test]
    fn test_signatory_selection() {
        let mut persona = build(DOCUMENT).unwrap();

        assert_eq!(persona.signatory().unwrap().name(), "A. Person");
        assert_eq!(persona.signatory_key(), None);

        persona.set_signatory("director").unwrap();
        assert_eq!(persona.signatory().unwrap().designation(), "Director");

        let result = persona.set_signatory("auditor");
        assert!(matches!(result, Err(SchemaError::InvalidSelector { .. })));
        assert_eq!(persona.signatory_key(), Some("director"));

        persona.clear_signatory();
        assert_eq!(persona.signatory().unwrap().name(), "A. Person");
    }

    #[test]
    fn test_initial_signatory_validated() {
        let root = InstanceRoot::new("/srv/acme");
        let result = Persona::builder()
            .with_document(document(DOCUMENT))
            .with_resolver(&root)
            .with_signatory("auditor")
            .build();

        assert!(matches!(
            result,
            Err(Error::Schema(SchemaError::InvalidSelector { ref value, .. })) if value == "auditor"
        ));
    }

    #[test]
    fn test_missing_builder_inputs() {
        let root = InstanceRoot::new("/srv/acme");
        assert!(matches!(
            Persona::builder().with_resolver(&root).build(),
            Err(Error::MissingDocument)
        ));
        assert!(matches!(
            Persona::builder().with_document(document(DOCUMENT)).build(),
            Err(Error::MissingResolver)
        ));
    }

    #[test]
    fn test_missing_ident() {
        let result = build(
            r#"
            [schema]
            name = "TendrilPersona"
            version = "1.0"

            [identity.signatories]
            default = "a"
            a = { name = "A", designation = "B" }
            "#,
        );
        assert!(matches!(
            result,
            Err(Error::Schema(SchemaError::SchemaElementInvalid { attribute: "ident", .. }))
        ));
    }

    #[test]
    fn test_missing_signatories() {
        let result = build(
            r#"
            [schema]
            name = "TendrilPersona"
            version = "1.0"

            [identity]
            ident = "acme"
            "#,
        );
        assert!(matches!(
            result,
            Err(Error::Schema(SchemaError::SchemaElementInvalid { attribute: "signatories", .. }))
        ));
    }

    #[test]
    fn test_finish_requires_signatories() {
        let result = PersonaFields::default().finish();
        assert!(matches!(
            result,
            Err(SchemaError::SchemaElementInvalid { attribute: "signatories", ref source, .. })
                if matches!(**source, SchemaError::MissingValue)
        ));
    }

    #[test]
    fn test_bad_address_carries_context() {
        let result = build(
            r#"
            [schema]
            name = "TendrilPersona"
            version = "1.0"

            [identity]
            ident = "acme"
            address = 42

            [identity.signatories]
            default = "a"
            a = { name = "A", designation = "B" }
            "#,
        );
        match result {
            Err(Error::Schema(SchemaError::SchemaElementInvalid { attribute, path, .. })) => {
                assert_eq!(attribute, "address");
                assert_eq!(path, "identity.address");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let root = InstanceRoot::new("/srv/acme");
        let persona = Persona::builder()
            .with_document(document(DOCUMENT))
            .with_resolver(&root)
            .with_source("/srv/acme/persona.yaml")
            .build()
            .unwrap();
        assert_eq!(persona.to_string(), "<Persona acme /srv/acme/persona.yaml>");
        assert!(persona.document().contains_key("identity"));
    }

    #[test]
    fn test_register() {
        let mut registry = SchemaRegistry::new();
        register(&mut registry);
        assert!(registry.contains(SCHEMA_NAME));
        assert!(registry.description(SCHEMA_NAME).is_some());
    }
}
