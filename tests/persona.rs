use std::path::Path;

use schema_fnd::{
    persona, BindContext, Error, InstanceRoot, Persona, SchemaError, SchemaRegistry,
};

fn document(toml_str: &str) -> toml::Table {
    toml::from_str(toml_str).unwrap()
}

const TREASURER_ONLY: &str = r#"
    [schema]
    name = "TendrilPersona"
    version = "1.0"

    [identity]
    ident = "acme"
    name = "Acme Widgets Pvt. Ltd."
    address = ["Street 1", "City", "Country"]
    black_logo = "images/black.png"

    [identity.signatories]
    default = "treasurer"

    [identity.signatories.treasurer]
    name = "A. Person"
    designation = "Treasurer"
"#;

#[test]
fn test_end_to_end_construction() {
    let root = InstanceRoot::new("/srv/acme");
    let persona = Persona::builder()
        .with_document(document(TREASURER_ONLY))
        .with_resolver(&root)
        .build()
        .unwrap();

    assert_eq!(persona.ident(), "acme");
    assert_eq!(
        persona.signatory().unwrap().to_string(),
        "<Signatory A. Person, Treasurer>"
    );
    assert_eq!(persona.address().unwrap().to_string(), "Street 1\nCity\nCountry");
    assert_eq!(
        persona.black_logo(),
        Some(Path::new("/srv/acme/images/black.png"))
    );

    let keys: Vec<_> = persona.signatories().keys().collect();
    assert_eq!(keys, ["treasurer"]);
}

#[test]
fn test_selector_round_trip() {
    let root = InstanceRoot::new("/srv/acme");
    let mut persona = Persona::builder()
        .with_document(document(TREASURER_ONLY))
        .with_resolver(&root)
        .build()
        .unwrap();

    assert!(matches!(
        persona.set_signatory("default"),
        Err(SchemaError::InvalidSelector { .. })
    ));

    persona.set_signatory("treasurer").unwrap();
    let selected = persona.signatory().unwrap();
    assert_eq!(selected.key(), "treasurer");
    assert!(std::ptr::eq(selected, persona.signatories().default_entry()));
}

#[test]
fn test_missing_default_signatory() {
    let root = InstanceRoot::new("/srv/acme");
    let result = Persona::builder()
        .with_document(document(
            r#"
            [schema]
            name = "TendrilPersona"
            version = "1.0"

            [identity]
            ident = "acme"

            [identity.signatories.treasurer]
            name = "A. Person"
            "#,
        ))
        .with_resolver(&root)
        .build();

    assert!(matches!(
        result,
        Err(Error::Schema(SchemaError::DefaultKeyMissing))
    ));
}

fn signatories_failure(document_str: &str) -> SchemaError {
    let root = InstanceRoot::new("/srv/acme");
    let result = Persona::builder()
        .with_document(document(document_str))
        .with_resolver(&root)
        .build();

    match result {
        Err(Error::Schema(SchemaError::SchemaElementInvalid {
            attribute,
            path,
            source,
        })) => {
            assert_eq!(attribute, "signatories");
            assert_eq!(path, "identity.signatories");
            *source
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_nested_failures_carry_signatories_context() {
    let source = signatories_failure(&TREASURER_ONLY.replace("designation = \"Treasurer\"", ""));
    assert!(
        matches!(source, SchemaError::InvalidValue(ref m) if m.contains("treasurer")),
        "unexpected source: {source:?}"
    );

    let source = signatories_failure(
        &TREASURER_ONLY.replace("default = \"treasurer\"", "default = \"ghost\""),
    );
    assert!(
        matches!(source, SchemaError::UnknownKey(ref k) if k == "ghost"),
        "unexpected source: {source:?}"
    );
}

#[test]
fn test_unsupported_version() {
    let root = InstanceRoot::new("/srv/acme");
    let result = Persona::builder()
        .with_document(document(
            &TREASURER_ONLY.replace("version = \"1.0\"", "version = \"1.1\""),
        ))
        .with_resolver(&root)
        .build();

    assert!(matches!(
        result,
        Err(Error::Schema(SchemaError::SchemaVersionUnsupported { .. }))
    ));
}

#[test]
fn test_equivalent_decimal_versions() {
    let root = InstanceRoot::new("/srv/acme");
    for version in ["version = \"1.00\"", "version = 1.0", "version = 1"] {
        let persona = Persona::builder()
            .with_document(document(
                &TREASURER_ONLY.replace("version = \"1.0\"", version),
            ))
            .with_resolver(&root)
            .build();
        assert!(persona.is_ok(), "{version} should be accepted");
    }
}

#[test]
fn test_registry_dispatch() {
    let mut registry = SchemaRegistry::new();
    persona::register(&mut registry);

    let root = InstanceRoot::new("/srv/acme");
    let loaded = registry
        .load(document(TREASURER_ONLY), &BindContext::new(&root))
        .unwrap();

    assert_eq!(loaded.name(), persona::SCHEMA_NAME);
    let persona = loaded.downcast::<Persona>().unwrap();
    assert_eq!(persona.name(), Some("Acme Widgets Pvt. Ltd."));
}
