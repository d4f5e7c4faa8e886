use schema_fnd::{persona, BindContext, InstanceRoot, Persona, SchemaRegistry};
use tracing_subscriber::EnvFilter;

const DOCUMENT: &str = r#"
[schema]
name = "TendrilPersona"
version = "1.0"

[identity]
ident = "acme"
name = "Acme Widgets Pvt. Ltd."
name_short = "Acme"
address = ["12 Foundry Lane", "Pune 411001", "India"]
logo = "images/logo.png"

[identity.signatories]
default = "treasurer"
treasurer = { name = "A. Person", designation = "Treasurer" }
director = { name = "B. Person", designation = "Director" }
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = SchemaRegistry::new();
    persona::register(&mut registry);

    // Parsing belongs to the loader; here the document is inline TOML.
    let document: toml::Table = toml::from_str(DOCUMENT)?;
    let root = InstanceRoot::new("/srv/acme");

    let loaded = registry.load(document, &BindContext::new(&root))?;
    let mut persona = loaded
        .downcast::<Persona>()
        .map_err(|l| format!("unexpected record for schema {}", l.name()))?;

    println!("{persona}");
    println!("{}", persona.address().map(ToString::to_string).unwrap_or_default());
    println!("Logo: {:?}", persona.logo());
    println!("Signing: {}", persona.signatory()?);

    persona.set_signatory("director")?;
    println!("Signing: {}", persona.signatory()?);

    Ok(())
}
