//! Binding context shared by transforms during construction.

use std::path::PathBuf;

use crate::resolve::PathResolver;

/// Collaborators available to element transforms while a document is bound.
///
/// Holds only borrowed state, so it is cheap to copy into nested
/// constructions (collection members, sub-objects).
///
/// ## Example
///
/// ```
/// use schema_fnd::{BindContext, InstanceRoot};
///
/// let root = InstanceRoot::new("/srv/acme");
/// let ctx = BindContext::new(&root);
/// assert_eq!(ctx.resolve("logo.png"), std::path::Path::new("/srv/acme/logo.png"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BindContext<'a> {
    resolver: &'a dyn PathResolver,
}

impl<'a> BindContext<'a> {
    /// A context resolving file references through `resolver`.
    pub fn new(resolver: &'a dyn PathResolver) -> Self {
        Self { resolver }
    }

    /// Returns the resolver backing this context.
    pub fn resolver(&self) -> &'a dyn PathResolver {
        self.resolver
    }

    /// Resolves a file reference through the configured resolver.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.resolver.resolve(reference)
    }
}
