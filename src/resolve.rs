//! Resolution of file references found in documents.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Turns a relative file reference into a fully-qualified location.
///
/// Documents refer to files (logos and the like) relative to the instance
/// they belong to; the loader supplies the resolver that knows where that is.
pub trait PathResolver: fmt::Debug {
    fn resolve(&self, reference: &str) -> PathBuf;
}

/// Resolves references under a fixed instance root directory.
///
/// Absolute references are returned unchanged. Can be deserialized from the
/// loader's own configuration:
///
/// ```
/// use schema_fnd::{InstanceRoot, PathResolver};
///
/// let root: InstanceRoot = toml::from_str(r#"root = "/srv/instance""#).unwrap();
/// assert_eq!(
///     root.resolve("images/logo.png"),
///     std::path::Path::new("/srv/instance/images/logo.png"),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstanceRoot {
    root: PathBuf,
}

impl InstanceRoot {
    /// Resolves relative references under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The instance root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for InstanceRoot {
    fn resolve(&self, reference: &str) -> PathBuf {
        let reference = Path::new(reference);
        if reference.is_absolute() {
            reference.to_path_buf()
        } else {
            self.root.join(reference)
        }
    }
}
