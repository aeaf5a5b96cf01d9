//! Path resolution: identifier -> `root/<identifier>.<extension>`.
//!
//! Pure string/path composition. The root and the name are concatenated with
//! a `/`, never `Path::join`ed, so a leading `/` in the name stays under the
//! root. Identifiers are otherwise not sanitized: `..` segments can still
//! escape the root. Callers that accept untrusted identifiers must validate
//! them first.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
    extension: String,
}

impl PathResolver {
    /// `extension` is given without the leading dot.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `<identifier>.<extension>`
    pub fn file_name(&self, identifier: &str) -> String {
        format!("{}.{}", identifier, self.extension)
    }

    /// Full path of the artifact an upload of `identifier` produces.
    pub fn resolve(&self, identifier: &str) -> PathBuf {
        self.under_root(&self.file_name(identifier))
    }

    /// `root/<name>` with no extension appended. Used by retrieval, which
    /// expects the caller to pass the stored file name.
    pub fn resolve_raw(&self, name: &str) -> PathBuf {
        self.under_root(name)
    }

    // `root/name` by concatenation. An absolute `name` must not replace the root.
    fn under_root(&self, name: &str) -> PathBuf {
        let mut path = OsString::from(self.root.as_os_str());
        path.push("/");
        path.push(name);
        PathBuf::from(path)
    }
}
