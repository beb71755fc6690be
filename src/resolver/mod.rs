//! Cartridge discovery and parsing.
//!
//! Resolution is stateless and synchronous: every call re-reads the disk,
//! touches exactly one file, and surfaces failures immediately. There is no
//! caching across calls.

mod error;

pub use error::ResolveError;

use crate::python;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name searched for when no cartridge name is given.
pub const DEFAULT_CARTRIDGE_NAME: &str = "cartridge";

/// Module-level variable a Python cartridge must bind.
const CARTRIDGE_BINDING: &str = "cartridge";

/// Locates cartridge files relative to a base directory.
///
/// The free functions [`find_cartridge`] and [`find_cartridge_named`] resolve
/// against the process working directory; a `Resolver` pins the base
/// directory explicitly, which is what embedders and tests want.
///
/// # Example
///
/// ```rust,no_run
/// use flux_cartridge::Resolver;
///
/// let resolver = Resolver::with_base("cartridges");
/// let data = resolver.find("adventure")?;
/// # Ok::<(), flux_cartridge::ResolveError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    base: PathBuf,
}

impl Resolver {
    /// Create a resolver over the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver over an explicit base directory.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The directory bare names are resolved against.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Resolve the default cartridge name, `"cartridge"`.
    pub fn find_default(&self) -> Result<Value, ResolveError> {
        self.find(DEFAULT_CARTRIDGE_NAME)
    }

    /// Resolve `name` to a cartridge file and return its data.
    ///
    /// A name ending in `.yaml` or `.py` is read as exactly that file. A bare
    /// name tries `<name>.yaml` first and falls back to `<name>.py`; when
    /// both exist the YAML file wins. An absolute name bypasses the base
    /// directory.
    ///
    /// # Errors
    ///
    /// [`ResolveError::NotFound`] when no candidate file exists, otherwise
    /// whatever the chosen reader reports.
    pub fn find(&self, name: &str) -> Result<Value, ResolveError> {
        if name.ends_with(".yaml") {
            return read_yaml_cartridge(self.base.join(name));
        }
        if name.ends_with(".py") {
            return read_python_cartridge(self.base.join(name));
        }

        let yaml = self.base.join(format!("{name}.yaml"));
        if yaml.exists() {
            debug!(name, path = %yaml.display(), "resolved cartridge to YAML file");
            return read_yaml_cartridge(yaml);
        }

        let py = self.base.join(format!("{name}.py"));
        if py.exists() {
            debug!(name, path = %py.display(), "resolved cartridge to Python file");
            return read_python_cartridge(py);
        }

        Err(ResolveError::NotFound {
            name: name.to_string(),
        })
    }
}

/// Resolve the default cartridge name in the working directory.
///
/// Tries `cartridge.yaml`, then `cartridge.py`.
pub fn find_cartridge() -> Result<Value, ResolveError> {
    Resolver::new().find_default()
}

/// Resolve `name` in the working directory. See [`Resolver::find`].
pub fn find_cartridge_named(name: &str) -> Result<Value, ResolveError> {
    Resolver::new().find(name)
}

/// Parse the file at `path` as a YAML cartridge.
///
/// Uses a safe loader: YAML tags are never executed, the document is read
/// purely as data. The value comes back unchanged in shape, with nested
/// sequences and mappings preserved.
///
/// # Errors
///
/// [`ResolveError::FileNotFound`] when `path` does not exist,
/// [`ResolveError::Yaml`] when the content is malformed.
pub fn read_yaml_cartridge(path: impl AsRef<Path>) -> Result<Value, ResolveError> {
    let path = path.as_ref();
    let text = read_source(path)?;
    debug!(path = %path.display(), "reading YAML cartridge");
    serde_yaml::from_str(&text).map_err(|source| ResolveError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the file at `path` as a Python cartridge.
///
/// The source is scanned, never executed: the value of the last top-level
/// `cartridge = <literal>` binding is returned. See [`crate::python`] for
/// the accepted literal grammar.
///
/// # Errors
///
/// [`ResolveError::FileNotFound`] when `path` does not exist,
/// [`ResolveError::Python`] when the source is not literal-only, and
/// [`ResolveError::MissingBinding`] when no `cartridge` binding exists.
pub fn read_python_cartridge(path: impl AsRef<Path>) -> Result<Value, ResolveError> {
    let path = path.as_ref();
    let text = read_source(path)?;
    debug!(path = %path.display(), "reading Python cartridge");
    match python::extract_binding(&text, CARTRIDGE_BINDING) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(ResolveError::MissingBinding {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ResolveError::Python {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_source(path: &Path) -> Result<String, ResolveError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ResolveError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ResolveError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}
