//! Literal-only reader for Python cartridge files.
//!
//! Historically a cartridge could be a Python module exposing a module-level
//! `cartridge` variable. Executing arbitrary source to recover that value is
//! off the table, so this module scans the file instead: it walks the source
//! statement by statement, finds top-level `cartridge = <literal>` bindings,
//! and evaluates the literal without running any code. The last binding wins,
//! matching Python's rebinding behavior. Everything else in the file
//! (imports, functions, docstrings, other assignments) is skipped unread.
//!
//! The accepted literal grammar covers quoted strings (including
//! triple-quoted), integers, floats, `True`/`False`/`None`, lists, tuples,
//! and dicts, nested to any depth, with brackets free to span lines. Tuples
//! come back as sequences. Any non-literal right-hand side is a
//! [`PythonError::Syntax`].

mod error;
mod scanner;

pub use error::PythonError;

use serde_yaml::Value;

/// Extract the last top-level `<name> = <literal>` binding from `source`.
///
/// Returns `Ok(None)` when the source scans cleanly but never binds `name`
/// at column zero.
///
/// # Example
///
/// ```rust
/// use flux_cartridge::python::extract_binding;
/// use flux_cartridge::Value;
///
/// let value = extract_binding("cartridge = 'foo'\n", "cartridge").unwrap();
/// assert_eq!(value, Some(Value::String("foo".into())));
/// ```
pub fn extract_binding(source: &str, name: &str) -> Result<Option<Value>, PythonError> {
    scanner::Scanner::new(source).scan_binding(name)
}
