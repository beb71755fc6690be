//! Cartridge loading for the Flux state machine.
//!
//! A *cartridge* is an external definition of states, prompts, events, and
//! data that a Flux machine runs against. Cartridges live on disk either as
//! YAML documents or as legacy Python modules binding a module-level
//! `cartridge` variable. This crate locates the right file for a cartridge
//! name, parses it, and hands back the data.
//!
//! # Resolution
//!
//! [`find_cartridge`] and [`Resolver::find`] try, in order: the exact file
//! when the name already carries a `.yaml` or `.py` extension, then
//! `<name>.yaml`, then `<name>.py`. When both extension variants exist the
//! YAML file wins and the Python file is ignored for that lookup.
//!
//! Python cartridges are never executed: only a top-level
//! `cartridge = <literal>` binding is recognized. See the [`python`] module.
//!
//! # Example
//!
//! ```rust,no_run
//! use flux_cartridge::{Cartridge, Resolver};
//!
//! let resolver = Resolver::with_base("cartridges");
//!
//! // Raw data, whatever shape the file holds.
//! let value = resolver.find("adventure")?;
//!
//! // Typed view for state-table cartridges.
//! let cartridge = Cartridge::from_value(value).unwrap();
//! for (name, state) in cartridge.states() {
//!     println!("{name}: {}", state.prompt);
//! }
//! # Ok::<(), flux_cartridge::ResolveError>(())
//! ```

pub mod python;
pub mod resolver;
pub mod schema;

// Re-export commonly used types
pub use python::PythonError;
pub use resolver::{
    find_cartridge, find_cartridge_named, read_python_cartridge, read_yaml_cartridge,
    ResolveError, Resolver, DEFAULT_CARTRIDGE_NAME,
};
pub use schema::{Cartridge, SchemaError, StateDef};

/// Raw cartridge data as returned by resolution.
pub use serde_yaml::Value;
