//! Typed view over raw cartridge data.
//!
//! Resolution hands back a plain [`Value`]; cartridges that follow the Flux
//! convention describe a mapping from state name to a state table with a
//! role, a prompt, events, seed data, and optional `before`/`after` hook
//! names. [`Cartridge::from_value`] interprets a raw value as that shape.
//!
//! Hooks are carried as opaque names only. Running them (and state
//! transitions in general) belongs to the machine, not to cartridge loading.

mod error;

pub use error::SchemaError;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// One state's definition inside a cartridge.
///
/// Every field defaults, so sparse state tables deserialize: a state may
/// carry nothing but a prompt, or nothing at all.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct StateDef {
    /// Role the machine assumes while in this state.
    #[serde(default)]
    pub role: Option<String>,

    /// Prompt presented on entering the state.
    #[serde(default)]
    pub prompt: String,

    /// Events the state reacts to, kept as raw data.
    #[serde(default)]
    pub events: Vec<Value>,

    /// Seed data scoped to the state.
    #[serde(default)]
    pub data: Mapping,

    /// Name of a hook to run before the state's work.
    #[serde(default)]
    pub before: Option<String>,

    /// Name of a hook to run after the state's work.
    #[serde(default)]
    pub after: Option<String>,
}

/// A full cartridge: state name to state definition.
///
/// # Example
///
/// ```rust
/// use flux_cartridge::Cartridge;
///
/// let value = serde_yaml::from_str(
///     "START:\n  prompt: 'hello'\n  data:\n    foo: bar\n",
/// )
/// .unwrap();
/// let cartridge = Cartridge::from_value(value).unwrap();
///
/// assert_eq!(cartridge.start().unwrap().prompt, "hello");
/// ```
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cartridge {
    states: BTreeMap<String, StateDef>,
}

impl Cartridge {
    /// Conventional name of the entry state.
    pub const START_STATE: &'static str = "START";

    /// Interpret raw cartridge data as a state table.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidShape`] when the value is not a mapping of
    /// state definitions (a bare string cartridge, for example).
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let states = serde_yaml::from_value(value).map_err(SchemaError::InvalidShape)?;
        Ok(Self { states })
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&StateDef> {
        self.states.get(name)
    }

    /// The conventional `START` state, if the cartridge defines one.
    pub fn start(&self) -> Option<&StateDef> {
        self.state(Self::START_STATE)
    }

    /// All states, keyed by name.
    pub fn states(&self) -> &BTreeMap<String, StateDef> {
        &self.states
    }

    /// Number of states defined.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the cartridge defines no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "\
START:
  role: narrator
  prompt: 'welcome'
  events:
    - look
    - quit
  data:
    foo: bar
DOTHING:
  prompt: 'doing'
  before: change_data
";

    #[test]
    fn full_cartridge_deserializes() {
        let value: Value = serde_yaml::from_str(FULL).unwrap();
        let cartridge = Cartridge::from_value(value).unwrap();

        assert_eq!(cartridge.len(), 2);
        let start = cartridge.start().unwrap();
        assert_eq!(start.role.as_deref(), Some("narrator"));
        assert_eq!(start.prompt, "welcome");
        assert_eq!(start.events.len(), 2);
        assert_eq!(
            start.data.get(Value::String("foo".into())),
            Some(&Value::String("bar".into()))
        );
        assert!(start.before.is_none());

        let dothing = cartridge.state("DOTHING").unwrap();
        assert_eq!(dothing.before.as_deref(), Some("change_data"));
        assert!(dothing.events.is_empty());
    }

    #[test]
    fn sparse_states_default() {
        let value: Value = serde_yaml::from_str("IDLE: {}").unwrap();
        let cartridge = Cartridge::from_value(value).unwrap();

        let idle = cartridge.state("IDLE").unwrap();
        assert_eq!(idle, &StateDef::default());
    }

    #[test]
    fn scalar_cartridge_is_invalid_shape() {
        let err = Cartridge::from_value(Value::String("foo".into())).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidShape(_)));
    }

    #[test]
    fn empty_mapping_is_an_empty_cartridge() {
        let cartridge = Cartridge::from_value(Value::Mapping(Mapping::new())).unwrap();
        assert!(cartridge.is_empty());
        assert!(cartridge.start().is_none());
    }

    #[test]
    fn cartridge_roundtrips_through_json() {
        let value: Value = serde_yaml::from_str(FULL).unwrap();
        let cartridge = Cartridge::from_value(value).unwrap();

        let json = serde_json::to_string(&cartridge).unwrap();
        let back: Cartridge = serde_json::from_str(&json).unwrap();
        assert_eq!(cartridge, back);
    }
}
