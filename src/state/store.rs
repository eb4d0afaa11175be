//! Control state records and the lookup interface the diff engine reads from.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// ControlState is the editor state recorded for one control.
///
/// Only `name` is meaningful here; everything else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub name: String,

    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl ControlState {
    /// Creates a state with an empty payload.
    pub fn new(name: impl Into<String>) -> Self {
        ControlState {
            name: name.into(),
            data: serde_json::Map::new(),
        }
    }

    /// Adds a payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

/// ControlStateLookup retrieves control states by control identifier.
pub trait ControlStateLookup {
    /// Returns the state stored for `identifier`, if any.
    fn try_get_control_state(&self, identifier: &str) -> Option<&ControlState>;
}

impl ControlStateLookup for HashMap<String, ControlState> {
    fn try_get_control_state(&self, identifier: &str) -> Option<&ControlState> {
        self.get(identifier)
    }
}

impl ControlStateLookup for BTreeMap<String, ControlState> {
    fn try_get_control_state(&self, identifier: &str) -> Option<&ControlState> {
        self.get(identifier)
    }
}

impl<T: ControlStateLookup + ?Sized> ControlStateLookup for &T {
    fn try_get_control_state(&self, identifier: &str) -> Option<&ControlState> {
        (**self).try_get_control_state(identifier)
    }
}

/// EditorStateStore is an in-memory list of control states.
///
/// States are indexed by name before the first lookup, so the store should be
/// treated as immutable while it is being read. `insert` resets the index.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EditorStateStore {
    #[serde(default)]
    states: Vec<ControlState>,

    #[serde(skip)]
    index: OnceCell<HashMap<String, usize>>,
}

impl Clone for EditorStateStore {
    fn clone(&self) -> Self {
        EditorStateStore {
            states: self.states.clone(),
            index: OnceCell::new(),
        }
    }
}

impl EditorStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        EditorStateStore::default()
    }

    /// Creates a store from a list of states. Later states win on name clashes.
    pub fn from_states(states: Vec<ControlState>) -> Self {
        let mut store = EditorStateStore::new();
        for state in states {
            store.insert(state);
        }
        store
    }

    /// Parse a store from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let store: EditorStateStore = serde_json::from_str(json)?;
        Ok(EditorStateStore::from_states(store.states))
    }

    /// Parse a store from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let store: EditorStateStore = serde_yaml::from_str(yaml)?;
        Ok(EditorStateStore::from_states(store.states))
    }

    /// Inserts a state, replacing any state with the same name.
    ///
    /// The name index is updated in place rather than rebuilt.
    pub fn insert(&mut self, state: ControlState) {
        let mut index = self.index.take().unwrap_or_else(|| build_index(&self.states));
        match index.get(&state.name).copied() {
            Some(i) => self.states[i] = state,
            None => {
                index.insert(state.name.clone(), self.states.len());
                self.states.push(state);
            }
        }
        self.index = OnceCell::from(index);
    }

    /// Returns the number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the store holds no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns an iterator over the stored states in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ControlState> {
        self.states.iter()
    }

    fn index(&self) -> &HashMap<String, usize> {
        self.index.get_or_init(|| build_index(&self.states))
    }
}

fn build_index(states: &[ControlState]) -> HashMap<String, usize> {
    states
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.clone(), i))
        .collect()
}

impl ControlStateLookup for EditorStateStore {
    fn try_get_control_state(&self, identifier: &str) -> Option<&ControlState> {
        self.index().get(identifier).map(|&i| &self.states[i])
    }
}
