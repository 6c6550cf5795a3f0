//! # Conditions: typed key-value maps for goals and effects
//!
//! A [`Conditions`] map is how goals declare what they want and how actions
//! declare what they change. Keys are plain strings; the prefix of an effect
//! key decides where the value lands when the effect is applied:
//!
//! | prefix    | target                                  | value            |
//! |-----------|-----------------------------------------|------------------|
//! | `need_`   | [`AgentState`] need (clamped to [0, 1]) | float or integer |
//! | `fact_`   | [`WorldState`] fact                     | bool             |
//! | `item_`   | [`AgentState`] inventory, signed delta  | integer          |
//! | `effect_` | [`AgentState`] timed effect duration    | float or integer |
//!
//! The planner only simulates `need_` and `fact_` keys; inventory and timed
//! effects are applied for real by the executor once an action succeeds.
//!
//! ```
//! use goap_needs::{AgentState, Conditions, WorldState};
//!
//! let mut effects = Conditions::new();
//! effects.set("need_hunger", 0.0);
//! effects.set("fact_at_food", false);
//!
//! let mut agent = AgentState::new();
//! agent.set_need("hunger", 0.9);
//! let mut world = WorldState::new();
//! world.set_fact("at_food", true);
//!
//! effects.apply(&mut agent, &mut world);
//! assert_eq!(agent.need("hunger"), 0.0);
//! assert!(!world.fact("at_food"));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AgentState, WorldState};

/// Prefix routing an effect to an agent need
pub const NEED_PREFIX: &str = "need_";
/// Prefix routing an effect to a world fact
pub const FACT_PREFIX: &str = "fact_";
/// Prefix routing an effect to an inventory count
pub const ITEM_PREFIX: &str = "item_";
/// Prefix routing an effect to a timed agent effect
pub const EFFECT_PREFIX: &str = "effect_";

/// Builds the effect key for a need, e.g. `need_hunger`.
pub fn need_key(need: &str) -> String {
    format!("{NEED_PREFIX}{need}")
}

/// Builds the effect key for a world fact, e.g. `fact_at_food`.
pub fn fact_key(fact: &str) -> String {
    format!("{FACT_PREFIX}{fact}")
}

/// A single typed value in a [`Conditions`] map.
///
/// Deserializes untagged: `true` is a `Bool`, `3` an `Int` and `0.5` a `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f32),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f32`.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Value::Float(f) => Some(f),
            Value::Int(i) => Some(i as f32),
            Value::Bool(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value as f32)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A string-keyed map of [`Value`]s.
///
/// Used for goal desired states, action effects and data-driven action
/// preconditions.
///
/// # Examples
///
/// ```
/// use goap_needs::{Conditions, Value};
///
/// let mut desired = Conditions::new();
/// desired.set("need_hunger", 0.0);
///
/// let mut effects = Conditions::new();
/// effects.set("need_hunger", 0.0);
/// effects.set("fact_at_food", false);
///
/// assert_eq!(effects.overlap(&desired), 1);
/// assert_eq!(effects.get("fact_at_food"), Some(Value::Bool(false)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions {
    values: HashMap<String, Value>,
}

impl Conditions {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Sets a value for the key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).copied()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Read-only access to the underlying map.
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    /// Counts the keys present in both maps. Values are not compared.
    ///
    /// This is the planner's relevance measure between an action's effects
    /// and a goal's desired state.
    pub fn overlap(&self, other: &Conditions) -> usize {
        self.values
            .keys()
            .filter(|key| other.values.contains_key(*key))
            .count()
    }

    /// Applies only the `need_` and `fact_` entries, the part of an effect
    /// set the planner can reason about.
    pub fn simulate(&self, agent: &mut AgentState, world: &mut WorldState) {
        for (key, value) in &self.values {
            if let Some(need) = key.strip_prefix(NEED_PREFIX) {
                Self::apply_need(agent, need, value);
            } else if let Some(fact) = key.strip_prefix(FACT_PREFIX) {
                Self::apply_fact(world, fact, value);
            }
        }
    }

    /// Applies every routed entry to the agent and world. Keys without a known
    /// prefix and values of the wrong type are skipped.
    pub fn apply(&self, agent: &mut AgentState, world: &mut WorldState) {
        for (key, value) in &self.values {
            if let Some(need) = key.strip_prefix(NEED_PREFIX) {
                Self::apply_need(agent, need, value);
            } else if let Some(fact) = key.strip_prefix(FACT_PREFIX) {
                Self::apply_fact(world, fact, value);
            } else if let Some(item) = key.strip_prefix(ITEM_PREFIX) {
                Self::apply_item(agent, item, value);
            } else if let Some(effect) = key.strip_prefix(EFFECT_PREFIX) {
                match value.as_f32() {
                    Some(duration) => agent.add_effect(effect, duration),
                    None => log::warn!("Effect '{}' expects a duration, got {}", key, value),
                }
            } else {
                log::debug!("Ignoring effect '{}' with unknown prefix", key);
            }
        }
    }

    fn apply_need(agent: &mut AgentState, need: &str, value: &Value) {
        match value.as_f32() {
            Some(v) => agent.set_need(need, v),
            None => log::warn!("Need '{}' expects a number, got {}", need, value),
        }
    }

    fn apply_fact(world: &mut WorldState, fact: &str, value: &Value) {
        match value.as_bool() {
            Some(v) => world.set_fact(fact, v),
            None => log::warn!("Fact '{}' expects a bool, got {}", fact, value),
        }
    }

    fn apply_item(agent: &mut AgentState, item: &str, value: &Value) {
        let Some(delta) = value.as_i64() else {
            log::warn!("Item '{}' expects an integer delta, got {}", item, value);
            return;
        };
        let amount = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
        if delta >= 0 {
            agent.add_item(item, amount);
        } else if let Err(e) = agent.remove_item(item, amount) {
            log::warn!("Skipping inventory effect: {}", e);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (key, value) in iter {
            conditions.set(key, value);
        }
        conditions
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<_> = self.values.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "{{")?;
        for (i, (key, value)) in items.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}
