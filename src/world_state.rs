//! World state shared by the agents of one region.
//!
//! This module provides the [`WorldState`] structure, which holds:
//! - boolean facts (`at_food`, `door_open`, ...) that preconditions test,
//! - a blackboard of arbitrary shared values keyed by string,
//! - a registry of points of interest (POIs) grouped by kind, with nearest
//!   lookup from a position.
//!
//! POIs are registered as [`Location`]s owned by whoever spawned them. The world
//! only keeps weak references, so dropping the last `Arc<Location>` destroys the
//! POI; stale entries are pruned the next time their kind is queried.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use glam::Vec3;
//! use goap_needs::{Location, WorldState};
//!
//! let mut world = WorldState::new();
//! world.set_fact("daytime", true);
//!
//! let pantry = Arc::new(Location::new("pantry", Vec3::new(10.0, 0.0, 0.0)));
//! let orchard = Arc::new(Location::new("orchard", Vec3::new(2.0, 0.0, 0.0)));
//! world.register_poi("food", &pantry);
//! world.register_poi("food", &orchard);
//!
//! assert_eq!(world.nearest_poi("food", Vec3::ZERO).unwrap().id(), "orchard");
//!
//! // Destroying a location removes it from future queries
//! drop(orchard);
//! assert_eq!(world.nearest_poi("food", Vec3::ZERO).unwrap().id(), "pantry");
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use glam::Vec3;

/// A point of interest in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    id: String,
    position: Vec3,
}

impl Location {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

/// Nearest point-of-interest lookup, the spatial service movement actions use.
pub trait SpatialQuery {
    /// Position of the registered location of kind `tag` closest to `origin`.
    fn nearest(&mut self, tag: &str, origin: Vec3) -> Option<Vec3>;
}

type BlackboardValue = Arc<dyn Any + Send + Sync>;

/// Facts, blackboard and POI registry for a region of the world.
///
/// Cloning a `WorldState` is shallow for blackboard values and POIs: the clone
/// shares the same underlying objects, which is what planning over a shadow
/// copy needs.
#[derive(Clone, Default)]
pub struct WorldState {
    facts: HashMap<String, bool>,
    blackboard: HashMap<String, BlackboardValue>,
    pois: HashMap<String, Vec<Weak<Location>>>,
}

impl WorldState {
    /// Creates an empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world state from an existing fact table.
    pub fn from_facts(facts: HashMap<String, bool>) -> Self {
        Self {
            facts,
            ..Self::default()
        }
    }

    pub fn set_fact(&mut self, name: impl Into<String>, value: bool) {
        self.facts.insert(name.into(), value);
    }

    /// Value of a fact; facts that were never set read as `false`.
    pub fn fact(&self, name: &str) -> bool {
        self.facts.get(name).copied().unwrap_or(false)
    }

    pub fn has_fact(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    pub fn remove_fact(&mut self, name: &str) -> Option<bool> {
        self.facts.remove(name)
    }

    pub fn facts(&self) -> &HashMap<String, bool> {
        &self.facts
    }

    /// Checks that every listed fact has the given value.
    pub fn satisfies(&self, required: &HashMap<String, bool>) -> bool {
        required
            .iter()
            .all(|(name, value)| self.fact(name) == *value)
    }

    /// Stores a shared value on the blackboard, replacing any previous entry.
    pub fn set_data<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.blackboard.insert(key.into(), Arc::new(value));
    }

    /// Typed read from the blackboard. Returns `None` if the key is missing or
    /// holds a value of another type.
    pub fn data<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.blackboard
            .get(key)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    pub fn has_data(&self, key: &str) -> bool {
        self.blackboard.contains_key(key)
    }

    pub fn remove_data(&mut self, key: &str) -> bool {
        self.blackboard.remove(key).is_some()
    }

    /// Registers a location under `kind`. Registering the same location twice
    /// is a no-op.
    pub fn register_poi(&mut self, kind: impl Into<String>, location: &Arc<Location>) {
        let entries = self.pois.entry(kind.into()).or_default();
        let weak = Arc::downgrade(location);
        if !entries.iter().any(|existing| existing.ptr_eq(&weak)) {
            entries.push(weak);
        }
    }

    /// Removes a location from `kind`. Returns whether it was registered.
    pub fn unregister_poi(&mut self, kind: &str, location: &Arc<Location>) -> bool {
        let Some(entries) = self.pois.get_mut(kind) else {
            return false;
        };
        let weak = Arc::downgrade(location);
        let before = entries.len();
        entries.retain(|existing| !existing.ptr_eq(&weak));
        before != entries.len()
    }

    /// Live locations of `kind` after pruning destroyed ones.
    pub fn pois(&mut self, kind: &str) -> Vec<Arc<Location>> {
        self.prune(kind);
        self.pois
            .get(kind)
            .map(|entries| entries.iter().filter_map(Weak::upgrade).collect())
            .unwrap_or_default()
    }

    pub fn poi_count(&mut self, kind: &str) -> usize {
        self.prune(kind);
        self.pois.get(kind).map_or(0, Vec::len)
    }

    /// Whether at least one location of `kind` is still alive. Does not prune.
    pub fn has_live_poi(&self, kind: &str) -> bool {
        self.pois
            .get(kind)
            .is_some_and(|entries| entries.iter().any(|e| e.strong_count() > 0))
    }

    /// The live location of `kind` closest to `origin`. Ties go to the earliest
    /// registration.
    ///
    /// The returned `Arc` keeps the location alive while it is held; store a
    /// `Weak` to follow it without owning it.
    pub fn nearest_poi(&mut self, kind: &str, origin: Vec3) -> Option<Arc<Location>> {
        self.prune(kind);
        let mut best: Option<(f32, Arc<Location>)> = None;
        for location in self.pois.get(kind)?.iter().filter_map(Weak::upgrade) {
            let distance = location.position().distance_squared(origin);
            if best.as_ref().map_or(true, |(d, _)| distance < *d) {
                best = Some((distance, location));
            }
        }
        best.map(|(_, location)| location)
    }

    fn prune(&mut self, kind: &str) {
        if let Some(entries) = self.pois.get_mut(kind) {
            let before = entries.len();
            entries.retain(|e| e.strong_count() > 0);
            if entries.len() != before {
                log::debug!(
                    "Pruned {} stale '{}' locations",
                    before - entries.len(),
                    kind
                );
            }
        }
    }
}

impl SpatialQuery for WorldState {
    fn nearest(&mut self, tag: &str, origin: Vec3) -> Option<Vec3> {
        self.nearest_poi(tag, origin).map(|location| location.position())
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut blackboard_keys: Vec<_> = self.blackboard.keys().collect();
        blackboard_keys.sort();
        f.debug_struct("WorldState")
            .field("facts", &self.facts)
            .field("blackboard", &blackboard_keys)
            .field("pois", &self.pois.keys().collect::<Vec<_>>())
            .finish()
    }
}
