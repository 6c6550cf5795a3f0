//! # Action Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides the core action components for a GOAP system.
//!
//! ## Key Components
//!
//! * [`Action`]: the capability every action implements: a precondition check,
//!   declared effects, a cost, and a start/update/cancel/apply lifecycle
//! * [`ActionStatus`]: what one tick of an action reports
//! * [`ActionLibrary`]: the ordered set of actions an agent can choose from
//!
//! ## Lifecycle
//!
//! An action is executed by the [`Executor`](crate::Executor) over many ticks:
//!
//! 1. `check_preconditions` against the live state,
//! 2. `start`,
//! 3. `update(dt)` every tick until it returns `Success` or `Failed`,
//! 4. on `Success` the executor calls `apply_effects`; on `Failed` or
//!    `cancel` no effects are applied and the transient state resets.
//!
//! ## Custom Actions
//!
//! ```
//! use goap_needs::{Action, ActionStatus, AgentState, Conditions, WorldState};
//!
//! #[derive(Debug)]
//! struct Whistle {
//!     effects: Conditions,
//!     executing: bool,
//! }
//!
//! impl Action for Whistle {
//!     fn action_type(&self) -> &str {
//!         "whistle"
//!     }
//!
//!     fn cost(&self) -> f32 {
//!         0.5
//!     }
//!
//!     fn effects(&self) -> &Conditions {
//!         &self.effects
//!     }
//!
//!     fn check_preconditions(&self, _agent: &AgentState, world: &WorldState) -> bool {
//!         world.fact("awake")
//!     }
//!
//!     fn start(&mut self, _agent: &AgentState, _world: &mut WorldState) {
//!         self.executing = true;
//!     }
//!
//!     fn update(&mut self, _agent: &mut AgentState, _world: &mut WorldState, _dt: f32) -> ActionStatus {
//!         self.executing = false;
//!         ActionStatus::Success
//!     }
//!
//!     fn cancel(&mut self) {
//!         self.executing = false;
//!     }
//!
//!     fn is_executing(&self) -> bool {
//!         self.executing
//!     }
//! }
//! ```

use std::fmt;

use crate::{AgentState, Conditions, GoapError, Result, WorldState};

/// Outcome of a single action tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// Still working; call `update` again next tick
    Running,
    /// Finished; the executor applies the declared effects
    Success,
    /// Cannot proceed; the plan fails
    Failed,
}

/// Represents an action in the GOAP system.
///
/// An action has:
/// - a type that uniquely identifies it inside an [`ActionLibrary`]
/// - a positive cost used by the planner's score
/// - preconditions, checked against agent and world state
/// - declared effects, applied only when the action succeeds
/// - transient execution state, reset by `start` and `cancel`
pub trait Action: fmt::Debug {
    fn action_type(&self) -> &str;

    fn cost(&self) -> f32;

    /// Declared effects, see [`Conditions`] for the key prefixes.
    fn effects(&self) -> &Conditions;

    /// Whether the action can run on the given state.
    fn check_preconditions(&self, agent: &AgentState, world: &WorldState) -> bool;

    /// Begins an execution. Resets any progress from a previous run.
    fn start(&mut self, agent: &AgentState, world: &mut WorldState);

    /// Advances the execution by `dt` seconds.
    fn update(&mut self, agent: &mut AgentState, world: &mut WorldState, dt: f32) -> ActionStatus;

    /// Aborts the execution without applying effects.
    fn cancel(&mut self);

    fn is_executing(&self) -> bool;

    /// Applies the declared effects to the live state.
    fn apply_effects(&self, agent: &mut AgentState, world: &mut WorldState) {
        self.effects().apply(agent, world);
    }
}

/// Index of an action inside its [`ActionLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub usize);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The ordered set of actions available to an agent.
///
/// Insertion order matters: the planner breaks score ties in favour of the
/// action added first.
///
/// # Examples
///
/// ```
/// use goap_needs::{ActionLibrary, NeedReductionAction};
///
/// let mut actions = ActionLibrary::new();
/// let eat = actions
///     .add(NeedReductionAction::new("eat", 1.0, "hunger", 0.0, "at_food", 2.0).unwrap())
///     .unwrap();
///
/// assert_eq!(actions.get(eat).unwrap().action_type(), "eat");
/// assert_eq!(actions.find("eat"), Some(eat));
///
/// // Action types are unique
/// let again = NeedReductionAction::new("eat", 2.0, "hunger", 0.0, "at_food", 1.0).unwrap();
/// assert!(actions.add(again).is_err());
/// ```
#[derive(Debug, Default)]
pub struct ActionLibrary {
    actions: Vec<Box<dyn Action>>,
}

impl ActionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action and returns its id.
    ///
    /// # Errors
    ///
    /// - [`GoapError::ActionAlreadyInCollection`] if the type is taken
    /// - [`GoapError::InvalidActionCost`] if the cost is not positive
    pub fn add(&mut self, action: impl Action + 'static) -> Result<ActionId> {
        self.add_boxed(Box::new(action))
    }

    pub fn add_boxed(&mut self, action: Box<dyn Action>) -> Result<ActionId> {
        if self.find(action.action_type()).is_some() {
            return Err(GoapError::ActionAlreadyInCollection(
                action.action_type().to_string(),
            ));
        }
        if !(action.cost() > 0.0) {
            return Err(GoapError::InvalidActionCost);
        }
        self.actions.push(action);
        Ok(ActionId(self.actions.len() - 1))
    }

    pub fn get(&self, id: ActionId) -> Option<&dyn Action> {
        self.actions.get(id.0).map(|a| a.as_ref())
    }

    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut (dyn Action + 'static)> {
        self.actions.get_mut(id.0).map(|a| a.as_mut())
    }

    /// Looks an action up by type.
    pub fn find(&self, action_type: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|a| a.action_type() == action_type)
            .map(ActionId)
    }

    /// Actions in insertion order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &dyn Action)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, a)| (ActionId(i), a.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Display name for logs; unknown ids render as their index.
    pub(crate) fn name_of(&self, id: ActionId) -> String {
        self.get(id)
            .map(|a| a.action_type().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimedAction;

    #[test]
    fn test_add_and_lookup() {
        let mut library = ActionLibrary::new();
        let a = library.add(TimedAction::new("a", 1.0, 0.0).unwrap()).unwrap();
        let b = library.add(TimedAction::new("b", 2.0, 0.0).unwrap()).unwrap();
        assert_eq!(a, ActionId(0));
        assert_eq!(b, ActionId(1));
        assert_eq!(library.len(), 2);
        assert_eq!(library.find("b"), Some(b));
        assert_eq!(library.find("c"), None);
        assert_eq!(library.get(b).unwrap().cost(), 2.0);
        assert!(library.get(ActionId(7)).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut library = ActionLibrary::new();
        library.add(TimedAction::new("a", 1.0, 0.0).unwrap()).unwrap();
        let result = library.add(TimedAction::new("a", 3.0, 0.0).unwrap());
        assert!(matches!(
            result,
            Err(GoapError::ActionAlreadyInCollection(name)) if name == "a"
        ));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_iteration_order() {
        let mut library = ActionLibrary::new();
        for name in ["z", "m", "a"] {
            library.add(TimedAction::new(name, 1.0, 0.0).unwrap()).unwrap();
        }
        let names: Vec<_> = library.iter().map(|(_, a)| a.action_type()).collect();
        assert_eq!(names, ["z", "m", "a"]);
    }

    #[test]
    fn test_default_apply_effects() {
        let mut action = TimedAction::new("light", 1.0, 0.0).unwrap();
        action.effects_mut().set("fact_lit", true);
        let mut agent = AgentState::new();
        let mut world = WorldState::new();
        action.apply_effects(&mut agent, &mut world);
        assert!(world.fact("lit"));
    }
}
