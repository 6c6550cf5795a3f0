use std::collections::HashMap;

use crate::{Action, ActionStatus, AgentState, Conditions, GoapError, Result, WorldState};

/// A data-driven action: fact preconditions, declared effects, fixed duration.
///
/// # Examples
///
/// ```
/// use goap_needs::{Action, AgentState, TimedAction, WorldState};
///
/// let chop = TimedAction::new("chop_wood", 2.0, 3.0)
///     .unwrap()
///     .with_precondition("has_axe", true)
///     .with_effect("item_wood", 2);
///
/// let mut world = WorldState::new();
/// assert!(!chop.check_preconditions(&AgentState::new(), &world));
/// world.set_fact("has_axe", true);
/// assert!(chop.check_preconditions(&AgentState::new(), &world));
/// ```
#[derive(Debug, Clone)]
pub struct TimedAction {
    action_type: String,
    cost: f32,
    duration: f32,
    preconditions: HashMap<String, bool>,
    effects: Conditions,
    elapsed: f32,
    executing: bool,
}

impl TimedAction {
    /// # Errors
    ///
    /// Returns `GoapError::InvalidActionCost` if the cost is zero or negative.
    pub fn new(action_type: impl Into<String>, cost: f32, duration: f32) -> Result<Self> {
        if !(cost > 0.0) {
            return Err(GoapError::InvalidActionCost);
        }
        Ok(Self {
            action_type: action_type.into(),
            cost,
            duration: duration.max(0.0),
            preconditions: HashMap::new(),
            effects: Conditions::new(),
            elapsed: 0.0,
            executing: false,
        })
    }

    pub fn with_precondition(mut self, fact: impl Into<String>, value: bool) -> Self {
        self.preconditions.insert(fact.into(), value);
        self
    }

    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.effects.set(key, value);
        self
    }

    pub fn with_effects(mut self, effects: Conditions) -> Self {
        self.effects = effects;
        self
    }

    pub fn preconditions(&self) -> &HashMap<String, bool> {
        &self.preconditions
    }

    pub fn effects_mut(&mut self) -> &mut Conditions {
        &mut self.effects
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Action for TimedAction {
    fn action_type(&self) -> &str {
        &self.action_type
    }

    fn cost(&self) -> f32 {
        self.cost
    }

    fn effects(&self) -> &Conditions {
        &self.effects
    }

    fn check_preconditions(&self, _agent: &AgentState, world: &WorldState) -> bool {
        world.satisfies(&self.preconditions)
    }

    fn start(&mut self, _agent: &AgentState, _world: &mut WorldState) {
        self.elapsed = 0.0;
        self.executing = true;
    }

    fn update(&mut self, _agent: &mut AgentState, _world: &mut WorldState, dt: f32) -> ActionStatus {
        if !self.executing {
            return ActionStatus::Failed;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            self.executing = false;
            ActionStatus::Success
        } else {
            ActionStatus::Running
        }
    }

    fn cancel(&mut self) {
        self.elapsed = 0.0;
        self.executing = false;
    }

    fn is_executing(&self) -> bool {
        self.executing
    }
}
