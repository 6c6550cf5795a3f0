use std::sync::{Arc, Weak};

use glam::Vec3;

use crate::conditions::fact_key;
use crate::{
    Action, ActionStatus, AgentState, Conditions, GoapError, Location, Result, SharedNavigator,
    WorldState,
};

/// Walks the agent to the nearest point of interest of a kind.
///
/// On start the nearest live location of `poi_kind` is resolved from the
/// navigator's position. Each update advances the navigator; the action
/// reports `Running` until the agent is within `stopping_distance`, then
/// `Success`. Without a navigator or a target it reports `Failed`, and so it
/// does when the target location is destroyed on the way.
///
/// On success `location_fact` becomes true, which is what location-bound
/// actions such as [`NeedReductionAction`](crate::NeedReductionAction) require.
#[derive(Debug)]
pub struct MoveToAction {
    action_type: String,
    cost: f32,
    poi_kind: String,
    location_fact: String,
    stopping_distance: f32,
    effects: Conditions,
    navigator: Option<SharedNavigator>,
    target: Option<Weak<Location>>,
    executing: bool,
}

impl MoveToAction {
    /// # Errors
    ///
    /// Returns `GoapError::InvalidActionCost` if the cost is zero or negative.
    pub fn new(
        action_type: impl Into<String>,
        cost: f32,
        poi_kind: impl Into<String>,
        location_fact: impl Into<String>,
        stopping_distance: f32,
    ) -> Result<Self> {
        if !(cost > 0.0) {
            return Err(GoapError::InvalidActionCost);
        }
        let location_fact = location_fact.into();
        let mut effects = Conditions::new();
        effects.set(fact_key(&location_fact), true);

        Ok(Self {
            action_type: action_type.into(),
            cost,
            poi_kind: poi_kind.into(),
            location_fact,
            stopping_distance: stopping_distance.max(0.0),
            effects,
            navigator: None,
            target: None,
            executing: false,
        })
    }

    pub fn with_navigator(mut self, navigator: SharedNavigator) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn bind_navigator(&mut self, navigator: SharedNavigator) {
        self.navigator = Some(navigator);
    }

    pub fn poi_kind(&self) -> &str {
        &self.poi_kind
    }

    pub fn location_fact(&self) -> &str {
        &self.location_fact
    }

    /// Position of the destination resolved by the last `start`, while that
    /// location still exists.
    pub fn target(&self) -> Option<Vec3> {
        self.target
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|location| location.position())
    }
}

impl Action for MoveToAction {
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
        !world.fact(&self.location_fact) && world.has_live_poi(&self.poi_kind)
    }

    fn start(&mut self, _agent: &AgentState, world: &mut WorldState) {
        self.executing = true;
        self.target = None;
        let Some(navigator) = &self.navigator else {
            log::warn!("{}: no navigator bound", self.action_type);
            return;
        };
        let origin = navigator.borrow().position();
        match world.nearest_poi(&self.poi_kind, origin) {
            Some(location) => {
                navigator.borrow_mut().set_destination(location.position());
                self.target = Some(Arc::downgrade(&location));
            }
            None => log::warn!("{}: no '{}' location to move to", self.action_type, self.poi_kind),
        }
    }

    fn update(&mut self, _agent: &mut AgentState, _world: &mut WorldState, dt: f32) -> ActionStatus {
        if !self.executing {
            return ActionStatus::Failed;
        }
        let (Some(navigator), Some(target)) = (&self.navigator, &self.target) else {
            self.executing = false;
            return ActionStatus::Failed;
        };

        let mut navigator = navigator.borrow_mut();
        let Some(location) = target.upgrade() else {
            log::warn!("{}: destination '{}' no longer exists", self.action_type, self.poi_kind);
            navigator.stop();
            self.executing = false;
            return ActionStatus::Failed;
        };
        navigator.advance(dt);
        if navigator.position().distance(location.position()) <= self.stopping_distance {
            navigator.stop();
            self.executing = false;
            ActionStatus::Success
        } else {
            ActionStatus::Running
        }
    }

    fn cancel(&mut self) {
        if self.executing {
            if let Some(navigator) = &self.navigator {
                navigator.borrow_mut().stop();
            }
        }
        self.target = None;
        self.executing = false;
    }

    fn is_executing(&self) -> bool {
        self.executing
    }
}
