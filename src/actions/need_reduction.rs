use crate::conditions::{fact_key, need_key};
use crate::{Action, ActionStatus, AgentState, Conditions, GoapError, Result, WorldState};

/// Satisfies a need at a location: eat at the table, sleep in the bed.
///
/// Requires the agent to be at the location (`location_fact` is true), takes
/// `duration` seconds, then sets the need to `target_value` and clears the
/// location fact.
///
/// # Examples
///
/// ```
/// use goap_needs::{Action, NeedReductionAction};
///
/// let sleep = NeedReductionAction::new("sleep", 2.0, "fatigue", 0.0, "at_bed", 8.0).unwrap();
/// assert_eq!(sleep.effects().len(), 2);
/// assert!(sleep.effects().contains_key("need_fatigue"));
/// assert!(sleep.effects().contains_key("fact_at_bed"));
/// ```
#[derive(Debug, Clone)]
pub struct NeedReductionAction {
    action_type: String,
    cost: f32,
    need: String,
    target_value: f32,
    location_fact: String,
    duration: f32,
    effects: Conditions,
    elapsed: f32,
    executing: bool,
}

impl NeedReductionAction {
    /// # Errors
    ///
    /// Returns `GoapError::InvalidActionCost` if the cost is zero or negative.
    pub fn new(
        action_type: impl Into<String>,
        cost: f32,
        need: impl Into<String>,
        target_value: f32,
        location_fact: impl Into<String>,
        duration: f32,
    ) -> Result<Self> {
        if !(cost > 0.0) {
            return Err(GoapError::InvalidActionCost);
        }
        let need = need.into();
        let location_fact = location_fact.into();
        let target_value = target_value.clamp(0.0, 1.0);

        let mut effects = Conditions::new();
        effects.set(need_key(&need), target_value);
        effects.set(fact_key(&location_fact), false);

        Ok(Self {
            action_type: action_type.into(),
            cost,
            need,
            target_value,
            location_fact,
            duration: duration.max(0.0),
            effects,
            elapsed: 0.0,
            executing: false,
        })
    }

    pub fn need(&self) -> &str {
        &self.need
    }

    pub fn target_value(&self) -> f32 {
        self.target_value
    }

    pub fn location_fact(&self) -> &str {
        &self.location_fact
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

impl Action for NeedReductionAction {
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
        world.fact(&self.location_fact)
    }

    fn start(&mut self, _agent: &AgentState, _world: &mut WorldState) {
        self.elapsed = 0.0;
        self.executing = true;
        log::debug!("{}: reducing '{}' for {}s", self.action_type, self.need, self.duration);
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
