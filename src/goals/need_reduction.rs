use crate::conditions::need_key;
use crate::{AgentState, Conditions, Goal, WorldState};

/// Bring a need back down once it crosses an activation threshold.
///
/// - applicable while `need >= activation_threshold`
/// - completed once `need <= target_value`
/// - priority is `need * priority_scale` while applicable, `0` otherwise
/// - desired state is `need_<need> = target_value`
///
/// # Examples
///
/// ```
/// use goap_needs::{AgentState, Goal, NeedReductionGoal, WorldState};
///
/// let eat = NeedReductionGoal::new("eat", "hunger", 0.5, 0.0, 10.0);
/// let mut agent = AgentState::new();
/// let world = WorldState::new();
///
/// agent.set_need("hunger", 0.4);
/// assert_eq!(eat.calculate_priority(&agent, &world), 0.0);
///
/// agent.set_need("hunger", 0.8);
/// assert!(eat.can_satisfy(&agent, &world));
/// assert!((eat.calculate_priority(&agent, &world) - 8.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct NeedReductionGoal {
    goal_type: String,
    need: String,
    activation_threshold: f32,
    target_value: f32,
    priority_scale: f32,
    desired_state: Conditions,
}

impl NeedReductionGoal {
    pub fn new(
        goal_type: impl Into<String>,
        need: impl Into<String>,
        activation_threshold: f32,
        target_value: f32,
        priority_scale: f32,
    ) -> Self {
        let need = need.into();
        let target_value = target_value.clamp(0.0, 1.0);
        let mut desired_state = Conditions::new();
        desired_state.set(need_key(&need), target_value);
        Self {
            goal_type: goal_type.into(),
            need,
            activation_threshold,
            target_value,
            priority_scale,
            desired_state,
        }
    }

    pub fn need(&self) -> &str {
        &self.need
    }

    pub fn activation_threshold(&self) -> f32 {
        self.activation_threshold
    }

    pub fn target_value(&self) -> f32 {
        self.target_value
    }
}

impl Goal for NeedReductionGoal {
    fn goal_type(&self) -> &str {
        &self.goal_type
    }

    fn can_satisfy(&self, agent: &AgentState, _world: &WorldState) -> bool {
        agent.need(&self.need) >= self.activation_threshold
    }

    fn is_completed(&self, agent: &AgentState, _world: &WorldState) -> bool {
        agent.need(&self.need) <= self.target_value
    }

    fn desired_state(&self) -> &Conditions {
        &self.desired_state
    }

    fn calculate_priority(&self, agent: &AgentState, _world: &WorldState) -> f32 {
        let value = agent.need(&self.need);
        if value >= self.activation_threshold {
            value * self.priority_scale
        } else {
            0.0
        }
    }
}
