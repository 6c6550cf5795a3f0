use std::collections::HashMap;

use crate::conditions::fact_key;
use crate::{AgentState, Conditions, Goal, WorldState};

/// Reach a set of world facts at a fixed priority.
///
/// Always applicable, so a low-priority `FactGoal` makes a good idle or
/// fallback goal.
#[derive(Debug, Clone)]
pub struct FactGoal {
    goal_type: String,
    priority: f32,
    facts: HashMap<String, bool>,
    desired_state: Conditions,
}

impl FactGoal {
    pub fn new(goal_type: impl Into<String>, priority: f32) -> Self {
        Self {
            goal_type: goal_type.into(),
            priority,
            facts: HashMap::new(),
            desired_state: Conditions::new(),
        }
    }

    pub fn with_fact(mut self, fact: impl Into<String>, value: bool) -> Self {
        let fact = fact.into();
        self.desired_state.set(fact_key(&fact), value);
        self.facts.insert(fact, value);
        self
    }

    pub fn facts(&self) -> &HashMap<String, bool> {
        &self.facts
    }
}

impl Goal for FactGoal {
    fn goal_type(&self) -> &str {
        &self.goal_type
    }

    fn can_satisfy(&self, _agent: &AgentState, _world: &WorldState) -> bool {
        true
    }

    fn is_completed(&self, _agent: &AgentState, world: &WorldState) -> bool {
        world.satisfies(&self.facts)
    }

    fn desired_state(&self) -> &Conditions {
        &self.desired_state
    }

    fn calculate_priority(&self, _agent: &AgentState, _world: &WorldState) -> f32 {
        self.priority
    }
}
