//! Configuration: planner budgets and JSON agent blueprints.
//!
//! A blueprint describes an agent as data: starting needs, how fast they
//! grow, the planner budgets and the actions and goals it knows about.
//!
//! ```json
//! {
//!   "name": "villager",
//!   "needs": { "hunger": 0.2 },
//!   "need_rates": { "hunger": 0.05 },
//!   "planner": { "max_iterations": 50 },
//!   "actions": [
//!     { "kind": "move_to", "action_type": "go_to_food", "cost": 1.0,
//!       "poi_kind": "food", "location_fact": "at_food" },
//!     { "kind": "need_reduction", "action_type": "eat", "cost": 1.0,
//!       "need": "hunger", "location_fact": "at_food", "duration": 2.0 }
//!   ],
//!   "goals": [
//!     { "kind": "need_reduction", "goal_type": "eat", "need": "hunger",
//!       "activation_threshold": 0.5, "priority_scale": 10.0 }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{
    Action, Agent, AgentState, Conditions, FactGoal, GoapError, Goal, MoveToAction,
    NeedReductionAction, NeedReductionGoal, Planner, Result, SharedNavigator, TimedAction,
};

/// Search budgets for the [`Planner`].
///
/// Missing fields take their default when deserialized.
///
/// # Examples
///
/// ```
/// use goap_needs::PlannerConfig;
///
/// let config: PlannerConfig = serde_json::from_str(r#"{ "max_depth": 4 }"#).unwrap();
/// assert_eq!(config.max_iterations, 100);
/// assert_eq!(config.max_depth, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Upper bound on selection rounds
    pub max_iterations: usize,
    /// Upper bound on plan length
    pub max_depth: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_depth: 10,
        }
    }
}

impl PlannerConfig {
    /// # Errors
    ///
    /// Returns `GoapError::InvalidConfig` if either budget is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GoapError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(GoapError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_cost() -> f32 {
    1.0
}

fn default_stopping_distance() -> f32 {
    0.5
}

/// An action described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDefinition {
    MoveTo {
        action_type: String,
        #[serde(default = "default_cost")]
        cost: f32,
        poi_kind: String,
        location_fact: String,
        #[serde(default = "default_stopping_distance")]
        stopping_distance: f32,
    },
    NeedReduction {
        action_type: String,
        #[serde(default = "default_cost")]
        cost: f32,
        need: String,
        #[serde(default)]
        target_value: f32,
        location_fact: String,
        #[serde(default)]
        duration: f32,
    },
    Timed {
        action_type: String,
        #[serde(default = "default_cost")]
        cost: f32,
        #[serde(default)]
        duration: f32,
        #[serde(default)]
        preconditions: HashMap<String, bool>,
        #[serde(default)]
        effects: Conditions,
    },
}

impl ActionDefinition {
    /// Builds the action. Movement actions get `navigator` bound when one is
    /// given.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidActionCost` for a non-positive cost.
    pub fn into_action(self, navigator: Option<&SharedNavigator>) -> Result<Box<dyn Action>> {
        let action: Box<dyn Action> = match self {
            ActionDefinition::MoveTo {
                action_type,
                cost,
                poi_kind,
                location_fact,
                stopping_distance,
            } => {
                let mut action =
                    MoveToAction::new(action_type, cost, poi_kind, location_fact, stopping_distance)?;
                if let Some(navigator) = navigator {
                    action.bind_navigator(navigator.clone());
                }
                Box::new(action)
            }
            ActionDefinition::NeedReduction {
                action_type,
                cost,
                need,
                target_value,
                location_fact,
                duration,
            } => Box::new(NeedReductionAction::new(
                action_type,
                cost,
                need,
                target_value,
                location_fact,
                duration,
            )?),
            ActionDefinition::Timed {
                action_type,
                cost,
                duration,
                preconditions,
                effects,
            } => {
                let mut action = TimedAction::new(action_type, cost, duration)?.with_effects(effects);
                for (fact, value) in preconditions {
                    action = action.with_precondition(fact, value);
                }
                Box::new(action)
            }
        };
        Ok(action)
    }
}

/// A goal described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalDefinition {
    NeedReduction {
        goal_type: String,
        need: String,
        activation_threshold: f32,
        #[serde(default)]
        target_value: f32,
        #[serde(default = "default_priority_scale")]
        priority_scale: f32,
    },
    Fact {
        goal_type: String,
        priority: f32,
        #[serde(default)]
        facts: HashMap<String, bool>,
    },
}

fn default_priority_scale() -> f32 {
    1.0
}

impl GoalDefinition {
    pub fn into_goal(self) -> Box<dyn Goal> {
        match self {
            GoalDefinition::NeedReduction {
                goal_type,
                need,
                activation_threshold,
                target_value,
                priority_scale,
            } => Box::new(NeedReductionGoal::new(
                goal_type,
                need,
                activation_threshold,
                target_value,
                priority_scale,
            )),
            GoalDefinition::Fact {
                goal_type,
                priority,
                facts,
            } => {
                let mut goal = FactGoal::new(goal_type, priority);
                for (fact, value) in facts {
                    goal = goal.with_fact(fact, value);
                }
                Box::new(goal)
            }
        }
    }
}

/// Everything needed to build an [`Agent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentBlueprint {
    pub name: String,
    pub needs: HashMap<String, f32>,
    pub need_rates: HashMap<String, f32>,
    pub planner: PlannerConfig,
    pub actions: Vec<ActionDefinition>,
    pub goals: Vec<GoalDefinition>,
}

impl AgentBlueprint {
    /// # Errors
    ///
    /// Returns `GoapError::Serialization` for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns `GoapError::Serialization` for malformed JSON, including
    /// read failures of the underlying reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Builds the agent. `navigator` is bound to every movement action.
    ///
    /// # Errors
    ///
    /// Fails on invalid planner budgets, non-positive action costs and
    /// duplicate action or goal types.
    pub fn into_agent(self, navigator: Option<SharedNavigator>) -> Result<Agent> {
        let mut state = AgentState::new();
        for (need, value) in self.needs {
            state.set_need(need, value);
        }
        for (need, rate) in self.need_rates {
            state.set_need_rate(need, rate);
        }

        let mut agent = Agent::new(self.name)
            .with_planner(Planner::with_config(self.planner)?)
            .with_state(state);
        for definition in self.actions {
            agent.add_boxed_action(definition.into_action(navigator.as_ref())?)?;
        }
        for definition in self.goals {
            agent.add_boxed_goal(definition.into_goal())?;
        }
        log::info!(
            "Built agent '{}' with {} actions and {} goals",
            agent.name(),
            agent.actions().len(),
            agent.goals().len()
        );
        Ok(agent)
    }
}
