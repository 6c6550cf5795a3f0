mod action;
mod actions;
mod agent;
mod agent_state;
mod conditions;
mod config;
mod error;
mod executor;
mod goal;
mod goals;
mod navigation;
mod plan;
mod planner;
mod visualizer;
mod world_state;

pub use action::{Action, ActionId, ActionLibrary, ActionStatus};
pub use actions::{MoveToAction, NeedReductionAction, TimedAction};
pub use agent::Agent;
pub use agent_state::AgentState;
pub use conditions::{
    fact_key, need_key, Conditions, Value, EFFECT_PREFIX, FACT_PREFIX, ITEM_PREFIX, NEED_PREFIX,
};
pub use config::{ActionDefinition, AgentBlueprint, GoalDefinition, PlannerConfig};
pub use error::{GoapError, Result};
pub use executor::{
    ExecutionEvent, ExecutionLog, ExecutionObserver, ExecutionState, Executor, NoopObserver,
};
pub use goal::{select_goal, Goal};
pub use goals::{FactGoal, NeedReductionGoal};
pub use navigation::{LinearNavigator, Navigator, SharedNavigator};
pub use plan::Plan;
pub use planner::Planner;
pub use visualizer::PlanVisualizer;
pub use world_state::{Location, SpatialQuery, WorldState};

pub use glam::Vec3;
