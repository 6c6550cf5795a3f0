//! # Planner Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner turns a goal and the current agent/world state into a
//! [`Plan`]. It is a bounded greedy forward search:
//!
//! 1. Among the actions whose preconditions hold, score each as
//!    `overlap(effects, desired state) * 10 - cost`.
//! 2. Take the best one (ties go to the action added to the library first),
//!    append it to the plan and simulate its `need_` and `fact_` effects.
//! 3. Repeat until the goal is completed, no action qualifies, or the
//!    iteration/depth budget runs out.
//!
//! Planning failure is reported as `None`, never as a panic; callers usually
//! fall back to an idle goal.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_needs::{ActionLibrary, AgentState, NeedReductionAction, NeedReductionGoal, Planner, WorldState};
//!
//! let mut actions = ActionLibrary::new();
//! actions
//!     .add(NeedReductionAction::new("eat", 1.0, "hunger", 0.0, "at_food", 2.0).unwrap())
//!     .unwrap();
//!
//! let goal = NeedReductionGoal::new("eat_goal", "hunger", 0.5, 0.0, 1.0);
//!
//! let mut agent = AgentState::new();
//! agent.set_need("hunger", 0.8);
//! let mut world = WorldState::new();
//! world.set_fact("at_food", true);
//!
//! let plan = Planner::new().create_plan(&goal, &agent, &world, &actions).unwrap();
//! assert_eq!(plan.len(), 1);
//!
//! // Planning works on copies: the real state is untouched
//! assert_eq!(agent.need("hunger"), 0.8);
//! assert!(world.fact("at_food"));
//! ```

use crate::{ActionId, ActionLibrary, AgentState, Goal, Plan, PlannerConfig, Result, WorldState};

/// Score weight of one effect key shared with the goal's desired state.
const RELEVANCE_WEIGHT: f32 = 10.0;

/// The greedy GOAP planner.
///
/// A planner holds only its budgets; actions, goals and states are passed in
/// per call, so one planner can serve any number of agents.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Creates a planner with the default budgets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a planner with custom budgets.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidConfig` if a budget is zero.
    pub fn with_config(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Finds a plan for `goal`, simulating on copies of the agent and world.
    ///
    /// Returns `None` if no applicable action exists at some step or the
    /// budget runs out before the goal is completed. A goal that is already
    /// completed yields an empty plan.
    pub fn create_plan(
        &self,
        goal: &dyn Goal,
        agent: &AgentState,
        world: &WorldState,
        actions: &ActionLibrary,
    ) -> Option<Plan> {
        let mut agent = agent.clone();
        let mut world = world.clone();
        self.search(goal, &mut agent, &mut world, actions)
    }

    /// Like [`Planner::create_plan`], but simulates directly on the given
    /// state. On return the agent and world reflect every simulated effect,
    /// whether or not a plan was found.
    pub fn create_plan_in_place(
        &self,
        goal: &dyn Goal,
        agent: &mut AgentState,
        world: &mut WorldState,
        actions: &ActionLibrary,
    ) -> Option<Plan> {
        self.search(goal, agent, world, actions)
    }

    fn search(
        &self,
        goal: &dyn Goal,
        agent: &mut AgentState,
        world: &mut WorldState,
        actions: &ActionLibrary,
    ) -> Option<Plan> {
        let mut steps: Vec<ActionId> = Vec::new();
        let mut total_cost = 0.0;
        let mut iterations = 0;

        while !goal.is_completed(agent, world)
            && iterations < self.config.max_iterations
            && steps.len() < self.config.max_depth
        {
            iterations += 1;

            let mut best: Option<(ActionId, f32)> = None;
            for (id, action) in actions.iter() {
                if !action.check_preconditions(agent, world) {
                    continue;
                }
                let relevance = action.effects().overlap(goal.desired_state()) as f32;
                let score = relevance * RELEVANCE_WEIGHT - action.cost();
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((id, score));
                }
            }

            let Some((id, score)) = best else {
                log::debug!(
                    "No applicable action for goal '{}' after {} steps",
                    goal.goal_type(),
                    steps.len()
                );
                return None;
            };
            let action = actions.get(id)?;
            log::trace!("Step {}: {} (score {})", steps.len() + 1, action.action_type(), score);

            action.effects().simulate(agent, world);
            total_cost += action.cost();
            steps.push(id);
        }

        if goal.is_completed(agent, world) {
            log::info!(
                "Generated plan for '{}': [{}] (cost {})",
                goal.goal_type(),
                steps
                    .iter()
                    .map(|id| actions.name_of(*id))
                    .collect::<Vec<_>>()
                    .join(", "),
                total_cost
            );
            Some(Plan::new(goal.goal_type(), steps, total_cost))
        } else {
            log::info!(
                "Planning budget exhausted for goal '{}' ({} iterations, {} steps)",
                goal.goal_type(),
                iterations,
                steps.len()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::{
        Action, ActionStatus, Conditions, FactGoal, GoapError, NeedReductionAction,
        NeedReductionGoal, TimedAction,
    };

    fn make_action(name: &str, cost: f32, pre: Vec<(&str, bool)>, eff: Vec<(&str, bool)>) -> TimedAction {
        let mut action = TimedAction::new(name, cost, 0.0).unwrap();
        for (k, v) in pre {
            action = action.with_precondition(k, v);
        }
        for (k, v) in eff {
            action = action.with_effect(format!("fact_{}", k), v);
        }
        action
    }

    fn library(actions: Vec<TimedAction>) -> ActionLibrary {
        let mut library = ActionLibrary::new();
        for action in actions {
            library.add(action).unwrap();
        }
        library
    }

    fn names(plan: &Plan, actions: &ActionLibrary) -> Vec<String> {
        plan.actions()
            .iter()
            .map(|id| actions.get(*id).unwrap().action_type().to_string())
            .collect()
    }

    /// Counts precondition checks to observe how many search iterations ran.
    #[derive(Debug)]
    struct CountingAction {
        inner: TimedAction,
        checks: Rc<Cell<usize>>,
    }

    impl Action for CountingAction {
        fn action_type(&self) -> &str {
            self.inner.action_type()
        }
        fn cost(&self) -> f32 {
            self.inner.cost()
        }
        fn effects(&self) -> &Conditions {
            self.inner.effects()
        }
        fn check_preconditions(&self, agent: &AgentState, world: &WorldState) -> bool {
            self.checks.set(self.checks.get() + 1);
            self.inner.check_preconditions(agent, world)
        }
        fn start(&mut self, agent: &AgentState, world: &mut WorldState) {
            self.inner.start(agent, world)
        }
        fn update(&mut self, agent: &mut AgentState, world: &mut WorldState, dt: f32) -> ActionStatus {
            self.inner.update(agent, world, dt)
        }
        fn cancel(&mut self) {
            self.inner.cancel()
        }
        fn is_executing(&self) -> bool {
            self.inner.is_executing()
        }
    }

    #[test]
    fn test_simple_chain() {
        // a -> b -> c
        let actions = library(vec![
            make_action("a", 1.0, vec![("start", true), ("mid", false)], vec![("mid", true)]),
            make_action("b", 1.0, vec![("mid", true), ("end", false)], vec![("end", true)]),
            make_action("c", 1.0, vec![("end", true)], vec![("goal", true)]),
        ]);
        let goal = FactGoal::new("reach", 1.0).with_fact("goal", true);
        let mut world = WorldState::new();
        world.set_fact("start", true);

        let plan = Planner::new()
            .create_plan(&goal, &AgentState::new(), &world, &actions)
            .unwrap();
        assert_eq!(names(&plan, &actions), ["a", "b", "c"]);
        assert_eq!(plan.goal_type(), "reach");
        assert_eq!(plan.total_cost(), 3.0);
    }

    #[test]
    fn test_enabled_relevant_action_wins_next_step() {
        // "a" stays applicable, but once it enables "b" the relevant action outscores it
        let actions = library(vec![
            make_action("a", 1.0, vec![], vec![("mid", true)]),
            make_action("b", 1.0, vec![("mid", true)], vec![("end", true)]),
        ]);
        let goal = FactGoal::new("reach", 1.0).with_fact("end", true);
        let plan = Planner::new()
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
            .unwrap();
        assert_eq!(names(&plan, &actions), ["a", "b"]);
    }

    #[test]
    fn test_greedy_loops_when_unlock_is_costlier() {
        // "unlock" only enables "finish" and never scores above the cheap "fidget",
        // so the search repeats "fidget" until the depth budget runs out
        let actions = library(vec![
            make_action("fidget", 1.0, vec![], vec![("noise", true)]),
            make_action("unlock", 2.0, vec![], vec![("unlocked", true)]),
            make_action("finish", 1.0, vec![("unlocked", true)], vec![("end", true)]),
        ]);
        let goal = FactGoal::new("reach", 1.0).with_fact("end", true);
        assert!(Planner::new()
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
            .is_none());
    }

    #[test]
    fn test_relevant_action_preferred_over_cheap_one() {
        let actions = library(vec![
            make_action("cheap", 0.1, vec![], vec![("noise", true)]),
            make_action("useful", 5.0, vec![], vec![("goal", true)]),
        ]);
        let goal = FactGoal::new("g", 1.0).with_fact("goal", true);
        let plan = Planner::new()
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
            .unwrap();
        assert_eq!(names(&plan, &actions), ["useful"]);
        assert_eq!(plan.total_cost(), 5.0);
    }

    #[test]
    fn test_cheaper_of_equally_relevant() {
        let actions = library(vec![
            make_action("expensive", 5.0, vec![], vec![("goal", true)]),
            make_action("cheap", 1.0, vec![], vec![("goal", true)]),
        ]);
        let goal = FactGoal::new("g", 1.0).with_fact("goal", true);
        let plan = Planner::new()
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
            .unwrap();
        assert_eq!(names(&plan, &actions), ["cheap"]);
    }

    #[test]
    fn test_tie_break_is_library_order() {
        let goal = FactGoal::new("g", 1.0).with_fact("goal", true);
        for _ in 0..20 {
            let actions = library(vec![
                make_action("first", 2.0, vec![], vec![("goal", true)]),
                make_action("second", 2.0, vec![], vec![("goal", true)]),
            ]);
            let plan = Planner::new()
                .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
                .unwrap();
            assert_eq!(names(&plan, &actions), ["first"]);
        }

        let reversed = library(vec![
            make_action("second", 2.0, vec![], vec![("goal", true)]),
            make_action("first", 2.0, vec![], vec![("goal", true)]),
        ]);
        let plan = Planner::new()
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &reversed)
            .unwrap();
        assert_eq!(names(&plan, &reversed), ["second"]);
    }

    #[test]
    fn test_no_applicable_action() {
        let actions = library(vec![make_action("a", 1.0, vec![("foo", true)], vec![("bar", true)])]);
        let goal = FactGoal::new("g", 1.0).with_fact("bar", true);
        assert!(Planner::new()
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
            .is_none());
    }

    #[test]
    fn test_already_completed_goal_yields_empty_plan() {
        let goal = FactGoal::new("g", 1.0).with_fact("done", true);
        let mut world = WorldState::new();
        world.set_fact("done", true);
        let plan = Planner::new()
            .create_plan(&goal, &AgentState::new(), &world, &ActionLibrary::new())
            .unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_cost(), 0.0);
    }

    #[test]
    fn test_terminates_with_cyclic_effects() {
        let mut actions = ActionLibrary::new();
        actions
            .add(CountingAction {
                inner: make_action("on", 1.0, vec![("light", false)], vec![("light", true)]),
                checks: Rc::default(),
            })
            .unwrap();
        actions
            .add(CountingAction {
                inner: make_action("off", 1.0, vec![("light", true)], vec![("light", false)]),
                checks: Rc::default(),
            })
            .unwrap();
        let goal = FactGoal::new("g", 1.0).with_fact("door_open", true);

        let planner = Planner::with_config(PlannerConfig {
            max_iterations: 7,
            max_depth: 1000,
        })
        .unwrap();
        assert!(planner
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
            .is_none());

        let planner = Planner::with_config(PlannerConfig {
            max_iterations: 1000,
            max_depth: 4,
        })
        .unwrap();
        assert!(planner
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
            .is_none());
    }

    #[test]
    fn test_iteration_budget_bounds_search() {
        let checks = Rc::new(Cell::new(0));
        let mut actions = ActionLibrary::new();
        actions
            .add(CountingAction {
                inner: make_action("spin", 1.0, vec![], vec![("dizzy", true)]),
                checks: Rc::clone(&checks),
            })
            .unwrap();
        let goal = FactGoal::new("g", 1.0).with_fact("unreachable", true);
        let planner = Planner::with_config(PlannerConfig {
            max_iterations: 5,
            max_depth: 50,
        })
        .unwrap();
        assert!(planner
            .create_plan(&goal, &AgentState::new(), &WorldState::new(), &actions)
            .is_none());
        assert_eq!(checks.get(), 5);
    }

    #[test]
    fn test_invalid_config() {
        let result = Planner::with_config(PlannerConfig {
            max_iterations: 0,
            max_depth: 10,
        });
        assert!(matches!(result, Err(GoapError::InvalidConfig(_))));
    }

    #[test]
    fn test_need_effects_are_simulated() {
        let mut actions = ActionLibrary::new();
        actions
            .add(NeedReductionAction::new("eat", 1.0, "hunger", 0.0, "at_food", 2.0).unwrap())
            .unwrap();
        let goal = NeedReductionGoal::new("eat_goal", "hunger", 0.5, 0.0, 1.0);
        let mut agent = AgentState::new();
        agent.set_need("hunger", 0.8);
        let mut world = WorldState::new();
        world.set_fact("at_food", true);

        let plan = Planner::new().create_plan(&goal, &agent, &world, &actions).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.total_cost(), 1.0);
        assert_eq!(agent.need("hunger"), 0.8);
        assert!(world.fact("at_food"));
    }

    #[test]
    fn test_in_place_planning_mutates_live_state() {
        let mut actions = ActionLibrary::new();
        actions
            .add(NeedReductionAction::new("eat", 1.0, "hunger", 0.0, "at_food", 2.0).unwrap())
            .unwrap();
        let goal = NeedReductionGoal::new("eat_goal", "hunger", 0.5, 0.0, 1.0);
        let mut agent = AgentState::new();
        agent.set_need("hunger", 0.8);
        let mut world = WorldState::new();
        world.set_fact("at_food", true);

        let plan = Planner::new()
            .create_plan_in_place(&goal, &mut agent, &mut world, &actions)
            .unwrap();
        assert_eq!(plan.len(), 1);
        // The simulated effects leaked into the real state
        assert_eq!(agent.need("hunger"), 0.0);
        assert!(!world.fact("at_food"));
    }
}
