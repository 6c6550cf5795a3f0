//! Tick-driven plan execution.
//!
//! The [`Executor`] walks a [`Plan`] one action at a time:
//!
//! ```text
//! Idle --update--> Running --plan exhausted--> Succeeded
//!                     |
//!                     +--precondition lost / action failed--> Failed
//! ```
//!
//! It is the only place where declared effects reach the real agent and world
//! state, and the only place where a plan is re-validated: an action's
//! preconditions are checked again against the live state right before it
//! starts. Progress is reported through an [`ExecutionObserver`].

use crate::{
    ActionId, ActionLibrary, ActionStatus, AgentState, GoapError, Goal, Plan, Planner, Result,
    WorldState,
};

/// Where the executor stands with its current plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// No plan, or a plan that has not been ticked yet
    Idle,
    Running,
    /// Every action of the plan succeeded
    Succeeded,
    /// An action failed or lost its preconditions
    Failed,
}

impl ExecutionState {
    /// True for `Succeeded` and `Failed`.
    pub fn is_finished(self) -> bool {
        matches!(self, ExecutionState::Succeeded | ExecutionState::Failed)
    }
}

/// Receives execution notifications. Every method defaults to a no-op.
pub trait ExecutionObserver {
    /// The plan finished, successfully or not.
    fn on_plan_completed(&mut self, _plan: &Plan, _success: bool) {}

    /// An action reported `Failed` while running.
    fn on_action_failed(&mut self, _action_type: &str) {}

    /// An action passed its precondition re-check and started.
    fn on_action_started(&mut self, _action_type: &str) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {}

/// A single recorded notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    ActionStarted(String),
    ActionFailed(String),
    PlanCompleted { goal_type: String, success: bool },
}

/// Observer that records every notification in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionLog {
    events: Vec<ExecutionEvent>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ExecutionEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn completions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ExecutionEvent::PlanCompleted { .. }))
            .count()
    }
}

impl ExecutionObserver for ExecutionLog {
    fn on_plan_completed(&mut self, plan: &Plan, success: bool) {
        self.events.push(ExecutionEvent::PlanCompleted {
            goal_type: plan.goal_type().to_string(),
            success,
        });
    }

    fn on_action_failed(&mut self, action_type: &str) {
        self.events
            .push(ExecutionEvent::ActionFailed(action_type.to_string()));
    }

    fn on_action_started(&mut self, action_type: &str) {
        self.events
            .push(ExecutionEvent::ActionStarted(action_type.to_string()));
    }
}

/// Steps through a [`Plan`], driving each action's lifecycle.
///
/// The executor does not own the actions: they live in the agent's
/// [`ActionLibrary`], which is passed to every call that touches them.
///
/// # Examples
///
/// ```
/// use goap_needs::{
///     ActionLibrary, AgentState, ExecutionState, Executor, NeedReductionAction,
///     NeedReductionGoal, Planner, WorldState,
/// };
///
/// let mut actions = ActionLibrary::new();
/// actions
///     .add(NeedReductionAction::new("eat", 1.0, "hunger", 0.0, "at_food", 1.0).unwrap())
///     .unwrap();
/// let goal = NeedReductionGoal::new("eat_goal", "hunger", 0.5, 0.0, 1.0);
///
/// let mut agent = AgentState::new();
/// agent.set_need("hunger", 0.8);
/// let mut world = WorldState::new();
/// world.set_fact("at_food", true);
///
/// let plan = Planner::new().create_plan(&goal, &agent, &world, &actions).unwrap();
/// let mut executor = Executor::new();
/// executor.set_plan(plan, &mut actions);
///
/// while !executor.state().is_finished() {
///     executor.update(&mut actions, &mut agent, &mut world, 0.5);
/// }
/// assert_eq!(executor.state(), ExecutionState::Succeeded);
/// assert_eq!(agent.need("hunger"), 0.0);
/// ```
#[derive(Debug)]
pub struct Executor<O: ExecutionObserver = NoopObserver> {
    plan: Option<Plan>,
    current: Option<ActionId>,
    started: bool,
    state: ExecutionState,
    observer: O,
}

impl Executor<NoopObserver> {
    pub fn new() -> Self {
        Self::with_observer(NoopObserver)
    }
}

impl Default for Executor<NoopObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ExecutionObserver> Executor<O> {
    pub fn with_observer(observer: O) -> Self {
        Self {
            plan: None,
            current: None,
            started: false,
            state: ExecutionState::Idle,
            observer,
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// The action bound for execution, if any.
    pub fn current_action(&self) -> Option<ActionId> {
        self.current
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Adopts a new plan, cancelling any action still in flight.
    ///
    /// The executor is `Idle` until the next [`Executor::update`].
    pub fn set_plan(&mut self, plan: Plan, actions: &mut ActionLibrary) {
        self.cancel_current(actions);
        log::info!("Executing {}", plan);
        self.plan = Some(plan);
        self.state = ExecutionState::Idle;
    }

    /// Advances execution by one tick of `dt` seconds.
    ///
    /// - without a plan, or once finished, nothing happens;
    /// - an exhausted plan completes successfully;
    /// - the next action is bound, its preconditions are re-checked against
    ///   the live state and it is started, all within the same tick;
    /// - a started action is updated: on `Success` its effects are applied
    ///   and the cursor advances, on `Failed` the plan fails.
    ///
    /// The plan is reported complete on the tick after its last action
    /// succeeds.
    pub fn update(
        &mut self,
        actions: &mut ActionLibrary,
        agent: &mut AgentState,
        world: &mut WorldState,
        dt: f32,
    ) -> ExecutionState {
        let Some(plan) = self.plan.as_mut() else {
            return self.state;
        };
        if self.state.is_finished() {
            return self.state;
        }
        self.state = ExecutionState::Running;

        let id = match self.current {
            Some(id) => id,
            None => {
                let Some(id) = plan.next_action() else {
                    log::info!("Plan for '{}' completed", plan.goal_type());
                    self.state = ExecutionState::Succeeded;
                    self.observer.on_plan_completed(plan, true);
                    return self.state;
                };
                self.current = Some(id);
                self.started = false;
                id
            }
        };

        let Some(action) = actions.get_mut(id) else {
            log::warn!("Plan for '{}' refers to unknown action {}", plan.goal_type(), id);
            self.current = None;
            self.state = ExecutionState::Failed;
            self.observer.on_plan_completed(plan, false);
            return self.state;
        };

        if !self.started {
            if !action.check_preconditions(agent, world) {
                log::warn!(
                    "Action {} preconditions no longer satisfied",
                    action.action_type()
                );
                self.current = None;
                self.state = ExecutionState::Failed;
                self.observer.on_plan_completed(plan, false);
                return self.state;
            }
            action.start(agent, world);
            self.started = true;
            log::debug!("Started action {}", action.action_type());
            self.observer.on_action_started(action.action_type());
        }

        match action.update(agent, world, dt) {
            ActionStatus::Running => {}
            ActionStatus::Success => {
                log::info!("Action {} succeeded", action.action_type());
                action.apply_effects(agent, world);
                plan.advance();
                self.current = None;
                self.started = false;
            }
            ActionStatus::Failed => {
                log::error!("Action {} failed", action.action_type());
                self.observer.on_action_failed(action.action_type());
                self.current = None;
                self.started = false;
                self.state = ExecutionState::Failed;
                self.observer.on_plan_completed(plan, false);
            }
        }
        self.state
    }

    /// Cancels the current action and plans again for `goal` from the live
    /// state.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::NoPlanFound`] if the planner finds nothing; the
    /// executor is then `Failed` and holds no plan.
    pub fn replan(
        &mut self,
        goal: &dyn Goal,
        planner: &Planner,
        actions: &mut ActionLibrary,
        agent: &AgentState,
        world: &WorldState,
    ) -> Result<()> {
        self.cancel_current(actions);
        match planner.create_plan(goal, agent, world, actions) {
            Some(plan) => {
                self.set_plan(plan, actions);
                Ok(())
            }
            None => {
                log::warn!("Replanning for '{}' failed", goal.goal_type());
                self.plan = None;
                self.state = ExecutionState::Failed;
                Err(GoapError::NoPlanFound)
            }
        }
    }

    /// Stops execution for an external reason, such as a more urgent goal.
    ///
    /// The in-flight action is cancelled and the plan dropped without being
    /// reported as failed; the executor returns to `Idle`.
    pub fn cancel_execution(&mut self, actions: &mut ActionLibrary) {
        self.cancel_current(actions);
        if let Some(plan) = self.plan.take() {
            log::info!("Cancelled {}", plan);
        }
        self.state = ExecutionState::Idle;
    }

    fn cancel_current(&mut self, actions: &mut ActionLibrary) {
        if let Some(id) = self.current.take() {
            if self.started {
                if let Some(action) = actions.get_mut(id) {
                    log::debug!("Cancelling action {}", action.action_type());
                    action.cancel();
                }
            }
        }
        self.started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Location, MoveToAction, TimedAction, Vec3};

    fn setup() -> (ActionLibrary, ActionId, ActionId) {
        let mut actions = ActionLibrary::new();
        let walk = actions
            .add(
                TimedAction::new("walk", 1.0, 1.0)
                    .unwrap()
                    .with_effect("fact_at_shop", true),
            )
            .unwrap();
        let buy = actions
            .add(
                TimedAction::new("buy", 1.0, 0.0)
                    .unwrap()
                    .with_precondition("at_shop", true)
                    .with_effect("item_bread", 1),
            )
            .unwrap();
        (actions, walk, buy)
    }

    #[test]
    fn test_no_plan_is_noop() {
        let (mut actions, _, _) = setup();
        let mut executor = Executor::with_observer(ExecutionLog::new());
        let state = executor.update(
            &mut actions,
            &mut AgentState::new(),
            &mut WorldState::new(),
            1.0,
        );
        assert_eq!(state, ExecutionState::Idle);
        assert!(executor.observer().events().is_empty());
    }

    #[test]
    fn test_runs_plan_in_order() {
        let (mut actions, walk, buy) = setup();
        let mut agent = AgentState::new();
        let mut world = WorldState::new();
        let mut executor = Executor::with_observer(ExecutionLog::new());
        executor.set_plan(Plan::new("shop", vec![walk, buy], 2.0), &mut actions);
        assert_eq!(executor.state(), ExecutionState::Idle);

        // walk: started, half way
        assert_eq!(
            executor.update(&mut actions, &mut agent, &mut world, 0.5),
            ExecutionState::Running
        );
        assert_eq!(executor.current_action(), Some(walk));
        assert!(!world.fact("at_shop"));

        // walk succeeds, effects applied
        executor.update(&mut actions, &mut agent, &mut world, 0.5);
        assert!(world.fact("at_shop"));
        assert_eq!(executor.current_action(), None);

        // buy: started and finished in one tick
        executor.update(&mut actions, &mut agent, &mut world, 0.1);
        assert_eq!(agent.item_count("bread"), 1);
        assert_eq!(executor.state(), ExecutionState::Running);

        // plan exhausted
        assert_eq!(
            executor.update(&mut actions, &mut agent, &mut world, 0.1),
            ExecutionState::Succeeded
        );
        assert_eq!(
            executor.observer().events(),
            &[
                ExecutionEvent::ActionStarted("walk".to_string()),
                ExecutionEvent::ActionStarted("buy".to_string()),
                ExecutionEvent::PlanCompleted {
                    goal_type: "shop".to_string(),
                    success: true
                },
            ]
        );
    }

    #[test]
    fn test_completion_is_idempotent() {
        let (mut actions, _, _) = setup();
        let mut agent = AgentState::new();
        let mut world = WorldState::new();
        let mut executor = Executor::with_observer(ExecutionLog::new());
        executor.set_plan(Plan::new("nothing", Vec::new(), 0.0), &mut actions);

        for _ in 0..10 {
            assert_eq!(
                executor.update(&mut actions, &mut agent, &mut world, 1.0),
                ExecutionState::Succeeded
            );
        }
        assert_eq!(executor.observer().completions(), 1);
    }

    #[test]
    fn test_precondition_lost_before_start() {
        let (mut actions, _, buy) = setup();
        let mut agent = AgentState::new();
        let mut world = WorldState::new();
        let mut executor = Executor::with_observer(ExecutionLog::new());
        executor.set_plan(Plan::new("shop", vec![buy], 1.0), &mut actions);

        assert_eq!(
            executor.update(&mut actions, &mut agent, &mut world, 1.0),
            ExecutionState::Failed
        );
        assert!(!actions.get(buy).unwrap().is_executing());
        assert_eq!(agent.item_count("bread"), 0);
        assert_eq!(
            executor.observer().events(),
            &[ExecutionEvent::PlanCompleted {
                goal_type: "shop".to_string(),
                success: false
            }]
        );

        // Stays failed
        executor.update(&mut actions, &mut agent, &mut world, 1.0);
        assert_eq!(executor.observer().completions(), 1);
    }

    #[test]
    fn test_set_plan_cancels_running_action() {
        let (mut actions, walk, _) = setup();
        let mut agent = AgentState::new();
        let mut world = WorldState::new();
        let mut executor = Executor::new();
        executor.set_plan(Plan::new("a", vec![walk], 1.0), &mut actions);
        executor.update(&mut actions, &mut agent, &mut world, 0.5);
        assert!(actions.get(walk).unwrap().is_executing());

        executor.set_plan(Plan::new("b", vec![walk], 1.0), &mut actions);
        assert!(!actions.get(walk).unwrap().is_executing());
        assert_eq!(executor.state(), ExecutionState::Idle);
        assert_eq!(executor.plan().unwrap().goal_type(), "b");
    }

    #[test]
    fn test_cancel_execution_does_not_report_failure() {
        let (mut actions, walk, _) = setup();
        let mut agent = AgentState::new();
        let mut world = WorldState::new();
        let mut executor = Executor::with_observer(ExecutionLog::new());
        executor.set_plan(Plan::new("a", vec![walk], 1.0), &mut actions);
        executor.update(&mut actions, &mut agent, &mut world, 0.5);

        executor.cancel_execution(&mut actions);
        assert_eq!(executor.state(), ExecutionState::Idle);
        assert!(executor.plan().is_none());
        assert!(!actions.get(walk).unwrap().is_executing());
        assert_eq!(executor.observer().completions(), 0);
        assert!(!world.fact("at_shop"));
    }

    #[test]
    fn test_action_failure_fails_plan() {
        let kitchen = std::sync::Arc::new(Location::new("kitchen", Vec3::ONE));
        let mut world = WorldState::new();
        world.register_poi("food", &kitchen);
        let mut actions = ActionLibrary::new();
        // No navigator bound: starts, then fails on its first update
        let go = actions
            .add(MoveToAction::new("go", 1.0, "food", "at_food", 0.5).unwrap())
            .unwrap();
        let mut agent = AgentState::new();
        let mut executor = Executor::with_observer(ExecutionLog::new());
        executor.set_plan(Plan::new("eat", vec![go], 1.0), &mut actions);

        assert_eq!(
            executor.update(&mut actions, &mut agent, &mut world, 0.5),
            ExecutionState::Failed
        );
        assert_eq!(
            executor.observer().events(),
            &[
                ExecutionEvent::ActionStarted("go".to_string()),
                ExecutionEvent::ActionFailed("go".to_string()),
                ExecutionEvent::PlanCompleted {
                    goal_type: "eat".to_string(),
                    success: false
                },
            ]
        );
        assert!(!world.fact("at_food"));
        assert!(!actions.get(go).unwrap().is_executing());
        assert_eq!(executor.current_action(), None);

        // Finished: further ticks report nothing new
        executor.update(&mut actions, &mut agent, &mut world, 0.5);
        assert_eq!(executor.observer().events().len(), 3);
    }

    #[test]
    fn test_unknown_action_fails_plan() {
        let (mut actions, _, _) = setup();
        let mut executor = Executor::new();
        executor.set_plan(Plan::new("a", vec![ActionId(42)], 1.0), &mut actions);
        assert_eq!(
            executor.update(
                &mut actions,
                &mut AgentState::new(),
                &mut WorldState::new(),
                1.0
            ),
            ExecutionState::Failed
        );
    }
}
