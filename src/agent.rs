//! The per-tick driver tying state, goals, planner and executor together.

use crate::{
    select_goal, Action, ActionId, ActionLibrary, AgentState, ExecutionObserver, ExecutionState,
    Executor, GoapError, Goal, NoopObserver, Planner, Result, WorldState,
};

/// An autonomous agent.
///
/// Owns its needs, its action library, its goals, a planner and an
/// executor. The host calls [`Agent::tick`] once per frame.
///
/// # Examples
///
/// ```
/// use goap_needs::{Agent, NeedReductionAction, NeedReductionGoal, WorldState};
///
/// let mut agent = Agent::new("villager");
/// agent.state_mut().set_need("hunger", 0.8);
/// agent
///     .add_action(NeedReductionAction::new("eat", 1.0, "hunger", 0.0, "at_food", 1.0).unwrap())
///     .unwrap();
/// agent
///     .add_goal(NeedReductionGoal::new("eat", "hunger", 0.5, 0.0, 1.0))
///     .unwrap();
///
/// let mut world = WorldState::new();
/// world.set_fact("at_food", true);
///
/// for _ in 0..4 {
///     agent.tick(&mut world, 0.5);
/// }
/// assert_eq!(agent.state().need("hunger"), 0.0);
/// ```
#[derive(Debug)]
pub struct Agent<O: ExecutionObserver = NoopObserver> {
    name: String,
    state: AgentState,
    actions: ActionLibrary,
    goals: Vec<Box<dyn Goal>>,
    planner: Planner,
    executor: Executor<O>,
    current_goal: Option<usize>,
}

impl Agent<NoopObserver> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_observer(name, NoopObserver)
    }
}

impl<O: ExecutionObserver> Agent<O> {
    pub fn with_observer(name: impl Into<String>, observer: O) -> Self {
        Self {
            name: name.into(),
            state: AgentState::new(),
            actions: ActionLibrary::new(),
            goals: Vec::new(),
            planner: Planner::new(),
            executor: Executor::with_observer(observer),
            current_goal: None,
        }
    }

    pub fn with_planner(mut self, planner: Planner) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_state(mut self, state: AgentState) -> Self {
        self.state = state;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    pub fn actions(&self) -> &ActionLibrary {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionLibrary {
        &mut self.actions
    }

    pub fn goals(&self) -> &[Box<dyn Goal>] {
        &self.goals
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn executor(&self) -> &Executor<O> {
        &self.executor
    }

    /// The goal the running plan was made for.
    pub fn current_goal(&self) -> Option<&dyn Goal> {
        self.current_goal.map(|index| self.goals[index].as_ref())
    }

    /// # Errors
    ///
    /// See [`ActionLibrary::add`].
    pub fn add_action(&mut self, action: impl Action + 'static) -> Result<ActionId> {
        self.actions.add(action)
    }

    pub fn add_boxed_action(&mut self, action: Box<dyn Action>) -> Result<ActionId> {
        self.actions.add_boxed(action)
    }

    /// Goals are considered in the order they are added.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::GoalAlreadyInCollection` for a duplicate goal type.
    pub fn add_goal(&mut self, goal: impl Goal + 'static) -> Result<()> {
        self.add_boxed_goal(Box::new(goal))
    }

    pub fn add_boxed_goal(&mut self, goal: Box<dyn Goal>) -> Result<()> {
        if self.goals.iter().any(|g| g.goal_type() == goal.goal_type()) {
            return Err(GoapError::GoalAlreadyInCollection(
                goal.goal_type().to_string(),
            ));
        }
        self.goals.push(goal);
        Ok(())
    }

    /// Runs one frame:
    ///
    /// 1. needs grow and timed effects tick down;
    /// 2. the most urgent applicable goal is selected;
    /// 3. a new plan is made when nothing is running, the last plan finished,
    ///    or the selected goal outranks the running one;
    /// 4. the executor advances by `dt`.
    ///
    /// A goal that is already completed is not planned for.
    pub fn tick(&mut self, world: &mut WorldState, dt: f32) -> ExecutionState {
        self.state.update(dt);

        if let Some(selected) = select_goal(&self.goals, &self.state, world) {
            if self.should_replan(selected, world) {
                self.plan_for(selected, world);
            }
        }

        self.executor
            .update(&mut self.actions, &mut self.state, world, dt)
    }

    /// Drops the running plan, cancelling its current action.
    pub fn interrupt(&mut self) {
        self.executor.cancel_execution(&mut self.actions);
        self.current_goal = None;
    }

    fn should_replan(&self, selected: usize, world: &WorldState) -> bool {
        if self.goals[selected].is_completed(&self.state, world) {
            return false;
        }
        let (current, plan) = match (self.current_goal, self.executor.plan()) {
            (Some(current), Some(plan)) => (current, plan),
            _ => return true,
        };
        if self.executor.state().is_finished() {
            return true;
        }
        // Let an exhausted plan report its completion first
        if current == selected || plan.is_empty() {
            return false;
        }
        let selected_priority = self.goals[selected].calculate_priority(&self.state, world);
        let current_priority = self.goals[current].calculate_priority(&self.state, world);
        selected_priority > current_priority
    }

    fn plan_for(&mut self, selected: usize, world: &WorldState) {
        let goal = self.goals[selected].as_ref();
        if self.current_goal != Some(selected) {
            log::info!("Agent '{}' switching to goal '{}'", self.name, goal.goal_type());
        }
        self.executor.cancel_execution(&mut self.actions);

        match self
            .planner
            .create_plan(goal, &self.state, world, &self.actions)
        {
            Some(plan) => {
                self.executor.set_plan(plan, &mut self.actions);
                self.current_goal = Some(selected);
            }
            None => {
                log::debug!(
                    "Agent '{}' has no plan for '{}', idling",
                    self.name,
                    goal.goal_type()
                );
                self.current_goal = None;
            }
        }
    }
}
