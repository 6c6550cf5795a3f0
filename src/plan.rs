//! A plan: the ordered actions chosen for one goal, consumed through a cursor.

use std::fmt;

use crate::ActionId;

/// An ordered list of actions bound to one goal.
///
/// The list never changes after creation; executing the plan only moves a
/// cursor forward, so advancing is O(1). `total_cost` is the sum of the action
/// costs at planning time and is not recomputed.
///
/// # Examples
///
/// ```
/// use goap_needs::{ActionId, Plan};
///
/// let mut plan = Plan::new("eat", vec![ActionId(0), ActionId(1)], 3.0);
/// assert_eq!(plan.next_action(), Some(ActionId(0)));
/// assert_eq!(plan.actions_remaining(), 2);
///
/// plan.advance();
/// plan.advance();
/// plan.advance(); // no-op past the end
/// assert!(plan.is_empty());
/// assert_eq!(plan.cursor(), 2);
///
/// plan.reset();
/// assert_eq!(plan.next_action(), Some(ActionId(0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    goal_type: String,
    actions: Vec<ActionId>,
    cursor: usize,
    total_cost: f32,
}

impl Plan {
    pub fn new(goal_type: impl Into<String>, actions: Vec<ActionId>, total_cost: f32) -> Self {
        Self {
            goal_type: goal_type.into(),
            actions,
            cursor: 0,
            total_cost,
        }
    }

    /// The goal this plan was made for.
    pub fn goal_type(&self) -> &str {
        &self.goal_type
    }

    /// The action under the cursor, without consuming it.
    pub fn next_action(&self) -> Option<ActionId> {
        self.actions.get(self.cursor).copied()
    }

    /// Moves the cursor one step forward; does nothing once the plan is empty.
    pub fn advance(&mut self) {
        if self.cursor < self.actions.len() {
            self.cursor += 1;
        }
    }

    /// True once every action has been consumed.
    pub fn is_empty(&self) -> bool {
        self.cursor >= self.actions.len()
    }

    pub fn actions_remaining(&self) -> usize {
        self.actions.len() - self.cursor
    }

    /// Rewinds the cursor to the first action. Effects already applied to the
    /// agent or world are not undone.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of actions, consumed or not.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn actions(&self) -> &[ActionId] {
        &self.actions
    }

    pub fn total_cost(&self) -> f32 {
        self.total_cost
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Plan[{}] {}/{} (cost {})",
            self.goal_type,
            self.cursor,
            self.actions.len(),
            self.total_cost
        )
    }
}
