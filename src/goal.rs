//! Goals: what an agent wants, and how badly.
//!
//! A goal is immutable configuration plus pure functions of the current
//! agent and world state. Each planning cycle the agent asks every goal for
//! its priority and pursues the most urgent applicable one (see
//! [`select_goal`]).

use std::fmt;

use crate::{AgentState, Conditions, WorldState};

/// A goal an agent can pursue.
pub trait Goal: fmt::Debug {
    /// Unique key of the goal.
    fn goal_type(&self) -> &str;

    /// Whether the goal is worth pursuing in the current state.
    fn can_satisfy(&self, agent: &AgentState, world: &WorldState) -> bool;

    /// Termination test against the live state.
    fn is_completed(&self, agent: &AgentState, world: &WorldState) -> bool;

    /// Target key/value pairs; the planner scores actions by how many of
    /// these keys their effects touch.
    fn desired_state(&self) -> &Conditions;

    /// Urgency score; higher wins.
    fn calculate_priority(&self, agent: &AgentState, world: &WorldState) -> f32;
}

/// Picks the applicable goal with the highest priority.
///
/// Ties go to the goal declared first. Goals whose priority is NaN are
/// skipped. Returns the index into `goals`.
///
/// # Examples
///
/// ```
/// use goap_needs::{select_goal, AgentState, FactGoal, Goal, NeedReductionGoal, WorldState};
///
/// let goals: Vec<Box<dyn Goal>> = vec![
///     Box::new(FactGoal::new("wander", 0.1).with_fact("wandered", true)),
///     Box::new(NeedReductionGoal::new("eat", "hunger", 0.5, 0.0, 1.0)),
/// ];
///
/// let mut agent = AgentState::new();
/// let world = WorldState::new();
///
/// agent.set_need("hunger", 0.2);
/// assert_eq!(select_goal(&goals, &agent, &world), Some(0));
///
/// agent.set_need("hunger", 0.8);
/// assert_eq!(select_goal(&goals, &agent, &world), Some(1));
/// ```
pub fn select_goal(goals: &[Box<dyn Goal>], agent: &AgentState, world: &WorldState) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, goal) in goals.iter().enumerate() {
        if !goal.can_satisfy(agent, world) {
            continue;
        }
        let priority = goal.calculate_priority(agent, world);
        if priority.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, p)| priority > p) {
            best = Some((index, priority));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactGoal, NeedReductionGoal};

    #[test]
    fn test_no_goals() {
        let goals: Vec<Box<dyn Goal>> = Vec::new();
        assert_eq!(select_goal(&goals, &AgentState::new(), &WorldState::new()), None);
    }

    #[test]
    fn test_inapplicable_goals_skipped() {
        let goals: Vec<Box<dyn Goal>> = vec![Box::new(NeedReductionGoal::new(
            "eat", "hunger", 0.5, 0.0, 1.0,
        ))];
        let mut agent = AgentState::new();
        agent.set_need("hunger", 0.1);
        assert_eq!(select_goal(&goals, &agent, &WorldState::new()), None);
    }

    #[test]
    fn test_ties_go_to_declaration_order() {
        let goals: Vec<Box<dyn Goal>> = vec![
            Box::new(FactGoal::new("first", 1.0).with_fact("a", true)),
            Box::new(FactGoal::new("second", 1.0).with_fact("b", true)),
        ];
        assert_eq!(
            select_goal(&goals, &AgentState::new(), &WorldState::new()),
            Some(0)
        );
    }

    #[test]
    fn test_highest_priority_wins() {
        let goals: Vec<Box<dyn Goal>> = vec![
            Box::new(NeedReductionGoal::new("eat", "hunger", 0.3, 0.0, 1.0)),
            Box::new(NeedReductionGoal::new("sleep", "fatigue", 0.3, 0.0, 1.0)),
        ];
        let mut agent = AgentState::new();
        agent.set_need("hunger", 0.6);
        agent.set_need("fatigue", 0.9);
        assert_eq!(select_goal(&goals, &agent, &WorldState::new()), Some(1));
    }
}
