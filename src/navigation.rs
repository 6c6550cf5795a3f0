//! Movement capability driven by movement actions.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;

/// Something that can carry an agent towards a destination.
///
/// Movement actions set a destination when they start and call
/// [`Navigator::advance`] once per tick until the agent is close enough.
pub trait Navigator: fmt::Debug {
    /// Current position of the agent.
    fn position(&self) -> Vec3;

    fn set_destination(&mut self, target: Vec3);

    /// Moves the agent for `dt` seconds towards its destination.
    fn advance(&mut self, dt: f32);

    /// Clears the destination; the agent stays where it is.
    fn stop(&mut self);

    /// Straight-line distance to the destination, if one is set.
    fn remaining_distance(&self) -> Option<f32>;
}

/// A navigator handle shared by the movement actions of one agent.
pub type SharedNavigator = Rc<RefCell<dyn Navigator>>;

/// Moves at constant speed in a straight line, without obstacles.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearNavigator {
    position: Vec3,
    speed: f32,
    destination: Option<Vec3>,
}

impl LinearNavigator {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            speed: speed.max(0.0),
            destination: None,
        }
    }

    /// Wraps the navigator into a [`SharedNavigator`] handle.
    pub fn shared(self) -> SharedNavigator {
        Rc::new(RefCell::new(self))
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }
}

impl Navigator for LinearNavigator {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_destination(&mut self, target: Vec3) {
        self.destination = Some(target);
    }

    fn advance(&mut self, dt: f32) {
        let Some(target) = self.destination else {
            return;
        };
        let to_target = target - self.position;
        let distance = to_target.length();
        let step = self.speed * dt.max(0.0);
        if step >= distance {
            self.position = target;
        } else {
            self.position += to_target / distance * step;
        }
    }

    fn stop(&mut self) {
        self.destination = None;
    }

    fn remaining_distance(&self) -> Option<f32> {
        self.destination
            .map(|target| target.distance(self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_at_speed() {
        let mut nav = LinearNavigator::new(Vec3::ZERO, 2.0);
        nav.set_destination(Vec3::new(10.0, 0.0, 0.0));
        nav.advance(1.0);
        assert_eq!(nav.position(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(nav.remaining_distance(), Some(8.0));
    }

    #[test]
    fn test_advance_does_not_overshoot() {
        let mut nav = LinearNavigator::new(Vec3::ZERO, 100.0);
        nav.set_destination(Vec3::new(0.0, 0.0, 3.0));
        nav.advance(1.0);
        assert_eq!(nav.position(), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(nav.remaining_distance(), Some(0.0));
    }

    #[test]
    fn test_no_destination_stays_put() {
        let mut nav = LinearNavigator::new(Vec3::ONE, 5.0);
        nav.advance(1.0);
        assert_eq!(nav.position(), Vec3::ONE);
        assert_eq!(nav.remaining_distance(), None);

        nav.set_destination(Vec3::ZERO);
        nav.stop();
        nav.advance(1.0);
        assert_eq!(nav.position(), Vec3::ONE);
    }

    #[test]
    fn test_shared_handle() {
        let nav = LinearNavigator::new(Vec3::ZERO, 1.0).shared();
        nav.borrow_mut().set_destination(Vec3::X);
        nav.borrow_mut().advance(0.5);
        assert_eq!(nav.borrow().position(), Vec3::new(0.5, 0.0, 0.0));
    }
}
