//! Fixed-size particle trail that chases a moving target

use glam::Vec3;
use std::collections::VecDeque;

/// Ring buffer of particle positions, head first
///
/// Each `step` eases the head toward the target and shifts every older
/// position one slot toward the tail; the oldest position falls off.
#[derive(Debug, Clone)]
pub struct Trail {
    positions: VecDeque<Vec3>,
    capacity: usize,
    follow: f32,
}

impl Trail {
    /// `capacity` particles all starting at `origin`; `follow` in (0, 1]
    pub fn new(capacity: usize, follow: f32, origin: Vec3) -> Self {
        let capacity = capacity.max(1);
        Self {
            positions: std::iter::repeat(origin).take(capacity).collect(),
            capacity,
            follow: follow.clamp(f32::EPSILON, 1.0),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn head(&self) -> Vec3 {
        self.positions.front().copied().unwrap_or(Vec3::ZERO)
    }

    /// Positions from newest to oldest
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vec3> + '_ {
        self.positions.iter().copied()
    }

    /// Advance one frame toward `target`
    pub fn step(&mut self, target: Vec3) {
        let head = self.head();
        let next = head + (target - head) * self.follow;
        self.positions.pop_back();
        self.positions.push_front(next);
    }

    /// Collapse every particle onto `position`
    pub fn reset(&mut self, position: Vec3) {
        for p in self.positions.iter_mut() {
            *p = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_fixed() {
        let mut trail = Trail::new(8, 0.5, Vec3::ZERO);
        for i in 0..100 {
            trail.step(Vec3::splat(i as f32));
            assert_eq!(trail.len(), 8);
        }
    }

    #[test]
    fn test_shifts_one_slot_per_step() {
        let mut trail = Trail::new(4, 1.0, Vec3::ZERO);
        let before: Vec<Vec3> = trail.positions().collect();
        trail.step(Vec3::X);
        let after: Vec<Vec3> = trail.positions().collect();

        assert_eq!(after[0], Vec3::X);
        assert_eq!(&after[1..], &before[..3]);

        trail.step(Vec3::Y);
        trail.step(Vec3::Z);
        let positions: Vec<Vec3> = trail.positions().collect();
        assert_eq!(positions, vec![Vec3::Z, Vec3::Y, Vec3::X, Vec3::ZERO]);
    }

    #[test]
    fn test_head_eases_toward_target() {
        let mut trail = Trail::new(3, 0.25, Vec3::ZERO);
        trail.step(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(trail.head(), Vec3::new(1.0, 0.0, 0.0));
        trail.step(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(trail.head(), Vec3::new(1.75, 0.0, 0.0));
    }

    #[test]
    fn test_converges_on_stationary_target() {
        let target = Vec3::new(2.0, -1.0, 3.0);
        let mut trail = Trail::new(5, 0.3, Vec3::ZERO);
        for _ in 0..200 {
            trail.step(target);
        }
        assert!(trail.positions().all(|p| p.distance(target) < 1e-4));
    }

    #[test]
    fn test_reset() {
        let mut trail = Trail::new(3, 0.5, Vec3::ZERO);
        trail.step(Vec3::ONE);
        trail.reset(Vec3::NEG_Y);
        assert!(trail.positions().all(|p| p == Vec3::NEG_Y));
        assert_eq!(trail.capacity(), 3);
    }
}
