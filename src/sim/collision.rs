//! Collision detection between the runner and obstacles
//!
//! Axis-aligned boxes only. The detector remembers which obstacles the
//! runner overlapped last tick and reports the differences as contact
//! begin/end events, which the handler folds into a contact count.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameState, Obstacle, ObstacleId};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box with bottom-left corner `pos`
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap; boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Something that can take part in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Runner,
    Obstacle(ObstacleId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPhase {
    Begin,
    End,
}

/// A contact change between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub a: EntityId,
    pub b: EntityId,
    pub phase: ContactPhase,
}

impl ContactEvent {
    pub fn runner_obstacle(id: ObstacleId, phase: ContactPhase) -> Self {
        Self {
            a: EntityId::Runner,
            b: EntityId::Obstacle(id),
            phase,
        }
    }

    /// The obstacle involved, if the other side is the runner
    pub fn runner_obstacle_pair(&self) -> Option<ObstacleId> {
        match (self.a, self.b) {
            (EntityId::Runner, EntityId::Obstacle(id)) | (EntityId::Obstacle(id), EntityId::Runner) => {
                Some(id)
            }
            _ => None,
        }
    }
}

/// Overlap memory between ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactDetector {
    /// Obstacles overlapping the runner as of the last `detect` (sorted by id)
    touching: Vec<ObstacleId>,
}

impl ContactDetector {
    /// Compare current overlaps with the previous tick.
    ///
    /// Ends are reported before begins, each in id order. An obstacle that
    /// vanished while overlapping produces an end event.
    pub fn detect(&mut self, runner: &Aabb, obstacles: &[Obstacle]) -> Vec<ContactEvent> {
        let mut current: Vec<ObstacleId> = obstacles
            .iter()
            .filter(|o| runner.intersects(&o.aabb()))
            .map(|o| o.id)
            .collect();
        current.sort_unstable();

        let mut events: Vec<ContactEvent> = self
            .touching
            .iter()
            .filter(|id| current.binary_search(id).is_err())
            .map(|&id| ContactEvent::runner_obstacle(id, ContactPhase::End))
            .collect();
        events.extend(
            current
                .iter()
                .filter(|id| self.touching.binary_search(id).is_err())
                .map(|&id| ContactEvent::runner_obstacle(id, ContactPhase::Begin)),
        );

        self.touching = current;
        events
    }

    pub fn contact_count(&self) -> usize {
        self.touching.len()
    }

    pub fn is_touching(&self, id: ObstacleId) -> bool {
        self.touching.binary_search(&id).is_ok()
    }

    pub fn clear(&mut self) {
        self.touching.clear();
    }
}

/// Apply one contact event to the runner.
///
/// Keeps a count rather than a flag so an end from one obstacle does not
/// clear contact with another. Contacts not involving the runner and an
/// obstacle are ignored.
pub fn handle_contact(state: &mut GameState, event: &ContactEvent) {
    let Some(id) = event.runner_obstacle_pair() else {
        return;
    };

    let runner = &mut state.runner;
    match event.phase {
        ContactPhase::Begin => {
            runner.contact_count += 1;
            log::debug!("contact begin with {:?} (count {})", id, runner.contact_count);
        }
        ContactPhase::End => {
            runner.contact_count = runner.contact_count.saturating_sub(1);
            log::debug!("contact end with {:?} (count {})", id, runner.contact_count);
        }
    }
    runner.touching_obstacle = runner.contact_count > 0;

    if event.phase == ContactPhase::Begin && state.config.collision_ends_run {
        state.game_over();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::layout::Layout;
    use crate::sim::state::{GamePhase, RunConfig};

    fn state(config: RunConfig) -> GameState {
        let layout = Layout::with_ground(SCREEN_WIDTH, SCREEN_HEIGHT, GROUND_HEIGHT).unwrap();
        GameState::new(1, layout, config).unwrap()
    }

    fn obstacle(id: u32, x: f32) -> Obstacle {
        Obstacle {
            id: ObstacleId(id),
            pos: Vec2::new(x, 0.0),
            size: Vec2::new(20.0, 40.0),
            spawn_time: 0.0,
        }
    }

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::from_pos_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_pos_size(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = Aabb::from_pos_size(Vec2::new(20.0, 0.0), Vec2::new(5.0, 5.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        let a = Aabb::from_pos_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_pos_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let above = Aabb::from_pos_size(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));
        assert!(!a.intersects(&b));
        assert!(!a.intersects(&above));
    }

    #[test]
    fn test_begin_then_end() {
        let mut detector = ContactDetector::default();
        let runner = Aabb::from_pos_size(Vec2::new(100.0, 0.0), Vec2::new(30.0, 40.0));

        let events = detector.detect(&runner, &[obstacle(1, 110.0)]);
        assert_eq!(
            events,
            vec![ContactEvent::runner_obstacle(ObstacleId(1), ContactPhase::Begin)]
        );
        assert!(detector.is_touching(ObstacleId(1)));

        // Still overlapping: no new events
        assert!(detector.detect(&runner, &[obstacle(1, 105.0)]).is_empty());

        let events = detector.detect(&runner, &[obstacle(1, 60.0)]);
        assert_eq!(
            events,
            vec![ContactEvent::runner_obstacle(ObstacleId(1), ContactPhase::End)]
        );
        assert_eq!(detector.contact_count(), 0);
    }

    #[test]
    fn test_despawned_obstacle_ends_contact() {
        let mut detector = ContactDetector::default();
        let runner = Aabb::from_pos_size(Vec2::new(100.0, 0.0), Vec2::new(30.0, 40.0));
        detector.detect(&runner, &[obstacle(4, 110.0)]);
        let events = detector.detect(&runner, &[]);
        assert_eq!(events[0].phase, ContactPhase::End);
        assert_eq!(events[0].runner_obstacle_pair(), Some(ObstacleId(4)));
    }

    #[test]
    fn test_end_from_one_obstacle_keeps_other_contact() {
        let mut state = state(RunConfig::default());
        handle_contact(
            &mut state,
            &ContactEvent::runner_obstacle(ObstacleId(1), ContactPhase::Begin),
        );
        handle_contact(
            &mut state,
            &ContactEvent::runner_obstacle(ObstacleId(2), ContactPhase::Begin),
        );
        handle_contact(
            &mut state,
            &ContactEvent::runner_obstacle(ObstacleId(1), ContactPhase::End),
        );
        assert!(state.runner.touching_obstacle);
        assert_eq!(state.runner.contact_count, 1);

        handle_contact(
            &mut state,
            &ContactEvent::runner_obstacle(ObstacleId(2), ContactPhase::End),
        );
        assert!(!state.runner.touching_obstacle);
    }

    #[test]
    fn test_contact_does_not_end_run_by_default() {
        let mut state = state(RunConfig::default());
        handle_contact(
            &mut state,
            &ContactEvent::runner_obstacle(ObstacleId(1), ContactPhase::Begin),
        );
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_contact_ends_run_when_enabled() {
        let mut state = state(RunConfig {
            collision_ends_run: true,
            ..Default::default()
        });
        handle_contact(
            &mut state,
            &ContactEvent::runner_obstacle(ObstacleId(1), ContactPhase::Begin),
        );
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn test_non_runner_contact_ignored() {
        let mut state = state(RunConfig::default());
        let event = ContactEvent {
            a: EntityId::Obstacle(ObstacleId(1)),
            b: EntityId::Obstacle(ObstacleId(2)),
            phase: ContactPhase::Begin,
        };
        handle_contact(&mut state, &event);
        assert!(!state.runner.touching_obstacle);
    }
}
