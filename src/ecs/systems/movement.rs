use crate::ecs::components::{on_floor, ActionState, Facing, Motion, Mood};

/// Distance per tick, in floor units.
pub const WALK_SPEED: f32 = 1.5;
/// Closer than this, the cat snaps onto its target.
pub const ARRIVAL_RADIUS: f32 = 5.0;
/// Horizontal speed needed before the sprite turns around.
const TURN_THRESHOLD: f32 = 0.1;

/// Step the cat toward its target. Only walking cats move.
pub fn integrate(motion: &mut Motion, mood: &mut Mood) {
    if mood.action != ActionState::Walking {
        return;
    }

    if !on_floor(motion.target) {
        log::warn!(
            "Walk target {:?} is off the floor, stopping in place",
            motion.target
        );
        motion.target = motion.current;
        mood.action = ActionState::Idle;
        return;
    }

    let delta = motion.target - motion.current;
    let dist = delta.length();

    if dist < ARRIVAL_RADIUS {
        motion.current = motion.target;
        return;
    }

    let vel = delta / dist * WALK_SPEED;
    motion.current += vel;

    if vel.x > TURN_THRESHOLD {
        motion.facing = Facing::Right;
    } else if vel.x < -TURN_THRESHOLD {
        motion.facing = Facing::Left;
    }

    log::trace!("Cat at {:?} -> {:?}", motion.current, motion.target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn walking() -> Mood {
        Mood {
            action: ActionState::Walking,
            ..Mood::default()
        }
    }

    #[test]
    fn one_tick_moves_walk_speed() {
        let mut motion = Motion {
            target: Vec2::new(100.0, 0.0),
            ..Motion::default()
        };
        let mut mood = walking();
        integrate(&mut motion, &mut mood);
        assert!((motion.current - Vec2::new(1.5, 0.0)).length() < 1e-6);
        assert_eq!(motion.facing, Facing::Right);
    }

    #[test]
    fn snaps_inside_arrival_radius() {
        let mut motion = Motion {
            current: Vec2::new(97.0, 0.0),
            target: Vec2::new(100.0, 0.0),
            ..Motion::default()
        };
        let mut mood = walking();
        integrate(&mut motion, &mut mood);
        assert_eq!(motion.current, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn zero_distance_target_is_arrived() {
        let mut motion = Motion::default();
        let mut mood = walking();
        integrate(&mut motion, &mut mood);
        assert_eq!(motion.current, Vec2::ZERO);
        assert_eq!(mood.action, ActionState::Walking);
    }

    #[test]
    fn stationary_cat_does_not_move() {
        let mut motion = Motion {
            current: Vec2::new(3.0, 4.0),
            target: Vec2::new(100.0, 0.0),
            ..Motion::default()
        };
        let mut mood = Mood::default();
        integrate(&mut motion, &mut mood);
        assert_eq!(motion.current, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn vertical_walk_keeps_facing() {
        let mut motion = Motion {
            target: Vec2::new(0.0, 40.0),
            facing: Facing::Left,
            ..Motion::default()
        };
        let mut mood = walking();
        integrate(&mut motion, &mut mood);
        assert_eq!(motion.facing, Facing::Left);
    }

    #[test]
    fn walking_left_turns_sprite() {
        let mut motion = Motion {
            target: Vec2::new(-100.0, 10.0),
            ..Motion::default()
        };
        let mut mood = walking();
        integrate(&mut motion, &mut mood);
        assert_eq!(motion.facing, Facing::Left);
    }

    #[test]
    fn off_floor_target_falls_back_to_idle() {
        let mut motion = Motion {
            current: Vec2::new(10.0, 10.0),
            target: Vec2::new(500.0, 0.0),
            ..Motion::default()
        };
        let mut mood = walking();
        integrate(&mut motion, &mut mood);
        assert_eq!(mood.action, ActionState::Idle);
        assert_eq!(motion.current, Vec2::new(10.0, 10.0));
        assert_eq!(motion.target, motion.current);
    }

    #[test]
    fn reaches_far_corner_without_leaving_floor() {
        let corner = Vec2::new(130.0, 50.0);
        let mut motion = Motion {
            target: corner,
            ..Motion::default()
        };
        let mut mood = walking();
        let mut ticks = 0;
        while motion.current != corner {
            integrate(&mut motion, &mut mood);
            assert!(on_floor(motion.current), "{:?}", motion.current);
            ticks += 1;
            assert!(ticks < 1000, "never arrived");
        }
        assert_eq!(motion.current, corner);
    }
}
