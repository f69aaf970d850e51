use glam::Vec2;

use crate::ecs::components::{ActionState, Motion, Mood, FLOOR_MAX, FLOOR_MIN};

/// Above this roll a walking cat stops.
const STOP_WALK_ROLL: f32 = 0.7;
/// Below this roll a walking cat picks a fresh target without stopping.
const RETARGET_ROLL: f32 = 0.2;

/// What one behavior evaluation decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep doing the same thing.
    Continue,
    /// Keep walking, toward a new target.
    Retarget,
    /// Start walking toward a new target.
    Walk,
    /// Settle into a stationary action.
    Settle(ActionState),
}

/// Pure transition table. `stop_roll` is only consulted when a walk ends.
pub fn decide(action: ActionState, roll: f32, stop_roll: impl FnOnce() -> f32) -> Decision {
    if action == ActionState::Walking {
        if roll > STOP_WALK_ROLL {
            let stop = stop_roll();
            let next = if stop < 0.4 {
                ActionState::Idle
            } else if stop < 0.7 {
                ActionState::Sitting
            } else {
                ActionState::Laying
            };
            Decision::Settle(next)
        } else if roll < RETARGET_ROLL {
            Decision::Retarget
        } else {
            Decision::Continue
        }
    } else if roll < 0.4 {
        Decision::Walk
    } else if roll < 0.6 {
        Decision::Settle(ActionState::Sitting)
    } else if roll < 0.8 {
        Decision::Settle(ActionState::Laying)
    } else if roll < 0.9 {
        Decision::Settle(ActionState::Licking)
    } else {
        Decision::Settle(ActionState::Idle)
    }
}

/// Uniform random point on the walkable floor.
pub fn random_target(rng: &mut fastrand::Rng) -> Vec2 {
    let span = FLOOR_MAX - FLOOR_MIN;
    FLOOR_MIN + Vec2::new(rng.f32() * span.x, rng.f32() * span.y)
}

/// Re-evaluate what the cat is doing. Frozen while a click reaction runs.
pub fn evaluate(mood: &mut Mood, motion: &mut Motion, rng: &mut fastrand::Rng) {
    if mood.interacting {
        return;
    }

    let roll = rng.f32();
    let decision = decide(mood.action, roll, || rng.f32());

    match decision {
        Decision::Continue => {}
        Decision::Retarget => {
            motion.target = random_target(rng);
            log::debug!("Cat retargets to {:?}", motion.target);
        }
        Decision::Walk => {
            mood.action = ActionState::Walking;
            motion.target = random_target(rng);
            log::debug!("Cat starts walking to {:?}", motion.target);
        }
        Decision::Settle(next) => {
            if next != mood.action {
                log::debug!("Cat {} -> {}", mood.action.label(), next.label());
            }
            mood.action = next;
        }
    }
}

/// Externally requested action. Ignored during a click reaction like any other change.
pub fn force_action(mood: &mut Mood, action: ActionState) {
    if mood.interacting {
        log::debug!("Ignoring forced {} during reaction", action.label());
        return;
    }
    mood.action = action;
}

/// Send the cat walking to `target`, clamped onto the floor.
pub fn walk_to(mood: &mut Mood, motion: &mut Motion, target: Vec2) {
    if mood.interacting {
        return;
    }
    if !target.is_finite() {
        log::warn!("Ignoring non-finite walk target {target:?}");
        return;
    }
    motion.target = target.clamp(FLOOR_MIN, FLOOR_MAX);
    mood.action = ActionState::Walking;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::ecs::components::on_floor;

    #[test]
    fn walk_to_clamps_onto_floor() {
        let mut mood = Mood::default();
        let mut motion = Motion::default();
        walk_to(&mut mood, &mut motion, Vec2::new(400.0, -90.0));
        assert_eq!(mood.action, ActionState::Walking);
        assert_eq!(motion.target, Vec2::new(130.0, -10.0));
    }

    #[test]
    fn forced_action_waits_for_reaction() {
        let mut mood = Mood {
            action: ActionState::Surprised,
            interacting: true,
            ..Mood::default()
        };
        force_action(&mut mood, ActionState::Sleeping);
        assert_eq!(mood.action, ActionState::Surprised);
        mood.interacting = false;
        force_action(&mut mood, ActionState::Sleeping);
        assert_eq!(mood.action, ActionState::Sleeping);
    }

    fn no_second_roll() -> f32 {
        panic!("second roll drawn")
    }

    #[test]
    fn stationary_table() {
        let sit = ActionState::Sitting;
        assert_eq!(decide(sit, 0.0, no_second_roll), Decision::Walk);
        assert_eq!(decide(sit, 0.39, no_second_roll), Decision::Walk);
        assert_eq!(
            decide(sit, 0.4, no_second_roll),
            Decision::Settle(ActionState::Sitting)
        );
        assert_eq!(
            decide(sit, 0.6, no_second_roll),
            Decision::Settle(ActionState::Laying)
        );
        assert_eq!(
            decide(sit, 0.8, no_second_roll),
            Decision::Settle(ActionState::Licking)
        );
        assert_eq!(
            decide(sit, 0.9, no_second_roll),
            Decision::Settle(ActionState::Idle)
        );
        assert_eq!(
            decide(ActionState::Surprised, 0.95, no_second_roll),
            Decision::Settle(ActionState::Idle)
        );
    }

    #[test]
    fn walking_table() {
        let walk = ActionState::Walking;
        assert_eq!(decide(walk, 0.1, no_second_roll), Decision::Retarget);
        assert_eq!(decide(walk, 0.2, no_second_roll), Decision::Continue);
        assert_eq!(decide(walk, 0.7, no_second_roll), Decision::Continue);
        assert_eq!(
            decide(walk, 0.71, || 0.1),
            Decision::Settle(ActionState::Idle)
        );
        assert_eq!(
            decide(walk, 0.71, || 0.5),
            Decision::Settle(ActionState::Sitting)
        );
        assert_eq!(
            decide(walk, 0.99, || 0.7),
            Decision::Settle(ActionState::Laying)
        );
    }

    #[test]
    fn interacting_freezes_behavior() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut mood = Mood {
            action: ActionState::Surprised,
            interacting: true,
            ..Mood::default()
        };
        let mut motion = Motion::default();
        for _ in 0..100 {
            evaluate(&mut mood, &mut motion, &mut rng);
            assert_eq!(mood.action, ActionState::Surprised);
            assert_eq!(motion.target, Vec2::ZERO);
        }
    }

    #[test]
    fn walking_always_gets_floor_target() {
        let mut rng = fastrand::Rng::with_seed(99);
        let mut mood = Mood::default();
        let mut motion = Motion::default();
        for _ in 0..1000 {
            evaluate(&mut mood, &mut motion, &mut rng);
            assert!(on_floor(motion.target), "{:?}", motion.target);
        }
    }

    proptest! {
        #[test]
        fn targets_stay_on_floor(seed in any::<u64>()) {
            let mut rng = fastrand::Rng::with_seed(seed);
            for _ in 0..64 {
                let t = random_target(&mut rng);
                prop_assert!(t.x >= -130.0 && t.x <= 130.0);
                prop_assert!(t.y >= -10.0 && t.y <= 50.0);
            }
        }

        #[test]
        fn every_decision_is_a_known_action(
            start in 0u8..7,
            roll in 0.0f32..1.0,
            stop in 0.0f32..1.0,
        ) {
            let action = ActionState::from_repr(start);
            let next = match decide(action, roll, || stop) {
                Decision::Continue | Decision::Retarget => action,
                Decision::Walk => ActionState::Walking,
                Decision::Settle(a) => a,
            };
            prop_assert!(ActionState::ALL.contains(&next));
        }
    }
}
