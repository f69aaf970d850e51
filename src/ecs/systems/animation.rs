use crate::ecs::components::{ActionState, Motion, Mood};

/// Frame counter wraps at this value.
pub const FRAME_CYCLE: u8 = 64;
/// Chance per blink check that an awake cat blinks.
pub const BLINK_CHANCE: f32 = 0.15;
/// How long the eyes stay shut.
pub const BLINK_MS: u64 = 200;

/// Advance the cyclic frame counter by one tick.
pub fn advance_frame(motion: &mut Motion) {
    motion.frame = (motion.frame + 1) % FRAME_CYCLE;
}

/// Walking leg swap: toggles every 4 ticks.
pub fn leg_phase(frame: u8) -> bool {
    (frame / 4) % 2 == 1
}

/// Idle tail wag: toggles every 8 ticks.
pub fn tail_phase(frame: u8) -> bool {
    (frame / 8) % 2 == 1
}

/// Roll for a blink. Returns true if one started; the caller schedules its end.
pub fn blink_check(mood: &mut Mood, rng: &mut fastrand::Rng) -> bool {
    if rng.f32() < BLINK_CHANCE && mood.action != ActionState::Sleeping {
        mood.blinking = true;
        return true;
    }
    false
}

pub fn end_blink(mood: &mut Mood) {
    mood.blinking = false;
}
