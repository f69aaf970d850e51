use glam::Vec2;

/// Walkable floor rectangle, relative to the floor anchor.
pub const FLOOR_MIN: Vec2 = Vec2::new(-130.0, -10.0);
pub const FLOOR_MAX: Vec2 = Vec2::new(130.0, 50.0);

/// Is `p` inside the walkable floor (boundary inclusive)?
pub fn on_floor(p: Vec2) -> bool {
    p.is_finite() && p.cmpge(FLOOR_MIN).all() && p.cmple(FLOOR_MAX).all()
}

/// Discrete behavior mode of the cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ActionState {
    Idle,
    Walking,
    #[default]
    Sitting,
    Laying,
    Licking,
    Sleeping,
    Surprised,
}

impl ActionState {
    pub const ALL: [ActionState; 7] = [
        Self::Idle,
        Self::Walking,
        Self::Sitting,
        Self::Laying,
        Self::Licking,
        Self::Sleeping,
        Self::Surprised,
    ];

    /// Decode a raw index. Anything unrecognised falls through to `Idle`.
    pub fn from_repr(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Walking,
            2 => Self::Sitting,
            3 => Self::Laying,
            4 => Self::Licking,
            5 => Self::Sleeping,
            6 => Self::Surprised,
            other => {
                log::warn!("Unknown action index {other}, falling back to idle");
                Self::Idle
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::Sitting => "sitting",
            Self::Laying => "laying",
            Self::Licking => "licking",
            Self::Sleeping => "sleeping",
            Self::Surprised => "surprised",
        }
    }
}

/// Horizontal facing of the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// High-frequency state, rewritten every tick by the movement and frame systems.
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    /// Current offset from the floor anchor.
    pub current: Vec2,
    /// Where a walk is heading. Always on the floor.
    pub target: Vec2,
    pub facing: Facing,
    /// Cyclic animation frame in [0, 64).
    pub frame: u8,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            current: Vec2::ZERO,
            target: Vec2::ZERO,
            facing: Facing::Right,
            frame: 0,
        }
    }
}

/// Rarely-changing state that should trigger a visual update.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mood {
    pub action: ActionState,
    /// True for the length of a click reaction. Autonomous behavior is frozen.
    pub interacting: bool,
    /// Bumped on every click so only the latest reaction deadline ends it.
    pub reaction: u64,
    pub blinking: bool,
    pub hovered: bool,
}

/// Marks the cat entity.
#[derive(Debug, Clone, Copy)]
pub struct Cat;
