use glam::Vec2;

use crate::cat::wardrobe::{Accessory, Customization, Hat};
use crate::ecs::components::{ActionState, Facing};
use crate::ecs::systems::animation::{leg_phase, tail_phase};

/// Head tilt while the cat is happy, in degrees (clockwise on screen).
pub const HAPPY_TILT_DEG: f32 = 15.0;
/// Idle tail wag shift, in sprite units.
pub const TAIL_WAG_SHIFT: f32 = 2.0;

/// Everything the pose depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseInput {
    pub action: ActionState,
    pub frame: u8,
    pub facing: Facing,
    pub hovered: bool,
    pub blinking: bool,
    pub outfit: Customization,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legs {
    /// Feet under the body corners.
    Planted,
    /// Mid-stride, feet tucked in.
    Stride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// Compact sitting column with the tail wrapped round.
    Seated,
    /// Long and low, paws out front and back.
    Prone,
    Standing { legs: Legs, tail_wag: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Asleep,
    /// Squinted eyes, blush and a little tongue.
    Happy,
    Awake { eyes_closed: bool, licking: bool },
}

/// Concrete draw description for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub body: Body,
    pub face: Face,
    /// Vertical shift of head and hat, in sprite units.
    pub head_offset: f32,
    /// Vertical shift of the neck accessory, in sprite units.
    pub accessory_offset: f32,
    /// Rotation of head and hat around the head pivot, in degrees.
    pub tilt_deg: f32,
    /// Mirror the whole sprite group horizontally.
    pub mirrored: bool,
    pub depth_scale: f32,
    pub hat: Hat,
    pub accessory: Accessory,
}

/// Perspective factor: cats further back (smaller y) draw smaller.
pub fn depth_scale(y: f32) -> f32 {
    0.9 + (y + 20.0) / 200.0
}

impl Pose {
    pub fn derive(input: &PoseInput) -> Self {
        let (body, head_offset, accessory_offset) = match input.action {
            ActionState::Sitting | ActionState::Surprised => (Body::Seated, 0.0, 1.0),
            ActionState::Laying | ActionState::Sleeping => (Body::Prone, 8.0, 7.0),
            ActionState::Idle | ActionState::Walking | ActionState::Licking => {
                let legs = if input.action == ActionState::Walking && !leg_phase(input.frame) {
                    Legs::Stride
                } else {
                    Legs::Planted
                };
                let tail_wag = input.action == ActionState::Idle && tail_phase(input.frame);
                (Body::Standing { legs, tail_wag }, 0.0, 0.0)
            }
        };

        let happy = input.hovered || input.action == ActionState::Surprised;

        let face = if input.action == ActionState::Sleeping {
            Face::Asleep
        } else if happy {
            Face::Happy
        } else {
            Face::Awake {
                eyes_closed: input.blinking,
                licking: input.action == ActionState::Licking,
            }
        };

        Self {
            body,
            face,
            head_offset,
            accessory_offset,
            tilt_deg: if happy { HAPPY_TILT_DEG } else { 0.0 },
            mirrored: input.facing == Facing::Left,
            depth_scale: depth_scale(input.position.y),
            hat: input.outfit.hat,
            accessory: input.outfit.accessory,
        }
    }
}
