//! Pixel-art tables for the cat. Everything here is in sprite units on a
//! 32x32 grid, origin top-left, y down.

use glam::Vec2;

use super::pose::{Body, Face, Legs, Pose, TAIL_WAG_SHIFT};
use crate::cat::wardrobe::{Accessory, Hat};

/// Sprite grid edge length.
pub const SPRITE_SIZE: f32 = 32.0;
/// Head and hat rotate around this point.
const HEAD_PIVOT: Vec2 = Vec2::new(16.0, 12.0);

const WHITE: u32 = 0xFFFFFFFF;
const TAIL: u32 = 0xDDDDDDFF;
const EAR_INNER: u32 = 0xFFCDD2FF;
const EYE: u32 = 0x333333FF;
const NOSE: u32 = 0xF48FB1FF;
const WHISKER: u32 = 0xCCCCCCFF;
const BLUSH: u32 = 0xFF80AB99;
const TONGUE: u32 = 0xFF5252FF;
const LICK: u32 = 0xFF8A80FF;
const SANTA_RED: u32 = 0xD32F2FFF;
const SANTA_GREEN: u32 = 0x2E7D32FF;
const POMPOM: u32 = 0xFFEB3BFF;
const ANTLER: u32 = 0x795548FF;
const BELL_STRAP: u32 = 0xA1887FFF;
const BELL: u32 = 0xFFD700FF;
pub const HEART: u32 = 0xE53935FF;

/// Which transform group a rect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Body,
    Head,
    Hat,
    Accessory,
}

/// One solid pixel block of the sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// RGBA packed as u32.
    pub color: u32,
    pub layer: Layer,
}

impl SpriteRect {
    /// Centre and rotation (radians) after the layer's transform and mirroring.
    /// Mirroring applies to the whole group so asymmetric parts stay consistent.
    pub fn placed(&self, pose: &Pose) -> (Vec2, f32) {
        let mut center = Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5);
        let mut rotation = 0.0;

        match self.layer {
            Layer::Body => {}
            Layer::Head | Layer::Hat => {
                if pose.tilt_deg != 0.0 {
                    rotation = pose.tilt_deg.to_radians();
                    center = HEAD_PIVOT + Vec2::from_angle(rotation).rotate(center - HEAD_PIVOT);
                }
                center.y += pose.head_offset;
            }
            Layer::Accessory => center.y += pose.accessory_offset,
        }

        if pose.mirrored {
            center.x = SPRITE_SIZE - center.x;
            rotation = -rotation;
        }
        (center, rotation)
    }
}

type Block = [f32; 4];

fn push(out: &mut Vec<SpriteRect>, layer: Layer, color: u32, blocks: &[Block]) {
    push_shifted(out, layer, color, blocks, 0.0);
}

fn push_shifted(out: &mut Vec<SpriteRect>, layer: Layer, color: u32, blocks: &[Block], dx: f32) {
    out.extend(blocks.iter().map(|&[x, y, w, h]| SpriteRect {
        x: x + dx,
        y,
        w,
        h,
        color,
        layer,
    }));
}

/// Append the rects for `pose` in draw order: body, head, hat, accessory.
pub fn build(pose: &Pose, out: &mut Vec<SpriteRect>) {
    body(pose.body, out);
    head(pose.face, out);
    hat(pose.hat, out);
    accessory(pose.accessory, out);
}

fn body(body: Body, out: &mut Vec<SpriteRect>) {
    match body {
        Body::Seated => {
            push(
                out,
                Layer::Body,
                WHITE,
                &[[10.0, 16.0, 10.0, 12.0], [18.0, 22.0, 6.0, 6.0], [10.0, 28.0, 3.0, 2.0], [14.0, 28.0, 3.0, 2.0]],
            );
            push(
                out,
                Layer::Body,
                TAIL,
                &[[24.0, 26.0, 2.0, 2.0], [26.0, 26.0, 4.0, 2.0], [28.0, 24.0, 2.0, 2.0]],
            );
        }
        Body::Prone => {
            push(
                out,
                Layer::Body,
                WHITE,
                &[[6.0, 22.0, 20.0, 8.0], [26.0, 22.0, 4.0, 2.0], [2.0, 28.0, 6.0, 2.0], [24.0, 28.0, 6.0, 2.0]],
            );
        }
        Body::Standing { legs, tail_wag } => {
            push(out, Layer::Body, WHITE, &[[6.0, 16.0, 20.0, 12.0]]);
            let feet: &[Block] = match legs {
                Legs::Stride => &[[8.0, 28.0, 4.0, 4.0], [20.0, 28.0, 4.0, 4.0]],
                Legs::Planted => &[[6.0, 28.0, 4.0, 4.0], [22.0, 28.0, 4.0, 4.0]],
            };
            push(out, Layer::Body, WHITE, feet);
            let shift = if tail_wag { TAIL_WAG_SHIFT } else { 0.0 };
            push_shifted(out, Layer::Body, TAIL, &[[26.0, 14.0, 2.0, 6.0], [28.0, 12.0, 2.0, 2.0]], shift);
        }
    }
}

fn head(face: Face, out: &mut Vec<SpriteRect>) {
    push(
        out,
        Layer::Head,
        WHITE,
        &[
            [6.0, 6.0, 14.0, 10.0],
            [4.0, 8.0, 2.0, 6.0],
            [20.0, 8.0, 2.0, 6.0],
            // ears
            [6.0, 4.0, 2.0, 2.0],
            [18.0, 4.0, 2.0, 2.0],
            [8.0, 2.0, 2.0, 2.0],
            [16.0, 2.0, 2.0, 2.0],
        ],
    );
    push(out, Layer::Head, EAR_INNER, &[[8.0, 6.0, 2.0, 2.0], [16.0, 6.0, 2.0, 2.0]]);

    match face {
        Face::Asleep => {
            push(out, Layer::Head, EYE, &[[8.0, 11.0, 2.0, 1.0], [16.0, 11.0, 2.0, 1.0]]);
            push(out, Layer::Head, NOSE, &[[12.0, 12.0, 2.0, 1.0]]);
            push(out, Layer::Head, WHISKER, &[[3.0, 11.0, 2.0, 1.0], [21.0, 11.0, 2.0, 1.0]]);
        }
        Face::Happy => {
            // ^ ^
            push(
                out,
                Layer::Head,
                EYE,
                &[
                    [8.0, 11.0, 1.0, 1.0],
                    [9.0, 10.0, 1.0, 1.0],
                    [10.0, 11.0, 1.0, 1.0],
                    [16.0, 11.0, 1.0, 1.0],
                    [17.0, 10.0, 1.0, 1.0],
                    [18.0, 11.0, 1.0, 1.0],
                ],
            );
            push(out, Layer::Head, BLUSH, &[[6.0, 12.0, 2.0, 1.0], [18.0, 12.0, 2.0, 1.0]]);
            push(out, Layer::Head, NOSE, &[[12.0, 12.0, 2.0, 1.0]]);
            push(out, Layer::Head, TONGUE, &[[12.0, 13.0, 2.0, 1.0]]);
            push(out, Layer::Head, WHISKER, &[[3.0, 12.0, 2.0, 1.0], [21.0, 12.0, 2.0, 1.0]]);
        }
        Face::Awake { eyes_closed, licking } => {
            let eyes: &[Block] = if eyes_closed {
                &[[8.0, 10.0, 2.0, 1.0], [16.0, 10.0, 2.0, 1.0]]
            } else {
                &[[8.0, 9.0, 2.0, 2.0], [16.0, 9.0, 2.0, 2.0]]
            };
            push(out, Layer::Head, EYE, eyes);
            push(out, Layer::Head, NOSE, &[[12.0, 12.0, 2.0, 1.0]]);
            push(out, Layer::Head, WHISKER, &[[3.0, 11.0, 2.0, 1.0], [21.0, 11.0, 2.0, 1.0]]);
            if licking {
                push(out, Layer::Head, LICK, &[[12.0, 13.0, 2.0, 2.0]]);
            }
        }
    }
}

fn hat(hat: Hat, out: &mut Vec<SpriteRect>) {
    match hat {
        Hat::None => {}
        Hat::SantaRed => {
            push(out, Layer::Hat, WHITE, &[[4.0, 4.0, 18.0, 2.0]]);
            push(
                out,
                Layer::Hat,
                SANTA_RED,
                &[[6.0, 2.0, 14.0, 2.0], [8.0, 0.0, 8.0, 2.0], [18.0, 0.0, 2.0, 4.0]],
            );
            push(out, Layer::Hat, WHITE, &[[20.0, 4.0, 2.0, 2.0]]);
        }
        Hat::SantaGreen => {
            push(out, Layer::Hat, WHITE, &[[4.0, 4.0, 18.0, 2.0]]);
            push(out, Layer::Hat, SANTA_GREEN, &[[6.0, 2.0, 14.0, 2.0], [8.0, 0.0, 8.0, 2.0]]);
            push(out, Layer::Hat, POMPOM, &[[12.0, -2.0, 2.0, 2.0]]);
        }
        Hat::Reindeer => {
            push(
                out,
                Layer::Hat,
                ANTLER,
                &[[4.0, 0.0, 2.0, 6.0], [20.0, 0.0, 2.0, 6.0], [2.0, 0.0, 2.0, 2.0], [22.0, 0.0, 2.0, 2.0]],
            );
        }
    }
}

fn accessory(accessory: Accessory, out: &mut Vec<SpriteRect>) {
    match accessory {
        Accessory::None => {}
        Accessory::ScarfRed => {
            push(out, Layer::Accessory, SANTA_RED, &[[8.0, 14.0, 10.0, 2.0], [16.0, 14.0, 2.0, 6.0]]);
        }
        Accessory::ScarfGreen => {
            push(out, Layer::Accessory, SANTA_GREEN, &[[8.0, 14.0, 10.0, 2.0], [16.0, 14.0, 2.0, 6.0]]);
        }
        Accessory::Bell => {
            push(out, Layer::Accessory, BELL_STRAP, &[[10.0, 14.0, 6.0, 2.0]]);
            push(out, Layer::Accessory, BELL, &[[12.0, 16.0, 2.0, 2.0]]);
        }
    }
}

/// Heart glyph on a 7x6 grid, used for click hearts and the hover badge.
pub const HEART_GRID: Vec2 = Vec2::new(7.0, 6.0);
pub const HEART_BLOCKS: [Block; 6] = [
    [1.0, 0.0, 2.0, 1.0],
    [4.0, 0.0, 2.0, 1.0],
    [0.0, 1.0, 7.0, 2.0],
    [1.0, 3.0, 5.0, 1.0],
    [2.0, 4.0, 3.0, 1.0],
    [3.0, 5.0, 1.0, 1.0],
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat::wardrobe::Customization;
    use crate::ecs::components::{ActionState, Facing};
    use crate::render::pose::PoseInput;

    fn pose(action: ActionState, outfit: Customization) -> Pose {
        Pose::derive(&PoseInput {
            action,
            frame: 0,
            facing: Facing::Right,
            hovered: false,
            blinking: false,
            outfit,
            position: Vec2::ZERO,
        })
    }

    fn rects(p: &Pose) -> Vec<SpriteRect> {
        let mut out = Vec::new();
        build(p, &mut out);
        out
    }

    #[test]
    fn bare_cat_has_no_overlays() {
        let bare = Customization {
            hat: Hat::None,
            accessory: Accessory::None,
        };
        let r = rects(&pose(ActionState::Sitting, bare));
        assert!(r.iter().all(|r| matches!(r.layer, Layer::Body | Layer::Head)));
    }

    #[test]
    fn outfit_adds_overlays() {
        let r = rects(&pose(ActionState::Sitting, Customization::default()));
        assert!(r.iter().any(|r| r.layer == Layer::Hat));
        assert!(r.iter().any(|r| r.layer == Layer::Accessory));
    }

    #[test]
    fn licking_shows_tongue() {
        let r = rects(&pose(ActionState::Licking, Customization::default()));
        assert!(r.iter().any(|r| r.color == LICK));
        let r = rects(&pose(ActionState::Idle, Customization::default()));
        assert!(!r.iter().any(|r| r.color == LICK));
    }

    #[test]
    fn mirroring_flips_around_sprite_centre() {
        let mut p = pose(ActionState::Sitting, Customization::default());
        let r = SpriteRect {
            x: 10.0,
            y: 0.0,
            w: 2.0,
            h: 2.0,
            color: WHITE,
            layer: Layer::Body,
        };
        assert_eq!(r.placed(&p).0, Vec2::new(11.0, 1.0));
        p.mirrored = true;
        assert_eq!(r.placed(&p).0, Vec2::new(21.0, 1.0));
    }

    #[test]
    fn prone_head_drops_and_accessory_follows_body() {
        let p = pose(ActionState::Laying, Customization::default());
        let head = SpriteRect {
            x: 6.0,
            y: 6.0,
            w: 2.0,
            h: 2.0,
            color: WHITE,
            layer: Layer::Head,
        };
        assert_eq!(head.placed(&p).0, Vec2::new(7.0, 15.0));
        let scarf = SpriteRect {
            layer: Layer::Accessory,
            ..head
        };
        assert_eq!(scarf.placed(&p).0, Vec2::new(7.0, 14.0));
    }

    #[test]
    fn tilt_keeps_pivot_and_flips_with_mirror() {
        let mut p = pose(ActionState::Surprised, Customization::default());
        let at_pivot = SpriteRect {
            x: 15.0,
            y: 11.0,
            w: 2.0,
            h: 2.0,
            color: WHITE,
            layer: Layer::Hat,
        };
        let (c, rot) = at_pivot.placed(&p);
        assert!((c - HEAD_PIVOT).length() < 1e-5);
        assert!((rot - 15f32.to_radians()).abs() < 1e-6);

        p.mirrored = true;
        let (c, rot) = at_pivot.placed(&p);
        assert!((c - Vec2::new(16.0, 12.0)).length() < 1e-5);
        assert!(rot < 0.0);
    }
}
