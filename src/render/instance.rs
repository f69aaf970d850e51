use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::pose::Pose;
use super::sprite::{self, SpriteRect, HEART, HEART_BLOCKS, HEART_GRID, SPRITE_SIZE};
use crate::particles::Heart;
use crate::scene::SceneView;

/// Per-instance data uploaded to GPU each frame.
/// Stride = 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RectInstance {
    /// Screen-space centre (x, y) in pixels.
    pub center: [f32; 2],
    /// Width and height in pixels.
    pub size: [f32; 2],
    /// RGBA color packed as u32.
    pub color: u32,
    /// Clockwise rotation in radians around the centre.
    pub rotation: f32,
}

/// Sprite unit in pixels at zoom 1.0 (a 64px cat).
pub const UNIT_PX: f32 = 2.0;
/// Gap between the window bottom and the sprite's bottom edge, at zoom 1.0.
const FLOOR_LIFT_PX: f32 = 80.0;
/// Extra hover/click margin around the sprite, at zoom 1.0.
const HITBOX_MARGIN_PX: f32 = 16.0;
/// Speech bubble bottom sits this far above the sprite's bottom edge.
const BUBBLE_LIFT_PX: f32 = 80.0;
/// Hearts start this far above the sprite's top edge.
const HEART_START_PX: f32 = 40.0;
/// Hearts rise this far over their lifetime.
const HEART_RISE_PX: f32 = 40.0;
/// Heart glyph width.
const HEART_WIDTH_PX: f32 = 20.0;

/// Maps floor coordinates and sprite units onto the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub screen_w: f32,
    pub screen_h: f32,
    pub zoom: f32,
}

impl Stage {
    /// Floor anchor: centre of the sprite box when the cat is at (0, 0).
    fn anchor(&self) -> Vec2 {
        let half = SPRITE_SIZE * 0.5 * UNIT_PX;
        Vec2::new(
            self.screen_w * 0.5,
            self.screen_h - (FLOOR_LIFT_PX + half) * self.zoom,
        )
    }

    /// Screen centre of the sprite box for a cat at `position`.
    pub fn sprite_center(&self, position: Vec2) -> Vec2 {
        self.anchor() + position * self.zoom
    }

    /// Pixels per sprite unit, including depth scaling.
    pub fn unit(&self, pose: &Pose) -> f32 {
        UNIT_PX * self.zoom * pose.depth_scale
    }

    /// Screen-space box that counts as "on the cat" for hover and click.
    pub fn hit_box(&self, pose: &Pose, position: Vec2) -> (Vec2, Vec2) {
        let center = self.sprite_center(position);
        let half = SPRITE_SIZE * 0.5 * self.unit(pose) + HITBOX_MARGIN_PX * self.zoom * pose.depth_scale;
        (center - Vec2::splat(half), center + Vec2::splat(half))
    }

    /// Floor coordinates under a screen point (inverse of `sprite_center`).
    pub fn floor_point(&self, screen: Vec2) -> Vec2 {
        (screen - self.anchor()) / self.zoom.max(f32::EPSILON)
    }

    /// Where the speech bubble's bottom-centre goes.
    pub fn bubble_anchor(&self, pose: &Pose, position: Vec2) -> Vec2 {
        let center = self.sprite_center(position);
        let half_px = SPRITE_SIZE * 0.5 * UNIT_PX;
        center + Vec2::new(0.0, (half_px - BUBBLE_LIFT_PX) * self.zoom * pose.depth_scale)
    }

    fn rect_instance(&self, pose: &Pose, position: Vec2, rect: &SpriteRect) -> RectInstance {
        let unit = self.unit(pose);
        let (local, rotation) = rect.placed(pose);
        let center = self.sprite_center(position) + (local - Vec2::splat(SPRITE_SIZE * 0.5)) * unit;
        RectInstance {
            center: center.into(),
            size: [rect.w * unit, rect.h * unit],
            color: rect.color,
            rotation,
        }
    }
}

/// Append the cat sprite (and hover badge) for this frame.
pub fn build_cat(stage: &Stage, view: &SceneView, rects: &mut Vec<SpriteRect>, buf: &mut Vec<RectInstance>) {
    let pose = Pose::derive(&view.pose);
    rects.clear();
    sprite::build(&pose, rects);
    let position = view.pose.position;
    buf.extend(rects.iter().map(|r| stage.rect_instance(&pose, position, r)));

    if view.pose.hovered {
        let scale = stage.zoom * pose.depth_scale;
        let half_px = SPRITE_SIZE * 0.5 * UNIT_PX;
        let badge = stage.sprite_center(position) + Vec2::new(half_px + 6.0, -half_px - 16.0) * scale;
        push_heart(buf, badge, HEART_WIDTH_PX * 0.6 * scale, 0xFF);
    }
}

/// Append the floating click hearts.
pub fn build_hearts(stage: &Stage, view: &SceneView, buf: &mut Vec<RectInstance>) {
    let pose = Pose::derive(&view.pose);
    let scale = stage.zoom * pose.depth_scale;
    let center = stage.sprite_center(view.pose.position);
    let top = center.y - SPRITE_SIZE * 0.5 * UNIT_PX * scale;

    for heart in &view.hearts {
        buf.extend(heart_instances(heart, view.now_ms, center.x, top, scale));
    }
}

fn heart_instances(heart: &Heart, now_ms: u64, center_x: f32, top: f32, scale: f32) -> Vec<RectInstance> {
    let p = heart.progress(now_ms);
    let pos = Vec2::new(
        center_x + heart.jitter * scale,
        top - (HEART_START_PX + HEART_RISE_PX * p) * scale,
    );
    let width = HEART_WIDTH_PX * (1.0 + 0.5 * p) * scale;
    let alpha = ((1.0 - p) * 255.0) as u32;
    let mut out = Vec::with_capacity(HEART_BLOCKS.len());
    push_heart(&mut out, pos, width, alpha);
    out
}

/// Heart glyph centred on `center`, `width` pixels across.
fn push_heart(buf: &mut Vec<RectInstance>, center: Vec2, width: f32, alpha: u32) {
    let block = width / HEART_GRID.x;
    let origin = center - HEART_GRID * block * 0.5;
    let color = (HEART & 0xFFFFFF00) | (alpha & 0xFF);
    buf.extend(HEART_BLOCKS.iter().map(|&[x, y, w, h]| RectInstance {
        center: (origin + Vec2::new(x + w * 0.5, y + h * 0.5) * block).into(),
        size: [w * block, h * block],
        color,
        rotation: 0.0,
    }));
}
