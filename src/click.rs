use glam::Vec2;

use crate::schedule::{PointerEvent, SimEvent};

/// Tracks cursor and button state and turns it into scene events.
pub struct ClickState {
    cursor: Option<Vec2>,
    left_was_down: bool,
    right_was_down: bool,
    over_cat: bool,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            cursor: None,
            left_was_down: false,
            right_was_down: false,
            over_cat: false,
        }
    }

    pub fn set_cursor(&mut self, pos: Option<Vec2>) {
        self.cursor = pos;
    }

    fn set_buttons(&mut self, left_down: bool, right_down: bool) -> (bool, bool) {
        // Edge-detect presses (press, not hold)
        let left_pressed = left_down && !self.left_was_down;
        let right_pressed = right_down && !self.right_was_down;
        self.left_was_down = left_down;
        self.right_was_down = right_down;
        (left_pressed, right_pressed)
    }

    /// Update from this frame's input. `hit_box` is the cat's screen box,
    /// `floor_point` maps a screen point to floor coordinates.
    /// `blocked` is true when egui owns the pointer.
    pub fn update(
        &mut self,
        left_down: bool,
        right_down: bool,
        hit_box: Option<(Vec2, Vec2)>,
        floor_point: impl Fn(Vec2) -> Vec2,
        blocked: bool,
        out: &mut Vec<SimEvent>,
    ) {
        let (left_pressed, right_pressed) = self.set_buttons(left_down, right_down);

        let over = !blocked
            && match (self.cursor, hit_box) {
                (Some(p), Some((min, max))) => p.cmpge(min).all() && p.cmple(max).all(),
                _ => false,
            };

        if over != self.over_cat {
            out.push(SimEvent::Pointer(if over {
                PointerEvent::Enter
            } else {
                PointerEvent::Leave
            }));
            self.over_cat = over;
        }

        if left_pressed && over {
            out.push(SimEvent::Pointer(PointerEvent::Click));
        }

        if right_pressed && !blocked {
            if let Some(p) = self.cursor {
                out.push(SimEvent::WalkTo(floor_point(p)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: Option<(Vec2, Vec2)> = Some((Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0)));

    fn step(state: &mut ClickState, left: bool, right: bool, blocked: bool) -> Vec<SimEvent> {
        let mut out = Vec::new();
        state.update(left, right, BOX, |p| p * 0.5, blocked, &mut out);
        out
    }

    #[test]
    fn enter_and_leave_fire_once() {
        let mut s = ClickState::new();
        s.set_cursor(Some(Vec2::new(20.0, 20.0)));
        assert_eq!(step(&mut s, false, false, false), vec![SimEvent::Pointer(PointerEvent::Enter)]);
        assert!(step(&mut s, false, false, false).is_empty());
        s.set_cursor(Some(Vec2::new(90.0, 90.0)));
        assert_eq!(step(&mut s, false, false, false), vec![SimEvent::Pointer(PointerEvent::Leave)]);
        s.set_cursor(None);
        assert!(step(&mut s, false, false, false).is_empty());
    }

    #[test]
    fn click_only_on_press_over_cat() {
        let mut s = ClickState::new();
        s.set_cursor(Some(Vec2::new(90.0, 90.0)));
        assert!(step(&mut s, true, false, false).is_empty());
        step(&mut s, false, false, false);

        s.set_cursor(Some(Vec2::new(20.0, 20.0)));
        let events = step(&mut s, true, false, false);
        assert!(events.contains(&SimEvent::Pointer(PointerEvent::Click)));
        // Holding the button is not another click.
        assert!(!step(&mut s, true, false, false).contains(&SimEvent::Pointer(PointerEvent::Click)));
    }

    #[test]
    fn right_click_walks_to_floor_point() {
        let mut s = ClickState::new();
        s.set_cursor(Some(Vec2::new(100.0, 40.0)));
        let events = step(&mut s, false, true, false);
        assert_eq!(events, vec![SimEvent::WalkTo(Vec2::new(50.0, 20.0))]);
    }

    #[test]
    fn egui_blocks_pointer() {
        let mut s = ClickState::new();
        s.set_cursor(Some(Vec2::new(20.0, 20.0)));
        step(&mut s, false, false, false);
        let events = step(&mut s, true, true, true);
        assert_eq!(events, vec![SimEvent::Pointer(PointerEvent::Leave)]);
    }
}
