use glam::Vec2;

use crate::cat;
use crate::cat::dialogue::Dialogue;
use crate::cat::wardrobe::Customization;
use crate::ecs::components::{Motion, Mood};
use crate::ecs::systems;
use crate::particles::{Heart, Hearts};
use crate::render::pose::PoseInput;
use crate::schedule::{
    Scheduler, SimEvent, TimerHandle, BEHAVIOR_MS, BLINK_CHECK_MS, TICK_MS,
};

/// Read-only view of the cat for the renderer and the control panel.
#[derive(Debug, Clone)]
pub struct SceneView {
    pub pose: PoseInput,
    pub target: Vec2,
    pub interacting: bool,
    pub dialogue: Dialogue,
    pub hearts: Vec<Heart>,
    pub now_ms: u64,
    pub ticks: u64,
    /// Live periodic timers.
    pub timers: usize,
}

/// The mounted cat, its timers and everything it spawns.
pub struct Scene {
    world: hecs::World,
    cat: Option<hecs::Entity>,
    hearts: Hearts,
    rng: fastrand::Rng,
    scheduler: Scheduler,
    timers: Vec<TimerHandle>,
    ticks: u64,
}

impl Scene {
    pub fn new(rng: fastrand::Rng) -> Self {
        Self {
            world: hecs::World::new(),
            cat: None,
            hearts: Hearts::new(),
            rng,
            scheduler: Scheduler::new(),
            timers: Vec::with_capacity(3),
            ticks: 0,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.cat.is_some()
    }

    /// Spawn the cat and start its three periodic timers.
    pub fn mount(&mut self, outfit: Customization, greeting: Option<String>) {
        if self.is_mounted() {
            self.unmount();
        }
        self.cat = Some(cat::spawn_cat(&mut self.world, outfit, greeting));
        self.timers.push(self.scheduler.set_interval(SimEvent::Tick, TICK_MS));
        self.timers
            .push(self.scheduler.set_interval(SimEvent::BehaviorCheck, BEHAVIOR_MS));
        self.timers
            .push(self.scheduler.set_interval(SimEvent::BlinkCheck, BLINK_CHECK_MS));
        log::info!("Cat mounted at t={}ms", self.scheduler.now());
    }

    /// Release every timer handle and despawn the cat.
    pub fn unmount(&mut self) {
        for handle in self.timers.drain(..) {
            self.scheduler.clear(handle);
        }
        // Pending one-shots (blink end, reaction end, heart expiry) die with the cat.
        self.scheduler.clear_all();
        self.hearts.clear();
        if let Some(cat) = self.cat.take() {
            if self.world.despawn(cat).is_err() {
                log::warn!("Cat entity was already gone on unmount");
            }
        }
        log::info!("Cat unmounted at t={}ms", self.scheduler.now());
    }

    /// Queue an event at the current time. Applied on the next `advance`.
    pub fn post(&mut self, event: SimEvent) {
        self.scheduler.post(event);
    }

    /// Run simulated time forward, applying every due event in order.
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now() + ms;
        while let Some(event) = self.scheduler.pop_due(until) {
            let Some(cat) = self.cat else {
                continue;
            };
            if event == SimEvent::Tick {
                self.ticks += 1;
            }
            systems::dispatch(
                &mut self.world,
                cat,
                &mut self.hearts,
                &mut self.rng,
                &mut self.scheduler,
                event,
            );
        }
        self.scheduler.settle(until);
    }

    #[cfg(test)]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now()
    }

    #[cfg(test)]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[cfg(test)]
    pub fn live_timers(&self) -> usize {
        self.scheduler.live_intervals()
    }

    #[cfg(test)]
    pub fn heart_count(&self) -> usize {
        self.hearts.len()
    }

    /// Swap the outfit. Cosmetic only, so it bypasses the event queue.
    pub fn set_outfit(&mut self, outfit: Customization) {
        if let Some(mut current) = self
            .cat
            .and_then(|cat| self.world.get::<&mut Customization>(cat).ok())
        {
            *current = outfit;
        }
    }

    /// Mutable access to the speech bubble, owned by the chat side.
    pub fn dialogue_mut(&mut self) -> Option<hecs::RefMut<'_, Dialogue>> {
        let cat = self.cat?;
        self.world.get::<&mut Dialogue>(cat).ok()
    }

    pub fn snapshot(&self) -> Option<SceneView> {
        let cat = self.cat?;
        let mut q = self
            .world
            .query_one::<(&Motion, &Mood, &Customization, &Dialogue)>(cat)
            .ok()?;
        let (motion, mood, outfit, dialogue) = q.get()?;
        Some(SceneView {
            pose: PoseInput {
                action: mood.action,
                frame: motion.frame,
                facing: motion.facing,
                hovered: mood.hovered,
                blinking: mood.blinking,
                outfit: *outfit,
                position: motion.current,
            },
            target: motion.target,
            interacting: mood.interacting,
            dialogue: dialogue.clone(),
            hearts: self.hearts.iter().copied().collect(),
            now_ms: self.scheduler.now(),
            ticks: self.ticks,
            timers: self.scheduler.live_intervals(),
        })
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        if self.is_mounted() {
            self.unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat::wardrobe::Hat;
    use crate::ecs::components::{on_floor, ActionState, Facing};
    use crate::schedule::PointerEvent;

    fn mounted(seed: u64) -> Scene {
        let mut scene = Scene::new(fastrand::Rng::with_seed(seed));
        scene.mount(Customization::default(), None);
        scene
    }

    fn view(scene: &Scene) -> SceneView {
        scene.snapshot().expect("cat mounted")
    }

    fn click(scene: &mut Scene) {
        scene.post(SimEvent::Pointer(PointerEvent::Click));
        scene.advance(0);
    }

    #[test]
    fn mounts_sitting_at_anchor_facing_right() {
        let scene = mounted(1);
        let v = view(&scene);
        assert_eq!(v.pose.action, ActionState::Sitting);
        assert_eq!(v.pose.position, Vec2::ZERO);
        assert_eq!(v.pose.facing, Facing::Right);
        assert_eq!(scene.live_timers(), 3);
    }

    #[test]
    fn click_reaction_lasts_800ms() {
        let mut scene = mounted(2);
        click(&mut scene);
        let v = view(&scene);
        assert_eq!(v.pose.action, ActionState::Surprised);
        assert!(v.interacting);
        assert_eq!(v.hearts.len(), 2);
        assert_ne!(v.hearts[0].id, v.hearts[1].id);

        scene.advance(799);
        assert_eq!(view(&scene).pose.action, ActionState::Surprised);
        assert_eq!(scene.heart_count(), 2);

        scene.advance(1);
        let v = view(&scene);
        assert_eq!(v.pose.action, ActionState::Sitting);
        assert!(!v.interacting);
        assert!(v.hearts.is_empty());
    }

    #[test]
    fn reaction_survives_behavior_checks() {
        let mut scene = mounted(3);
        // Land the click just before the 2000ms behavior check.
        scene.advance(1500);
        click(&mut scene);
        scene.advance(700);
        let v = view(&scene);
        assert_eq!(v.pose.action, ActionState::Surprised);
        assert!(v.interacting);
    }

    #[test]
    fn second_click_restarts_window_and_keeps_own_hearts() {
        let mut scene = mounted(4);
        click(&mut scene);
        scene.advance(500);
        click(&mut scene);
        assert_eq!(scene.heart_count(), 4);

        scene.advance(300); // t=800: first pair expires, reaction continues
        assert_eq!(scene.heart_count(), 2);
        assert_eq!(view(&scene).pose.action, ActionState::Surprised);

        scene.advance(500); // t=1300: second deadline
        let v = view(&scene);
        assert_eq!(v.pose.action, ActionState::Sitting);
        assert!(!v.interacting);
        assert!(v.hearts.is_empty());
    }

    #[test]
    fn blink_lasts_200ms_and_never_while_sleeping() {
        let mut scene = mounted(5);
        let mut saw_blink = false;
        for _ in 0..4000 {
            scene.advance(50);
            let v = view(&scene);
            if v.pose.blinking {
                saw_blink = true;
                // Blinks start on a whole second and end 200ms later.
                assert!(v.now_ms % 1000 < 200, "blink still open at {}", v.now_ms);
            }
        }
        assert!(saw_blink);

        let mut scene = mounted(5);
        let mut sleeping_checks = 0;
        for _ in 0..100 {
            scene.post(SimEvent::ForceAction(ActionState::Sleeping));
            scene.advance(0);
            scene.advance(1000);
            let v = view(&scene);
            if v.pose.action == ActionState::Sleeping {
                sleeping_checks += 1;
                assert!(!v.pose.blinking);
            }
        }
        assert!(sleeping_checks >= 50);
    }

    #[test]
    fn blink_clears_exactly_200ms_after_it_starts() {
        let mut scene = mounted(11);
        let mut start = None;
        for _ in 0..60_000 {
            scene.advance(1);
            if view(&scene).pose.blinking {
                start = Some(scene.now_ms());
                break;
            }
        }
        let t0 = start.expect("a blink within a minute");

        scene.advance(199);
        assert_eq!(scene.now_ms(), t0 + 199);
        assert!(view(&scene).pose.blinking, "blink ended early");

        scene.advance(1);
        assert_eq!(scene.now_ms(), t0 + 200);
        assert!(!view(&scene).pose.blinking, "blink still open at +200ms");
    }

    #[test]
    fn forced_walk_reaches_corner_exactly() {
        let mut scene = mounted(6);
        let corner = Vec2::new(130.0, 50.0);
        let mut arrived = false;
        for _ in 0..200 {
            // Keep insisting so behavior checks cannot wander off.
            scene.post(SimEvent::WalkTo(corner));
            scene.advance(TICK_MS);
            let v = view(&scene);
            assert!(on_floor(v.pose.position), "{:?}", v.pose.position);
            if v.pose.position == corner {
                arrived = true;
                break;
            }
        }
        assert!(arrived);
    }

    #[test]
    fn autonomous_run_stays_valid() {
        let mut scene = mounted(7);
        for _ in 0..5000 {
            scene.advance(60);
            let v = view(&scene);
            assert!(ActionState::ALL.contains(&v.pose.action));
            assert!(on_floor(v.target));
            assert!(on_floor(v.pose.position));
            assert!(v.pose.frame < 64);
        }
        assert_eq!(scene.ticks(), 5000);
    }

    #[test]
    fn remount_restores_three_timers() {
        let mut scene = mounted(8);
        click(&mut scene);
        scene.unmount();
        assert!(scene.snapshot().is_none());
        assert_eq!(scene.live_timers(), 0);
        assert_eq!(scene.heart_count(), 0);

        scene.advance(5000);
        assert_eq!(scene.ticks(), 0);

        scene.mount(Customization::default(), None);
        assert_eq!(scene.live_timers(), 3);
        assert_eq!(view(&scene).pose.action, ActionState::Sitting);
        scene.advance(TICK_MS);
        assert_eq!(scene.ticks(), 1);
    }

    #[test]
    fn hover_is_instant_and_untimed() {
        let mut scene = mounted(9);
        scene.post(SimEvent::Pointer(PointerEvent::Enter));
        scene.advance(0);
        assert!(view(&scene).pose.hovered);
        assert!(!view(&scene).interacting);
        scene.advance(10_000);
        assert!(view(&scene).pose.hovered);
        scene.post(SimEvent::Pointer(PointerEvent::Leave));
        scene.advance(0);
        assert!(!view(&scene).pose.hovered);
    }

    #[test]
    fn outfit_and_dialogue_set_from_outside() {
        let mut scene = mounted(10);
        scene.set_outfit(Customization {
            hat: Hat::Reindeer,
            ..Customization::default()
        });
        if let Some(mut d) = scene.dialogue_mut() {
            d.show_reply(Ok("Meow!".into()));
        }
        let v = view(&scene);
        assert_eq!(v.pose.outfit.hat, Hat::Reindeer);
        assert_eq!(v.dialogue.bubble_text(), Some("Meow!"));
    }
}
