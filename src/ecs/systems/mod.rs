pub mod animation;
pub mod behavior;
pub mod click;
pub mod movement;

use crate::ecs::components::{Motion, Mood};
use crate::particles::Hearts;
use crate::schedule::{PointerEvent, Scheduler, SimEvent};

use self::animation::BLINK_MS;

/// Apply one event from the queue. This is the only place cat state changes.
pub fn dispatch(
    world: &mut hecs::World,
    cat: hecs::Entity,
    hearts: &mut Hearts,
    rng: &mut fastrand::Rng,
    scheduler: &mut Scheduler,
    event: SimEvent,
) {
    if let SimEvent::ExpireHearts { ids } = event {
        hearts.remove(&ids);
        return;
    }

    let Ok((motion, mood)) = world.query_one_mut::<(&mut Motion, &mut Mood)>(cat) else {
        log::warn!("Dropping {event:?}: cat is not mounted");
        return;
    };

    match event {
        SimEvent::Tick => {
            // Frame and motion read the same snapshot of current/target.
            animation::advance_frame(motion);
            movement::integrate(motion, mood);
        }
        SimEvent::BehaviorCheck => behavior::evaluate(mood, motion, rng),
        SimEvent::BlinkCheck => {
            if animation::blink_check(mood, rng) {
                scheduler.set_timeout(SimEvent::EndBlink, BLINK_MS);
            }
        }
        SimEvent::EndBlink => animation::end_blink(mood),
        SimEvent::Pointer(PointerEvent::Click) => click::on_click(mood, hearts, rng, scheduler),
        SimEvent::Pointer(PointerEvent::Enter) => click::on_hover(mood, true),
        SimEvent::Pointer(PointerEvent::Leave) => click::on_hover(mood, false),
        SimEvent::EndReaction { reaction } => click::end_reaction(mood, reaction),
        SimEvent::ForceAction(action) => behavior::force_action(mood, action),
        SimEvent::WalkTo(target) => behavior::walk_to(mood, motion, target),
        SimEvent::ExpireHearts { .. } => {}
    }
}
