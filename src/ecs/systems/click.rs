use crate::ecs::components::{ActionState, Mood};
use crate::particles::{Hearts, HEART_LIFETIME_MS};
use crate::schedule::{Scheduler, SimEvent};

/// How long a click reaction suppresses autonomous behavior.
pub const REACTION_MS: u64 = 800;

/// A click on the cat: hard override to `Surprised`, two hearts, and a
/// deadline after which the cat sits back down.
///
/// Clicking again mid-reaction restarts the window. Each click's hearts are
/// expired by their own ids, so overlapping clicks never cancel each other.
pub fn on_click(
    mood: &mut Mood,
    hearts: &mut Hearts,
    rng: &mut fastrand::Rng,
    scheduler: &mut Scheduler,
) {
    mood.interacting = true;
    mood.action = ActionState::Surprised;
    mood.reaction += 1;

    let ids = hearts.spawn_pair(scheduler.now(), rng);
    scheduler.set_timeout(SimEvent::ExpireHearts { ids }, HEART_LIFETIME_MS);
    scheduler.set_timeout(
        SimEvent::EndReaction {
            reaction: mood.reaction,
        },
        REACTION_MS,
    );

    log::debug!("Cat clicked (reaction {}), hearts {:?}", mood.reaction, ids);
}

/// Reaction deadline. Only the latest click's deadline ends the reaction.
pub fn end_reaction(mood: &mut Mood, reaction: u64) {
    if reaction != mood.reaction || !mood.interacting {
        return;
    }
    mood.action = ActionState::Sitting;
    mood.interacting = false;
    log::debug!("Reaction {reaction} over, cat sits");
}

/// Pointer enter/leave. No timer, no effect on the interaction flag.
pub fn on_hover(mood: &mut Mood, hovered: bool) {
    mood.hovered = hovered;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_overrides_any_action() {
        for action in ActionState::ALL {
            let mut mood = Mood {
                action,
                ..Mood::default()
            };
            let mut hearts = Hearts::new();
            let mut rng = fastrand::Rng::with_seed(5);
            let mut sched = Scheduler::new();
            on_click(&mut mood, &mut hearts, &mut rng, &mut sched);
            assert_eq!(mood.action, ActionState::Surprised);
            assert!(mood.interacting);
            assert_eq!(hearts.len(), 2);
            assert_eq!(sched.pending(), 2);
        }
    }

    #[test]
    fn stale_deadline_is_ignored() {
        let mut mood = Mood::default();
        let mut hearts = Hearts::new();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut sched = Scheduler::new();
        on_click(&mut mood, &mut hearts, &mut rng, &mut sched);
        on_click(&mut mood, &mut hearts, &mut rng, &mut sched);

        end_reaction(&mut mood, 1);
        assert_eq!(mood.action, ActionState::Surprised);
        assert!(mood.interacting);

        end_reaction(&mut mood, 2);
        assert_eq!(mood.action, ActionState::Sitting);
        assert!(!mood.interacting);
    }

    #[test]
    fn hover_leaves_interaction_alone() {
        let mut mood = Mood::default();
        on_hover(&mut mood, true);
        assert!(mood.hovered);
        assert!(!mood.interacting);
        on_hover(&mut mood, false);
        assert!(!mood.hovered);
    }
}
