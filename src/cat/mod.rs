pub mod dialogue;
pub mod wardrobe;

use crate::ecs::components::{Cat, Motion, Mood};

use self::dialogue::Dialogue;
use self::wardrobe::Customization;

/// Spawn the cat in its mount state: sitting at the floor anchor, facing right.
pub fn spawn_cat(
    world: &mut hecs::World,
    outfit: Customization,
    greeting: Option<String>,
) -> hecs::Entity {
    world.spawn((
        Cat,
        Motion::default(),
        Mood::default(),
        outfit,
        Dialogue {
            message: greeting,
            thinking: false,
        },
    ))
}
