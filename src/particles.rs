/// How long a heart lives, in milliseconds.
pub const HEART_LIFETIME_MS: u64 = 800;
/// Max horizontal jitter either side of the sprite centre.
pub const HEART_JITTER: f32 = 10.0;

/// A single heart floating up from a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heart {
    pub id: u64,
    /// Horizontal offset from the sprite centre, in [-10, 10].
    pub jitter: f32,
    pub born_ms: u64,
}

impl Heart {
    /// Animation progress 0.0 (just spawned) to 1.0 (about to vanish).
    pub fn progress(&self, now_ms: u64) -> f32 {
        let age = now_ms.saturating_sub(self.born_ms) as f32;
        (age / HEART_LIFETIME_MS as f32).clamp(0.0, 1.0)
    }
}

/// Hearts currently on screen. Insert-then-timed-delete; ids are never reused.
pub struct Hearts {
    hearts: Vec<Heart>,
    next_id: u64,
}

impl Hearts {
    pub fn new() -> Self {
        Self {
            hearts: Vec::with_capacity(8),
            next_id: 0,
        }
    }

    /// Spawn two hearts with independent jitter. Returns their ids.
    pub fn spawn_pair(&mut self, now_ms: u64, rng: &mut fastrand::Rng) -> [u64; 2] {
        let ids = [self.next_id, self.next_id + 1];
        self.next_id += 2;
        for id in ids {
            self.hearts.push(Heart {
                id,
                jitter: rng.f32() * HEART_JITTER * 2.0 - HEART_JITTER,
                born_ms: now_ms,
            });
        }
        ids
    }

    /// Remove hearts by id. Returns how many were removed.
    pub fn remove(&mut self, ids: &[u64]) -> usize {
        let before = self.hearts.len();
        self.hearts.retain(|h| !ids.contains(&h.id));
        before - self.hearts.len()
    }

    pub fn clear(&mut self) {
        self.hearts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Heart> {
        self.hearts.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.hearts.len()
    }
}
