//! Pooled random sources for IV generation.

use rand::{RngCore, SeedableRng, rngs::StdRng};

/// A reusable cryptographically secure random byte source.
///
/// Seeding from OS entropy is the expensive part, which is why these are
/// pooled and reused rather than recreated per message. A handle is held by
/// at most one operation at a time (the pool enforces this), so no locking
/// is needed around the generator state.
pub struct RandomHandle {
    rng: StdRng,
}

impl RandomHandle {
    /// Create a fresh generator seeded from OS entropy.
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Fill `buf` with random bytes.
    pub fn fill(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }
}

impl Default for RandomHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_fills_differ() {
        let mut random = RandomHandle::new();
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        random.fill(&mut first);
        random.fill(&mut second);
        // 2^-128 collision probability; a failure here means a broken RNG.
        assert_ne!(first, second);
    }
}
