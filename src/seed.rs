//! Process-wide seed registry and fresh-name prefixes.
//!
//! Passes that synthesize gates need names that can not collide with anything
//! already encoded. Each pass run draws a random numeric prefix from a ChaCha
//! stream seeded by the global seed, and appends a monotonic counter (the
//! encoder size) per minted name.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

/// Seed used when the embedding application never calls [`set_global_seed`].
pub const DEFAULT_GLOBAL_SEED: u64 = 8_132_751_891_241;

static SEED: AtomicU64 = AtomicU64::new(DEFAULT_GLOBAL_SEED);
static SEED_LOCKED: AtomicBool = AtomicBool::new(false);
static STREAM: Mutex<Option<ChaChaRng>> = Mutex::new(None);

/// Fixes the global seed. Effective only once, before any pass has drawn from
/// the stream; later calls are ignored with a warning.
pub fn set_global_seed(value: u64) {
    if SEED_LOCKED.swap(true, Ordering::SeqCst) {
        log::warn!("global seed already fixed, ignoring set to {value}");
        return;
    }
    SEED.store(value, Ordering::SeqCst);
}

/// The seed the fresh-name stream is (or will be) initialized from.
/// Reading locks the registry against later [`set_global_seed`] calls.
#[must_use]
pub fn global_seed() -> u64 {
    SEED_LOCKED.store(true, Ordering::SeqCst);
    SEED.load(Ordering::SeqCst)
}

/// A run-unique numeric prefix for fresh gate names.
///
/// Collisions with user-chosen names are ruled out by the full fresh-name
/// shape (`<prefix>::<pass>@<counter>`), which no bench file can produce
/// accidentally without also colliding on the random prefix.
#[must_use]
pub(crate) fn unique_prefix() -> String {
    let mut guard = STREAM.lock().unwrap_or_else(|e| e.into_inner());
    let rng = guard.get_or_insert_with(|| ChaChaRng::seed_from_u64(global_seed()));
    rng.gen_range(100_000_000_u64..=999_999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::unique_prefix;

    #[test]
    fn prefixes_are_nine_digit_and_advance() {
        let a = unique_prefix();
        let b = unique_prefix();
        assert_eq!(a.len(), 9);
        assert_eq!(b.len(), 9);
        // The stream advances between draws.
        assert_ne!(a, b);
    }
}
