//! Hash containers with deterministic hashing, re-exports *hashbrown* and *foldhash*.
//!
//! [`FixedHashState`] seeds `foldhash` with a constant, so iteration order only
//! depends on the inserted keys. [`NoOpHashState`] passes integer keys straight
//! through, which is what [`TypeId`](core::any::TypeId) keys want.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x3C6E_F372_FE94_F82B);

/// A hasher whose results only depend on the input.
pub type FixedHasher = FoldHasher<'static>;

/// Builds [`FixedHasher`]s from a fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use bm_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("a"), FixedHashState.hash_one("a"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// A hasher that uses the written integer as the hash value.
///
/// Only meaningful for keys that are already well distributed, such as `TypeId`.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(u64::from(*byte));
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Builds [`NoOpHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher::default()
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

#[cfg(test)]
mod tests {
    use super::{HashMap, HashSet, NoOpHashState};
    use core::hash::BuildHasher;

    #[test]
    fn noop_passes_u64_through() {
        assert_eq!(NoOpHashState.hash_one(42_u64), 42);
    }

    #[test]
    fn containers_are_usable() {
        let mut map: HashMap<&str, u32> = HashMap::default();
        map.insert("a", 1);
        assert_eq!(map.get("a"), Some(&1));

        let mut set: HashSet<u32> = HashSet::default();
        assert!(set.insert(3));
        assert!(!set.insert(3));
    }
}
