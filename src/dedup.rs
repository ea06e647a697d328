//! Structural hashing of voices for duplicate detection.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::patch::Voice;

/// Content hash of a voice: every parameter and the name, but not the
/// file it came from. Stable within one build of the crate; std does not
/// promise the same values across Rust releases, so never persist it.
pub fn content_hash(voice: &Voice) -> u64 {
    let mut hasher = DefaultHasher::new();
    voice.hash(&mut hasher);
    hasher.finish()
}

/// Table of voices seen so far, keyed by [`content_hash`].
///
/// Owned by whoever is folding banks together, so independent scans never
/// share state.
#[derive(Debug, Clone, Default)]
pub struct DedupTable {
    seen: HashMap<u64, String>,
}

impl DedupTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `voice`. Returns `false` if an identical voice was recorded
    /// before, in which case the table is unchanged.
    pub fn insert(&mut self, voice: &Voice) -> bool {
        let hash = content_hash(voice);
        if self.seen.contains_key(&hash) {
            return false;
        }
        self.seen.insert(hash, voice.name());
        true
    }

    /// Whether an identical voice has been recorded
    pub fn contains(&self, voice: &Voice) -> bool {
        self.seen.contains_key(&content_hash(voice))
    }

    /// Name of the voice recorded under `hash`
    pub fn name_of(&self, hash: u64) -> Option<&str> {
        self.seen.get(&hash).map(String::as_str)
    }

    /// Number of distinct voices recorded
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forgets every recorded voice
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_does_not_affect_hash() {
        let a = Voice::init().with_source("BANK1.SYX");
        let b = Voice::init().with_source("bank2.syx");
        assert_eq!(content_hash(&a), content_hash(&b));
        assert_eq!(content_hash(&a), content_hash(&Voice::init()));
    }

    #[test]
    fn test_any_field_changes_hash() {
        let base = Voice::init();
        let mut other = base.clone();
        other.op[0].envelope.rate[3] = 98;
        assert_ne!(content_hash(&base), content_hash(&other));

        let mut other = base.clone();
        other.set_name("INIT VOICF");
        assert_ne!(content_hash(&base), content_hash(&other));
    }

    #[test]
    fn test_hash_repeats_within_process() {
        let voice = Voice::init();
        let first = content_hash(&voice);
        let handle = std::thread::spawn(move || content_hash(&voice));
        assert_eq!(handle.join().unwrap(), first);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut table = DedupTable::new();
        let first = Voice::init().with_source("a.syx");
        let second = Voice::init().with_source("b.syx");

        assert!(table.insert(&first));
        assert!(!table.insert(&second));
        assert!(table.contains(&second));
        assert_eq!(table.len(), 1);
        assert_eq!(table.name_of(content_hash(&first)), Some("INIT VOICE"));

        table.clear();
        assert!(table.is_empty());
    }
}
