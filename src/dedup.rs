use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Suppression window for repeated identical submissions. Shared between the
/// check and the eviction sweep so the two cannot drift apart.
pub const SUPPRESS_WINDOW: Duration = Duration::from_secs(2);

const DEFAULT_CAPACITY: usize = 1024;

/// Bounded "seen recently" cache keyed by submission signature.
///
/// Guards against client-side double-submit (double-click). It is advisory:
/// callers lock it only for the duration of `check_and_record`, so two truly
/// concurrent identical requests can both pass the check. A legitimate
/// identical re-order inside the window is dropped; accepted behavior.
pub struct DuplicateSuppressor {
    seen: HashMap<String, Instant>,
    capacity: usize,
}

impl DuplicateSuppressor {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Returns false when `signature` was recorded under `SUPPRESS_WINDOW`
    /// ago; otherwise records `now` under it and returns true.
    pub fn check_and_record(&mut self, signature: &str, now: Instant) -> bool {
        if let Some(last) = self.seen.get(signature) {
            if now.duration_since(*last) < SUPPRESS_WINDOW {
                return false;
            }
        }

        if !self.seen.contains_key(signature) && self.seen.len() >= self.capacity {
            self.evict(now);
        }
        self.seen.insert(signature.to_string(), now);
        true
    }

    // Sweep expired entries; if everything is still fresh, drop the oldest.
    fn evict(&mut self, now: Instant) {
        self.seen
            .retain(|_, last| now.duration_since(*last) < SUPPRESS_WINDOW);
        while self.seen.len() >= self.capacity {
            let oldest = self
                .seen
                .iter()
                .min_by_key(|(_, last)| **last)
                .map(|(sig, _)| sig.clone());
            match oldest {
                Some(sig) => self.seen.remove(&sig),
                None => break,
            };
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.seen.len()
    }
}

impl Default for DuplicateSuppressor {
    fn default() -> Self {
        Self::new()
    }
}
