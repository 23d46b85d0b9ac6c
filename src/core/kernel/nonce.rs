use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Strictly increasing request nonce with microsecond resolution
///
/// Each value is `max(now_us, previous + 1)`, published with a single
/// compare-and-swap, so concurrent callers never see equal or out-of-order
/// nonces even when the wall clock stalls or steps backwards.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a known floor, e.g. the last nonce a venue accepted
    pub fn starting_after(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    pub fn next(&self) -> u64 {
        let now = now_micros();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }

    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or_default()
}

static REGISTRY: OnceLock<Mutex<HashMap<String, Arc<NonceGenerator>>>> = OnceLock::new();

/// The process-wide generator for one API key
///
/// Venues track nonces per key, so every signer built from the same key
/// must draw from the same sequence.
pub fn shared_for(api_key: &str) -> Arc<NonceGenerator> {
    let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
    let mut generators = registry.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(
        generators
            .entry(api_key.to_string())
            .or_insert_with(|| Arc::new(NonceGenerator::new())),
    )
}
