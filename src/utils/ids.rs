//! Identifier, seed and clock sources
//!
//! Every structural node of a draft carries a fresh identifier and the
//! provider rejects collisions, so generators must never repeat within a
//! process.

use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of unique synthetic node identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs (production default).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` identifiers, counting from 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Number of identifiers handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{n}", self.prefix)
    }
}

/// Lower bound of the generation seed range.
pub const SEED_MIN: u64 = 2_500_000_000;
/// Exclusive upper bound of the generation seed range.
pub const SEED_MAX: u64 = 2_600_000_000;

/// Draw a seed uniformly from `[SEED_MIN, SEED_MAX)`.
pub fn random_seed() -> u64 {
    rand::thread_rng().gen_range(SEED_MIN..SEED_MAX)
}

/// Source of generation seeds.
pub type SeedSource = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Millisecond wall clock.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
