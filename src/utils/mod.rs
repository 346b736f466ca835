//! Utility modules for dreamgen
//!
//! Small capabilities injected into the request builder so graph shape can be
//! asserted exactly in tests.

pub mod ids;

pub use ids::{
    Clock, IdGenerator, SeedSource, SequentialIdGenerator, SystemClock, UuidIdGenerator,
    random_seed,
};
