//! Caching and telemetry around a matching strategy.
//!
//! [`CachedInstrumentedMatcher`] consults the cache backend, runs the strategy on a miss,
//! scores the returned records, stores the result and appends one metrics sample per kind.
//! Cache and metrics failures degrade the call; they never fail it.

pub mod matcher;
pub mod types;


pub use matcher::CachedInstrumentedMatcher;
pub use types::{InstrumentConfig, MatchOutcome};
