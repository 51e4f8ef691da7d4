//! Telemetry metric name constants.
//!
//! Centralised metric names for stowaway operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `stowaway_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `strategy`: serving strategy: "network_first" or "cache_first"
//! - `kind`: offline fallback served: "cached", "synthesized" or "offline_document"

/// Total cache lookups that found an entry.
///
/// Labels: `strategy`.
pub const CACHE_HITS_TOTAL: &str = "stowaway_cache_hits_total";

/// Total cache lookups that found nothing.
///
/// Labels: `strategy`.
pub const CACHE_MISSES_TOTAL: &str = "stowaway_cache_misses_total";

/// Total response copies written to the current generation.
pub const CACHE_WRITES_TOTAL: &str = "stowaway_cache_writes_total";

/// Total responses served in place of a failed network fetch.
///
/// Labels: `kind`.
pub const OFFLINE_FALLBACKS_TOTAL: &str = "stowaway_offline_fallbacks_total";

/// Total stale generations deleted during activation.
pub const GENERATIONS_DELETED_TOTAL: &str = "stowaway_generations_deleted_total";
