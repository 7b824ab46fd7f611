//! TTL policy for synthesized records.
//!
//! Records are only as fresh as the last successful refresh, so every TTL
//! is the refresh interval and the SOA timers are fixed fractions and
//! multiples of it. None of these are configurable on their own.

/// SOA timer fields derived from the refresh interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoaTimers {
    /// TTL of every record, SOA included.
    pub ttl: u32,
    /// SOA refresh (Hickory uses i32 for SOA fields).
    pub refresh: i32,
    /// SOA retry: half the interval.
    pub retry: i32,
    /// SOA expire: twice the interval.
    pub expire: i32,
    /// SOA minimum (negative caching): half the interval.
    pub minimum: u32,
}

impl SoaTimers {
    /// Timers for a refresh interval of `ttl` seconds.
    pub fn for_interval(ttl: u32) -> Self {
        let half = ttl / 2;
        Self {
            ttl,
            refresh: clamp_i32(ttl),
            retry: clamp_i32(half),
            expire: clamp_i32(ttl.saturating_mul(2)),
            minimum: half,
        }
    }
}

fn clamp_i32(secs: u32) -> i32 {
    i32::try_from(secs).unwrap_or(i32::MAX)
}
