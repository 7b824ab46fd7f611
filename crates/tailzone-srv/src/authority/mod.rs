//! Record assembly and answer synthesis for peer zones.
//!
//! The name index is rebuilt from scratch on every refresh; nothing in here
//! mutates a published index.

pub mod addrs;
pub mod answer;
pub mod names;
pub mod ttl_policy;
pub mod zone_builder;
pub mod zones;
