//! Query resolution: classifies a query and decides what to answer.
//!
//! Evaluation order:
//!
//! 1. nothing published yet: decline
//! 2. class other than IN or ANY: decline
//! 3. name is neither a served apex nor directly below one: decline
//! 4. apex: NS, SOA, or no-data
//! 5. host: NXDOMAIN on a miss, CNAME + A + AAAA for A/AAAA/CNAME/ANY,
//!    no-data for anything else
//!
//! Declining means "not ours": the caller hands the query to whatever is
//! next in its chain. Lookups never fail past this module.

use hickory_proto::rr::{DNSClass, Name, Record, RecordType};
use std::sync::Arc;
use tracing::debug;

use crate::authority::answer::AnswerSynthesizer;
use crate::authority::names::{self, name_key};
use crate::authority::zones::ZoneSet;
use crate::store::SnapshotStore;

/// Outcome of resolving one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Authoritative answer with records.
    Answer { answers: Vec<Record> },
    /// Name exists, type does not. Authority carries the zone SOA.
    NoData { authority: Vec<Record> },
    /// Name does not exist in a served zone. Authority carries the zone SOA.
    NxDomain { authority: Vec<Record> },
    /// Not ours; defer to the next handler.
    Decline,
}

impl Response {
    /// Everything except [`Response::Decline`] is an authoritative answer.
    pub const fn is_authoritative(&self) -> bool {
        !matches!(self, Self::Decline)
    }

    pub fn answers(&self) -> &[Record] {
        match self {
            Self::Answer { answers } => answers,
            _ => &[],
        }
    }

    pub fn authority(&self) -> &[Record] {
        match self {
            Self::NoData { authority } | Self::NxDomain { authority } => authority,
            _ => &[],
        }
    }
}

/// Read side of the engine. Cheap to clone; every clone shares the store.
#[derive(Debug, Clone)]
pub struct Resolver {
    zones: Arc<ZoneSet>,
    store: Arc<SnapshotStore>,
    synth: AnswerSynthesizer,
}

impl Resolver {
    pub fn new(zones: Arc<ZoneSet>, store: Arc<SnapshotStore>, ttl: u32) -> Self {
        Self {
            zones,
            store,
            synth: AnswerSynthesizer::new(ttl),
        }
    }

    /// True once a snapshot has been published and not cleared.
    pub fn ready(&self) -> bool {
        self.store.is_ready()
    }

    /// Resolve one question against the current snapshot.
    pub fn resolve(&self, name: &Name, query_type: RecordType, query_class: DNSClass) -> Response {
        if !self.ready() {
            debug!(name = %name, "not ready; declining");
            return Response::Decline;
        }

        if !matches!(query_class, DNSClass::IN | DNSClass::ANY) {
            debug!(name = %name, class = %query_class, "unsupported class; declining");
            return Response::Decline;
        }

        let key = name_key(name);
        if !self.zones.owns(&key) {
            debug!(name = %key, "outside served zones; declining");
            return Response::Decline;
        }

        // Cleared between the readiness check and here.
        let Some(lookup) = self.store.read(&key) else {
            return Response::Decline;
        };

        if let Some(zone) = self.zones.get(&key) {
            debug!(name = %key, query_type = %query_type, "zone apex query");
            return match query_type {
                RecordType::NS => Response::Answer {
                    answers: vec![self.synth.ns(zone)],
                },
                RecordType::SOA => Response::Answer {
                    answers: vec![self.synth.soa(zone, lookup.serial)],
                },
                _ => Response::NoData {
                    authority: vec![self.synth.soa(zone, lookup.serial)],
                },
            };
        }

        let Some(zone) = names::zone_of(&key).and_then(|parent| self.zones.get(parent)) else {
            return Response::Decline;
        };

        let Some(record) = lookup.record else {
            debug!(name = %key, "no such host");
            return Response::NxDomain {
                authority: vec![self.synth.soa(zone, lookup.serial)],
            };
        };

        match query_type {
            RecordType::A | RecordType::AAAA | RecordType::CNAME | RecordType::ANY => {
                debug!(name = %key, target = %record.canonical_name, "host answer");
                Response::Answer {
                    answers: self.synth.host_answer(&name.to_lowercase(), &record),
                }
            }
            _ => Response::NoData {
                authority: vec![self.synth.soa(zone, lookup.serial)],
            },
        }
    }
}
