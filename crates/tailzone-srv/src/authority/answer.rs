//! Answer synthesis: turns peer records and zones into resource records.

use hickory_proto::rr::rdata::{A, AAAA, CNAME, NS, SOA};
use hickory_proto::rr::{Name, RData, Record};

use crate::authority::ttl_policy::SoaTimers;
use crate::authority::zone_builder::PeerRecord;
use crate::authority::zones::ZoneNames;

/// Builds records with TTLs taken from the refresh interval.
#[derive(Debug, Clone, Copy)]
pub struct AnswerSynthesizer {
    timers: SoaTimers,
}

impl AnswerSynthesizer {
    pub fn new(ttl: u32) -> Self {
        Self {
            timers: SoaTimers::for_interval(ttl),
        }
    }

    pub const fn ttl(&self) -> u32 {
        self.timers.ttl
    }

    /// One A record per IPv4 address, owned by the peer's canonical name.
    pub fn a(&self, record: &PeerRecord) -> Vec<Record> {
        record
            .v4
            .iter()
            .map(|ip| {
                Record::from_rdata(record.canonical_name.clone(), self.ttl(), RData::A(A(*ip)))
            })
            .collect()
    }

    /// One AAAA record per IPv6 address, owned by the peer's canonical name.
    pub fn aaaa(&self, record: &PeerRecord) -> Vec<Record> {
        record
            .v6
            .iter()
            .map(|ip| {
                Record::from_rdata(
                    record.canonical_name.clone(),
                    self.ttl(),
                    RData::AAAA(AAAA(*ip)),
                )
            })
            .collect()
    }

    /// `owner CNAME <canonical name>`
    pub fn cname(&self, owner: &Name, record: &PeerRecord) -> Record {
        Record::from_rdata(
            owner.clone(),
            self.ttl(),
            RData::CNAME(CNAME(record.canonical_name.clone())),
        )
    }

    /// The combined host answer: CNAME first, then A, then AAAA.
    pub fn host_answer(&self, owner: &Name, record: &PeerRecord) -> Vec<Record> {
        let mut answers = Vec::with_capacity(1 + record.v4.len() + record.v6.len());
        answers.push(self.cname(owner, record));
        answers.extend(self.a(record));
        answers.extend(self.aaaa(record));
        answers
    }

    /// `<zone> NS ns.<zone>`
    pub fn ns(&self, zone: &ZoneNames) -> Record {
        Record::from_rdata(zone.apex.clone(), self.ttl(), RData::NS(NS(zone.ns.clone())))
    }

    /// Zone SOA carrying `serial`.
    pub fn soa(&self, zone: &ZoneNames, serial: u32) -> Record {
        let soa = SOA::new(
            zone.ns.clone(),
            zone.mbox.clone(),
            serial,
            self.timers.refresh,
            self.timers.retry,
            self.timers.expire,
            self.timers.minimum,
        );
        Record::from_rdata(zone.apex.clone(), self.timers.ttl, RData::SOA(soa))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::zones::ZoneSet;
    use crate::config::Config;
    use hickory_proto::rr::RecordType;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn record() -> PeerRecord {
        PeerRecord {
            canonical_name: Name::from_ascii("foo.ts.net.").unwrap(),
            v4: vec![Ipv4Addr::new(100, 1, 2, 3), Ipv4Addr::new(100, 1, 2, 4)],
            v6: vec!["fd7a::3".parse::<Ipv6Addr>().unwrap()],
        }
    }

    fn zone() -> ZoneNames {
        ZoneSet::from_config(&Config::new("corp.example.com."))
            .unwrap()
            .get("corp.example.com.")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_host_answer_order_and_owners() {
        let synth = AnswerSynthesizer::new(300);
        let owner = Name::from_ascii("foo.corp.example.com.").unwrap();
        let answers = synth.host_answer(&owner, &record());

        let types: Vec<_> = answers.iter().map(Record::record_type).collect();
        assert_eq!(
            types,
            vec![RecordType::CNAME, RecordType::A, RecordType::A, RecordType::AAAA]
        );
        assert_eq!(answers[0].name(), &owner);
        match answers[0].data() {
            RData::CNAME(target) => assert_eq!(target.0.to_string(), "foo.ts.net."),
            other => panic!("unexpected rdata: {other:?}"),
        }
        for rr in &answers[1..] {
            assert_eq!(rr.name().to_string(), "foo.ts.net.");
            assert_eq!(rr.ttl(), 300);
        }
        assert_eq!(answers[1].data(), &RData::A(A(Ipv4Addr::new(100, 1, 2, 3))));
    }

    #[test]
    fn test_no_addresses_gives_cname_only() {
        let synth = AnswerSynthesizer::new(60);
        let bare = PeerRecord {
            v4: vec![],
            v6: vec![],
            ..record()
        };
        let owner = Name::from_ascii("foo.corp.example.com.").unwrap();
        assert_eq!(synth.host_answer(&owner, &bare).len(), 1);
    }

    #[test]
    fn test_ns_record() {
        let ns = AnswerSynthesizer::new(300).ns(&zone());
        assert_eq!(ns.name().to_string(), "corp.example.com.");
        assert_eq!(ns.record_type(), RecordType::NS);
        match ns.data() {
            RData::NS(target) => assert_eq!(target.0.to_string(), "ns.corp.example.com."),
            other => panic!("unexpected rdata: {other:?}"),
        }
    }

    #[test]
    fn test_soa_record() {
        let soa = AnswerSynthesizer::new(300).soa(&zone(), 4242);
        assert_eq!(soa.name().to_string(), "corp.example.com.");
        assert_eq!(soa.ttl(), 300);
        match soa.data() {
            RData::SOA(soa) => {
                assert_eq!(soa.mname().to_string(), "ns.corp.example.com.");
                assert_eq!(soa.rname().to_string(), "root.ns.corp.example.com.");
                assert_eq!(soa.serial(), 4242);
                assert_eq!(soa.refresh(), 300);
                assert_eq!(soa.retry(), 150);
                assert_eq!(soa.expire(), 600);
                assert_eq!(soa.minimum(), 150);
            }
            other => panic!("unexpected rdata: {other:?}"),
        }
    }
}
