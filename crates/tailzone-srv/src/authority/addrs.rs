//! Address classification: splits raw peer addresses by family.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Bucket raw addresses into IPv4 and IPv6 lists.
///
/// Relative order is preserved within each family. Entries that do not
/// parse, and unspecified addresses (`0.0.0.0`, `::`), are dropped.
pub fn bucket_addrs<I, S>(addrs: I) -> (Vec<Ipv4Addr>, Vec<Ipv6Addr>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut v4 = Vec::new();
    let mut v6 = Vec::new();

    for raw in addrs {
        let Ok(addr) = raw.as_ref().trim().parse::<IpAddr>() else {
            continue;
        };
        if addr.is_unspecified() {
            continue;
        }
        match addr {
            IpAddr::V4(a) => v4.push(a),
            IpAddr::V6(a) => v6.push(a),
        }
    }

    (v4, v6)
}
