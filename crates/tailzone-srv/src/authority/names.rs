//! Name helpers: canonical form, host labels and parent zones.
//!
//! Index keys are plain strings in canonical form (lower-case, dot
//! terminated). These helpers are the only place that form is produced.

use hickory_proto::rr::Name;

/// Longest label DNS allows.
const MAX_LABEL_LEN: usize = 63;

/// Lower-case `name` and make sure it ends in a single dot.
///
/// An empty (or all-whitespace) name stays empty.
pub fn canonical_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut out = trimmed.trim_end_matches('.').to_ascii_lowercase();
    out.push('.');
    out
}

/// Canonical index key for a wire name.
pub fn name_key(name: &Name) -> String {
    canonical_name(&name.to_ascii())
}

/// First label of a fully-qualified source name.
///
/// `host.tailnet.ts.net.` gives `host`. Returns `None` when the name cannot
/// be split into a non-empty label and a non-empty zone tail. Case is
/// preserved.
pub fn host_label(source: &str) -> Option<&str> {
    let (label, rest) = source.split_once('.')?;
    if label.is_empty() || rest.trim_end_matches('.').is_empty() {
        return None;
    }
    Some(label)
}

/// Zone owning `name`: the name with its leftmost label stripped.
///
/// `foo.corp.example.com.` gives `corp.example.com.`. Returns `None` for a
/// single-label name.
pub fn zone_of(name: &str) -> Option<&str> {
    let (_, rest) = name.split_once('.')?;
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Whether `label` is usable as the leftmost label of a synthesized name.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Parse a canonical string into a wire name.
pub fn parse_name(name: &str) -> crate::Result<Name> {
    Name::from_ascii(name)
        .map_err(|e| crate::SrvError::Zone(format!("invalid name '{name}': {e}")))
}
