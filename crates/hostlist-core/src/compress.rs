//! Compression of explicit host names into host list notation.
//!
//! Hosts are grouped by the literal text around their first numeric run
//! outside brackets. Within a group, numbers are deduplicated by their exact
//! text, sorted by width and then value, and consecutive values are merged
//! into `first-last` ranges:
//!
//! ```text
//! cn01 cn02 cn03 cn07 cn7  ->  cn[7,01-03,07]
//! ```
//!
//! Output order is deterministic: hosts without a numeric run come first in
//! input order, followed by one entry per group in order of the group's first
//! appearance.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::debug;

use crate::scan::{canonicalize_brackets, find_first_numeric_run};

/// Literal text before and after the numeric run of a host name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GroupKey<'a> {
    head: &'a str,
    tail: &'a str,
}

/// A number as written in a host name.
///
/// `value` is `None` when the digits do not fit in a `u64`; such entries
/// never join a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumericEntry<'a> {
    digits: &'a str,
    value: Option<u64>,
}

impl<'a> NumericEntry<'a> {
    fn new(digits: &'a str) -> Self {
        Self {
            digits,
            value: digits.parse().ok(),
        }
    }

    /// Whether `next` extends a run that started with a number `width`
    /// digits wide and currently ends at `self`.
    ///
    /// Values must differ by exactly one, and `next` must be written the way
    /// re-expanding the run would render it.
    fn continued_by(&self, width: usize, next: &NumericEntry<'_>) -> bool {
        match (self.value, next.value) {
            (Some(a), Some(b)) if a.checked_add(1) == Some(b) => {
                next.digits.len() == width.max(b.to_string().len())
            }
            _ => false,
        }
    }
}

/// Compress explicit host names into host list notation.
///
/// Never fails: hosts without a numeric run outside brackets are returned
/// unchanged. A single host is returned verbatim.
///
/// ```rust
/// let compressed = hostlist_core::compress(["cn01", "cn03", "cn02", "login"]);
/// assert_eq!(compressed, vec!["login", "cn[01-03]"]);
/// ```
pub fn compress<I, S>(hosts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let hosts: Vec<S> = hosts.into_iter().collect();

    match hosts.as_slice() {
        [] => return Vec::new(),
        [only] => return vec![only.as_ref().to_string()],
        _ => {}
    }

    let mut passthrough = Vec::new();
    let mut order: Vec<GroupKey<'_>> = Vec::new();
    let mut buckets: HashMap<GroupKey<'_>, Vec<&str>> = HashMap::new();

    for host in &hosts {
        let host = host.as_ref();
        if host.is_empty() {
            continue;
        }

        match find_first_numeric_run(host) {
            Some(run) => {
                let key = GroupKey {
                    head: &host[..run.start],
                    tail: &host[run.end..],
                };
                buckets
                    .entry(key)
                    .or_insert_with(|| {
                        order.push(key);
                        Vec::new()
                    })
                    .push(&host[run]);
            }
            None => passthrough.push(host.to_string()),
        }
    }

    if buckets.is_empty() {
        return passthrough;
    }

    debug!(
        "compressing {} hosts into {} groups ({} passed through)",
        hosts.len(),
        order.len(),
        passthrough.len()
    );

    for key in order {
        if let Some(digits) = buckets.remove(&key) {
            passthrough.push(render_group(key, digits));
        }
    }

    passthrough
}

fn render_group(key: GroupKey<'_>, digits: Vec<&str>) -> String {
    // Equal-width digit strings order the same lexically and numerically.
    let entries = digits
        .into_iter()
        .unique()
        .sorted_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .map(NumericEntry::new);

    let mut runs: Vec<(NumericEntry<'_>, NumericEntry<'_>)> = Vec::new();
    for entry in entries {
        match runs.last_mut() {
            Some((first, last)) if last.continued_by(first.digits.len(), &entry) => {
                *last = entry
            }
            _ => runs.push((entry, entry)),
        }
    }

    let body = runs
        .iter()
        .map(|(first, last)| {
            if first == last {
                first.digits.to_string()
            } else {
                format!("{}-{}", first.digits, last.digits)
            }
        })
        .join(",");

    canonicalize_brackets(&format!("{}[{}]{}", key.head, body, key.tail))
}
