//! Expansion of compact host list notation into explicit host names.
//!
//! Expansion happens in two stages:
//!
//! 1. [`split_host_list`] strips spaces and splits the raw input at top-level
//!    commas, keeping commas inside brackets as part of the token.
//! 2. Every token in bracket notation is expanded by
//!    [`Expander::expand_node_list`]; all other tokens are used verbatim.
//!
//! Bracket groups inside one token are combined as a Cartesian product, with
//! the first group as the outer loop:
//!
//! ```text
//! r[1-2]n[01,03]  ->  r1n01, r1n03, r2n01, r2n03
//! ```
//!
//! The number of hosts one call may produce is capped (see
//! [`DEFAULT_MAX_HOSTS`]) so that inputs chaining many bracket groups fail
//! before the product is allocated.

use itertools::Itertools;
use tracing::debug;

use crate::scan::is_bracketed;
use crate::{HostlistError, Result};

/// Default cap on the number of hosts a single expansion may produce.
pub const DEFAULT_MAX_HOSTS: usize = 1 << 20;

/// Expand a host list using the default host limit.
///
/// ```rust
/// let hosts = hostlist_core::expand("cn[01-03],login").unwrap();
/// assert_eq!(hosts, vec!["cn01", "cn02", "cn03", "login"]);
/// ```
pub fn expand(raw: &str) -> Result<Vec<String>> {
    Expander::default().expand(raw)
}

/// Host list expander with a bounded output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expander {
    max_hosts: usize,
}

impl Default for Expander {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HOSTS)
    }
}

impl Expander {
    /// Create an expander that refuses to produce more than `max_hosts` hosts.
    pub fn new(max_hosts: usize) -> Self {
        Self { max_hosts }
    }

    /// The configured host limit.
    pub fn max_hosts(&self) -> usize {
        self.max_hosts
    }

    /// Expand a raw, comma separated host list.
    ///
    /// Plain tokens are passed through; bracketed tokens are expanded in
    /// place. Any malformed token fails the whole call. The host limit
    /// applies to the total across all tokens.
    pub fn expand(&self, raw: &str) -> Result<Vec<String>> {
        let mut hosts = Vec::new();

        for token in split_host_list(raw)? {
            let remaining = self.max_hosts.saturating_sub(hosts.len());

            if is_bracketed(&token) {
                let expanded = self.expand_within(&token, remaining)?;
                hosts.extend(expanded);
            } else if remaining == 0 {
                return Err(self.limit_exceeded(&token));
            } else {
                hosts.push(token);
            }
        }

        Ok(hosts)
    }

    /// Expand a single token that contains at least one bracket group.
    ///
    /// The text after the last `]` is appended to every generated host.
    pub fn expand_node_list(&self, token: &str) -> Result<Vec<String>> {
        self.expand_within(token, self.max_hosts)
    }

    fn expand_within(&self, token: &str, budget: usize) -> Result<Vec<String>> {
        debug!("expanding bracketed token '{}'", token);

        let mut fragments: Vec<&str> = token.split(']').collect();
        // `split` always yields at least one item.
        let suffix = fragments.pop().unwrap_or_default();
        if fragments.is_empty() || suffix.contains('[') {
            return Err(HostlistError::isolated_bracket(token));
        }

        let groups = fragments
            .into_iter()
            .map(|fragment| BracketGroup::parse(token, fragment))
            .collect::<Result<Vec<_>>>()?;

        let total = groups
            .iter()
            .try_fold(1u64, |acc, group| acc.checked_mul(group.host_count()));
        match total {
            Some(total) if total <= budget as u64 => {}
            _ => return Err(self.limit_exceeded(token)),
        }

        let mut hosts = vec![String::new()];
        for group in &groups {
            let units = group.render();
            hosts = hosts
                .iter()
                .cartesian_product(units.iter())
                .map(|(left, right)| format!("{left}{right}"))
                .collect();
        }

        if !suffix.is_empty() {
            for host in &mut hosts {
                host.push_str(suffix);
            }
        }

        Ok(hosts)
    }

    fn limit_exceeded(&self, token: &str) -> HostlistError {
        HostlistError::ExpansionLimitExceeded {
            token: token.to_string(),
            limit: self.max_hosts,
        }
    }
}

/// Literal head text followed by the units of one `[...]` group.
#[derive(Debug)]
struct BracketGroup<'a> {
    head: &'a str,
    units: Vec<Unit<'a>>,
}

impl<'a> BracketGroup<'a> {
    /// Parse one `]`-delimited fragment such as `cn[01,05-07`.
    fn parse(token: &str, fragment: &'a str) -> Result<Self> {
        if !fragment.contains('[') {
            return Err(HostlistError::isolated_bracket(token));
        }

        let mut pieces = fragment.split(|c: char| c == '[' || c == ',');
        let head = pieces.next().unwrap_or_default();
        let units = pieces.map(Unit::parse).collect::<Result<Vec<_>>>()?;

        Ok(Self { head, units })
    }

    fn host_count(&self) -> u64 {
        self.units
            .iter()
            .fold(0u64, |acc, unit| acc.saturating_add(unit.len()))
    }

    fn render(&self) -> Vec<String> {
        let mut rendered = Vec::new();
        for unit in &self.units {
            match *unit {
                Unit::Single(digits) => rendered.push(format!("{}{}", self.head, digits)),
                Unit::Range { start, end, width } => rendered.extend(
                    (start..=end).map(|n| format!("{}{:0>width$}", self.head, n, width = width)),
                ),
            }
        }
        rendered
    }
}

/// One comma separated item inside brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit<'a> {
    /// A bare number, emitted exactly as written.
    Single(&'a str),

    /// An inclusive range; every value is padded to the width of `start`.
    /// A range whose start exceeds its end yields no values.
    Range { start: u64, end: u64, width: usize },
}

impl<'a> Unit<'a> {
    fn parse(piece: &'a str) -> Result<Self> {
        if is_digits(piece) {
            return Ok(Unit::Single(piece));
        }

        let Some((start_str, end_str)) = piece.split_once('-') else {
            return Err(HostlistError::invalid_unit_token(piece));
        };
        if !is_digits(start_str) || !is_digits(end_str) {
            return Err(HostlistError::invalid_unit_token(piece));
        }

        let start = start_str.parse::<u64>().map_err(|err| {
            HostlistError::invalid_range_boundary(piece, format!("range start: {err}"))
        })?;
        let end = end_str.parse::<u64>().map_err(|err| {
            HostlistError::invalid_range_boundary(piece, format!("range end: {err}"))
        })?;

        Ok(Unit::Range {
            start,
            end,
            width: start_str.len(),
        })
    }

    fn len(&self) -> u64 {
        match *self {
            Unit::Single(_) => 1,
            Unit::Range { start, end, .. } => end
                .checked_sub(start)
                .map_or(0, |span| span.saturating_add(1)),
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Split a raw host list into tokens at commas that are not inside brackets.
///
/// All spaces are removed first. Empty tokens (`a,,b`, a trailing comma) are
/// dropped instead of being passed through as empty host names. Fails on nested
/// (`DuplicateBracket`) or unmatched (`IsolatedBracket`) brackets.
///
/// ```rust
/// let tokens = hostlist_core::split_host_list("cn[1,3], gpu01,").unwrap();
/// assert_eq!(tokens, vec!["cn[1,3]", "gpu01"]);
/// ```
pub fn split_host_list(raw: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut bracket: Option<String> = None;

    for c in raw.chars().filter(|c| *c != ' ') {
        match c {
            '[' => {
                if bracket.is_some() {
                    return Err(HostlistError::duplicate_bracket(raw));
                }
                bracket = Some(String::from('['));
            }
            ']' => {
                let Some(content) = bracket.take() else {
                    return Err(HostlistError::isolated_bracket(raw));
                };
                token.push_str(&content);
                token.push(']');
            }
            ',' if bracket.is_none() => tokens.push(std::mem::take(&mut token)),
            _ => match bracket.as_mut() {
                Some(content) => content.push(c),
                None => token.push(c),
            },
        }
    }

    if bracket.is_some() {
        return Err(HostlistError::isolated_bracket(raw));
    }
    tokens.push(token);

    Ok(tokens
        .into_iter()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_range() {
        assert_eq!(expand("cn[01-03]").unwrap(), vec!["cn01", "cn02", "cn03"]);
    }

    #[test]
    fn mixed_group() {
        assert_eq!(
            expand("cn[01,03,05-06]").unwrap(),
            vec!["cn01", "cn03", "cn05", "cn06"]
        );
    }

    #[test]
    fn width_follows_range_start() {
        assert_eq!(
            expand("n[8-11]").unwrap(),
            vec!["n8", "n9", "n10", "n11"]
        );
        assert_eq!(
            expand("n[098-101]").unwrap(),
            vec!["n098", "n099", "n100", "n101"]
        );
    }

    #[test]
    fn bare_numbers_keep_their_padding() {
        assert_eq!(expand("cn[007,8]").unwrap(), vec!["cn007", "cn8"]);
    }

    #[test]
    fn suffix_is_applied_to_every_host() {
        assert_eq!(
            expand("cn[1-2].ib0").unwrap(),
            vec!["cn1.ib0", "cn2.ib0"]
        );
    }

    #[test]
    fn cartesian_order_first_group_is_outer_loop() {
        assert_eq!(
            expand("r[1-2]n[01,03]").unwrap(),
            vec!["r1n01", "r1n03", "r2n01", "r2n03"]
        );
    }

    #[test]
    fn plain_and_bracketed_tokens_mix() {
        assert_eq!(
            expand("login01, cn[1-2],mgmt").unwrap(),
            vec!["login01", "cn1", "cn2", "mgmt"]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(expand("").unwrap().is_empty());
        assert!(expand(" , ,").unwrap().is_empty());
    }

    #[test]
    fn unterminated_bracket_is_isolated() {
        let err = expand("cn[01-").unwrap_err();
        assert!(matches!(err, HostlistError::IsolatedBracket { .. }));
    }

    #[test]
    fn closing_bracket_without_opening() {
        let err = expand("cn01]").unwrap_err();
        assert!(matches!(err, HostlistError::IsolatedBracket { .. }));
    }

    #[test]
    fn nested_brackets_are_rejected() {
        let err = expand("cn[0[1]]").unwrap_err();
        assert!(matches!(err, HostlistError::DuplicateBracket { .. }));
    }

    #[test]
    fn non_numeric_unit_is_rejected() {
        let err = expand("cn[a-b]").unwrap_err();
        assert!(matches!(err, HostlistError::InvalidUnitToken { ref token } if token == "a-b"));

        let err = expand("cn[]").unwrap_err();
        assert!(matches!(err, HostlistError::InvalidUnitToken { .. }));

        let err = expand("cn[1-2-3]").unwrap_err();
        assert!(matches!(err, HostlistError::InvalidUnitToken { .. }));
    }

    #[test]
    fn oversized_boundary_is_rejected() {
        let err = expand("cn[1-99999999999999999999999]").unwrap_err();
        assert!(matches!(
            err,
            HostlistError::InvalidRangeBoundary { ref reason, .. } if reason.starts_with("range end")
        ));

        let err = expand("cn[99999999999999999999999-1]").unwrap_err();
        assert!(matches!(
            err,
            HostlistError::InvalidRangeBoundary { ref reason, .. } if reason.starts_with("range start")
        ));
    }

    #[test]
    fn reversed_range_expands_to_nothing() {
        assert_eq!(expand("cn[5-1,3]").unwrap(), vec!["cn3"]);
        assert!(expand("cn[5-1]").unwrap().is_empty());
        assert_eq!(expand("login,cn[5-1]").unwrap(), vec!["login"]);
    }

    #[test]
    fn reversed_range_counts_toward_no_hosts() {
        let expander = Expander::new(1);
        assert_eq!(expander.expand("cn[9-0,4]").unwrap(), vec!["cn4"]);
    }

    #[test]
    fn split_drops_empty_tokens() {
        assert_eq!(split_host_list("a,,b,").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn bad_token_aborts_whole_input() {
        assert!(expand("cn[1-3],gpu[x]").is_err());
    }

    #[test]
    fn expansion_limit_per_token() {
        let expander = Expander::new(10);
        assert_eq!(expander.expand("cn[1-10]").unwrap().len(), 10);

        let err = expander.expand("cn[1-11]").unwrap_err();
        assert!(matches!(
            err,
            HostlistError::ExpansionLimitExceeded { limit: 10, .. }
        ));
    }

    #[test]
    fn expansion_limit_counts_product() {
        let err = Expander::new(1000)
            .expand("a[1-10]b[1-10]c[1-11]")
            .unwrap_err();
        assert!(matches!(err, HostlistError::ExpansionLimitExceeded { .. }));
    }

    #[test]
    fn expansion_limit_spans_tokens() {
        let expander = Expander::new(3);
        assert!(expander.expand("cn[1-2],login").is_ok());
        assert!(expander.expand("cn[1-2],login,mgmt").is_err());
        assert!(expander.expand("login,cn[1-3]").is_err());
    }

    #[test]
    fn huge_product_does_not_overflow() {
        let raw = "a[0-4294967295]b[0-4294967295]c[0-4294967295]";
        assert!(matches!(
            expand(raw).unwrap_err(),
            HostlistError::ExpansionLimitExceeded { .. }
        ));
    }

    #[test]
    fn expand_node_list_directly() {
        let expander = Expander::default();
        assert_eq!(
            expander.expand_node_list("gpu[1,2]-eth").unwrap(),
            vec!["gpu1-eth", "gpu2-eth"]
        );
        assert!(expander.expand_node_list("gpu1").is_err());
    }

    #[test]
    fn split_keeps_bracket_commas() {
        assert_eq!(
            split_host_list("a[1,2],b, c [3-4] ").unwrap(),
            vec!["a[1,2]", "b", "c[3-4]"]
        );
    }

    #[test]
    fn split_rejects_duplicate_bracket() {
        assert!(matches!(
            split_host_list("a[1[2]").unwrap_err(),
            HostlistError::DuplicateBracket { .. }
        ));
    }
}
