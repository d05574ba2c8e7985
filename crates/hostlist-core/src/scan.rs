//! Character-level scanners shared by expansion and compression.
//!
//! These helpers work on raw host strings without allocating where possible:
//!
//! - [`find_first_numeric_run`] locates the digits that compression groups on.
//! - [`canonicalize_brackets`] drops bracket pairs that hold a single value.
//! - [`is_bracketed`] decides whether a token needs bracket expansion.
//!
//! All offsets returned here are byte offsets. Brackets and ASCII digits are
//! single-byte characters, so every offset is a valid `char` boundary.

use std::ops::Range;

/// Find the first maximal run of ASCII digits that sits outside any bracket
/// pair.
///
/// Returns the byte range of the run, or `None` when every digit in `input`
/// is enclosed in brackets (or there are no digits at all). A run that ends
/// at the end of the string is reported with `end == input.len()`.
///
/// ```rust
/// use hostlist_core::find_first_numeric_run;
///
/// assert_eq!(find_first_numeric_run("cn012.ib"), Some(2..5));
/// assert_eq!(find_first_numeric_run("rack[1-4]a"), None);
/// ```
pub fn find_first_numeric_run(input: &str) -> Option<Range<usize>> {
    let mut depth = 0usize;
    let mut start = None;

    for (idx, byte) in input.bytes().enumerate() {
        match (start, byte) {
            (Some(_), b'0'..=b'9') => {}
            (Some(begin), _) => return Some(begin..idx),
            (None, b'[') => depth += 1,
            // Stray closing brackets must not wrap the depth counter.
            (None, b']') => depth = depth.saturating_sub(1),
            (None, b'0'..=b'9') if depth == 0 => start = Some(idx),
            (None, _) => {}
        }
    }

    start.map(|begin| begin..input.len())
}

/// Remove every bracket pair whose content contains neither `-` nor `,`.
///
/// `cn[5]` becomes `cn5`, while `cn[1-2]` and `cn[1,3]` are left alone.
/// The function is total and idempotent.
pub fn canonicalize_brackets(input: &str) -> String {
    let mut output = input.to_string();
    let mut cursor = 0;

    while let Some(open) = output[cursor..].find('[').map(|offset| cursor + offset) {
        let Some(close) = output[open..].find(']').map(|offset| open + offset) else {
            break;
        };

        if output[open + 1..close].contains(&['-', ','][..]) {
            cursor = close + 1;
        } else {
            output.remove(close);
            output.remove(open);
            cursor = open;
        }
    }

    output
}

/// Check whether a token is in bracket notation: literal text, at least one
/// balanced `[...]`, and optional literal text after it.
///
/// Nested or unbalanced brackets make the token plain text.
pub fn is_bracketed(token: &str) -> bool {
    let mut open = false;
    let mut pairs = 0usize;

    for c in token.chars() {
        match c {
            '[' if open => return false,
            '[' => open = true,
            ']' if !open => return false,
            ']' => {
                open = false;
                pairs += 1;
            }
            _ => {}
        }
    }

    !open && pairs > 0
}
