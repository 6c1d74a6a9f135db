//! Extraction of structured signals from encoder diagnostic text.
//!
//! Encoders print free-form progress on stderr. The only signal we read is
//! the pass count, written as `<N> pass` or `<N> passes`. Text that does not
//! contain the token simply yields nothing.

use std::sync::LazyLock;

use regex::Regex;

static PASSES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s+pass(?:es)?\b").expect("pass-count pattern is valid")
});

/// Extract the first `<N> pass(es)` count from diagnostic text.
///
/// Matching is case-insensitive and only ASCII digits count. A count too
/// large for `u32` is treated as absent.
///
/// # Example
///
/// ```
/// use encode_bench::encoder::parse_passes;
///
/// assert_eq!(parse_passes("encoded in 2 passes"), Some(2));
/// assert_eq!(parse_passes("1 pass used"), Some(1));
/// assert_eq!(parse_passes("done"), None);
/// ```
#[must_use]
pub fn parse_passes(text: &str) -> Option<u32> {
    PASSES_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
