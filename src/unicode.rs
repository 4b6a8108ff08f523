//! Display width and grapheme helpers.
//!
//! The engine never breaks inside a grapheme cluster: wrap scanning and
//! truncation both walk grapheme boundaries. Width here is the column-count
//! estimate used by the builtin measurer; hosts with real font metrics
//! supply their own [`TextMeasurer`](crate::measure::TextMeasurer).

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of a string in column units.
#[must_use]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Count grapheme clusters.
#[must_use]
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// The prefix of `s` that spans the first `n` grapheme clusters.
#[must_use]
pub fn grapheme_prefix(s: &str, n: usize) -> &str {
    match s.grapheme_indices(true).nth(n) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}
