//! Line breaking: wrap, truncate, and ellipsis policy over styled runs.
//!
//! The breaker consumes resolved text (markup included), splits it on hard
//! breaks, and packs it into line fragments against a width/height budget.
//! Styled spans are atomic: a break or truncation point never lands inside
//! a formatted run, mirroring the never-split-mid-word rule. Given identical
//! text, policy, and measurer the output is byte-identical.

use crate::markup::{StyledRun, parse_runs};
use crate::measure::TextMeasurer;
use crate::style::{Style, TextStyle};
use crate::unicode::{grapheme_count, grapheme_prefix};

/// Line-breaking policy for one draw pass.
#[derive(Clone, Debug)]
pub struct BreakPolicy {
    /// Greedy word wrapping at `max_width`.
    pub wrap: bool,
    /// Truncate with ellipsis once the budget is exhausted; takes precedence
    /// over `wrap`.
    pub truncate: bool,
    /// Ellipsis appended to a truncated line.
    pub ellipsis: String,
    /// Width budget; `<= 0` means unconstrained.
    pub max_width: f64,
    /// Height budget; `<= 0` means unconstrained.
    pub max_height: f64,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self {
            wrap: false,
            truncate: false,
            ellipsis: "...".to_string(),
            max_width: 0.0,
            max_height: 0.0,
        }
    }
}

impl BreakPolicy {
    fn width_constrained(&self) -> bool {
        self.max_width > 0.0
    }

    fn height_constrained(&self) -> bool {
        self.max_height > 0.0
    }
}

/// One candidate line produced by the breaker.
#[derive(Clone, Debug, PartialEq)]
pub struct LineFragment {
    /// Styled runs in visual order. Empty for an empty line.
    pub runs: Vec<StyledRun>,
    /// Measured width; 0 when unmeasurable (see [`Self::measured`]).
    pub width: f64,
    /// False when the measurement primitive failed for this line; the line
    /// is placed alone and the layout is flagged oversized.
    pub measured: bool,
}

impl LineFragment {
    fn empty() -> Self {
        Self {
            runs: Vec::new(),
            width: 0.0,
            measured: true,
        }
    }

    /// Visible text of the line (markup already resolved into runs).
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when the line holds more than one formatted run.
    #[must_use]
    pub fn composite(&self) -> bool {
        self.runs.len() > 1
    }

    /// True when the line has no visible text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AtomKind {
    Word,
    Space,
    /// A formatted span; atomic for breaking purposes.
    Span,
}

#[derive(Clone, Debug)]
struct Atom {
    text: String,
    style: Style,
    kind: AtomKind,
}

/// Break resolved text into line fragments.
///
/// Hard `\n` breaks always produce a new line. With `truncate` set the
/// output stops at the first line that exhausts the budget; with only
/// `wrap` set words are packed greedily and an overwide word is placed
/// alone on its own line. With neither, each hard line passes through
/// whole. Empty input yields one empty line.
#[must_use]
pub fn break_lines(
    resolved: &str,
    policy: &BreakPolicy,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
) -> Vec<LineFragment> {
    let base = style.base_overlay();
    let runs = parse_runs(resolved, base);
    let hard_lines = split_hard_lines(&runs);

    let mut lines: Vec<LineFragment> = Vec::new();
    for hard in &hard_lines {
        if hard.is_empty() {
            lines.push(LineFragment::empty());
            continue;
        }
        if policy.wrap && policy.width_constrained() {
            lines.extend(pack_line(hard, policy.max_width, measurer, style, base));
        } else {
            lines.push(whole_line(hard, measurer, style));
        }
    }

    if lines.is_empty() {
        lines.push(LineFragment::empty());
    }

    if policy.truncate {
        apply_truncation(&mut lines, policy, measurer, style, base);
    }

    lines
}

/// Split a run sequence at hard line breaks, carrying styles across them.
fn split_hard_lines(runs: &[StyledRun]) -> Vec<Vec<StyledRun>> {
    let mut lines: Vec<Vec<StyledRun>> = vec![Vec::new()];
    for run in runs {
        let mut first = true;
        for piece in run.text.split('\n') {
            if !first {
                lines.push(Vec::new());
            }
            first = false;
            if !piece.is_empty() {
                let line = lines.last_mut().expect("at least one line");
                line.push(StyledRun::new(piece, run.style));
            }
        }
    }
    lines
}

/// One fragment from a whole hard line, measured in a single call.
fn whole_line(runs: &[StyledRun], measurer: &dyn TextMeasurer, style: &TextStyle) -> LineFragment {
    let text: String = runs.iter().map(|r| r.text.as_str()).collect();
    let (width, measured) = match measurer.width(&text, style) {
        Some(w) => (w, true),
        None => (0.0, false),
    };
    LineFragment {
        runs: runs.to_vec(),
        width,
        measured,
    }
}

fn tokenize(runs: &[StyledRun], base: Style) -> Vec<Atom> {
    let mut atoms = Vec::new();
    for run in runs {
        if run.style != base {
            atoms.push(Atom {
                text: run.text.clone(),
                style: run.style,
                kind: AtomKind::Span,
            });
            continue;
        }
        let mut rest = run.text.as_str();
        while !rest.is_empty() {
            let is_ws = rest
                .chars()
                .next()
                .is_some_and(char::is_whitespace);
            let end = rest
                .find(|c: char| c.is_whitespace() != is_ws)
                .unwrap_or(rest.len());
            atoms.push(Atom {
                text: rest[..end].to_string(),
                style: run.style,
                kind: if is_ws { AtomKind::Space } else { AtomKind::Word },
            });
            rest = &rest[end..];
        }
    }
    atoms
}

/// Greedy word packing of one hard line against `max_width`.
fn pack_line(
    runs: &[StyledRun],
    max_width: f64,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
    base: Style,
) -> Vec<LineFragment> {
    let atoms = tokenize(runs, base);
    let mut lines: Vec<LineFragment> = Vec::new();
    let mut current: Vec<StyledRun> = Vec::new();
    let mut current_width = 0.0;
    // Whitespace glue between the current line and the next word; committed
    // only when the word lands on the same line, dropped at a break.
    let mut pending: Option<(Atom, f64)> = None;

    fn flush(lines: &mut Vec<LineFragment>, current: &mut Vec<StyledRun>, current_width: &mut f64) {
        if !current.is_empty() {
            lines.push(LineFragment {
                runs: merge_runs(std::mem::take(current)),
                width: *current_width,
                measured: true,
            });
            *current_width = 0.0;
        }
    }

    for atom in atoms {
        if atom.kind == AtomKind::Space {
            if current.is_empty() {
                continue;
            }
            let w = measurer.width(&atom.text, style).unwrap_or(0.0);
            pending = match pending.take() {
                Some((mut glue, glue_w)) => {
                    glue.text.push_str(&atom.text);
                    Some((glue, glue_w + w))
                }
                None => Some((atom, w)),
            };
            continue;
        }

        let Some(w) = measurer.width(&atom.text, style) else {
            // Unmeasurable: place the atom alone and flag the line.
            flush(&mut lines, &mut current, &mut current_width);
            pending = None;
            lines.push(LineFragment {
                runs: vec![StyledRun::new(atom.text, atom.style)],
                width: 0.0,
                measured: false,
            });
            continue;
        };

        let glue_width = pending.as_ref().map_or(0.0, |(_, gw)| *gw);
        if current.is_empty() || current_width + glue_width + w <= max_width {
            if let Some((glue, gw)) = pending.take() {
                current.push(StyledRun::new(glue.text, glue.style));
                current_width += gw;
            }
            current.push(StyledRun::new(atom.text, atom.style));
            current_width += w;
        } else {
            pending = None;
            flush(&mut lines, &mut current, &mut current_width);
            current_width = w;
            current.push(StyledRun::new(atom.text, atom.style));
        }
    }

    flush(&mut lines, &mut current, &mut current_width);
    if lines.is_empty() {
        lines.push(LineFragment::empty());
    }
    lines
}

fn merge_runs(runs: Vec<StyledRun>) -> Vec<StyledRun> {
    let mut merged: Vec<StyledRun> = Vec::new();
    for run in runs {
        if let Some(last) = merged.last_mut() {
            if last.style == run.style {
                last.text.push_str(&run.text);
                continue;
            }
        }
        merged.push(run);
    }
    merged
}

/// Drop lines past the height budget and truncate the cut line with the
/// ellipsis; independently truncate the first overwide line. No further
/// lines are produced past a truncation point.
fn apply_truncation(
    lines: &mut Vec<LineFragment>,
    policy: &BreakPolicy,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
    base: Style,
) {
    let mut needs_ellipsis_at_tail = false;
    if policy.height_constrained() {
        let line_height = measurer.line_height(style);
        if line_height > 0.0 {
            let max_lines = ((policy.max_height / line_height).floor() as usize).max(1);
            if lines.len() > max_lines {
                lines.truncate(max_lines);
                needs_ellipsis_at_tail = true;
            }
        }
    }

    if policy.width_constrained() {
        let overwide = lines
            .iter()
            .position(|l| l.measured && l.width > policy.max_width);
        if let Some(idx) = overwide {
            lines.truncate(idx + 1);
            truncate_fragment(&mut lines[idx], policy, measurer, style, base);
            return;
        }
    }

    if needs_ellipsis_at_tail {
        if let Some(last) = lines.last_mut() {
            if policy.width_constrained() {
                truncate_fragment(last, policy, measurer, style, base);
            } else {
                append_ellipsis(last, &policy.ellipsis, measurer, style);
            }
        }
    }
}

/// Cut a fragment to the longest prefix whose width plus the ellipsis width
/// fits `max_width`, then append the ellipsis.
///
/// The cut never lands inside a styled run: composite lines truncate at run
/// boundaries, and only the final base-styled run is cut grapheme by
/// grapheme.
fn truncate_fragment(
    fragment: &mut LineFragment,
    policy: &BreakPolicy,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
    base: Style,
) {
    let ellipsis_width = measurer.width(&policy.ellipsis, style).unwrap_or(0.0);
    let budget = policy.max_width - ellipsis_width;

    let mut kept: Vec<StyledRun> = Vec::new();
    let mut kept_width = 0.0;
    for run in &fragment.runs {
        let run_width = measurer.width(&run.text, style).unwrap_or(0.0);
        if kept_width + run_width <= budget {
            kept.push(run.clone());
            kept_width += run_width;
            continue;
        }
        if run.style == base {
            let (prefix, prefix_width) =
                longest_fitting_prefix(&run.text, budget - kept_width, measurer, style);
            if !prefix.is_empty() {
                kept.push(StyledRun::new(prefix, run.style));
                kept_width += prefix_width;
            }
        }
        // Styled runs are atomic: cut lands at the run boundary.
        break;
    }

    // Trailing whitespace before an ellipsis is noise.
    while let Some(last) = kept.last_mut() {
        let trimmed = last.text.trim_end();
        if trimmed.len() != last.text.len() {
            let removed_width = measurer
                .width(&last.text[trimmed.len()..], style)
                .unwrap_or(0.0);
            last.text.truncate(trimmed.len());
            kept_width -= removed_width;
        }
        if last.text.is_empty() {
            kept.pop();
        } else {
            break;
        }
    }

    let ellipsis_style = kept.last().map_or(base, |r| r.style);
    kept.push(StyledRun::new(policy.ellipsis.clone(), ellipsis_style));
    fragment.runs = merge_runs(kept);
    fragment.width = kept_width + ellipsis_width;
    fragment.measured = true;
}

fn longest_fitting_prefix(
    text: &str,
    budget: f64,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
) -> (String, f64) {
    if budget <= 0.0 {
        return (String::new(), 0.0);
    }
    let total = grapheme_count(text);
    let mut best = (String::new(), 0.0);
    for n in 1..=total {
        let prefix = grapheme_prefix(text, n);
        let Some(w) = measurer.width(prefix, style) else {
            break;
        };
        if w > budget {
            break;
        }
        best = (prefix.to_string(), w);
    }
    best
}

fn append_ellipsis(
    fragment: &mut LineFragment,
    ellipsis: &str,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
) {
    let ellipsis_width = measurer.width(ellipsis, style).unwrap_or(0.0);
    let style_for = fragment.runs.last().map_or(Style::NONE, |r| r.style);
    fragment.runs.push(StyledRun::new(ellipsis, style_for));
    fragment.runs = merge_runs(std::mem::take(&mut fragment.runs));
    fragment.width += ellipsis_width;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::CharMetrics;

    /// Width = chars * 6, like a 6px monospace face.
    struct SixPerChar;

    impl TextMeasurer for SixPerChar {
        fn width(&self, text: &str, _style: &TextStyle) -> Option<f64> {
            Some(text.chars().count() as f64 * 6.0)
        }

        fn line_height(&self, _style: &TextStyle) -> f64 {
            10.0
        }
    }

    fn policy() -> BreakPolicy {
        BreakPolicy::default()
    }

    fn style() -> TextStyle {
        TextStyle::default()
    }

    #[test]
    fn test_empty_text_one_empty_line() {
        let lines = break_lines("", &policy(), &SixPerChar, &style());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
    }

    #[test]
    fn test_no_policy_single_line() {
        let lines = break_lines("hello world", &policy(), &SixPerChar, &style());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "hello world");
        assert!((lines[0].width - 66.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hard_breaks() {
        let lines = break_lines("a\nb\n\nc", &policy(), &SixPerChar, &style());
        let texts: Vec<String> = lines.iter().map(LineFragment::text).collect();
        assert_eq!(texts, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_wrap_greedy_packing() {
        let mut p = policy();
        p.wrap = true;
        p.max_width = 70.0;
        let lines = break_lines("alpha beta gamma", &p, &SixPerChar, &style());
        let texts: Vec<String> = lines.iter().map(LineFragment::text).collect();
        // "alpha beta" = 10 chars = 60 <= 70; adding " gamma" would be 96.
        assert_eq!(texts, vec!["alpha beta", "gamma"]);
        for line in &lines {
            assert!(line.width <= 70.0);
        }
    }

    #[test]
    fn test_wrap_overwide_word_alone() {
        let mut p = policy();
        p.wrap = true;
        p.max_width = 30.0;
        let lines = break_lines("hi extraordinary yo", &p, &SixPerChar, &style());
        let texts: Vec<String> = lines.iter().map(LineFragment::text).collect();
        assert_eq!(texts, vec!["hi", "extraordinary", "yo"]);
    }

    #[test]
    fn test_wrap_drops_break_whitespace() {
        let mut p = policy();
        p.wrap = true;
        p.max_width = 36.0;
        let lines = break_lines("aaa   bbb", &p, &SixPerChar, &style());
        let texts: Vec<String> = lines.iter().map(LineFragment::text).collect();
        assert_eq!(texts, vec!["aaa", "bbb"]);
    }

    #[test]
    fn test_wrap_zero_max_width_unconstrained() {
        let mut p = policy();
        p.wrap = true;
        p.max_width = 0.0;
        let lines = break_lines("alpha beta gamma", &p, &SixPerChar, &style());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_styled_span_atomic() {
        let mut p = policy();
        p.wrap = true;
        p.max_width = 40.0;
        // The bold span is 8 chars = 48 wide; it may not be split.
        let lines = break_lines("x [bold]aaaa bbb[/]", &p, &SixPerChar, &style());
        let texts: Vec<String> = lines.iter().map(LineFragment::text).collect();
        assert_eq!(texts, vec!["x", "aaaa bbb"]);
        assert_eq!(lines[1].runs.len(), 1);
    }

    #[test]
    fn test_tags_not_counted_in_width() {
        let p = policy();
        let lines = break_lines("[bold]abc[/]", &p, &SixPerChar, &style());
        assert!((lines[0].width - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_truncate_overwide_line() {
        let mut p = policy();
        p.truncate = true;
        p.ellipsis = "\u{2026}".to_string();
        p.max_width = 50.0;
        let lines = break_lines(
            "Supercalifragilisticexpialidocious",
            &p,
            &SixPerChar,
            &style(),
        );
        assert_eq!(lines.len(), 1);
        let text = lines[0].text();
        assert!(text.ends_with('\u{2026}'));
        // Prefix width plus ellipsis width must fit the budget.
        assert!(lines[0].width <= 50.0);
        let prefix_chars = text.chars().count() - 1;
        assert!(prefix_chars as f64 * 6.0 + 6.0 <= 50.0);
    }

    #[test]
    fn test_truncate_stops_further_lines() {
        let mut p = policy();
        p.truncate = true;
        p.max_width = 30.0;
        let lines = break_lines("aaaaaaaaaa\nnever shown", &p, &SixPerChar, &style());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].text().ends_with("..."));
    }

    #[test]
    fn test_truncate_height_budget() {
        let mut p = policy();
        p.truncate = true;
        p.wrap = true;
        p.max_width = 60.0;
        p.max_height = 25.0; // two 10-unit lines fit
        let lines = break_lines("one two three four five six", &p, &SixPerChar, &style());
        assert_eq!(lines.len(), 2);
        assert!(lines[1].text().ends_with("..."));
        assert!(lines[1].width <= 60.0);
    }

    #[test]
    fn test_truncate_fits_without_ellipsis() {
        let mut p = policy();
        p.truncate = true;
        p.max_width = 100.0;
        let lines = break_lines("short", &p, &SixPerChar, &style());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "short");
    }

    #[test]
    fn test_truncate_composite_cuts_at_run_boundary() {
        let mut p = policy();
        p.truncate = true;
        p.max_width = 40.0;
        // "ab" (12) fits; the bold run (36) would overflow the 22 budget
        // left after the ellipsis, and styled runs are never cut.
        let lines = break_lines("ab[bold]cdefgh[/]", &p, &SixPerChar, &style());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "ab...");
    }

    #[test]
    fn test_truncate_nothing_fits_keeps_ellipsis() {
        let mut p = policy();
        p.truncate = true;
        p.max_width = 5.0;
        let lines = break_lines("abcdef", &p, &SixPerChar, &style());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "...");
    }

    #[test]
    fn test_determinism() {
        let mut p = policy();
        p.wrap = true;
        p.max_width = 47.0;
        let a = break_lines("the quick brown fox jumps", &p, &SixPerChar, &style());
        let b = break_lines("the quick brown fox jumps", &p, &SixPerChar, &style());
        assert_eq!(a, b);
    }

    #[test]
    fn test_unmeasurable_placed_alone() {
        struct Flaky;
        impl TextMeasurer for Flaky {
            fn width(&self, text: &str, _style: &TextStyle) -> Option<f64> {
                if text.contains("broken") {
                    None
                } else {
                    Some(text.chars().count() as f64 * 6.0)
                }
            }
            fn line_height(&self, _style: &TextStyle) -> f64 {
                10.0
            }
        }
        let mut p = policy();
        p.wrap = true;
        p.max_width = 60.0;
        let lines = break_lines("ok broken ok", &p, &Flaky, &style());
        let flagged: Vec<&LineFragment> = lines.iter().filter(|l| !l.measured).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].text(), "broken");
    }

    #[test]
    fn test_char_metrics_integration() {
        let mut p = policy();
        p.wrap = true;
        p.max_width = 40.0;
        let s = TextStyle {
            font_size: 10.0,
            ..TextStyle::default()
        };
        let lines = break_lines("one two three", &p, &CharMetrics::default(), &s);
        assert!(lines.len() > 1);
    }
}
