//! Property tests for the line breaker: determinism, width bounds, word
//! preservation, and truncation budgets.

use labelkit::{BreakPolicy, TextMeasurer, TextStyle, break_lines};
use proptest::prelude::*;

/// Width = chars * 6, total (never fails to measure).
struct SixPerChar;

impl TextMeasurer for SixPerChar {
    fn width(&self, text: &str, _style: &TextStyle) -> Option<f64> {
        Some(text.chars().count() as f64 * 6.0)
    }

    fn line_height(&self, _style: &TextStyle) -> f64 {
        10.0
    }
}

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,12}", 1..10)
}

proptest! {
    #[test]
    fn breaking_is_deterministic(
        ws in words(),
        max_width in 10.0_f64..200.0,
        wrap in any::<bool>(),
        truncate in any::<bool>(),
    ) {
        let text = ws.join(" ");
        let policy = BreakPolicy {
            wrap,
            truncate,
            max_width,
            ..BreakPolicy::default()
        };
        let style = TextStyle::default();
        let a = break_lines(&text, &policy, &SixPerChar, &style);
        let b = break_lines(&text, &policy, &SixPerChar, &style);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn wrapped_lines_respect_width_unless_single_word(
        ws in words(),
        max_width in 10.0_f64..200.0,
    ) {
        let text = ws.join(" ");
        let policy = BreakPolicy {
            wrap: true,
            max_width,
            ..BreakPolicy::default()
        };
        let lines = break_lines(&text, &policy, &SixPerChar, &TextStyle::default());
        for line in &lines {
            let word_count = line.text().split_whitespace().count();
            if word_count > 1 {
                // Multi-word lines always fit; only an unbreakable word may
                // overflow, and it sits alone.
                prop_assert!(line.width <= max_width);
            }
        }
    }

    #[test]
    fn wrapping_preserves_every_word_in_order(
        ws in words(),
        max_width in 10.0_f64..200.0,
    ) {
        let text = ws.join(" ");
        let policy = BreakPolicy {
            wrap: true,
            max_width,
            ..BreakPolicy::default()
        };
        let lines = break_lines(&text, &policy, &SixPerChar, &TextStyle::default());
        let rejoined: Vec<String> = lines
            .iter()
            .map(labelkit::LineFragment::text)
            .flat_map(|t| {
                t.split_whitespace()
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .collect();
        let expected: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
        prop_assert_eq!(rejoined, expected);
    }

    #[test]
    fn hard_breaks_produce_exact_line_count(
        segments in prop::collection::vec("[a-z ]{0,10}", 1..6),
    ) {
        let text = segments.join("\n");
        let lines = break_lines(
            &text,
            &BreakPolicy::default(),
            &SixPerChar,
            &TextStyle::default(),
        );
        prop_assert_eq!(lines.len(), segments.len());
    }

    #[test]
    fn truncated_output_fits_the_budget(
        ws in words(),
        max_width in 20.0_f64..120.0,
    ) {
        let text = ws.join(" ");
        let policy = BreakPolicy {
            truncate: true,
            max_width,
            ..BreakPolicy::default()
        };
        let lines = break_lines(&text, &policy, &SixPerChar, &TextStyle::default());
        prop_assert_eq!(lines.len(), 1);
        // Budget: max_width is always at least the 18-unit ellipsis here.
        prop_assert!(lines[0].width <= max_width);
        if text.chars().count() as f64 * 6.0 > max_width {
            prop_assert!(lines[0].text().ends_with("..."));
        } else {
            prop_assert_eq!(lines[0].text(), text);
        }
    }

    #[test]
    fn total_measurer_never_flags_unmeasured(
        ws in words(),
        wrap in any::<bool>(),
        max_width in 10.0_f64..200.0,
    ) {
        let text = ws.join(" ");
        let policy = BreakPolicy {
            wrap,
            max_width,
            ..BreakPolicy::default()
        };
        let lines = break_lines(&text, &policy, &SixPerChar, &TextStyle::default());
        prop_assert!(lines.iter().all(|l| l.measured));
    }
}
