//! Text measurement contract and the builtin estimating measurer.
//!
//! Real glyph metrics live in the host; the engine only needs a synchronous
//! width/height oracle. [`CharMetrics`] is a column-count estimate good
//! enough for tests and headless layout.

use crate::style::TextStyle;
use crate::unicode::display_width;

/// Synchronous measurement primitive consumed by the line breaker.
pub trait TextMeasurer {
    /// Measured width of `text` (markup already stripped) in local units.
    ///
    /// Returns `None` when the text cannot be measured; the breaker then
    /// treats the span as a single-word overflow.
    fn width(&self, text: &str, style: &TextStyle) -> Option<f64>;

    /// Height of one line in the given style.
    fn line_height(&self, style: &TextStyle) -> f64;
}

/// Column-count width estimation from Unicode display width.
///
/// Width is `columns * font_size * advance`; line height is
/// `font_size * leading`.
#[derive(Clone, Copy, Debug)]
pub struct CharMetrics {
    /// Average advance as a fraction of font size.
    pub advance: f64,
    /// Line height as a fraction of font size.
    pub leading: f64,
}

impl Default for CharMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            leading: 1.2,
        }
    }
}

impl TextMeasurer for CharMetrics {
    fn width(&self, text: &str, style: &TextStyle) -> Option<f64> {
        let columns = display_width(text) as f64;
        Some(columns * style.font_size * self.advance)
    }

    fn line_height(&self, style: &TextStyle) -> f64 {
        style.font_size * self.leading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_metrics_width() {
        let m = CharMetrics::default();
        let style = TextStyle {
            font_size: 10.0,
            ..TextStyle::default()
        };
        assert_eq!(m.width("abcd", &style), Some(24.0));
        assert_eq!(m.width("", &style), Some(0.0));
    }

    #[test]
    fn test_char_metrics_line_height() {
        let m = CharMetrics::default();
        let style = TextStyle {
            font_size: 10.0,
            ..TextStyle::default()
        };
        assert!((m.line_height(&style) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wide_chars_count_double() {
        let m = CharMetrics::default();
        let style = TextStyle {
            font_size: 10.0,
            ..TextStyle::default()
        };
        assert_eq!(m.width("日本", &style), Some(24.0));
    }
}
