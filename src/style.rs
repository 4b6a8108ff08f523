//! Text styling: run attributes, font properties, and style overlays.
//!
//! Two layers of styling flow through the pipeline:
//!
//! - [`TextStyle`]: the label-wide font configuration (size, weight,
//!   decoration) set through the facade's property surface.
//! - [`Style`]: a per-run overlay produced by inline markup directives,
//!   merged over the base style when a line contains formatted spans.

use crate::color::Rgba;
use bitflags::bitflags;

bitflags! {
    /// Per-run text attributes produced by inline markup directives.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextAttributes: u8 {
        /// Bold weight.
        const BOLD          = 0x01;
        /// Italic slant.
        const ITALIC        = 0x02;
        /// Underlined text.
        const UNDERLINE     = 0x04;
        /// Strikethrough text.
        const STRIKETHROUGH = 0x08;
    }
}

/// Per-run style overlay: attributes plus an optional fill color.
///
/// `None` fill means "inherit the label's fill" rather than a specific color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Style {
    /// Fill color override (None = inherit).
    pub fill: Option<Rgba>,
    /// Text rendering attributes.
    pub attributes: TextAttributes,
}

impl Style {
    /// Empty style with no overrides.
    pub const NONE: Self = Self {
        fill: None,
        attributes: TextAttributes::empty(),
    };

    /// Create a style with only a fill color.
    #[must_use]
    pub const fn fill(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            attributes: TextAttributes::empty(),
        }
    }

    /// Create a bold style.
    #[must_use]
    pub const fn bold() -> Self {
        Self {
            fill: None,
            attributes: TextAttributes::BOLD,
        }
    }

    /// Return a new style with the specified attributes added.
    #[must_use]
    pub const fn with_attributes(self, attrs: TextAttributes) -> Self {
        Self {
            attributes: self.attributes.union(attrs),
            ..self
        }
    }

    /// Return a new style with the specified fill color.
    #[must_use]
    pub const fn with_fill(self, color: Rgba) -> Self {
        Self {
            fill: Some(color),
            ..self
        }
    }

    /// Check if this style has any non-default properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.attributes.is_empty()
    }

    /// Merge two styles, with `other` taking precedence for set values.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            fill: other.fill.or(self.fill),
            attributes: self.attributes | other.attributes,
        }
    }
}

/// Font weight of the whole label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS-compatible keyword for serializers and format signatures.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

/// Text decoration of the whole label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

impl TextDecoration {
    /// CSS-compatible keyword for serializers and format signatures.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Underline => "underline",
            Self::LineThrough => "line-through",
        }
    }
}

/// Label-wide font configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in local units.
    pub font_size: f64,
    /// Font weight.
    pub font_weight: FontWeight,
    /// Text decoration.
    pub text_decoration: TextDecoration,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            font_weight: FontWeight::Normal,
            text_decoration: TextDecoration::None,
        }
    }
}

impl TextStyle {
    /// The base run overlay implied by the label-wide configuration.
    ///
    /// Inline markup merges on top of this.
    #[must_use]
    pub fn base_overlay(&self) -> Style {
        let mut attrs = TextAttributes::empty();
        if self.font_weight == FontWeight::Bold {
            attrs |= TextAttributes::BOLD;
        }
        match self.text_decoration {
            TextDecoration::Underline => attrs |= TextAttributes::UNDERLINE,
            TextDecoration::LineThrough => attrs |= TextAttributes::STRIKETHROUGH,
            TextDecoration::None => {}
        }
        Style {
            fill: None,
            attributes: attrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_merge() {
        let base = Style::bold();
        let overlay = Style::fill(Rgba::RED).with_attributes(TextAttributes::ITALIC);

        let merged = base.merge(overlay);

        assert_eq!(merged.fill, Some(Rgba::RED));
        assert!(merged.attributes.contains(TextAttributes::BOLD));
        assert!(merged.attributes.contains(TextAttributes::ITALIC));
    }

    #[test]
    fn test_merge_fill_precedence() {
        let base = Style::fill(Rgba::BLACK);
        let overlay = Style::fill(Rgba::RED);
        assert_eq!(base.merge(overlay).fill, Some(Rgba::RED));
        assert_eq!(overlay.merge(base).fill, Some(Rgba::BLACK));
    }

    #[test]
    fn test_base_overlay() {
        let style = TextStyle {
            font_weight: FontWeight::Bold,
            text_decoration: TextDecoration::Underline,
            ..TextStyle::default()
        };
        let overlay = style.base_overlay();
        assert!(overlay.attributes.contains(TextAttributes::BOLD));
        assert!(overlay.attributes.contains(TextAttributes::UNDERLINE));
        assert!(overlay.fill.is_none());
    }

    #[test]
    fn test_default_overlay_empty() {
        assert!(TextStyle::default().base_overlay().is_empty());
    }
}
