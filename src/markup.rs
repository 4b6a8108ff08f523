//! Inline formatting markup: bracketed style directives.
//!
//! Resolved text may carry bracket tags that style the enclosed span:
//!
//! - `[bold]`, `[italic]`, `[underline]`, `[strike]` — attribute directives
//! - `[#rrggbb]` / `[#rgb]` — fill color
//! - space-separated combinations: `[bold #ff0000]`
//! - `[/]` — pop back to the enclosing style
//! - `[[` — literal `[`
//!
//! Unknown directives are dropped silently; an unterminated `[` is treated
//! as literal text. Labels must render whatever they are given.

use crate::color::Rgba;
use crate::style::{Style, TextAttributes};

/// A span of text with one resolved style.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: Style,
}

impl StyledRun {
    /// Create a new run.
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

}

/// Parse markup into styled runs over a base style.
///
/// Adjacent text under the same style collapses into one run; empty spans
/// produce no run. Tag characters never appear in run text.
#[must_use]
pub fn parse_runs(text: &str, base: Style) -> Vec<StyledRun> {
    let mut runs: Vec<StyledRun> = Vec::new();
    let mut stack: Vec<Style> = Vec::new();
    let mut current_text = String::new();
    let mut rest = text;

    let flush = |runs: &mut Vec<StyledRun>, buf: &mut String, style: Style| {
        if buf.is_empty() {
            return;
        }
        if let Some(last) = runs.last_mut() {
            if last.style == style {
                last.text.push_str(buf);
                buf.clear();
                return;
            }
        }
        runs.push(StyledRun::new(std::mem::take(buf), style));
    };

    while let Some(open) = rest.find('[') {
        let style = stack.last().copied().unwrap_or(base);
        current_text.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        if let Some(after_escape) = after.strip_prefix('[') {
            current_text.push('[');
            rest = after_escape;
            continue;
        }

        let Some(close) = after.find(']') else {
            // Unterminated tag: literal text.
            current_text.push_str(&rest[open..]);
            rest = "";
            break;
        };

        flush(&mut runs, &mut current_text, style);
        let directive = &after[..close];
        if directive == "/" {
            stack.pop();
        } else {
            stack.push(style.merge(parse_directives(directive)));
        }
        rest = &after[close + 1..];
    }

    current_text.push_str(rest);
    let style = stack.last().copied().unwrap_or(base);
    flush(&mut runs, &mut current_text, style);
    runs
}

/// Strip all markup, returning the visible text.
#[must_use]
pub fn strip(text: &str) -> String {
    parse_runs(text, Style::NONE)
        .into_iter()
        .map(|run| run.text)
        .collect()
}

fn parse_directives(directive: &str) -> Style {
    let mut style = Style::NONE;
    for word in directive.split_whitespace() {
        match word {
            "bold" => style.attributes |= TextAttributes::BOLD,
            "italic" => style.attributes |= TextAttributes::ITALIC,
            "underline" => style.attributes |= TextAttributes::UNDERLINE,
            "strike" => style.attributes |= TextAttributes::STRIKETHROUGH,
            other if Rgba::is_hex_directive(other) => {
                if let Ok(color) = Rgba::from_hex(other) {
                    style.fill = Some(color);
                }
            }
            // Unknown directives are dropped.
            _ => {}
        }
    }
    style
}
