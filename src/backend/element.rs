//! Renderable element tree produced by the backends.
//!
//! A [`RenderHandle`] is the opaque reference a [`LineInfo`](crate::cache::LineInfo)
//! owns for one rendered line. Handles are cheap clones over shared interior
//! state (single-threaded, `Rc<RefCell>`); the host compositor positions,
//! hides, and disposes them, and can serialize the element subtree to
//! vector (SVG-style) or block (HTML-style) markup.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::style::{Style, TextAttributes, TextStyle};
use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

/// Element flavor in the produced scene subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Vector line container (`<g>`).
    Group,
    /// Vector text run, a sibling child inside a group.
    Text,
    /// Block line container (`<div>`).
    Block,
    /// Inline formatted span inside a block.
    Inline,
}

#[derive(Debug)]
struct ElementInner {
    kind: ElementKind,
    x: f64,
    y: f64,
    visible: bool,
    disposed: bool,
    text: String,
    style: Style,
    font: TextStyle,
    children: Vec<RenderHandle>,
}

/// Opaque reference to one backend-produced renderable element.
#[derive(Clone, Debug)]
pub struct RenderHandle {
    inner: Rc<RefCell<ElementInner>>,
}

impl RenderHandle {
    /// Create a container element (group or block).
    #[must_use]
    pub fn container(kind: ElementKind, font: TextStyle) -> Self {
        Self::new_inner(kind, String::new(), Style::NONE, font)
    }

    /// Create a leaf run element (text or inline).
    #[must_use]
    pub fn leaf(kind: ElementKind, text: impl Into<String>, style: Style, font: TextStyle) -> Self {
        Self::new_inner(kind, text.into(), style, font)
    }

    fn new_inner(kind: ElementKind, text: String, style: Style, font: TextStyle) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementInner {
                kind,
                x: 0.0,
                y: 0.0,
                visible: true,
                disposed: false,
                text,
                style,
                font,
                children: Vec::new(),
            })),
        }
    }

    /// Element kind.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.inner.borrow().kind
    }

    /// Position the element in local coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisposedHandle`] on a disposed element.
    pub fn set_position(&self, x: f64, y: f64) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed {
            return Err(Error::DisposedHandle);
        }
        inner.x = x;
        inner.y = y;
        Ok(())
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        let inner = self.inner.borrow();
        (inner.x, inner.y)
    }

    /// Replace the element's text content in place.
    ///
    /// On a container with exactly one child the text lands on that child,
    /// which is the shallow-reuse fast path for flat lines. A container with
    /// several runs collapses to a single unstyled run holding the new text,
    /// releasing the old runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisposedHandle`] on a disposed element.
    pub fn set_text(&self, text: &str) -> Result<()> {
        let (kind, font, child_count) = {
            let inner = self.inner.borrow();
            if inner.disposed {
                return Err(Error::DisposedHandle);
            }
            if inner.children.len() == 1 {
                let child = inner.children[0].clone();
                drop(inner);
                return child.set_text(text);
            }
            (inner.kind, inner.font, inner.children.len())
        };
        if child_count > 1 {
            let leaf_kind = match kind {
                ElementKind::Block | ElementKind::Inline => ElementKind::Inline,
                ElementKind::Group | ElementKind::Text => ElementKind::Text,
            };
            return self.replace_children(vec![Self::leaf(leaf_kind, text, Style::NONE, font)]);
        }
        self.inner.borrow_mut().text = text.to_string();
        Ok(())
    }

    /// Visible text content (concatenated over children for containers).
    #[must_use]
    pub fn text(&self) -> String {
        let inner = self.inner.borrow();
        if inner.children.is_empty() {
            inner.text.clone()
        } else {
            inner.children.iter().map(|c| c.text()).collect()
        }
    }

    /// Show or hide the element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisposedHandle`] on a disposed element.
    pub fn set_visible(&self, visible: bool) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed {
            return Err(Error::DisposedHandle);
        }
        inner.visible = visible;
        Ok(())
    }

    /// Current visibility.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.inner.borrow().visible
    }

    /// Append a child run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisposedHandle`] on a disposed element.
    pub fn add_child(&self, child: RenderHandle) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed {
            return Err(Error::DisposedHandle);
        }
        inner.children.push(child);
        Ok(())
    }

    /// Replace all child runs, releasing the old ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisposedHandle`] on a disposed element.
    pub fn replace_children(&self, children: Vec<RenderHandle>) -> Result<()> {
        let old = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return Err(Error::DisposedHandle);
            }
            std::mem::replace(&mut inner.children, children)
        };
        for child in old {
            child.dispose();
        }
        Ok(())
    }

    /// Number of child runs.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Release the element and its subtree. Idempotent.
    pub fn dispose(&self) {
        let children = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            std::mem::take(&mut inner.children)
        };
        for child in children {
            child.dispose();
        }
    }

    /// Whether the element has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    /// Serialize the element subtree to host markup.
    ///
    /// Groups and their text children serialize as SVG-style markup, blocks
    /// and inline spans as HTML-style markup. Disposed elements serialize
    /// to the empty string.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let inner = self.inner.borrow();
        if inner.disposed {
            return String::new();
        }
        let mut out = String::new();
        match inner.kind {
            ElementKind::Group => {
                let _ = write!(
                    out,
                    r#"<g transform="translate({:.2} {:.2})"{}>"#,
                    inner.x,
                    inner.y,
                    if inner.visible {
                        ""
                    } else {
                        r#" visibility="hidden""#
                    }
                );
                for child in &inner.children {
                    out.push_str(&child.to_markup());
                }
                out.push_str("</g>");
            }
            ElementKind::Text => {
                let _ = write!(
                    out,
                    r#"<text font-size="{}"{}>{}</text>"#,
                    inner.font.font_size,
                    svg_style_attrs(inner.style),
                    escape_markup(&inner.text)
                );
            }
            ElementKind::Block => {
                let _ = write!(
                    out,
                    r#"<div style="position:absolute;left:{:.2}px;top:{:.2}px;font-size:{}px{}">"#,
                    inner.x,
                    inner.y,
                    inner.font.font_size,
                    if inner.visible { "" } else { ";display:none" }
                );
                for child in &inner.children {
                    out.push_str(&child.to_markup());
                }
                out.push_str("</div>");
            }
            ElementKind::Inline => {
                let css = css_style_attrs(inner.style);
                if css.is_empty() {
                    let _ = write!(out, "<span>{}</span>", escape_markup(&inner.text));
                } else {
                    let _ = write!(
                        out,
                        r#"<span style="{}">{}</span>"#,
                        css,
                        escape_markup(&inner.text)
                    );
                }
            }
        }
        out
    }
}

fn svg_style_attrs(style: Style) -> String {
    let mut out = String::new();
    if style.attributes.contains(TextAttributes::BOLD) {
        out.push_str(r#" font-weight="bold""#);
    }
    if style.attributes.contains(TextAttributes::ITALIC) {
        out.push_str(r#" font-style="italic""#);
    }
    if let Some(d) = decoration(style.attributes) {
        let _ = write!(out, r#" text-decoration="{d}""#);
    }
    if let Some(fill) = style.fill {
        let _ = write!(out, r#" fill="{fill}""#);
    }
    out
}

fn css_style_attrs(style: Style) -> String {
    let mut parts: Vec<String> = Vec::new();
    if style.attributes.contains(TextAttributes::BOLD) {
        parts.push("font-weight:bold".to_string());
    }
    if style.attributes.contains(TextAttributes::ITALIC) {
        parts.push("font-style:italic".to_string());
    }
    if let Some(d) = decoration(style.attributes) {
        parts.push(format!("text-decoration:{d}"));
    }
    if let Some(fill) = style.fill {
        parts.push(format!("color:{fill}"));
    }
    parts.join(";")
}

fn decoration(attrs: TextAttributes) -> Option<&'static str> {
    if attrs.contains(TextAttributes::UNDERLINE) {
        Some("underline")
    } else if attrs.contains(TextAttributes::STRIKETHROUGH) {
        Some("line-through")
    } else {
        None
    }
}

/// Escape text content for XML/HTML embedding.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
