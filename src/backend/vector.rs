//! Vector-markup line producer.
//!
//! Emits one grouped vector element per line; multiple formatted runs
//! within a line become sibling text children inside that group.

use crate::backend::element::{ElementKind, RenderHandle};
use crate::backend::{BackendKind, RenderBackend, RenderContext, RenderStats};
use crate::breaker::LineFragment;
use crate::cache::LineInfo;
use crate::error::Result;
use crate::geometry::Rect;

/// SVG-style line producer.
#[derive(Debug, Default)]
pub struct VectorBackend {
    stats: RenderStats,
}

impl VectorBackend {
    /// Create a new backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for VectorBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Vector
    }

    fn render_line(
        &mut self,
        fragment: &LineFragment,
        y: f64,
        ctx: &RenderContext,
    ) -> Result<LineInfo> {
        let group = RenderHandle::container(ElementKind::Group, ctx.font);
        for run in &fragment.runs {
            group.add_child(RenderHandle::leaf(
                ElementKind::Text,
                run.text.clone(),
                run.style,
                ctx.font,
            ))?;
        }
        group.set_position(0.0, y)?;
        self.stats.lines_rendered += 1;
        Ok(LineInfo::new(
            Rect::new(0.0, y, fragment.width, ctx.line_height),
            group,
            fragment.composite(),
        ))
    }

    fn rewrite_line(
        &mut self,
        info: &mut LineInfo,
        fragment: &LineFragment,
        ctx: &RenderContext,
    ) -> Result<()> {
        if !fragment.composite() && info.handle.child_count() == 1 && !info.composite {
            // Flat line onto flat line: swap the text in place.
            info.handle.set_text(&fragment.text())?;
        } else {
            let children: Vec<RenderHandle> = fragment
                .runs
                .iter()
                .map(|run| {
                    RenderHandle::leaf(ElementKind::Text, run.text.clone(), run.style, ctx.font)
                })
                .collect();
            info.handle.replace_children(children)?;
        }
        info.composite = fragment.composite();
        self.stats.lines_rewritten += 1;
        Ok(())
    }

    fn stats(&self) -> RenderStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaker::{BreakPolicy, break_lines};
    use crate::measure::CharMetrics;
    use crate::style::TextStyle;

    fn ctx() -> RenderContext {
        RenderContext {
            font: TextStyle::default(),
            line_height: 14.4,
        }
    }

    fn fragment(text: &str) -> LineFragment {
        break_lines(
            text,
            &BreakPolicy::default(),
            &CharMetrics::default(),
            &TextStyle::default(),
        )
        .remove(0)
    }

    #[test]
    fn test_render_flat_line() {
        let mut backend = VectorBackend::new();
        let info = backend.render_line(&fragment("hello"), 10.0, &ctx()).unwrap();
        assert!(!info.composite);
        assert_eq!(info.handle.child_count(), 1);
        assert_eq!(info.handle.position(), (0.0, 10.0));
        assert_eq!(backend.stats().lines_rendered, 1);
    }

    #[test]
    fn test_render_composite_line_sibling_runs() {
        let mut backend = VectorBackend::new();
        let info = backend
            .render_line(&fragment("a [bold]b[/]"), 0.0, &ctx())
            .unwrap();
        assert!(info.composite);
        assert_eq!(info.handle.child_count(), 2);
        let markup = info.handle.to_markup();
        assert!(markup.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn test_rewrite_keeps_handle() {
        let mut backend = VectorBackend::new();
        let mut info = backend.render_line(&fragment("one"), 0.0, &ctx()).unwrap();
        let handle = info.handle.clone();
        let old_bounds = info.bounds;

        backend
            .rewrite_line(&mut info, &fragment("two"), &ctx())
            .unwrap();

        assert_eq!(info.handle.text(), "two");
        assert!(!handle.is_disposed());
        // Bounds are left stale until the next full pass.
        assert_eq!(info.bounds, old_bounds);
        assert_eq!(backend.stats().lines_rewritten, 1);
    }

    #[test]
    fn test_rewrite_flat_to_composite() {
        let mut backend = VectorBackend::new();
        let mut info = backend.render_line(&fragment("one"), 0.0, &ctx()).unwrap();
        backend
            .rewrite_line(&mut info, &fragment("[bold]a[/]b"), &ctx())
            .unwrap();
        assert!(info.composite);
        assert_eq!(info.handle.child_count(), 2);
        assert_eq!(info.handle.text(), "ab");
    }
}
