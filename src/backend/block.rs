//! Block-markup line producer.
//!
//! Emits one block element per line with nested inline spans for formatted
//! runs; used when rich/HTML-capable rendering is requested and the host
//! supports foreign-content embedding.

use crate::backend::element::{ElementKind, RenderHandle};
use crate::backend::{BackendKind, RenderBackend, RenderContext, RenderStats};
use crate::breaker::LineFragment;
use crate::cache::LineInfo;
use crate::error::Result;
use crate::geometry::Rect;

/// HTML-style line producer.
#[derive(Debug, Default)]
pub struct BlockBackend {
    stats: RenderStats,
}

impl BlockBackend {
    /// Create a new backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for BlockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Block
    }

    fn render_line(
        &mut self,
        fragment: &LineFragment,
        y: f64,
        ctx: &RenderContext,
    ) -> Result<LineInfo> {
        let block = RenderHandle::container(ElementKind::Block, ctx.font);
        for run in &fragment.runs {
            block.add_child(RenderHandle::leaf(
                ElementKind::Inline,
                run.text.clone(),
                run.style,
                ctx.font,
            ))?;
        }
        block.set_position(0.0, y)?;
        self.stats.lines_rendered += 1;
        Ok(LineInfo::new(
            Rect::new(0.0, y, fragment.width, ctx.line_height),
            block,
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
            info.handle.set_text(&fragment.text())?;
        } else {
            let children: Vec<RenderHandle> = fragment
                .runs
                .iter()
                .map(|run| {
                    RenderHandle::leaf(ElementKind::Inline, run.text.clone(), run.style, ctx.font)
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
