//! Renderer backends: interchangeable line producers.
//!
//! Two strategies share the [`RenderBackend`] contract: the vector backend
//! emits one grouped vector-markup element per line, the block backend one
//! block element with nested inline spans. Backend selection lives in the
//! facade, never in the line types themselves.

pub mod block;
pub mod element;
pub mod vector;

pub use block::BlockBackend;
pub use element::{ElementKind, RenderHandle, escape_markup};
pub use vector::VectorBackend;

use crate::breaker::LineFragment;
use crate::cache::LineInfo;
use crate::error::Result;
use crate::style::TextStyle;

/// Which rendering substrate produces lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Vector,
    Block,
}

/// Per-pass rendering context shared by all lines.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext {
    /// Label-wide font configuration.
    pub font: TextStyle,
    /// Height of one line in local units.
    pub line_height: f64,
}

/// Cumulative backend call counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Lines rendered through fresh handles.
    pub lines_rendered: usize,
    /// Lines rewritten in place under shallow reuse.
    pub lines_rewritten: usize,
}

impl RenderStats {
    /// Total backend calls of either kind.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.lines_rendered + self.lines_rewritten
    }
}

/// A line producer turning fragments into positioned renderable elements.
pub trait RenderBackend {
    /// Backend flavor.
    fn kind(&self) -> BackendKind;

    /// Render one line at vertical offset `y`, creating exactly one new
    /// renderable handle.
    ///
    /// The returned [`LineInfo`] carries the immediate local bounding box;
    /// global aggregation happens in the alignment pass.
    ///
    /// # Errors
    ///
    /// Propagates handle faults (disposed elements).
    fn render_line(&mut self, fragment: &LineFragment, y: f64, ctx: &RenderContext)
    -> Result<LineInfo>;

    /// Mutate an existing line's text content in place (same handle, new
    /// text). The entry's bounding box is left as-is and may go stale until
    /// the next full pass.
    ///
    /// # Errors
    ///
    /// Propagates handle faults (disposed elements).
    fn rewrite_line(
        &mut self,
        info: &mut LineInfo,
        fragment: &LineFragment,
        ctx: &RenderContext,
    ) -> Result<()>;

    /// Cumulative call counters.
    fn stats(&self) -> RenderStats;
}
