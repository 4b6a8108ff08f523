//! Alignment and overflow: positions produced lines inside the available box.
//!
//! Runs after all lines are produced. Horizontal offsets are per line (lines
//! have different widths); the vertical offset moves the whole block. The
//! oversize decision compares the aggregate box against the available box;
//! hidden-on-oversize lines keep their handles so a later fit recovers
//! without re-rendering.

use crate::cache::LineCache;
use crate::error::Result;
use crate::geometry::Rect;

/// Horizontal per-line alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    Middle,
    End,
}

/// Vertical block alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextValign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Alignment policy for one pass.
#[derive(Clone, Copy, Debug)]
pub struct AlignPolicy {
    pub text_align: TextAlign,
    pub text_valign: TextValign,
    /// Available box width; `<= 0` means unconstrained.
    pub available_width: f64,
    /// Available box height; `<= 0` means unconstrained.
    pub available_height: f64,
    /// Hide all lines when the aggregate box cannot fit.
    pub hide_oversized: bool,
}

/// Result of an alignment pass.
#[derive(Clone, Copy, Debug)]
pub struct AlignOutcome {
    /// Content that still cannot fit even after line-breaking.
    pub oversized: bool,
    /// Aggregate bounding box of all lines after alignment.
    pub bounds: Rect,
}

/// Position every cached line and decide the oversize/hide state.
///
/// # Errors
///
/// Propagates handle faults (disposed elements), which indicate a pipeline
/// sequencing bug.
pub fn align(cache: &mut LineCache, policy: &AlignPolicy) -> Result<AlignOutcome> {
    let max_width = cache
        .iter()
        .map(|l| l.bounds.width)
        .fold(0.0_f64, f64::max);
    let total_height: f64 = cache.iter().map(|l| l.bounds.height).sum();

    let width_constrained = policy.available_width > 0.0;
    let height_constrained = policy.available_height > 0.0;

    let block_offset = if height_constrained {
        match policy.text_valign {
            TextValign::Top => 0.0,
            TextValign::Middle => (policy.available_height - total_height) / 2.0,
            TextValign::Bottom => policy.available_height - total_height,
        }
    } else {
        0.0
    };

    let mut y = block_offset;
    for line in cache.iter_mut() {
        let x = if width_constrained {
            match policy.text_align {
                TextAlign::Start => 0.0,
                TextAlign::Middle => (policy.available_width - line.bounds.width) / 2.0,
                TextAlign::End => policy.available_width - line.bounds.width,
            }
        } else {
            0.0
        };
        line.bounds.x = x;
        line.bounds.y = y;
        line.handle.set_position(x, y)?;
        y += line.bounds.height;
    }

    let oversized = (width_constrained && max_width > policy.available_width)
        || (height_constrained && total_height > policy.available_height);

    let visible = !(policy.hide_oversized && oversized);
    for line in cache.iter_mut() {
        line.handle.set_visible(visible)?;
    }

    Ok(AlignOutcome {
        oversized,
        bounds: Rect::new(0.0, block_offset, max_width, total_height),
    })
}
