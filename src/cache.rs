//! Per-line geometry cache.
//!
//! The cache is a dense arena of [`LineInfo`] addressed by line index, with
//! explicit `put`/`reset` operations so handle-release discipline stays
//! auditable. Index i always corresponds to the i-th line from the top
//! after the current layout pass.

use crate::backend::element::RenderHandle;
use crate::error::{Error, Result};
use crate::geometry::Rect;

/// One measured and rendered line.
#[derive(Clone, Debug)]
pub struct LineInfo {
    /// Bounding box in local coordinates.
    pub bounds: Rect,
    /// Backend-produced element for this line; owned exclusively by this
    /// entry and released when the line is replaced or the cache resets.
    pub handle: RenderHandle,
    /// True when the line contains more than one formatted run.
    pub composite: bool,
}

impl LineInfo {
    /// Create a new line entry.
    #[must_use]
    pub fn new(bounds: Rect, handle: RenderHandle, composite: bool) -> Self {
        Self {
            bounds,
            handle,
            composite,
        }
    }
}

/// Ordered store of per-line geometry, insertion order == visual order.
#[derive(Debug, Default)]
pub struct LineCache {
    lines: Vec<LineInfo>,
}

impl LineCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the line at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LineInfo> {
        self.lines.get(index)
    }

    /// Get the line at `index` mutably.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut LineInfo> {
        self.lines.get_mut(index)
    }

    /// Iterate lines in visual order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineInfo> {
        self.lines.iter()
    }

    /// Iterate lines mutably in visual order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LineInfo> {
        self.lines.iter_mut()
    }

    /// Store a line at `index`.
    ///
    /// An index at or past the current length appends, keeping the sequence
    /// dense. An occupied index with `replace` set releases the old handle
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CacheOverwrite`] for an occupied index without
    /// `replace`: a double-write is a pipeline sequencing fault. The cache
    /// itself is left untouched.
    pub fn put(&mut self, index: usize, info: LineInfo, replace: bool) -> Result<()> {
        if index >= self.lines.len() {
            self.lines.push(info);
            return Ok(());
        }
        if !replace {
            return Err(Error::CacheOverwrite { index });
        }
        let old = std::mem::replace(&mut self.lines[index], info);
        old.handle.dispose();
        Ok(())
    }

    /// Drop all lines from `index` to the end, releasing their handles.
    pub fn truncate_from(&mut self, index: usize) {
        for info in self.lines.drain(index..) {
            info.handle.dispose();
        }
    }

    /// Release every held handle, then empty the sequence.
    ///
    /// Must run before a full non-reused redraw so no stale handle leaks.
    pub fn reset(&mut self) {
        self.truncate_from(0);
    }
}

impl Drop for LineCache {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::element::ElementKind;
    use crate::style::TextStyle;

    fn line(text: &str) -> LineInfo {
        let handle = RenderHandle::container(ElementKind::Group, TextStyle::default());
        let run = RenderHandle::leaf(
            ElementKind::Text,
            text,
            crate::style::Style::NONE,
            TextStyle::default(),
        );
        handle.add_child(run).unwrap();
        LineInfo::new(Rect::new(0.0, 0.0, 10.0, 5.0), handle, false)
    }

    #[test]
    fn test_put_appends_in_order() {
        let mut cache = LineCache::new();
        cache.put(0, line("a"), false).unwrap();
        cache.put(1, line("b"), false).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(0).unwrap().handle.text(), "a");
        assert_eq!(cache.get(1).unwrap().handle.text(), "b");
    }

    #[test]
    fn test_put_past_length_appends() {
        let mut cache = LineCache::new();
        cache.put(7, line("a"), false).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_occupied_without_replace_is_fault() {
        let mut cache = LineCache::new();
        cache.put(0, line("a"), false).unwrap();
        let err = cache.put(0, line("b"), false).unwrap_err();
        assert!(matches!(err, Error::CacheOverwrite { index: 0 }));
        // Cache untouched by the fault.
        assert_eq!(cache.get(0).unwrap().handle.text(), "a");
    }

    #[test]
    fn test_put_replace_releases_old_handle() {
        let mut cache = LineCache::new();
        cache.put(0, line("a"), false).unwrap();
        let old = cache.get(0).unwrap().handle.clone();
        cache.put(0, line("b"), true).unwrap();
        assert!(old.is_disposed());
        assert_eq!(cache.get(0).unwrap().handle.text(), "b");
    }

    #[test]
    fn test_reset_releases_all() {
        let mut cache = LineCache::new();
        cache.put(0, line("a"), false).unwrap();
        cache.put(1, line("b"), false).unwrap();
        let handles: Vec<RenderHandle> = cache.iter().map(|l| l.handle.clone()).collect();
        cache.reset();
        assert!(cache.is_empty());
        assert!(handles.iter().all(RenderHandle::is_disposed));
    }

    #[test]
    fn test_truncate_from_releases_tail() {
        let mut cache = LineCache::new();
        cache.put(0, line("a"), false).unwrap();
        cache.put(1, line("b"), false).unwrap();
        cache.put(2, line("c"), false).unwrap();
        let tail = cache.get(2).unwrap().handle.clone();
        cache.truncate_from(2);
        assert_eq!(cache.len(), 2);
        assert!(tail.is_disposed());
        assert!(!cache.get(1).unwrap().handle.is_disposed());
    }
}
