//! Text facade: the label orchestrating the whole layout pipeline.
//!
//! A [`Label`] owns the property surface, the per-line cache, the active
//! backend, and an optional data-record binding. `update()` is the single
//! entry point: it resolves the template, compares against the last drawn
//! state, and either skips entirely (redraw-skip) or runs the full
//! break/render/align pipeline. With shallow rendering enabled a redraw
//! rewrites existing handles in place instead of resetting the cache,
//! trading bounding-box fidelity for element churn during rapid redraws.

use crate::align::{AlignOutcome, AlignPolicy, TextAlign, TextValign, align};
use crate::backend::{
    BackendKind, BlockBackend, RenderBackend, RenderContext, RenderStats, VectorBackend,
};
use crate::breaker::{BreakPolicy, break_lines};
use crate::cache::LineCache;
use crate::error::Result;
use crate::event::{EVENT_BACKEND_DEGRADED, LogLevel, emit_event, emit_log};
use crate::markup;
use crate::measure::{CharMetrics, TextMeasurer};
use crate::record::{DataRecord, Subscription};
use crate::style::{FontWeight, TextDecoration, TextStyle};
use crate::template;
use std::cell::Cell;
use std::fmt::Write as _;
use std::rc::{Rc, Weak};

/// What the host environment can embed.
#[derive(Clone, Copy, Debug)]
pub struct HostCapabilities {
    /// Whether block/foreign content can be embedded inside the vector
    /// canvas. When false, HTML content degrades to the vector backend.
    pub foreign_content: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            foreign_content: true,
        }
    }
}

/// State of the last successful draw.
#[derive(Clone, Debug, Default)]
pub struct TextState {
    /// Resolved display text of the last draw.
    pub resolved: String,
    /// Fingerprint of formatting-relevant properties at the last draw.
    pub format_signature: String,
    /// Whether the last draw could not fit the available box.
    pub oversized: bool,
}

/// Outcome of an [`Label::update`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Resolved text and format signature were unchanged; nothing ran.
    Skipped,
    /// The full pipeline ran.
    Drawn,
}

struct RecordBinding {
    record: Weak<DataRecord>,
    // Held for its Drop side effect: unsubscribes on rebind or teardown.
    _subscription: Subscription,
}

/// Dynamic chart label: template in, positioned renderable lines out.
pub struct Label {
    text: String,
    html: Option<String>,
    wrap: bool,
    truncate: bool,
    ellipsis: String,
    selectable: bool,
    text_align: TextAlign,
    text_valign: TextValign,
    font: TextStyle,
    hide_oversized: bool,
    max_width: f64,
    max_height: f64,
    shallow_rendering: bool,
    capabilities: HostCapabilities,

    state: Option<TextState>,
    cache: LineCache,
    backend: Box<dyn RenderBackend>,
    measurer: Box<dyn TextMeasurer>,
    binding: Option<RecordBinding>,
    dirty: bool,
    data_dirty: Rc<Cell<bool>>,
}

impl Default for Label {
    fn default() -> Self {
        Self::new(Box::new(CharMetrics::default()))
    }
}

impl Label {
    /// Create a label with the given measurement primitive.
    #[must_use]
    pub fn new(measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            text: String::new(),
            html: None,
            wrap: false,
            truncate: false,
            ellipsis: "...".to_string(),
            selectable: false,
            text_align: TextAlign::Start,
            text_valign: TextValign::Top,
            font: TextStyle::default(),
            hide_oversized: false,
            max_width: 0.0,
            max_height: 0.0,
            shallow_rendering: false,
            capabilities: HostCapabilities::default(),
            state: None,
            cache: LineCache::new(),
            backend: Box::new(VectorBackend::new()),
            measurer,
            binding: None,
            dirty: true,
            data_dirty: Rc::new(Cell::new(false)),
        }
    }

    /// Override what the host environment supports.
    pub fn set_capabilities(&mut self, capabilities: HostCapabilities) {
        self.capabilities = capabilities;
        self.dirty = true;
    }

    /// Set the text template (placeholders and inline markup allowed).
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// Set raw HTML content; requests the block backend.
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = Some(html.into());
        self.dirty = true;
    }

    /// Clear HTML content, reverting to the text template.
    pub fn clear_html(&mut self) {
        self.html = None;
        self.dirty = true;
    }

    /// Enable greedy word wrapping.
    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
        self.dirty = true;
    }

    /// Enable truncation with ellipsis; takes precedence over wrap.
    pub fn set_truncate(&mut self, truncate: bool) {
        self.truncate = truncate;
        self.dirty = true;
    }

    /// Set the ellipsis string (default `"..."`).
    pub fn set_ellipsis(&mut self, ellipsis: impl Into<String>) {
        self.ellipsis = ellipsis.into();
        self.dirty = true;
    }

    /// Mark the label text as selectable for the host's interaction layer.
    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
        self.dirty = true;
    }

    /// Whether the host should allow text selection on the produced lines.
    #[must_use]
    pub fn selectable(&self) -> bool {
        self.selectable
    }

    /// Horizontal alignment (default start).
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
        self.dirty = true;
    }

    /// Vertical alignment (default top).
    pub fn set_text_valign(&mut self, valign: TextValign) {
        self.text_valign = valign;
        self.dirty = true;
    }

    /// Font size in local units.
    pub fn set_font_size(&mut self, size: f64) {
        self.font.font_size = size;
        self.dirty = true;
    }

    /// Font weight (default normal).
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.font.font_weight = weight;
        self.dirty = true;
    }

    /// Text decoration (default none).
    pub fn set_text_decoration(&mut self, decoration: TextDecoration) {
        self.font.text_decoration = decoration;
        self.dirty = true;
    }

    /// Hide all lines when content cannot fit (default false).
    pub fn set_hide_oversized(&mut self, hide: bool) {
        self.hide_oversized = hide;
        self.dirty = true;
    }

    /// Available box the label must fit; `<= 0` per axis is unconstrained.
    pub fn set_available_box(&mut self, width: f64, height: f64) {
        self.max_width = width;
        self.max_height = height;
        self.dirty = true;
    }

    /// Reuse existing handles across redraws instead of resetting the cache.
    pub fn set_shallow_rendering(&mut self, shallow: bool) {
        self.shallow_rendering = shallow;
        self.dirty = true;
    }

    /// Bind an external data record for placeholder substitution.
    ///
    /// Any previous binding is unsubscribed first; the label never owns the
    /// record's lifetime. Record changes mark the label for redraw.
    pub fn bind_record(&mut self, record: &Rc<DataRecord>) {
        self.binding = None; // drop old subscription before resubscribing
        let dirty = Rc::clone(&self.data_dirty);
        let subscription = record.subscribe(move || dirty.set(true));
        self.binding = Some(RecordBinding {
            record: Rc::downgrade(record),
            _subscription: subscription,
        });
        self.data_dirty.set(true);
    }

    /// Drop the data-record binding, unsubscribing from change notifications.
    pub fn unbind_record(&mut self) {
        self.binding = None;
        self.data_dirty.set(true);
    }

    /// State of the last successful draw, if any.
    #[must_use]
    pub fn state(&self) -> Option<&TextState> {
        self.state.as_ref()
    }

    /// Whether the last draw could not fit the available box.
    #[must_use]
    pub fn is_oversized(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.oversized)
    }

    /// Per-line geometry from the last draw.
    #[must_use]
    pub fn lines(&self) -> &LineCache {
        &self.cache
    }

    /// Cumulative backend call counters.
    #[must_use]
    pub fn render_stats(&self) -> RenderStats {
        self.backend.stats()
    }

    /// Serialize all produced lines to host markup.
    #[must_use]
    pub fn to_markup(&self) -> String {
        self.cache.iter().map(|l| l.handle.to_markup()).collect()
    }

    /// Recompute the resolved text and redraw if anything changed.
    ///
    /// The redraw is skipped iff both the resolved text and the format
    /// signature are unchanged since the last successful draw; a skipped
    /// update performs no breaking, no backend calls, and no cache mutation.
    ///
    /// # Errors
    ///
    /// Propagates pipeline sequencing faults; the cache stays consistent
    /// for the next pass after a reset.
    pub fn update(&mut self) -> Result<UpdateOutcome> {
        let data_dirty = self.data_dirty.replace(false);
        // A dropped record fires no change notification; placeholders now
        // resolve empty, so a dead binding forces one re-resolve and is
        // discarded.
        let binding_died = self
            .binding
            .as_ref()
            .is_some_and(|b| b.record.upgrade().is_none());
        if binding_died {
            self.binding = None;
        }
        if !self.dirty && !data_dirty && !binding_died && self.state.is_some() {
            return Ok(UpdateOutcome::Skipped);
        }

        let resolved = self.resolve_content();
        let signature = self.format_signature();

        if let Some(state) = &self.state {
            if state.resolved == resolved && state.format_signature == signature {
                self.dirty = false;
                return Ok(UpdateOutcome::Skipped);
            }
        }

        self.draw(resolved, signature)?;
        self.dirty = false;
        Ok(UpdateOutcome::Drawn)
    }

    /// Tear the label down: release all handles and the record binding.
    pub fn dispose(&mut self) {
        self.cache.reset();
        self.binding = None;
        self.state = None;
    }

    fn resolve_content(&self) -> String {
        let template = self.html.as_deref().unwrap_or(&self.text);
        let record = self
            .binding
            .as_ref()
            .and_then(|b| b.record.upgrade());
        match record {
            Some(record) => template::resolve(template, Some(&*record)),
            None => template::resolve(template, None),
        }
    }

    fn format_signature(&self) -> String {
        let mut sig = String::new();
        let _ = write!(
            sig,
            "{}|{}|{}|{:?}|{:?}|{}|{}|{}|{}|{}|{}|{}",
            self.font.font_size,
            self.font.font_weight.as_str(),
            self.font.text_decoration.as_str(),
            self.text_align,
            self.text_valign,
            self.wrap,
            self.truncate,
            self.ellipsis,
            self.hide_oversized,
            self.max_width,
            self.max_height,
            self.html.is_some(),
        );
        let _ = write!(sig, "|{}", self.capabilities.foreign_content);
        sig
    }

    /// Pick the backend for this pass; degrade HTML content to vector when
    /// the host cannot embed foreign content.
    fn select_backend(&mut self) -> (BackendKind, bool) {
        let wants_block = self.html.is_some();
        let degraded = wants_block && !self.capabilities.foreign_content;
        let desired = if wants_block && !degraded {
            BackendKind::Block
        } else {
            BackendKind::Vector
        };
        if self.backend.kind() != desired {
            // Old handles belong to the old substrate.
            self.cache.reset();
            self.backend = match desired {
                BackendKind::Vector => Box::new(VectorBackend::new()),
                BackendKind::Block => Box::new(BlockBackend::new()),
            };
        }
        (desired, degraded)
    }

    fn draw(&mut self, resolved: String, signature: String) -> Result<()> {
        let (_, degraded) = self.select_backend();
        let content = if degraded {
            emit_event(EVENT_BACKEND_DEGRADED, "{\"fallback\":\"vector\"}");
            emit_log(
                LogLevel::Warn,
                "host cannot embed block content; falling back to vector backend",
            );
            markup::strip(&strip_angle_tags(&resolved))
        } else {
            resolved.clone()
        };

        let policy = BreakPolicy {
            wrap: self.wrap,
            truncate: self.truncate,
            ellipsis: self.ellipsis.clone(),
            max_width: self.max_width,
            max_height: self.max_height,
        };
        let fragments = break_lines(&content, &policy, &*self.measurer, &self.font);
        let any_unmeasured = fragments.iter().any(|f| !f.measured);

        let line_height = self.measurer.line_height(&self.font);
        let ctx = RenderContext {
            font: self.font,
            line_height,
        };

        if self.shallow_rendering && !self.cache.is_empty() {
            // Walk existing entries by index, rewriting text in place; only
            // the tail is appended or removed when the line count changes.
            for (i, fragment) in fragments.iter().enumerate() {
                if i < self.cache.len() {
                    let info = self
                        .cache
                        .get_mut(i)
                        .expect("index checked against length");
                    self.backend.rewrite_line(info, fragment, &ctx)?;
                } else {
                    let y = i as f64 * line_height;
                    let info = self.backend.render_line(fragment, y, &ctx)?;
                    self.cache.put(i, info, false)?;
                }
            }
            if fragments.len() < self.cache.len() {
                self.cache.truncate_from(fragments.len());
            }
        } else {
            self.cache.reset();
            for (i, fragment) in fragments.iter().enumerate() {
                let y = i as f64 * line_height;
                let info = self.backend.render_line(fragment, y, &ctx)?;
                self.cache.put(i, info, false)?;
            }
        }

        let outcome: AlignOutcome = align(
            &mut self.cache,
            &AlignPolicy {
                text_align: self.text_align,
                text_valign: self.text_valign,
                available_width: self.max_width,
                available_height: self.max_height,
                hide_oversized: self.hide_oversized,
            },
        )?;

        self.state = Some(TextState {
            resolved,
            format_signature: signature,
            oversized: outcome.oversized || any_unmeasured,
        });
        Ok(())
    }
}

/// Remove `<...>` tag sequences from degraded HTML content.
fn strip_angle_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
