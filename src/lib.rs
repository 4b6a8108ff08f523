//! `labelkit` - dynamic text layout and rendering engine for chart labels.
//!
//! Takes a template string (optionally containing data-bound placeholders
//! and inline formatting tags), resolves it against a data record, breaks
//! it into lines that fit a bounding box, and emits positioned renderable
//! line elements through one of two interchangeable backends (vector-markup
//! or block-markup lines). Per-line geometry is cached so repeated redraws
//! avoid re-measuring unchanged content.
//!
//! ```
//! use labelkit::{DataRecord, Label, UpdateOutcome};
//! use serde_json::json;
//!
//! let mut label = Label::default();
//! label.set_text("Value: [bold]${v}[/]");
//! label.set_available_box(200.0, 50.0);
//!
//! let record = DataRecord::new(json!({"v": 42}));
//! label.bind_record(&record);
//!
//! assert_eq!(label.update().unwrap(), UpdateOutcome::Drawn);
//! assert_eq!(label.state().unwrap().resolved, "Value: [bold]42[/]");
//! // Unchanged content skips the whole pipeline.
//! assert_eq!(label.update().unwrap(), UpdateOutcome::Skipped);
//! ```

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Intentional line-count casts
#![allow(clippy::cast_precision_loss)] // Intentional for coordinate math
#![allow(clippy::module_name_repetitions)] // Allow LineCache::LineInfo etc
#![allow(clippy::struct_excessive_bools)] // Property surface needs flags
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::float_cmp)] // Exact comparisons of unchanged coordinates
#![allow(clippy::must_use_candidate)] // Not every getter needs must_use
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod align;
pub mod backend;
pub mod breaker;
pub mod cache;
pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod label;
pub mod markup;
pub mod measure;
pub mod record;
pub mod style;
pub mod template;
pub mod unicode;

// Re-export core types at crate root
pub use align::{AlignOutcome, AlignPolicy, TextAlign, TextValign};
pub use backend::{
    BackendKind, BlockBackend, RenderBackend, RenderContext, RenderHandle, RenderStats,
    VectorBackend,
};
pub use breaker::{BreakPolicy, LineFragment, break_lines};
pub use cache::{LineCache, LineInfo};
pub use color::Rgba;
pub use error::{Error, Result};
pub use event::{LogLevel, emit_event, emit_log, set_event_callback, set_log_callback};
pub use label::{HostCapabilities, Label, TextState, UpdateOutcome};
pub use markup::StyledRun;
pub use measure::{CharMetrics, TextMeasurer};
pub use record::{DataRecord, RecordLookup, Subscription};
pub use style::{FontWeight, Style, TextAttributes, TextDecoration, TextStyle};
pub use template::resolve;
