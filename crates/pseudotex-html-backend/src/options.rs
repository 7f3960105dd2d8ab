//! Renderer options and the caption counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;

lazy_static! {
    static ref GLOBAL_CAPTION_COUNTER: CaptionCounter = CaptionCounter::new(0);
}

/// Shared handle on the running caption number.
///
/// Clones share the same count. Each `algorithm` environment that has a
/// caption advances it by one when the environment is rendered.
#[derive(Debug, Clone, Default)]
pub struct CaptionCounter(Arc<AtomicUsize>);

impl CaptionCounter {
    pub fn new(start: usize) -> Self {
        Self(Arc::new(AtomicUsize::new(start)))
    }

    /// The process-wide counter, for hosts that want numbering to continue
    /// across independent render calls.
    pub fn global() -> Self {
        GLOBAL_CAPTION_COUNTER.clone()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self, value: usize) {
        self.0.store(value, Ordering::SeqCst);
    }

    /// Advances the counter and returns the new caption number.
    pub fn next(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn shares_with(&self, other: &CaptionCounter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Options for pseudocode → HTML rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Block indentation, in em
    /// Default: 1.2
    pub indent_size: f64,

    /// Text placed before comment content
    /// Default: " // "
    pub comment_delimiter: String,

    /// Number code lines
    /// Default: false
    pub line_number: bool,

    /// Punctuation after a line number
    /// Default: ":"
    pub line_number_punc: String,

    /// Suppress `end ...` lines
    /// Default: false
    pub no_end: bool,

    /// Draw vertical scope lines beside blocks
    /// Default: false
    pub scope_lines: bool,

    /// Reset the caption counter to this value before rendering
    /// Default: None (counter left as is)
    pub caption_count: Option<usize>,

    /// Keyword before the caption number
    /// Default: "Algorithm"
    pub title_prefix: String,

    pub caption_counter: CaptionCounter,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_size: 1.2,
            comment_delimiter: " // ".to_string(),
            line_number: false,
            line_number_punc: ":".to_string(),
            no_end: false,
            scope_lines: false,
            caption_count: None,
            title_prefix: "Algorithm".to_string(),
            caption_counter: CaptionCounter::default(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numbered lines, as in most published listings.
    pub fn numbered() -> Self {
        Self {
            line_number: true,
            ..Self::default()
        }
    }

    /// No `end` lines and a narrower indent.
    pub fn compact() -> Self {
        Self {
            indent_size: 0.8,
            no_end: true,
            ..Self::default()
        }
    }

    pub fn with_caption_counter(mut self, counter: CaptionCounter) -> Self {
        self.caption_counter = counter;
        self
    }

    pub fn with_caption_count(mut self, count: usize) -> Self {
        self.caption_count = Some(count);
        self
    }

    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefix = prefix.into();
        self
    }
}
