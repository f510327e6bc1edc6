//! Plain text layout engine
//!
//! A small [`TextLayoutEngine`] that breaks unstyled text at UAX #14 break
//! opportunities using fixed per-character metrics. It stands in for a real
//! typesetter in the CLI, the wasm build, benchmarks and tests.

use rustc_hash::FxHashMap;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::engine::{TextLayoutEngine, WrapMode, UNBOUNDED_EXTENT};
use crate::layout::font::FontMetrics;
use crate::layout::page_setup::Orientation;
use crate::Size;

/// Distinct wrap limits remembered before the cache starts over
const MAX_CACHED_LIMITS: usize = 16;

/// Unstyled text with cached line counts per wrap limit
#[derive(Debug, Clone)]
pub struct PlainTextLayout {
    text: String,
    metrics: FontMetrics,
    container_size: Size,
    wrap_mode: WrapMode,
    vertical_text: bool,
    /// (vertical, wrap limit bits) -> line count
    line_counts: FxHashMap<(bool, u32), usize>,
    /// Number of line-breaking passes actually run
    layout_passes: u64,
}

impl PlainTextLayout {
    pub fn new(text: impl Into<String>, metrics: FontMetrics) -> Self {
        Self {
            text: text.into(),
            metrics,
            container_size: Size::new(UNBOUNDED_EXTENT, UNBOUNDED_EXTENT),
            wrap_mode: WrapMode::default(),
            vertical_text: true,
            line_counts: FxHashMap::default(),
            layout_passes: 0,
        }
    }

    /// Disable vertical text, as some typesetters do
    pub fn without_vertical_text(mut self) -> Self {
        self.vertical_text = false;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalidate_layout();
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    /// Number of lines (or columns, for vertical text) when wrapped to `limit`
    pub fn line_count(&mut self, limit: f32, vertical: bool) -> usize {
        let key = (vertical, limit.to_bits());
        if let Some(count) = self.line_counts.get(&key) {
            return *count;
        }
        let count = self.break_lines(limit, vertical);
        self.layout_passes += 1;
        if self.line_counts.len() >= MAX_CACHED_LIMITS {
            self.line_counts.clear();
        }
        self.line_counts.insert(key, count);
        count
    }

    fn break_lines(&self, limit: f32, vertical: bool) -> usize {
        if self.text.is_empty() {
            return 1;
        }

        let mut opportunities = linebreaks(&self.text).peekable();
        let mut lines = 1;
        // Advance since the start of the current line
        let mut advance: f32 = 0.0;
        // Advance since the last break opportunity on the current line
        let mut since_break: f32 = 0.0;

        for (byte_idx, grapheme) in self.text.grapheme_indices(true) {
            while let Some(&(pos, kind)) = opportunities.peek() {
                if pos > byte_idx {
                    break;
                }
                opportunities.next();
                if pos == byte_idx {
                    match kind {
                        BreakOpportunity::Mandatory => {
                            lines += 1;
                            advance = 0.0;
                            since_break = 0.0;
                        }
                        BreakOpportunity::Allowed => since_break = 0.0,
                    }
                }
            }

            let step = if vertical {
                self.metrics.grapheme_height(grapheme)
            } else {
                self.metrics.grapheme_width(grapheme)
            };

            // Trailing whitespace hangs past the edge
            let hangs = grapheme.chars().all(char::is_whitespace);
            if !hangs && advance + step > limit && advance > 0.0 {
                lines += 1;
                // Carry the unfinished word when the line had a break opportunity,
                // otherwise break right here
                advance = if since_break < advance { since_break } else { 0.0 };
                since_break = advance;
            }

            advance += step;
            since_break += step;
        }

        if self.text.ends_with('\n') {
            lines += 1;
        }
        lines
    }
}

impl TextLayoutEngine for PlainTextLayout {
    fn used_height(&mut self, width: f32) -> f32 {
        self.line_count(width, false) as f32 * self.metrics.line_height
    }

    fn used_width(&mut self, height: f32) -> f32 {
        self.line_count(height, true) as f32 * self.metrics.line_height
    }

    fn container_size(&self) -> Size {
        self.container_size
    }

    fn set_container_size(&mut self, size: Size) {
        if size != self.container_size {
            self.container_size = size;
            self.line_counts.clear();
        }
    }

    fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.wrap_mode = mode;
    }

    fn invalidate_layout(&mut self) {
        self.line_counts.clear();
    }

    fn document_len(&self) -> usize {
        self.text.len()
    }

    fn supports_orientation(&self, orientation: Orientation) -> bool {
        orientation == Orientation::VerticalFlow || self.vertical_text
    }
}
