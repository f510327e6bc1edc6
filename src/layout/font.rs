//! Font metrics for the plain text layout engine

const ASCII_LEN: usize = 128;
const TAB_COLUMNS: f32 = 4.0;

/// Advances and leading of a single font, in points
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Distance between baselines; also the glyph advance in vertical text
    pub line_height: f32,
    ascii_advances: [f32; ASCII_LEN],
    /// Advance used outside ASCII
    pub fallback_advance: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 12pt Helvetica-ish: 14.4pt leading, ~6.7pt average advance
        Self::monospace(6.7, 14.4)
    }
}

impl FontMetrics {
    /// Every character has the same advance
    pub fn monospace(advance: f32, line_height: f32) -> Self {
        Self {
            line_height,
            ascii_advances: [advance; ASCII_LEN],
            fallback_advance: advance,
        }
    }

    /// Start from `fallback_advance` and override individual ASCII characters
    pub fn proportional(
        line_height: f32,
        fallback_advance: f32,
        overrides: impl IntoIterator<Item = (char, f32)>,
    ) -> Self {
        let mut metrics = Self::monospace(fallback_advance, line_height);
        for (c, advance) in overrides {
            if let Some(slot) = metrics.ascii_advances.get_mut(c as usize) {
                *slot = advance;
            }
        }
        metrics
    }

    pub fn advance(&self, c: char) -> f32 {
        self.ascii_advances
            .get(c as usize)
            .copied()
            .unwrap_or(self.fallback_advance)
    }

    /// Horizontal advance of a grapheme cluster
    pub fn grapheme_width(&self, grapheme: &str) -> f32 {
        match grapheme {
            "\t" => self.fallback_advance * TAB_COLUMNS,
            g if g.chars().all(char::is_control) => 0.0,
            g => g.chars().map(|c| self.advance(c)).sum(),
        }
    }

    /// Vertical advance of a grapheme cluster in vertical text
    pub fn grapheme_height(&self, grapheme: &str) -> f32 {
        if grapheme.chars().all(char::is_control) {
            0.0
        } else {
            self.line_height
        }
    }
}
