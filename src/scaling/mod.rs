//! Scaling transform between document space and view space
//!
//! Page geometry is always computed unscaled. This module owns the single
//! uniform scale factor and the scroll offset, and maps points and rects
//! between the two spaces:
//!
//! ```text
//! view = document * factor - scroll_offset
//! document = (view + scroll_offset) / factor
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::{Point, Rect, Size};

/// Zoom popup entries, as factors
pub const ZOOM_PRESETS: [f32; 10] = [0.1, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 4.0, 8.0];

/// Zoom bounds and step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Multiplier applied by one zoom-in step
    pub step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 10.0,
            step: 1.25,
        }
    }
}

impl ZoomConfig {
    /// Bounds must be finite with `0 < min_scale <= max_scale`, and a zoom
    /// step must grow the factor
    pub fn validate(&self) -> Result<()> {
        let finite = [self.min_scale, self.max_scale, self.step]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(LayoutError::InvalidZoom(format!(
                "non-finite value in [{}, {}] step {}",
                self.min_scale, self.max_scale, self.step
            )));
        }
        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(LayoutError::InvalidZoom(format!(
                "bounds [{}, {}] are empty or not positive",
                self.min_scale, self.max_scale
            )));
        }
        if self.step <= 1.0 {
            return Err(LayoutError::InvalidZoom(format!(
                "step {} does not enlarge",
                self.step
            )));
        }
        Ok(())
    }

    pub fn contains(&self, factor: f32) -> bool {
        factor.is_finite() && factor >= self.min_scale && factor <= self.max_scale
    }

    pub fn clamp(&self, factor: f32) -> f32 {
        factor.clamp(self.min_scale, self.max_scale)
    }
}

/// Scale factor and the document point held fixed by the last change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleState {
    pub factor: f32,
    pub anchor: Point,
}

/// Outcome of a scale change, for pushing to the scroll host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleChange {
    pub previous: f32,
    pub factor: f32,
    /// Document size times the new factor
    pub display_size: Size,
    pub scroll_offset: Point,
}

/// Document-space <-> view-space mapping for one document window
#[derive(Debug, Clone)]
pub struct ScalingTransform {
    config: ZoomConfig,
    state: ScaleState,
    /// Origin of the visible area, in view space
    scroll_offset: Point,
    /// Size of the visible area, in view space
    viewport_size: Size,
    /// Unscaled size of the presented content
    document_size: Size,
}

impl Default for ScalingTransform {
    fn default() -> Self {
        Self::with_valid_config(ZoomConfig::default())
    }
}

impl ScalingTransform {
    /// Start at actual size, or at the nearest bound when 1.0 is outside it
    pub fn new(config: ZoomConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ZoomConfig) -> Self {
        Self {
            config,
            state: ScaleState {
                factor: config.clamp(1.0),
                anchor: Point::default(),
            },
            scroll_offset: Point::default(),
            viewport_size: Size::default(),
            document_size: Size::default(),
        }
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    pub fn factor(&self) -> f32 {
        self.state.factor
    }

    pub fn state(&self) -> ScaleState {
        self.state
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll_offset
    }

    /// User scrolling
    pub fn set_scroll_offset(&mut self, offset: Point) {
        self.scroll_offset = offset;
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Record the unscaled content size; returns the scaled display size
    pub fn set_document_size(&mut self, size: Size) -> Size {
        self.document_size = size;
        self.display_size()
    }

    /// Content size in view space
    pub fn display_size(&self) -> Size {
        self.document_size.scale(self.state.factor)
    }

    pub fn to_view(&self, point: Point) -> Point {
        let f = self.state.factor;
        Point::new(
            point.x * f - self.scroll_offset.x,
            point.y * f - self.scroll_offset.y,
        )
    }

    pub fn to_document(&self, point: Point) -> Point {
        let f = self.state.factor;
        Point::new(
            (point.x + self.scroll_offset.x) / f,
            (point.y + self.scroll_offset.y) / f,
        )
    }

    pub fn rect_to_view(&self, rect: Rect) -> Rect {
        let origin = self.to_view(rect.origin());
        Rect::from_origin_size(origin, rect.size().scale(self.state.factor))
    }

    pub fn rect_to_document(&self, rect: Rect) -> Rect {
        let origin = self.to_document(rect.origin());
        Rect::from_origin_size(origin, rect.size().scale(1.0 / self.state.factor))
    }

    /// The visible area mapped back to document space
    pub fn visible_document_rect(&self) -> Rect {
        self.rect_to_document(Rect::from_origin_size(Point::default(), self.viewport_size))
    }

    /// Document point currently at the centre of the viewport
    pub fn viewport_center(&self) -> Point {
        self.to_document(Point::new(
            self.viewport_size.width / 2.0,
            self.viewport_size.height / 2.0,
        ))
    }

    /// Change the factor keeping `anchor` at the same view position.
    ///
    /// Fails without touching any state when `factor` is outside the bounds.
    pub fn set_scale(&mut self, factor: f32, anchor: Point) -> Result<ScaleChange> {
        if !self.config.contains(factor) {
            return Err(LayoutError::OutOfRange {
                factor,
                min: self.config.min_scale,
                max: self.config.max_scale,
            });
        }
        Ok(self.apply(factor, anchor))
    }

    /// Like [`set_scale`](Self::set_scale) but clamps instead of failing
    pub fn set_scale_clamped(&mut self, factor: f32, anchor: Point) -> ScaleChange {
        let clamped = if factor.is_nan() {
            self.state.factor
        } else {
            self.config.clamp(factor)
        };
        if clamped != factor {
            log::warn!("scale factor {} clamped to {}", factor, clamped);
        }
        self.apply(clamped, anchor)
    }

    pub fn zoom_in(&mut self) -> ScaleChange {
        let target = self.state.factor * self.config.step;
        let center = self.viewport_center();
        self.set_scale_clamped(target, center)
    }

    pub fn zoom_out(&mut self) -> ScaleChange {
        let target = self.state.factor / self.config.step;
        let center = self.viewport_center();
        self.set_scale_clamped(target, center)
    }

    pub fn zoom_to_actual_size(&mut self) -> ScaleChange {
        let center = self.viewport_center();
        self.set_scale_clamped(1.0, center)
    }

    fn apply(&mut self, factor: f32, anchor: Point) -> ScaleChange {
        let previous = self.state.factor;
        let pinned = self.to_view(anchor);
        self.state = ScaleState { factor, anchor };
        self.scroll_offset = Point::new(anchor.x * factor - pinned.x, anchor.y * factor - pinned.y);
        log::debug!("scale {} -> {} anchored at ({}, {})", previous, factor, anchor.x, anchor.y);
        ScaleChange {
            previous,
            factor,
            display_size: self.display_size(),
            scroll_offset: self.scroll_offset,
        }
    }

    /// Percentage label for a zoom popup, e.g. "125%"
    pub fn zoom_label(&self) -> String {
        format!("{}%", (self.state.factor * 100.0).round() as i32)
    }

    /// Preset within bounds closest to the current factor
    pub fn nearest_preset(&self) -> f32 {
        let factor = self.state.factor;
        ZOOM_PRESETS
            .iter()
            .copied()
            .filter(|preset| self.config.contains(*preset))
            .min_by(|a, b| (a - factor).abs().total_cmp(&(b - factor).abs()))
            .unwrap_or(factor)
    }
}
