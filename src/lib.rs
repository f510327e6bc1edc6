//! Folio: multi-page layout and scaling core for a text editor
//!
//! This crate provides:
//! - Page geometry (page and content rectangles, page counts) from an
//!   immutable page setup snapshot
//! - A lazily recomputed multi-page container with hit testing
//! - A zoom transform between unscaled document space and view space
//! - Print-time reflow of the text container with guaranteed restoration
//!
//! Text layout itself is an external collaborator behind [`TextLayoutEngine`].

pub mod error;
pub mod layout;
pub mod print;
pub mod render;
pub mod scaling;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPresentation;

// Re-export primary types
pub use error::{LayoutError, Result};
pub use layout::{
    ContainerState, FontMetrics, LayoutOrientationController, Margins, MultiPageContainer,
    Orientation, OrientationSection, PageGeometry, PageGeometryEngine, PageSequence, PageSetup,
    PlainTextLayout, TextLayoutEngine, WrapMode,
};
pub use print::{paginate_for_print, PrintLayout, PrintOptions, PrintReflowAdapter, ReflowSnapshot};
pub use render::{Color, DisplayItem, DisplayList, DisplayPage, PageStyle};
pub use scaling::{ScaleChange, ScaleState, ScalingTransform, ZoomConfig};

use serde::{Deserialize, Serialize};

use layout::UNBOUNDED_EXTENT;

/// Document or view coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Uniform scale of both dimensions
    pub fn scale(&self, factor: f32) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle, origin at the top left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Receives scroll bounds and position from the presentation
pub trait ScrollHost {
    /// Scrollable content size in view space
    fn scrollable_size_changed(&mut self, size: Size);

    fn scroll_offset_changed(&mut self, _offset: Point) {}
}

impl ScrollHost for () {
    fn scrollable_size_changed(&mut self, _size: Size) {}
}

/// Configuration of one document window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresentationConfig {
    pub page_setup: PageSetup,
    pub zoom: ZoomConfig,
    pub page_style: PageStyle,
    pub wrap_mode: WrapMode,
}

impl PresentationConfig {
    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.page_setup.validate()?;
        self.zoom.validate()
    }
}

/// Result of hit testing a view point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageHit {
    pub page_index: usize,
    pub document_point: Point,
    /// Whether the point is inside the margins, on the text area
    pub in_content: bool,
}

/// One document window: container, zoom, orientation and print reflow over a
/// text layout engine, reporting scroll bounds to `H`
pub struct Presentation<E: TextLayoutEngine, H: ScrollHost = ()> {
    engine: E,
    host: H,
    container: MultiPageContainer,
    scaling: ScalingTransform,
    orientation: LayoutOrientationController,
    reflow: PrintReflowAdapter,
    style: PageStyle,
}

impl<E: TextLayoutEngine, H: ScrollHost> Presentation<E, H> {
    /// Create a presentation and lay it out once
    pub fn new(mut engine: E, config: PresentationConfig, host: H) -> Result<Self> {
        engine.set_wrap_mode(config.wrap_mode);
        let orientation = config.page_setup.orientation;
        let document_len = engine.document_len();
        let mut presentation = Self {
            engine,
            host,
            container: MultiPageContainer::new(config.page_setup),
            scaling: ScalingTransform::new(config.zoom)?,
            orientation: LayoutOrientationController::new(orientation, document_len),
            reflow: PrintReflowAdapter::new(),
            style: config.page_style,
        };
        presentation.relayout()?;
        Ok(presentation)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access for text changes; call [`relayout`](Self::relayout) afterwards
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn container(&self) -> &MultiPageContainer {
        &self.container
    }

    pub fn scaling(&self) -> &ScalingTransform {
        &self.scaling
    }

    pub fn orientation_controller(&self) -> &LayoutOrientationController {
        &self.orientation
    }

    pub fn page_style(&self) -> &PageStyle {
        &self.style
    }

    pub fn set_page_style(&mut self, style: PageStyle) {
        self.style = style;
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.engine.wrap_mode()
    }

    /// Pages are shown only when text wraps to the page
    pub fn has_multiple_pages(&self) -> bool {
        self.engine.wrap_mode() == WrapMode::WrapToPage
    }

    /// Size the text container for the current mode, measure the text and
    /// push the scaled content size to the scroll host
    pub fn relayout(&mut self) -> Result<Size> {
        let setup = *self.container.setup();
        let content = PageGeometryEngine::new().content_size(&setup)?;
        let orientation = setup.orientation;

        let document_size = if self.has_multiple_pages() {
            self.engine.set_container_size(
                orientation.size(UNBOUNDED_EXTENT, orientation.across(content)),
            );
            self.container.measure(&mut self.engine)?;
            self.container.total_size()?
        } else {
            let across = self.window_extent(content);
            let window = orientation.size(UNBOUNDED_EXTENT, across);
            self.engine.set_container_size(window);
            self.container.measure(&mut self.engine)?;
            orientation.size(self.engine.used_extent(orientation, window), across)
        };

        let display_size = self.scaling.set_document_size(document_size);
        self.host.scrollable_size_changed(display_size);
        Ok(display_size)
    }

    /// Cross-axis extent of a wrap-to-window container in document space
    fn window_extent(&self, content: Size) -> f32 {
        let orientation = self.container.orientation();
        let viewport = orientation.across(self.scaling.viewport_size());
        if viewport > 0.0 {
            viewport / self.scaling.factor()
        } else {
            orientation.across(content)
        }
    }

    /// Page setup changed; orientation stays under the orientation controller
    pub fn set_page_setup(&mut self, setup: PageSetup) -> Result<Size> {
        let setup = setup.with_orientation(self.orientation.orientation());
        self.container.setup_changed(setup);
        self.relayout()
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<bool> {
        let changed = self
            .orientation
            .set_orientation(orientation, &mut self.container, &self.engine)?;
        if changed {
            self.relayout()?;
        }
        Ok(changed)
    }

    pub fn set_orientation_sections(
        &mut self,
        sections: impl IntoIterator<Item = OrientationSection>,
        document_len: usize,
    ) -> Result<()> {
        self.orientation.set_sections(sections, document_len)
    }

    pub fn document_length_changed(&mut self, document_len: usize) -> Result<Size> {
        self.orientation.document_length_changed(document_len);
        self.relayout()
    }

    pub fn set_wrap_mode(&mut self, mode: WrapMode) -> Result<Size> {
        self.engine.set_wrap_mode(mode);
        self.relayout()
    }

    pub fn toggle_page_breaks(&mut self) -> Result<Size> {
        let mode = match self.wrap_mode() {
            WrapMode::WrapToWindow => WrapMode::WrapToPage,
            WrapMode::WrapToPage => WrapMode::WrapToWindow,
        };
        self.set_wrap_mode(mode)
    }

    pub fn set_viewport_size(&mut self, size: Size) -> Result<Size> {
        self.scaling.set_viewport_size(size);
        self.relayout()
    }

    pub fn scroll_to(&mut self, offset: Point) {
        self.scaling.set_scroll_offset(offset);
        self.host.scroll_offset_changed(offset);
    }

    /// Zoom keeping the document point `anchor` in place
    pub fn set_scale(&mut self, factor: f32, anchor: Point) -> Result<ScaleChange> {
        let change = self.scaling.set_scale(factor, anchor)?;
        self.scale_changed(change)
    }

    pub fn set_scale_clamped(&mut self, factor: f32, anchor: Point) -> Result<ScaleChange> {
        let change = self.scaling.set_scale_clamped(factor, anchor);
        self.scale_changed(change)
    }

    pub fn zoom_in(&mut self) -> Result<ScaleChange> {
        let change = self.scaling.zoom_in();
        self.scale_changed(change)
    }

    pub fn zoom_out(&mut self) -> Result<ScaleChange> {
        let change = self.scaling.zoom_out();
        self.scale_changed(change)
    }

    pub fn zoom_to_actual_size(&mut self) -> Result<ScaleChange> {
        let change = self.scaling.zoom_to_actual_size();
        self.scale_changed(change)
    }

    fn scale_changed(&mut self, mut change: ScaleChange) -> Result<ScaleChange> {
        if self.has_multiple_pages() {
            self.host.scrollable_size_changed(change.display_size);
        } else {
            // The window now spans a different document width
            change.display_size = self.relayout()?;
        }
        self.host.scroll_offset_changed(change.scroll_offset);
        Ok(change)
    }

    pub fn number_of_pages(&mut self) -> Result<usize> {
        self.container.page_count()
    }

    /// Unscaled size of all pages and separators
    pub fn total_size(&mut self) -> Result<Size> {
        self.container.total_size()
    }

    /// Route a view-space point to the page under it
    pub fn hit_test(&mut self, view_point: Point) -> Result<Option<PageHit>> {
        let document_point = self.scaling.to_document(view_point);
        let Some(page_index) = self.container.page_containing(document_point)? else {
            return Ok(None);
        };
        let page = self.container.page(page_index)?;
        Ok(Some(PageHit {
            page_index,
            document_point,
            in_content: page.content_rect.contains_point(document_point),
        }))
    }

    /// Display list for the visible area
    pub fn display_list(&mut self) -> Result<DisplayList> {
        let viewport = Rect::from_origin_size(Point::default(), self.scaling.viewport_size());
        let sequence = self.container.ensure_laid_out()?;
        Ok(DisplayList::build(sequence, &self.scaling, viewport, &self.style))
    }

    /// Paginate for printing; the on-screen layout is untouched afterwards
    pub fn print(&mut self, options: &PrintOptions) -> Result<PrintLayout> {
        let setup = *self.container.setup();
        paginate_for_print(&mut self.reflow, &mut self.engine, &setup, options)
    }
}
