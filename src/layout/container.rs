//! Multi-page container: the current page sequence and queries over it

use crate::error::{LayoutError, Result};
use crate::layout::engine::TextLayoutEngine;
use crate::layout::geometry::{PageGeometry, PageGeometryEngine};
use crate::layout::page_setup::{Orientation, PageSetup};
use crate::{Point, Rect, Size};

/// Layout state of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// No geometry has been computed yet
    Empty,
    /// The page sequence matches the current inputs
    LaidOut,
    /// Inputs changed since the last computation
    Stale,
}

/// Ordered pages plus the size enclosing them
#[derive(Debug, Clone, PartialEq)]
pub struct PageSequence {
    pub pages: Vec<PageGeometry>,
    pub total_size: Size,
    pub orientation: Orientation,
}

impl PageSequence {
    fn empty(orientation: Orientation) -> Self {
        Self {
            pages: Vec::new(),
            total_size: Size::default(),
            orientation,
        }
    }

    /// Binary search for the page under `point`
    pub fn page_containing(&self, point: Point) -> Option<usize> {
        let along = match self.orientation {
            Orientation::VerticalFlow => point.y,
            Orientation::HorizontalFlow => point.x,
        };
        let idx = self.pages.partition_point(|page| {
            let end = match self.orientation {
                Orientation::VerticalFlow => page.page_rect.max_y(),
                Orientation::HorizontalFlow => page.page_rect.max_x(),
            };
            end < along
        });
        self.pages
            .get(idx)
            .filter(|page| page.page_rect.contains_point(point))
            .map(|page| page.index)
    }
}

/// Owns the page sequence of one document view.
///
/// Inputs (page setup, orientation, document extent) may change at any time;
/// the sequence is rebuilt wholesale on the next query.
#[derive(Debug, Clone)]
pub struct MultiPageContainer {
    geometry: PageGeometryEngine,
    setup: PageSetup,
    /// Extent of the laid-out text along the flow axis
    document_extent: f32,
    state: ContainerState,
    sequence: PageSequence,
}

impl MultiPageContainer {
    pub fn new(setup: PageSetup) -> Self {
        Self {
            geometry: PageGeometryEngine::new(),
            setup,
            document_extent: 0.0,
            state: ContainerState::Empty,
            sequence: PageSequence::empty(setup.orientation),
        }
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    pub fn orientation(&self) -> Orientation {
        self.setup.orientation
    }

    pub fn document_extent(&self) -> f32 {
        self.document_extent
    }

    /// Page setup changed event
    pub fn setup_changed(&mut self, setup: PageSetup) {
        if setup != self.setup {
            self.setup = setup;
            self.mark_stale();
        }
    }

    /// Swap the flow axis; returns whether anything changed
    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if orientation == self.setup.orientation {
            return false;
        }
        self.setup = self.setup.with_orientation(orientation);
        self.mark_stale();
        true
    }

    pub fn set_document_extent(&mut self, extent: f32) {
        if extent.to_bits() != self.document_extent.to_bits() {
            self.document_extent = extent;
            self.mark_stale();
        }
    }

    /// Ask the text layout engine how far the text extends when wrapped to the
    /// page content size, and adopt that as the document extent
    pub fn measure<E: TextLayoutEngine + ?Sized>(&mut self, engine: &mut E) -> Result<f32> {
        let content = self.geometry.content_size(&self.setup)?;
        let extent = engine.used_extent(self.setup.orientation, content);
        self.set_document_extent(extent);
        Ok(extent)
    }

    fn mark_stale(&mut self) {
        if self.state == ContainerState::LaidOut {
            self.state = ContainerState::Stale;
        }
    }

    /// Current page sequence, recomputing it first when needed.
    ///
    /// On failure the previous sequence is kept and the state is unchanged.
    pub fn ensure_laid_out(&mut self) -> Result<&PageSequence> {
        if self.state != ContainerState::LaidOut {
            let pages = self.geometry.pages(self.document_extent, &self.setup)?;
            let total_size = self.geometry.total_size(pages.len(), &self.setup);
            log::debug!(
                "laid out {} pages ({:?}), total size {}x{}",
                pages.len(),
                self.setup.orientation,
                total_size.width,
                total_size.height
            );
            self.sequence = PageSequence {
                pages,
                total_size,
                orientation: self.setup.orientation,
            };
            self.state = ContainerState::LaidOut;
        }
        Ok(&self.sequence)
    }

    pub fn total_size(&mut self) -> Result<Size> {
        Ok(self.ensure_laid_out()?.total_size)
    }

    pub fn page_count(&mut self) -> Result<usize> {
        Ok(self.ensure_laid_out()?.pages.len())
    }

    pub fn pages(&mut self) -> Result<&[PageGeometry]> {
        Ok(&self.ensure_laid_out()?.pages)
    }

    /// Page under a document-space point; `None` in separator gaps and outside pages
    pub fn page_containing(&mut self, point: Point) -> Result<Option<usize>> {
        Ok(self.ensure_laid_out()?.page_containing(point))
    }

    /// Area inside the margins where the document draws
    pub fn document_size_in_page(&self) -> Result<Size> {
        self.geometry.content_size(&self.setup)
    }

    /// Content rectangle of `index`; page 0 is the first page
    pub fn document_rect_for_page(&self, index: usize) -> Result<Rect> {
        self.geometry
            .content_rect(index, self.document_extent, &self.setup)
    }

    /// Full paper rectangle of `index`; page 0 is the first page
    pub fn page_rect_for_page(&self, index: usize) -> Result<Rect> {
        self.geometry.page_rect(index, self.document_extent, &self.setup)
    }

    /// Geometry of `index` from the current sequence
    pub fn page(&mut self, index: usize) -> Result<PageGeometry> {
        let pages = &self.ensure_laid_out()?.pages;
        pages.get(index).copied().ok_or(LayoutError::InvalidIndex {
            index,
            page_count: pages.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font::FontMetrics;
    use crate::layout::line_break::PlainTextLayout;
    use crate::layout::page_setup::Margins;

    fn setup() -> PageSetup {
        PageSetup::new(Size::new(612.0, 792.0), Margins::uniform(72.0), 20.0)
    }

    #[test]
    fn test_state_transitions() {
        let mut container = MultiPageContainer::new(setup());
        assert_eq!(container.state(), ContainerState::Empty);

        // Changes before the first layout keep it empty
        container.set_document_extent(3000.0);
        assert_eq!(container.state(), ContainerState::Empty);

        assert_eq!(container.page_count().unwrap(), 5);
        assert_eq!(container.state(), ContainerState::LaidOut);

        container.set_document_extent(100.0);
        assert_eq!(container.state(), ContainerState::Stale);
        assert_eq!(container.page_count().unwrap(), 1);
        assert_eq!(container.state(), ContainerState::LaidOut);
    }

    #[test]
    fn test_unchanged_inputs_keep_layout() {
        let mut container = MultiPageContainer::new(setup());
        container.set_document_extent(3000.0);
        container.total_size().unwrap();

        container.set_document_extent(3000.0);
        container.setup_changed(setup());
        assert!(!container.set_orientation(Orientation::VerticalFlow));
        assert_eq!(container.state(), ContainerState::LaidOut);
    }

    #[test]
    fn test_orientation_change_goes_stale() {
        let mut container = MultiPageContainer::new(setup());
        container.set_document_extent(3000.0);
        container.total_size().unwrap();

        assert!(container.set_orientation(Orientation::HorizontalFlow));
        assert_eq!(container.state(), ContainerState::Stale);
        assert_eq!(container.setup().orientation, Orientation::HorizontalFlow);

        let size = container.total_size().unwrap();
        assert_eq!(size.height, 792.0);
        assert!(size.width > size.height);
    }

    #[test]
    fn test_total_size_includes_separators() {
        let mut container = MultiPageContainer::new(setup());
        container.set_document_extent(3000.0);
        assert_eq!(
            container.total_size().unwrap(),
            Size::new(612.0, 5.0 * 792.0 + 4.0 * 20.0)
        );
    }

    #[test]
    fn test_geometry_queries_are_idempotent() {
        let mut container = MultiPageContainer::new(setup());
        container.set_document_extent(3000.0);
        let first = container.ensure_laid_out().unwrap().clone();
        container.setup_changed(setup().with_separator_height(10.0));
        container.setup_changed(setup());
        let second = container.ensure_laid_out().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_containing() {
        let mut container = MultiPageContainer::new(setup());
        container.set_document_extent(3000.0);

        assert_eq!(container.page_containing(Point::new(10.0, 10.0)).unwrap(), Some(0));
        assert_eq!(container.page_containing(Point::new(10.0, 792.0)).unwrap(), Some(0));
        // Separator gap between page 0 and page 1
        assert_eq!(container.page_containing(Point::new(10.0, 800.0)).unwrap(), None);
        assert_eq!(container.page_containing(Point::new(10.0, 812.0)).unwrap(), Some(1));
        assert_eq!(container.page_containing(Point::new(10.0, 4.0 * 812.0 + 5.0)).unwrap(), Some(4));
        // Beyond the last page, left of the pages, below the pages
        assert_eq!(container.page_containing(Point::new(700.0, 10.0)).unwrap(), None);
        assert_eq!(container.page_containing(Point::new(-1.0, 10.0)).unwrap(), None);
        assert_eq!(container.page_containing(Point::new(10.0, 5000.0)).unwrap(), None);
    }

    #[test]
    fn test_page_containing_horizontal_flow() {
        let mut container =
            MultiPageContainer::new(setup().with_orientation(Orientation::HorizontalFlow));
        container.set_document_extent(1000.0);

        assert_eq!(container.page_containing(Point::new(640.0, 10.0)).unwrap(), Some(1));
        assert_eq!(container.page_containing(Point::new(620.0, 10.0)).unwrap(), None);
    }

    #[test]
    fn test_rect_delegation() {
        let mut container = MultiPageContainer::new(setup());
        container.set_document_extent(3000.0);

        assert_eq!(
            container.page_rect_for_page(1).unwrap(),
            Rect::new(0.0, 812.0, 612.0, 792.0)
        );
        assert_eq!(
            container.document_rect_for_page(1).unwrap(),
            Rect::new(72.0, 884.0, 468.0, 648.0)
        );
        assert_eq!(container.page(1).unwrap().page_rect, container.page_rect_for_page(1).unwrap());
        assert!(matches!(
            container.page_rect_for_page(5),
            Err(LayoutError::InvalidIndex { index: 5, .. })
        ));
    }

    #[test]
    fn test_failed_recompute_keeps_previous_geometry() {
        let mut container = MultiPageContainer::new(setup());
        container.set_document_extent(3000.0);
        let before = container.pages().unwrap().to_vec();

        container.setup_changed(setup().with_margins(Margins::uniform(500.0)));
        assert!(matches!(
            container.total_size(),
            Err(LayoutError::DegenerateGeometry(_))
        ));
        assert_eq!(container.state(), ContainerState::Stale);

        container.setup_changed(setup());
        assert_eq!(container.pages().unwrap(), &before[..]);
    }

    #[test]
    fn test_huge_extent_fails_without_allocating() {
        let mut container = MultiPageContainer::new(setup());
        container.set_document_extent(3000.0);
        assert_eq!(container.page_count().unwrap(), 5);

        container.set_document_extent(1.0e30);
        assert!(matches!(
            container.page_count(),
            Err(LayoutError::DegenerateGeometry(_))
        ));
        assert_eq!(container.state(), ContainerState::Stale);

        container.set_document_extent(3000.0);
        assert_eq!(container.page_count().unwrap(), 5);
    }

    #[test]
    fn test_measure_reads_engine_extent() {
        // 468pt content width at 8pt per char is 58 chars per line
        let text = "x".repeat(58 * 100);
        let mut engine = PlainTextLayout::new(text, FontMetrics::monospace(8.0, 10.0));
        let mut container = MultiPageContainer::new(setup());

        assert_eq!(container.measure(&mut engine).unwrap(), 1000.0);
        assert_eq!(container.page_count().unwrap(), 2);
    }
}
