//! Page geometry: page rectangles, content rectangles and page counts
//!
//! Everything here is a pure function of a [`PageSetup`] snapshot, a page
//! index and the total extent of the laid-out text along the flow axis. All
//! rectangles are in unscaled document space.

use crate::error::{LayoutError, Result};
use crate::layout::page_setup::{Orientation, PageSetup};
use crate::{Rect, Size};

/// Largest page sequence the engine will lay out; longer extents are rejected
pub const MAX_PAGE_COUNT: usize = 100_000;

/// Geometry of a single page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page index (0-based)
    pub index: usize,
    /// Full paper rectangle
    pub page_rect: Rect,
    /// Page rectangle minus margins; where text is drawn
    pub content_rect: Rect,
}

/// Stateless page geometry calculator
#[derive(Debug, Default, Clone, Copy)]
pub struct PageGeometryEngine;

impl PageGeometryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Content size shared by every page; the wrap width/height for text layout
    pub fn content_size(&self, setup: &PageSetup) -> Result<Size> {
        setup.validate()?;
        let m = &setup.margins;
        let width = setup.paper_size.width - m.left - m.right;
        let height = setup.paper_size.height - m.top - m.bottom;
        if width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::DegenerateGeometry(format!(
                "margins leave a {}x{} content area on {}x{} paper",
                width, height, setup.paper_size.width, setup.paper_size.height
            )));
        }
        Ok(Size::new(width, height))
    }

    /// Number of pages needed for `total_extent` points of text along the flow axis.
    ///
    /// Always at least one; an exact multiple does not add a trailing empty page.
    /// Fails with `DegenerateGeometry` beyond [`MAX_PAGE_COUNT`] pages.
    pub fn page_count(&self, total_extent: f32, setup: &PageSetup) -> Result<usize> {
        let content = self.content_size(setup)?;
        let span = setup.orientation.along(content) + setup.separator_height;
        if !total_extent.is_finite() || total_extent <= 0.0 {
            return Ok(1);
        }
        let pages = (total_extent / span).ceil();
        if pages > MAX_PAGE_COUNT as f32 {
            return Err(LayoutError::DegenerateGeometry(format!(
                "{}pt of text needs more than {} pages",
                total_extent, MAX_PAGE_COUNT
            )));
        }
        Ok((pages as usize).max(1))
    }

    /// Full page rectangle for `index`
    pub fn page_rect(&self, index: usize, total_extent: f32, setup: &PageSetup) -> Result<Rect> {
        let page_count = self.page_count(total_extent, setup)?;
        if index >= page_count {
            return Err(LayoutError::InvalidIndex { index, page_count });
        }
        Ok(self.page_rect_unchecked(index, setup))
    }

    /// Content rectangle for `index`: the page rectangle inset by the margins
    pub fn content_rect(
        &self,
        index: usize,
        total_extent: f32,
        setup: &PageSetup,
    ) -> Result<Rect> {
        let page = self.page_rect(index, total_extent, setup)?;
        let content = self.content_size(setup)?;
        Ok(Self::inset(page, content, setup))
    }

    /// Both rectangles for `index`
    pub fn page_geometry(
        &self,
        index: usize,
        total_extent: f32,
        setup: &PageSetup,
    ) -> Result<PageGeometry> {
        let page_rect = self.page_rect(index, total_extent, setup)?;
        let content = self.content_size(setup)?;
        Ok(PageGeometry {
            index,
            page_rect,
            content_rect: Self::inset(page_rect, content, setup),
        })
    }

    /// Geometry of every page for `total_extent`, in flow order
    pub fn pages(&self, total_extent: f32, setup: &PageSetup) -> Result<Vec<PageGeometry>> {
        let count = self.page_count(total_extent, setup)?;
        let content = self.content_size(setup)?;
        Ok((0..count)
            .map(|index| {
                let page_rect = self.page_rect_unchecked(index, setup);
                PageGeometry {
                    index,
                    page_rect,
                    content_rect: Self::inset(page_rect, content, setup),
                }
            })
            .collect())
    }

    /// Size enclosing `page_count` pages and the separators between them
    pub fn total_size(&self, page_count: usize, setup: &PageSetup) -> Size {
        let orientation = setup.orientation;
        let n = page_count.max(1) as f32;
        let along = orientation.along(setup.paper_size) * n + setup.separator_height * (n - 1.0);
        orientation.size(along, orientation.across(setup.paper_size))
    }

    fn page_rect_unchecked(&self, index: usize, setup: &PageSetup) -> Rect {
        let paper = setup.paper_size;
        let offset = index as f32 * (setup.orientation.along(paper) + setup.separator_height);
        match setup.orientation {
            Orientation::VerticalFlow => Rect::new(0.0, offset, paper.width, paper.height),
            Orientation::HorizontalFlow => Rect::new(offset, 0.0, paper.width, paper.height),
        }
    }

    fn inset(page: Rect, content: Size, setup: &PageSetup) -> Rect {
        Rect::new(
            page.x + setup.margins.left,
            page.y + setup.margins.top,
            content.width,
            content.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::page_setup::Margins;

    fn letter(separator: f32) -> PageSetup {
        PageSetup::new(Size::new(612.0, 792.0), Margins::uniform(72.0), separator)
    }

    #[test]
    fn test_letter_scenario() {
        let engine = PageGeometryEngine::new();
        let setup = letter(20.0);

        assert_eq!(engine.content_size(&setup).unwrap(), Size::new(468.0, 648.0));
        assert_eq!(engine.page_count(3000.0, &setup).unwrap(), 5);

        let last = engine.content_rect(4, 3000.0, &setup).unwrap();
        assert_eq!(last.width, 468.0);
        assert_eq!(last.height, 648.0);
        assert_eq!(last.y, 4.0 * 812.0 + 72.0);
    }

    #[test]
    fn test_page_count_minimum_one() {
        let engine = PageGeometryEngine::new();
        let setup = letter(20.0);
        assert_eq!(engine.page_count(0.0, &setup).unwrap(), 1);
        assert_eq!(engine.page_count(-50.0, &setup).unwrap(), 1);
        assert_eq!(engine.page_count(f32::NAN, &setup).unwrap(), 1);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let engine = PageGeometryEngine::new();
        let setup = letter(20.0);
        assert_eq!(engine.page_count(668.0, &setup).unwrap(), 1);
        assert_eq!(engine.page_count(1336.0, &setup).unwrap(), 2);
        assert_eq!(engine.page_count(1337.0, &setup).unwrap(), 3);
    }

    #[test]
    fn test_huge_extent_is_rejected() {
        let engine = PageGeometryEngine::new();
        let setup = letter(20.0);
        assert_eq!(
            engine.page_count(MAX_PAGE_COUNT as f32 * 668.0, &setup).unwrap(),
            MAX_PAGE_COUNT
        );
        for extent in [1.0e30, f32::MAX] {
            assert!(matches!(
                engine.page_count(extent, &setup),
                Err(LayoutError::DegenerateGeometry(_))
            ));
            assert!(engine.pages(extent, &setup).is_err());
        }
    }

    #[test]
    fn test_invalid_index() {
        let engine = PageGeometryEngine::new();
        let setup = letter(20.0);
        let err = engine.page_rect(5, 3000.0, &setup).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidIndex { index: 5, page_count: 5 }
        ));
    }

    #[test]
    fn test_degenerate_margins() {
        let engine = PageGeometryEngine::new();
        let setup = letter(20.0).with_margins(Margins {
            left: 400.0,
            right: 300.0,
            ..Margins::default()
        });
        assert!(matches!(
            engine.content_rect(0, 100.0, &setup),
            Err(LayoutError::DegenerateGeometry(_))
        ));
        assert!(engine.page_count(100.0, &setup).is_err());
    }

    #[test]
    fn test_pages_are_separated_and_contain_content() {
        let engine = PageGeometryEngine::new();
        for orientation in [Orientation::VerticalFlow, Orientation::HorizontalFlow] {
            let setup = letter(20.0).with_orientation(orientation);
            let pages = engine.pages(10_000.0, &setup).unwrap();
            assert!(pages.len() > 1);

            for page in &pages {
                assert!(page.page_rect.contains_rect(&page.content_rect));
            }
            for pair in pages.windows(2) {
                let (a, b) = (pair[0].page_rect, pair[1].page_rect);
                assert!(!a.intersects(&b));
                let gap = match orientation {
                    Orientation::VerticalFlow => b.y - a.max_y(),
                    Orientation::HorizontalFlow => b.x - a.max_x(),
                };
                assert_eq!(gap, 20.0);
            }
        }
    }

    #[test]
    fn test_horizontal_flow_uses_width() {
        let engine = PageGeometryEngine::new();
        let setup = letter(20.0).with_orientation(Orientation::HorizontalFlow);
        // content width 468 + separator 20 = 488 per page
        assert_eq!(engine.page_count(976.0, &setup).unwrap(), 2);
        let second = engine.page_rect(1, 976.0, &setup).unwrap();
        assert_eq!(second, Rect::new(632.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn test_total_size() {
        let engine = PageGeometryEngine::new();
        let setup = letter(20.0);
        assert_eq!(engine.total_size(5, &setup), Size::new(612.0, 5.0 * 792.0 + 80.0));
        let wide = setup.with_orientation(Orientation::HorizontalFlow);
        assert_eq!(engine.total_size(2, &wide), Size::new(1244.0, 792.0));
    }
}
