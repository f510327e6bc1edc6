//! Printing: panel options, print-time reflow and print pagination

mod options;
mod reflow;

pub use options::{PrintOptions, SummaryItem};
pub use reflow::{PrintReflowAdapter, ReflowSession, ReflowSnapshot, ReflowState, RejectedSnapshot};

use crate::error::Result;
use crate::layout::{PageGeometry, PageGeometryEngine, PageSetup, TextLayoutEngine, WrapMode, UNBOUNDED_EXTENT};

/// A page of a print job
#[derive(Debug, Clone, PartialEq)]
pub struct PrintPage {
    pub geometry: PageGeometry,
    pub header: Option<String>,
}

/// Page list for a print job
#[derive(Debug, Clone, PartialEq)]
pub struct PrintLayout {
    pub pages: Vec<PrintPage>,
    /// Wrap width (wrap height for horizontal flow) the text was measured at
    pub wrap_extent: f32,
    /// Whether the text container was temporarily reflowed
    pub reflowed: bool,
}

impl PrintLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Paginate the text for printing on `setup` paper.
///
/// Wrap-to-page text is already wrapped to the page content size and is
/// measured as is. Wrap-to-window text is reflowed to the page content size
/// when `options` ask for it, and measured at the window size otherwise. The
/// engine is back in its on-screen configuration when this returns, on
/// success or failure.
pub fn paginate_for_print<E: TextLayoutEngine + ?Sized>(
    adapter: &mut PrintReflowAdapter,
    engine: &mut E,
    setup: &PageSetup,
    options: &PrintOptions,
) -> Result<PrintLayout> {
    let geometry = PageGeometryEngine::new();
    let content = geometry.content_size(setup)?;
    let orientation = setup.orientation;
    let mode = engine.wrap_mode();

    let (extent, wrap_extent, reflowed) = if options.rewraps(mode) {
        let print_size = orientation.size(UNBOUNDED_EXTENT, orientation.across(content));
        let extent = adapter.with_reflow(engine, print_size, WrapMode::WrapToPage, |engine| {
            Ok(engine.used_extent(orientation, content))
        })?;
        (extent, orientation.across(content), true)
    } else if mode == WrapMode::WrapToPage {
        (engine.used_extent(orientation, content), orientation.across(content), false)
    } else {
        let window = engine.container_size();
        (engine.used_extent(orientation, window), orientation.across(window), false)
    };

    let pages = geometry.pages(extent, setup)?;
    let count = pages.len();
    log::debug!("print job: {} pages, reflowed: {}", count, reflowed);
    Ok(PrintLayout {
        pages: pages
            .into_iter()
            .map(|geometry| PrintPage {
                header: options.header_label(geometry.index, count),
                geometry,
            })
            .collect(),
        wrap_extent,
        reflowed,
    })
}
