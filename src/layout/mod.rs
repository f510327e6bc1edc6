//! Page layout: setup, geometry, the page container and orientation

mod container;
mod engine;
pub mod font;
mod geometry;
mod line_break;
mod orientation;
mod page_setup;

pub use container::{ContainerState, MultiPageContainer, PageSequence};
pub use engine::{TextLayoutEngine, WrapMode, UNBOUNDED_EXTENT};
pub use font::FontMetrics;
pub use geometry::{PageGeometry, PageGeometryEngine, MAX_PAGE_COUNT};
pub use line_break::PlainTextLayout;
pub use orientation::{LayoutOrientationController, OrientationSection, SectionList};
pub use page_setup::{Margins, Orientation, PageSetup, DEFAULT_SEPARATOR_HEIGHT};
