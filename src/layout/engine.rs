//! Interface to the external text layout engine

use serde::{Deserialize, Serialize};

use crate::layout::page_setup::Orientation;
use crate::Size;

/// Height (or width, for vertical text) given to a text container that should
/// never run out of room along the flow axis
pub const UNBOUNDED_EXTENT: f32 = 1.0e7;

/// How the text container's wrap width is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WrapMode {
    /// Text rewraps to the live window width
    #[default]
    WrapToWindow,
    /// Text wraps to the fixed printed-page content width
    WrapToPage,
}

/// The text layout collaborator, treated as a black box.
///
/// It owns line breaking. The layout core only asks how much room the text
/// uses for a given wrap width (or height, for vertical text) and drives the
/// container size during reflow.
pub trait TextLayoutEngine {
    /// Height used by the text when wrapped to `width`
    fn used_height(&mut self, width: f32) -> f32;

    /// Width used by vertical text when wrapped to `height`
    fn used_width(&mut self, height: f32) -> f32;

    fn container_size(&self) -> Size;

    fn set_container_size(&mut self, size: Size);

    fn wrap_mode(&self) -> WrapMode;

    fn set_wrap_mode(&mut self, mode: WrapMode);

    /// Discard line breaks so the next query recomputes them
    fn invalidate_layout(&mut self);

    /// Length of the laid out text in bytes; orientation sections cover `0..len`
    fn document_len(&self) -> usize;

    /// Whether the engine can lay text out for `orientation`
    fn supports_orientation(&self, _orientation: Orientation) -> bool {
        true
    }

    /// Extent along the flow axis when text fills `content` sized pages
    fn used_extent(&mut self, orientation: Orientation, content: Size) -> f32 {
        match orientation {
            Orientation::VerticalFlow => self.used_height(content.width),
            Orientation::HorizontalFlow => self.used_width(content.height),
        }
    }
}
