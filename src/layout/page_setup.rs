//! Page setup snapshot: paper, margins, separator and flow orientation

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::Size;

/// Gap between consecutive pages when none is configured
pub const DEFAULT_SEPARATOR_HEIGHT: f32 = 5.0;

/// Direction in which successive pages are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// Pages side by side, flow axis is x
    HorizontalFlow,
    /// Pages stacked top to bottom, flow axis is y
    #[default]
    VerticalFlow,
}

impl Orientation {
    /// Extent of `size` along the flow axis
    pub fn along(self, size: Size) -> f32 {
        match self {
            Orientation::VerticalFlow => size.height,
            Orientation::HorizontalFlow => size.width,
        }
    }

    /// Extent of `size` across the flow axis
    pub fn across(self, size: Size) -> f32 {
        match self {
            Orientation::VerticalFlow => size.width,
            Orientation::HorizontalFlow => size.height,
        }
    }

    /// Build a size from flow-axis and cross-axis extents
    pub fn size(self, along: f32, across: f32) -> Size {
        match self {
            Orientation::VerticalFlow => Size::new(across, along),
            Orientation::HorizontalFlow => Size::new(along, across),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Orientation::VerticalFlow => Orientation::HorizontalFlow,
            Orientation::HorizontalFlow => Orientation::VerticalFlow,
        }
    }
}

/// Margin insets in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Margins {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Margins {
    pub fn uniform(inset: f32) -> Self {
        Self {
            top: inset,
            left: inset,
            bottom: inset,
            right: inset,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(72.0) // 1 inch
    }
}

/// Immutable page setup snapshot.
///
/// Changing any field yields a new value through the `with_*` builders; the
/// container learns about it through an explicit `setup_changed` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSetup {
    pub paper_size: Size,
    pub margins: Margins,
    pub separator_height: f32,
    pub orientation: Orientation,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            paper_size: Size::new(612.0, 792.0), // US Letter
            margins: Margins::default(),
            separator_height: DEFAULT_SEPARATOR_HEIGHT,
            orientation: Orientation::VerticalFlow,
        }
    }
}

impl PageSetup {
    pub fn new(paper_size: Size, margins: Margins, separator_height: f32) -> Self {
        Self {
            paper_size,
            margins,
            separator_height,
            orientation: Orientation::default(),
        }
    }

    /// Parse a page setup from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_orientation(self, orientation: Orientation) -> Self {
        Self { orientation, ..self }
    }

    pub fn with_paper_size(self, paper_size: Size) -> Self {
        Self { paper_size, ..self }
    }

    pub fn with_margins(self, margins: Margins) -> Self {
        Self { margins, ..self }
    }

    pub fn with_separator_height(self, separator_height: f32) -> Self {
        Self {
            separator_height,
            ..self
        }
    }

    /// Reject setups that cannot produce a valid page sequence
    pub fn validate(&self) -> Result<()> {
        let m = &self.margins;
        let values = [
            self.paper_size.width,
            self.paper_size.height,
            m.top,
            m.left,
            m.bottom,
            m.right,
            self.separator_height,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LayoutError::DegenerateGeometry(
                "page setup contains a non-finite value".into(),
            ));
        }
        if m.top < 0.0 || m.left < 0.0 || m.bottom < 0.0 || m.right < 0.0 {
            return Err(LayoutError::DegenerateGeometry(format!(
                "negative margin in {:?}",
                m
            )));
        }
        if self.separator_height < 0.0 {
            return Err(LayoutError::DegenerateGeometry(format!(
                "negative separator height {}",
                self.separator_height
            )));
        }
        Ok(())
    }
}
