//! Display list: page frames and separators in view space

use serde::{Deserialize, Serialize};

use crate::layout::{Orientation, PageSequence};
use crate::scaling::ScalingTransform;
use crate::Rect;

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS hex notation, e.g. `#d3d3d3`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colors used to draw the pages of a multi-page view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageStyle {
    /// Page border
    pub line_color: Color,
    /// Area around and between the pages
    pub margin_color: Color,
    /// Paper
    pub page_color: Color,
    /// Outline the content rectangle inside each page
    pub show_margin_guides: bool,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            line_color: Color::GRAY,
            margin_color: Color::LIGHT_GRAY,
            page_color: Color::WHITE,
            show_margin_guides: false,
        }
    }
}

/// A display item to render
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// Paper fill
    Page { rect: Rect, color: Color },
    /// Page outline, one view unit wide at any zoom
    Border { rect: Rect, color: Color },
    /// Content rectangle outline
    ContentGuide { rect: Rect, color: Color },
}

/// Display list for a single page
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPage {
    pub page_index: usize,
    /// Page rectangle in view space
    pub bounds: Rect,
    pub items: Vec<DisplayItem>,
}

/// Everything visible in a viewport
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub scale: f32,
    pub background: Color,
    pub pages: Vec<DisplayPage>,
    /// Separator gaps between pages, in view space
    pub separators: Vec<Rect>,
}

impl DisplayList {
    /// Build the display list for `viewport`, a view-space rectangle
    pub fn build(
        sequence: &PageSequence,
        transform: &ScalingTransform,
        viewport: Rect,
        style: &PageStyle,
    ) -> Self {
        let mut pages = Vec::new();
        let mut separators = Vec::new();

        for (i, page) in sequence.pages.iter().enumerate() {
            let bounds = transform.rect_to_view(page.page_rect);

            if let Some(next) = sequence.pages.get(i + 1) {
                let gap = Self::separator_between(
                    sequence.orientation,
                    bounds,
                    transform.rect_to_view(next.page_rect),
                );
                if gap.intersects(&viewport) {
                    separators.push(gap);
                }
            }

            // Skip pages outside viewport
            if !bounds.intersects(&viewport) {
                continue;
            }

            let mut items = vec![
                DisplayItem::Page {
                    rect: bounds,
                    color: style.page_color,
                },
                DisplayItem::Border {
                    rect: bounds,
                    color: style.line_color,
                },
            ];
            if style.show_margin_guides {
                items.push(DisplayItem::ContentGuide {
                    rect: transform.rect_to_view(page.content_rect),
                    color: style.margin_color,
                });
            }

            pages.push(DisplayPage {
                page_index: page.index,
                bounds,
                items,
            });
        }

        DisplayList {
            scale: transform.factor(),
            background: style.margin_color,
            pages,
            separators,
        }
    }

    fn separator_between(orientation: Orientation, a: Rect, b: Rect) -> Rect {
        match orientation {
            Orientation::VerticalFlow => Rect::new(a.x, a.max_y(), a.width, b.y - a.max_y()),
            Orientation::HorizontalFlow => Rect::new(a.max_x(), a.y, b.x - a.max_x(), a.height),
        }
    }

    pub fn visible_page_indices(&self) -> Vec<usize> {
        self.pages.iter().map(|page| page.page_index).collect()
    }
}
