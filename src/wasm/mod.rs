//! WASM bindings for a paged document view

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::layout::{FontMetrics, Orientation, PageSetup, PlainTextLayout};
use crate::print::PrintOptions;
use crate::render::{DisplayItem, DisplayList};
use crate::{LayoutError, Point, Presentation, PresentationConfig, ScrollHost, Size};

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js(err: LayoutError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Scroll bounds last pushed by the presentation, read back by JS
#[derive(Debug, Default)]
pub struct ScrollState {
    pub content_size: Size,
    pub offset: Point,
}

impl ScrollHost for ScrollState {
    fn scrollable_size_changed(&mut self, size: Size) {
        self.content_size = size;
    }

    fn scroll_offset_changed(&mut self, offset: Point) {
        self.offset = offset;
    }
}

/// WASM-exposed presentation over plain text
#[wasm_bindgen]
pub struct WasmPresentation {
    inner: Presentation<PlainTextLayout, ScrollState>,
}

impl WasmPresentation {
    fn build(config: PresentationConfig) -> Result<Self, LayoutError> {
        let engine = PlainTextLayout::new(String::new(), FontMetrics::default());
        Ok(Self {
            inner: Presentation::new(engine, config, ScrollState::default())?,
        })
    }

    pub fn presentation(&self) -> &Presentation<PlainTextLayout, ScrollState> {
        &self.inner
    }
}

#[wasm_bindgen]
impl WasmPresentation {
    /// Create a presentation on US Letter with 1" margins
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmPresentation, JsValue> {
        Self::build(PresentationConfig::default()).map_err(to_js)
    }

    /// Create from a JSON `PresentationConfig`
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<WasmPresentation, JsValue> {
        PresentationConfig::from_json(json)
            .and_then(Self::build)
            .map_err(to_js)
    }

    /// Replace the page setup from JSON
    #[wasm_bindgen(js_name = setPageSetup)]
    pub fn set_page_setup(&mut self, json: &str) -> Result<(), JsValue> {
        let setup = PageSetup::from_json(json).map_err(to_js)?;
        self.inner.set_page_setup(setup).map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner.engine_mut().set_text(text);
        let len = text.len();
        self.inner.document_length_changed(len).map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.inner
            .set_viewport_size(Size::new(width, height))
            .map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.inner.scroll_to(Point::new(x, y));
    }

    /// Scale around a document point; fails outside the zoom bounds
    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, factor: f32, anchor_x: f32, anchor_y: f32) -> Result<(), JsValue> {
        self.inner
            .set_scale(factor, Point::new(anchor_x, anchor_y))
            .map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> Result<f32, JsValue> {
        Ok(self.inner.zoom_in().map_err(to_js)?.factor)
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> Result<f32, JsValue> {
        Ok(self.inner.zoom_out().map_err(to_js)?.factor)
    }

    #[wasm_bindgen(js_name = zoomToActualSize)]
    pub fn zoom_to_actual_size(&mut self) -> Result<f32, JsValue> {
        Ok(self.inner.zoom_to_actual_size().map_err(to_js)?.factor)
    }

    #[wasm_bindgen(js_name = zoomLabel)]
    pub fn zoom_label(&self) -> String {
        self.inner.scaling().zoom_label()
    }

    #[wasm_bindgen(js_name = scaleFactor)]
    pub fn scale_factor(&self) -> f32 {
        self.inner.scaling().factor()
    }

    /// `true` for pages side by side, `false` for a vertical stack
    #[wasm_bindgen(js_name = setHorizontalFlow)]
    pub fn set_horizontal_flow(&mut self, horizontal: bool) -> Result<bool, JsValue> {
        let orientation = if horizontal {
            Orientation::HorizontalFlow
        } else {
            Orientation::VerticalFlow
        };
        self.inner.set_orientation(orientation).map_err(to_js)
    }

    /// Switch between wrap-to-window and wrap-to-page; returns whether pages are shown
    #[wasm_bindgen(js_name = togglePageBreaks)]
    pub fn toggle_page_breaks(&mut self) -> Result<bool, JsValue> {
        self.inner.toggle_page_breaks().map_err(to_js)?;
        Ok(self.inner.has_multiple_pages())
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&mut self) -> Result<usize, JsValue> {
        self.inner.number_of_pages().map_err(to_js)
    }

    /// Scrollable content size as `[width, height]`
    #[wasm_bindgen(js_name = contentSize)]
    pub fn content_size(&self) -> js_sys::Float32Array {
        let size = self.inner.host().content_size;
        js_sys::Float32Array::from(&[size.width, size.height][..])
    }

    /// Unscaled page rects as a flat `[x, y, width, height, ...]` buffer
    #[wasm_bindgen(js_name = pageRects)]
    pub fn page_rects(&mut self) -> Result<js_sys::Float32Array, JsValue> {
        let buffer = page_rect_buffer(&mut self.inner).map_err(to_js)?;
        Ok(js_sys::Float32Array::from(&buffer[..]))
    }

    /// Page index under a view point, or -1 outside every page
    #[wasm_bindgen(js_name = hitTest)]
    pub fn hit_test(&mut self, x: f32, y: f32) -> Result<i32, JsValue> {
        let hit = self.inner.hit_test(Point::new(x, y)).map_err(to_js)?;
        Ok(hit.map_or(-1, |hit| hit.page_index as i32))
    }

    /// Visible pages as JSON
    #[wasm_bindgen(js_name = getRenderData)]
    pub fn get_render_data(&mut self) -> Result<String, JsValue> {
        let list = self.inner.display_list().map_err(to_js)?;
        serde_json::to_string(&RenderData::from_display_list(&list))
            .map_err(|err| to_js(err.into()))
    }

    /// Print pagination as JSON, given JSON `PrintOptions`
    #[wasm_bindgen(js_name = printLayout)]
    pub fn print_layout(&mut self, options: &str) -> Result<String, JsValue> {
        let options: PrintOptions =
            serde_json::from_str(options).map_err(|err| to_js(err.into()))?;
        let layout = self.inner.print(&options).map_err(to_js)?;
        let data = PrintRenderData {
            reflowed: layout.reflowed,
            pages: layout
                .pages
                .iter()
                .map(|page| PrintPageData {
                    page_index: page.geometry.index,
                    header: page.header.clone(),
                    content_width: page.geometry.content_rect.width,
                    content_height: page.geometry.content_rect.height,
                })
                .collect(),
            summary: options
                .summary_items()
                .into_iter()
                .map(|item| (item.name, item.description))
                .collect(),
        };
        serde_json::to_string(&data).map_err(|err| to_js(err.into()))
    }
}

fn page_rect_buffer<H: ScrollHost>(
    presentation: &mut Presentation<PlainTextLayout, H>,
) -> Result<Vec<f32>, LayoutError> {
    let count = presentation.number_of_pages()?;
    let mut buffer = Vec::with_capacity(count * 4);
    for index in 0..count {
        let rect = presentation.container().page_rect_for_page(index)?;
        buffer.extend_from_slice(&[rect.x, rect.y, rect.width, rect.height]);
    }
    Ok(buffer)
}

/// Serializable render data for JS
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderData {
    pub scale: f32,
    pub background: String,
    pub pages: Vec<PageRenderData>,
    pub separators: Vec<[f32; 4]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRenderData {
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: String,
    pub border: String,
    pub content_guide: Option<[f32; 4]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRenderData {
    pub reflowed: bool,
    pub pages: Vec<PrintPageData>,
    pub summary: Vec<(&'static str, &'static str)>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintPageData {
    pub page_index: usize,
    pub header: Option<String>,
    pub content_width: f32,
    pub content_height: f32,
}

impl RenderData {
    pub fn from_display_list(list: &DisplayList) -> Self {
        let pages = list
            .pages
            .iter()
            .map(|page| {
                let mut data = PageRenderData {
                    page_index: page.page_index,
                    x: page.bounds.x,
                    y: page.bounds.y,
                    width: page.bounds.width,
                    height: page.bounds.height,
                    fill: String::new(),
                    border: String::new(),
                    content_guide: None,
                };
                for item in &page.items {
                    match item {
                        DisplayItem::Page { color, .. } => data.fill = color.to_hex(),
                        DisplayItem::Border { color, .. } => data.border = color.to_hex(),
                        DisplayItem::ContentGuide { rect, .. } => {
                            data.content_guide = Some([rect.x, rect.y, rect.width, rect.height])
                        }
                    }
                }
                data
            })
            .collect();

        RenderData {
            scale: list.scale,
            background: list.background.to_hex(),
            pages,
            separators: list
                .separators
                .iter()
                .map(|rect| [rect.x, rect.y, rect.width, rect.height])
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_rect_buffer() {
        let config = PresentationConfig::from_json(
            r#"{"pageSetup": {"separatorHeight": 20.0}, "wrapMode": "wrapToPage"}"#,
        )
        .unwrap();
        let text = "line\n".repeat(100);
        let engine = PlainTextLayout::new(text, FontMetrics::monospace(8.0, 10.0));
        let mut presentation = Presentation::new(engine, config, ScrollState::default()).unwrap();

        // 101 lines at 10pt in 648pt pages
        let buffer = page_rect_buffer(&mut presentation).unwrap();
        assert_eq!(buffer.len(), 8);
        assert_eq!(&buffer[4..], &[0.0, 812.0, 612.0, 792.0]);
        assert_eq!(presentation.host().content_size, Size::new(612.0, 1604.0));
    }

    #[test]
    fn test_render_data_json() {
        let config = PresentationConfig::from_json(r#"{"wrapMode": "wrapToPage"}"#).unwrap();
        let mut presentation = Presentation::new(
            PlainTextLayout::new("text", FontMetrics::default()),
            config,
            ScrollState::default(),
        )
        .unwrap();
        presentation.set_viewport_size(Size::new(800.0, 600.0)).unwrap();

        let list = presentation.display_list().unwrap();
        let json = serde_json::to_value(RenderData::from_display_list(&list)).unwrap();
        assert_eq!(json["pages"][0]["pageIndex"], 0);
        assert_eq!(json["pages"][0]["fill"], "#ffffff");
        assert_eq!(json["background"], "#d3d3d3");
        assert!(json["pages"][0]["contentGuide"].is_null());
    }
}
