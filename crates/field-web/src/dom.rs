use web_sys as web;

use crate::constants::COMPACT_WIDTH_PX;

pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Match the canvas backing store to CSS size * devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(window) = web::window() {
        let dpr = window.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let width = (rect.width() * dpr) as u32;
        let height = (rect.height() * dpr) as u32;
        canvas.set_width(width.max(1));
        canvas.set_height(height.max(1));
    }
}

pub fn is_compact_viewport() -> bool {
    web::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .map(|w| w < COMPACT_WIDTH_PX)
        .unwrap_or(false)
}

/// Page scroll progress in 0..1, zero when the page does not scroll.
pub fn scroll_progress() -> f32 {
    let Some(window) = web::window() else {
        return 0.0;
    };
    let Some(document) = window.document() else {
        return 0.0;
    };
    let Some(root) = document.document_element() else {
        return 0.0;
    };
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let range = root.scroll_height() as f64 - viewport;
    if range <= 0.0 {
        return 0.0;
    }
    (scroll_y / range).clamp(0.0, 1.0) as f32
}
