use glam::{Mat4, Vec2, Vec3, Vec4};
use web_sys as web;

/// Latest pointer position in canvas pixels plus the button state.
/// `down_x`/`down_y` hold the press position so release handlers can tell
/// a tap from the end of a drag.
#[derive(Default, Clone, Copy)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub down: bool,
    pub seen: bool,
    pub down_x: f32,
    pub down_y: f32,
}

/// A release reads as a click only when the pointer stayed near its press
/// position.
pub fn is_tap(state: &PointerState, up: Vec2, max_travel_px: f32) -> bool {
    let dx = up.x - state.down_x;
    let dy = up.y - state.down_y;
    dx * dx + dy * dy <= max_travel_px * max_travel_px
}

/// Client (CSS px) coordinates to canvas backing-store pixels.
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width() as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height() as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

/// Unproject a canvas pixel through the camera and intersect the z = 0
/// plane the particles live on.
pub fn screen_to_plane(
    canvas: &web::HtmlCanvasElement,
    sx: f32,
    sy: f32,
    camera_z: f32,
) -> Vec3 {
    let width = canvas.width() as f32;
    let height = canvas.height() as f32;
    let ndc_x = (2.0 * sx / width.max(1.0)) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / height.max(1.0));
    let aspect = width / height.max(1.0);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, aspect, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, camera_z), Vec3::ZERO, Vec3::Y);
    let inv = (proj * view).inverse();
    let p_near = inv * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p0: Vec3 = p_near.truncate() / p_near.w;
    let p1: Vec3 = p_far.truncate() / p_far.w;
    let dir = (p1 - p0).normalize();
    if dir.z.abs() < 1e-6 {
        return Vec3::new(p0.x, p0.y, 0.0);
    }
    let t = -p0.z / dir.z;
    p0 + dir * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed_at(x: f32, y: f32) -> PointerState {
        PointerState {
            down_x: x,
            down_y: y,
            down: true,
            ..Default::default()
        }
    }

    #[test]
    fn stationary_release_is_a_tap() {
        let state = pressed_at(100.0, 100.0);
        assert!(is_tap(&state, Vec2::new(104.0, 103.0), 12.0));
    }

    #[test]
    fn drag_release_is_not_a_tap() {
        let state = pressed_at(100.0, 100.0);
        assert!(!is_tap(&state, Vec2::new(160.0, 100.0), 12.0));
    }
}
