//! DOM event wiring. Every handler writes into shared Rc state that the
//! frame loop reads; none of them touch the simulation directly.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::audio::AudioEngine;
use crate::constants::{CAMERA_Z, CLICK_MAX_TRAVEL_PX};
use crate::input::{self, PointerState};

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub pointer: Rc<RefCell<PointerState>>,
    pub clicks: Rc<RefCell<Vec<glam::Vec3>>>,
    pub audio: Rc<RefCell<Option<AudioEngine>>>,
    pub hidden: Rc<RefCell<bool>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerdown(&w);
    wire_pointerup(&w);
    wire_visibility(&w);
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        let mut p = w.pointer.borrow_mut();
        p.x = pos.x;
        p.y = pos.y;
        p.seen = true;
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        // The audio context must be created inside a user gesture, so the
        // engine comes to life on the first press.
        {
            let mut audio = w.audio.borrow_mut();
            if audio.is_none() {
                if let Ok(engine) = AudioEngine::new() {
                    *audio = Some(engine);
                }
            }
        }
        {
            let pos = input::pointer_canvas_px(&ev, &w.canvas);
            let mut p = w.pointer.borrow_mut();
            p.x = pos.x;
            p.y = pos.y;
            p.down = true;
            p.seen = true;
            p.down_x = pos.x;
            p.down_y = pos.y;
        }
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        // Releasing a grab-drag is not a click; only a near-stationary
        // press/release pair fires a click effect.
        let tap = {
            let p = w.pointer.borrow();
            p.down && input::is_tap(&p, pos, CLICK_MAX_TRAVEL_PX)
        };
        if tap {
            let world = input::screen_to_plane(&w.canvas, pos.x, pos.y, CAMERA_Z);
            w.clicks.borrow_mut().push(world);
        }
        w.pointer.borrow_mut().down = false;
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_visibility(w: &InputWiring) {
    let w = w.clone();
    let Some(document) = web::window().and_then(|win| win.document()) else {
        return;
    };
    let doc_for_closure = document.clone();
    let closure = Closure::wrap(Box::new(move || {
        let hidden = doc_for_closure.visibility_state() == web::VisibilityState::Hidden;
        *w.hidden.borrow_mut() = hidden;
        log::info!("visibility: hidden={hidden}");
    }) as Box<dyn FnMut()>);
    _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}
