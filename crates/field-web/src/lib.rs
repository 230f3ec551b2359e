//! Browser entry point. Owns the canvas, the WebGPU renderer, the WebAudio
//! engine and the requestAnimationFrame loop; all simulation state lives in
//! `field-core`.

#![cfg(target_arch = "wasm32")]

use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod render;

use constants::FORMATION_TEXT;
use field_core::constants::{COMPACT_PARTICLE_COUNT, DEFAULT_PARTICLE_COUNT};
use field_core::Simulation;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("field-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id("field-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #field-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    wire_canvas_resize(&canvas);

    static STARTED: AtomicBool = AtomicBool::new(false);
    if !STARTED.swap(true, Ordering::SeqCst) {
        spawn_local(async move {
            let compact = dom::is_compact_viewport();
            let count = if compact {
                COMPACT_PARTICLE_COUNT
            } else {
                DEFAULT_PARTICLE_COUNT
            };
            let seed = js_sys::Date::now() as u64;
            let sim = Simulation::new(count, FORMATION_TEXT, compact, seed);

            // Sized for the larger profile so a resize to desktop width
            // never outgrows the instance buffer.
            let gpu = frame::init_gpu(&canvas, DEFAULT_PARTICLE_COUNT).await;

            let pointer = Rc::new(RefCell::new(input::PointerState::default()));
            let clicks: Rc<RefCell<Vec<glam::Vec3>>> = Rc::new(RefCell::new(Vec::new()));
            let audio = Rc::new(RefCell::new(None));
            let hidden = Rc::new(RefCell::new(false));

            events::wire_input_handlers(events::InputWiring {
                canvas: canvas.clone(),
                pointer: pointer.clone(),
                clicks: clicks.clone(),
                audio: audio.clone(),
                hidden: hidden.clone(),
            });

            let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
                sim,
                gpu,
                audio,
                canvas,
                pointer,
                clicks,
                hidden,
                last_instant: Instant::now(),
                elapsed: 0.0,
            }));
            frame::start_loop(frame_ctx);
        });
    }

    Ok(())
}
