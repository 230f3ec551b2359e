use glam::Vec3;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::audio::AudioEngine;
use crate::constants::CAMERA_Z;
use crate::dom;
use crate::input::{self, PointerState};
use crate::render;
use field_core::{Simulation, TickInput};

/// Everything the per-frame callback needs. Shared pieces are Rc'd because
/// the event closures write into them from outside the loop.
pub struct FrameContext<'a> {
    pub sim: Simulation,
    pub gpu: Option<render::GpuState<'a>>,
    pub audio: Rc<RefCell<Option<AudioEngine>>>,

    pub canvas: web::HtmlCanvasElement,
    pub pointer: Rc<RefCell<PointerState>>,
    pub clicks: Rc<RefCell<Vec<Vec3>>>,
    pub hidden: Rc<RefCell<bool>>,

    pub last_instant: Instant,
    pub elapsed: f32,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_raw = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        if *self.hidden.borrow() {
            // Simulation time freezes with the tab; nothing to draw either.
            return;
        }
        // Tab switches and debugger pauses produce huge frame gaps.
        let dt = dt_raw.min(0.1);
        self.elapsed += dt;

        let pointer = *self.pointer.borrow();
        let pointer_world = if pointer.seen {
            input::screen_to_plane(&self.canvas, pointer.x, pointer.y, CAMERA_Z)
        } else {
            Vec3::ZERO
        };
        for click in self.clicks.borrow_mut().drain(..) {
            self.sim.queue_click(click);
        }

        self.sim.set_compact(dom::is_compact_viewport());
        let triggers = self.sim.tick(&TickInput {
            time: self.elapsed,
            dt,
            scroll_progress: dom::scroll_progress(),
            pointer_world,
            pointer_down: pointer.down,
        });
        if let Some(engine) = self.audio.borrow_mut().as_mut() {
            engine.fire(&triggers);
        }

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(
                self.sim.instances(),
                self.sim.line_positions(),
                self.sim.line_vertex_count() as u32,
            ) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    particle_capacity: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, particle_capacity).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
