//! Newton's cradle entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, PointerEvent};

    use newtons_cradle::audio::{AudioManager, ImpactSoundGate};
    use newtons_cradle::consts::SIM_DT;
    use newtons_cradle::input::DragController;
    use newtons_cradle::renderer::{CradleRenderer, SceneFrame, cradle_scene};
    use newtons_cradle::{Cradle, Settings};

    /// Slider element ids, in page order
    const SLIDERS: [&str; 5] = ["ball-count", "rope-length", "gap", "gravity", "volume"];

    /// App instance holding all state
    struct App {
        cradle: Cradle,
        drag: DragController,
        settings: Settings,
        sound_gate: ImpactSoundGate,
        audio: AudioManager,
        renderer: Option<CradleRenderer>,
        last_time: f64,
        /// Canvas pixels per CSS pixel
        dpr: f32,
    }

    impl App {
        fn new(settings: Settings) -> Result<Self, newtons_cradle::CradleError> {
            let mut sound_gate = ImpactSoundGate::default();
            sound_gate.set_master_volume(settings.master_volume);
            sound_gate.set_muted(settings.muted);
            Ok(Self {
                cradle: Cradle::new(settings.to_params())?,
                drag: DragController::new(),
                settings,
                sound_gate,
                audio: AudioManager::new(),
                renderer: None,
                last_time: 0.0,
                dpr: 1.0,
            })
        }

        /// CSS offset from a pointer event to simulation space
        fn event_to_world(&self, event: &PointerEvent) -> Option<Vec2> {
            let renderer = self.renderer.as_ref()?;
            let screen = Vec2::new(event.offset_x() as f32, event.offset_y() as f32) * self.dpr;
            Some(renderer.view.screen_to_world(screen))
        }

        fn pointer_down(&mut self, event: &PointerEvent) {
            // First gesture unlocks audio
            self.audio.resume();
            let Some(point) = self.event_to_world(event) else { return };
            if let Err(e) = self.drag.pointer_down(&mut self.cradle, point) {
                log::warn!("Grab failed: {}", e);
            }
        }

        fn pointer_move(&mut self, event: &PointerEvent) {
            if self.drag.held().is_none() {
                return;
            }
            let Some(point) = self.event_to_world(event) else { return };
            if let Err(e) = self.drag.pointer_move(&mut self.cradle, point) {
                log::warn!("Drag failed: {}", e);
                self.drag.cancel();
            }
        }

        fn pointer_up(&mut self) {
            if let Err(e) = self.drag.pointer_up(&mut self.cradle) {
                log::warn!("Release failed: {}", e);
            }
        }

        /// Apply a slider change, rebuilding the row when the count changed
        fn apply_slider(&mut self, id: &str, value: f32) {
            if !self.settings.apply_slider(id, value) {
                log::warn!("Unknown slider: {}", id);
                return;
            }
            self.sound_gate.set_master_volume(self.settings.master_volume);

            let params = self.settings.to_params();
            match self.cradle.set_params(params) {
                Ok(rebuilt) => {
                    if rebuilt {
                        self.drag.cancel();
                    }
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.fit_to(&params);
                    }
                }
                Err(e) => log::warn!("Rejected settings: {}", e),
            }
            self.settings.save();
        }

        fn set_muted(&mut self, muted: bool) {
            self.settings.muted = muted;
            self.sound_gate.set_muted(muted);
            self.settings.save();
        }

        fn reset(&mut self) {
            self.drag.cancel();
            self.cradle.reset();
        }

        /// Run simulation steps and sound for one display frame
        fn update(&mut self, dt: f32, time: f64) {
            let collisions = self.cradle.advance(dt);
            if let Some(gain) = self.sound_gate.offer(&collisions, time / 1000.0) {
                self.audio.play_clack(gain);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let anchors = self.cradle.anchors();
            let positions = self.cradle.positions();
            let params = *self.cradle.params();
            let vertices = cradle_scene(&SceneFrame {
                anchors: &anchors,
                positions: &positions,
                ball_radius: params.ball_radius,
                rope_length: params.rope_length,
                held: self.drag.held(),
            });

            if let Some(ref mut renderer) = self.renderer {
                match renderer.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        renderer.resize(renderer.size.0, renderer.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Newton's cradle starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio() as f32;
        let (width, height) = canvas_size(&canvas, dpr);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let mut app = App::new(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        app.dpr = dpr;
        let app = Rc::new(RefCell::new(app));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let params = *app.borrow().cradle.params();
        let renderer = CradleRenderer::new(surface, &adapter, width, height, &params)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        app.borrow_mut().renderer = Some(renderer);

        setup_pointer_handlers(&canvas, app.clone());
        setup_controls(app.clone());
        setup_resize(canvas, app.clone());

        request_animation_frame(app);

        log::info!("Newton's cradle running!");
        Ok(())
    }

    /// Canvas backing size in device pixels
    fn canvas_size(canvas: &HtmlCanvasElement, dpr: f32) -> (u32, u32) {
        let w = (canvas.client_width() as f32 * dpr).max(1.0) as u32;
        let h = (canvas.client_height() as f32 * dpr).max(1.0) as u32;
        (w, h)
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Pointer down - grab
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                // Keep receiving moves while the pointer leaves the canvas
                let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                app.borrow_mut().pointer_down(&event);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move - steer
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().pointer_move(&event);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up / cancel - release
        for name in ["pointerup", "pointercancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                app.borrow_mut().pointer_up();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in SLIDERS {
            let Some(input) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                log::warn!("Slider #{} missing", id);
                continue;
            };

            // Show the stored value
            {
                let a = app.borrow();
                let s = &a.settings;
                let value = match id {
                    "ball-count" => s.ball_count as f64,
                    "rope-length" => s.rope_length as f64,
                    "gap" => s.gap as f64,
                    "gravity" => s.gravity as f64,
                    _ => s.master_volume as f64,
                };
                input.set_value_as_number(value);
            }

            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let value = input_clone.value_as_number();
                if value.is_finite() {
                    app.borrow_mut().apply_slider(id, value as f32);
                }
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(checkbox) = document
            .get_element_by_id("mute")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            checkbox.set_checked(app.borrow().settings.muted);
            let app = app.clone();
            let checkbox_clone = checkbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().set_muted(checkbox_clone.checked());
            });
            let _ = checkbox
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().reset();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio() as f32);
            let (width, height) = canvas_size(&canvas, dpr);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            a.dpr = dpr;
            if let Some(renderer) = a.renderer.as_mut() {
                renderer.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Newton's cradle (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the interactive version");

    let settings = match std::env::args().nth(1) {
        Some(path) => match load_settings_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}: {}", path, e);
                newtons_cradle::Settings::default()
            }
        },
        None => newtons_cradle::Settings::default(),
    };

    if let Err(e) = headless_demo(&settings) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings_file(path: &str) -> Result<newtons_cradle::Settings, newtons_cradle::CradleError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| newtons_cradle::CradleError::Settings(e.to_string()))?;
    newtons_cradle::Settings::from_json(&json)
}

/// Pull the first ball out, let go and report the swing
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(settings: &newtons_cradle::Settings) -> Result<(), newtons_cradle::CradleError> {
    use newtons_cradle::Cradle;

    const FRAME_DT: f32 = 1.0 / 60.0;
    const SECONDS: f32 = 3.0;

    let mut cradle = Cradle::new(settings.to_params())?;
    let last = cradle.params().ball_count - 1;

    cradle.set_drag_state(0, Some(-0.8))?;
    cradle.step_fixed();
    cradle.set_drag_state(0, None)?;

    let mut hits = 0usize;
    for frame in 0..(SECONDS / FRAME_DT) as u32 {
        for c in cradle.advance(FRAME_DT) {
            hits += 1;
            if c.intensity > 0.1 {
                log::info!(
                    "frame {:>3}: {}|{} dv={:.1} px/s intensity={:.2}",
                    frame,
                    c.left,
                    c.right,
                    c.relative_speed,
                    c.intensity
                );
            }
        }
    }

    println!(
        "{} balls, {} steps, {} collisions",
        cradle.params().ball_count,
        cradle.ticks(),
        hits
    );
    for (i, ball) in cradle.state().balls.iter().enumerate() {
        let tag = if i == 0 || i == last { "*" } else { " " };
        println!(
            "{} ball {}: angle {:+.3} rad, w {:+.3} rad/s",
            tag, i, ball.angle, ball.angular_vel
        );
    }
    Ok(())
}
