use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::cat::wardrobe::Customization;
use crate::click::ClickState;
use crate::config::CardConfig;
use crate::debug::{DebugOverlay, PanelAction};
use crate::render::instance::{self, RectInstance, Stage};
use crate::render::pose::Pose;
use crate::render::sprite::SpriteRect;
use crate::render::GpuState;
use crate::scene::{Scene, SceneView};
use crate::schedule::SimEvent;

/// Max wall-clock time fed to the scene per frame (prevents a tick burst after a stall).
const MAX_FRAME_MS: f64 = 250.0;

/// Top-level application state.
struct App {
    config: CardConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    debug: Option<DebugOverlay>,

    scene: Scene,
    clicks: ClickState,
    left_down: bool,
    right_down: bool,

    last_frame_time: Option<Instant>,
    /// Sub-millisecond remainder carried between frames.
    carry_ms: f64,

    screen_w: u32,
    screen_h: u32,

    // Reusable buffers (avoid per-frame allocation)
    sprite_buf: Vec<SpriteRect>,
    instance_buf: Vec<RectInstance>,
    pointer_events: Vec<SimEvent>,
    panel_actions: Vec<PanelAction>,

    /// Set when startup fails inside the event loop; returned from `run`.
    fatal: Option<Box<dyn std::error::Error>>,
}

impl App {
    fn new(config: CardConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            debug: None,
            scene: Scene::new(fastrand::Rng::new()),
            clicks: ClickState::new(),
            left_down: false,
            right_down: false,
            last_frame_time: None,
            carry_ms: 0.0,
            screen_w: 0,
            screen_h: 0,
            sprite_buf: Vec::with_capacity(64),
            instance_buf: Vec::with_capacity(128),
            pointer_events: Vec::with_capacity(4),
            panel_actions: Vec::with_capacity(4),
            fatal: None,
        }
    }

    fn stage(&self) -> Stage {
        Stage {
            screen_w: self.screen_w as f32,
            screen_h: self.screen_h as f32,
            zoom: self.config.window.zoom,
        }
    }

    /// Convert wall-clock time into whole simulated milliseconds.
    fn advance_clock(&mut self, dt: f64) {
        self.carry_ms += (dt * 1000.0).min(MAX_FRAME_MS);
        let whole = self.carry_ms.floor();
        self.carry_ms -= whole;
        self.scene.advance(whole as u64);
    }

    /// Hit-test the pointer against the cat and queue the resulting events.
    fn route_pointer(&mut self, view: Option<&SceneView>) {
        let stage = self.stage();
        let hit_box = view.map(|v| stage.hit_box(&Pose::derive(&v.pose), v.pose.position));
        let blocked = self.debug.as_ref().is_some_and(|d| d.wants_pointer());

        self.pointer_events.clear();
        self.clicks.update(
            self.left_down,
            self.right_down,
            hit_box,
            |p| stage.floor_point(p),
            blocked,
            &mut self.pointer_events,
        );
        for event in self.pointer_events.drain(..) {
            self.scene.post(event);
        }
    }

    fn apply_panel_actions(&mut self) {
        for action in std::mem::take(&mut self.panel_actions) {
            match action {
                PanelAction::SetOutfit(outfit) => self.scene.set_outfit(outfit),
                PanelAction::Say(text) => {
                    if let Some(mut d) = self.scene.dialogue_mut() {
                        d.show_reply(Ok(text));
                    }
                }
                PanelAction::SetThinking(on) => {
                    if let Some(mut d) = self.scene.dialogue_mut() {
                        if on {
                            d.start_thinking();
                        } else {
                            d.thinking = false;
                        }
                    }
                }
                PanelAction::ForceAction(a) => self.scene.post(SimEvent::ForceAction(a)),
            }
        }
    }

    fn cycle_outfit(&mut self, f: impl FnOnce(Customization) -> Customization) {
        if let Some(view) = self.scene.snapshot() {
            let outfit = f(view.pose.outfit);
            log::debug!(
                "Outfit: {} / {}",
                outfit.hat.label(),
                outfit.accessory.label()
            );
            self.scene.set_outfit(outfit);
        }
    }

    fn render(&mut self, view: Option<&SceneView>) {
        let stage = self.stage();

        self.instance_buf.clear();
        if let Some(v) = view {
            instance::build_cat(&stage, v, &mut self.sprite_buf, &mut self.instance_buf);
            instance::build_hearts(&stage, v, &mut self.instance_buf);
        }

        let bubble_anchor =
            view.map(|v| stage.bubble_anchor(&Pose::derive(&v.pose), v.pose.position));

        let (Some(gpu), Some(window)) = (&mut self.gpu, &self.window) else {
            return;
        };
        gpu.update_instances(&self.instance_buf);

        let Some(mut frame) = gpu.begin_frame() else {
            return;
        };
        gpu.draw_rects(&mut frame.encoder, &frame.view);

        let Some(debug) = &mut self.debug else {
            gpu.finish_frame(frame.encoder, frame.output, Vec::new());
            return;
        };

        let (primitives, textures_delta, screen_descriptor) = debug.run_frame(
            window,
            self.screen_w,
            self.screen_h,
            view,
            bubble_anchor,
            &mut self.panel_actions,
        );
        let egui_cmds = debug.prepare_egui(
            &gpu.device,
            &gpu.queue,
            &mut frame.encoder,
            &primitives,
            &textures_delta,
            &screen_descriptor,
        );
        {
            let mut pass = GpuState::begin_egui_pass(&mut frame.encoder, &frame.view);
            debug.render_egui(&mut pass, &primitives, &screen_descriptor);
        }
        gpu.finish_frame(frame.encoder, frame.output, egui_cmds);
        debug.free_textures(&textures_delta);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_mounted() {
            self.scene.unmount();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let wc = &self.config.window;
        let attrs = WindowAttributes::default()
            .with_title(wc.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(wc.width, wc.height))
            .with_visible(false);

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fatal = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.screen_w = size.width;
        self.screen_h = size.height;
        log::info!("Window created: {}x{}", size.width, size.height);

        let gpu = match GpuState::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(e) => {
                self.fatal = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        log::info!("wgpu + rect pipeline initialized");

        self.debug = Some(DebugOverlay::new(&window, &gpu));
        self.gpu = Some(gpu);

        self.scene
            .mount(self.config.cat.outfit(), self.config.cat.greeting.clone());

        event_loop.set_control_flow(ControlFlow::Poll);
        window.set_visible(true);
        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let egui_consumed = match (&mut self.debug, &self.window) {
            (Some(debug), Some(window)) => debug.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.screen_w = new_size.width;
                    self.screen_h = new_size.height;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.clicks
                    .set_cursor(Some(Vec2::new(position.x as f32, position.y as f32)));
            }
            WindowEvent::CursorLeft { .. } => {
                self.clicks.set_cursor(None);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let down = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.left_down = down,
                    MouseButton::Right => self.right_down = down,
                    _ => {}
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                match code {
                    KeyCode::F12 => {
                        if let Some(debug) = &mut self.debug {
                            debug.poll_toggle(pressed);
                        }
                    }
                    KeyCode::Escape if pressed => {
                        log::info!("ESC pressed, exiting");
                        self.shutdown(event_loop);
                    }
                    // Typing into the panel must not restyle the cat.
                    KeyCode::KeyH if pressed && !event.repeat && !egui_consumed => {
                        self.cycle_outfit(|o| Customization {
                            hat: o.hat.next(),
                            ..o
                        });
                    }
                    KeyCode::KeyA if pressed && !event.repeat && !egui_consumed => {
                        self.cycle_outfit(|o| Customization {
                            accessory: o.accessory.next(),
                            ..o
                        });
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                // --- Timing ---
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();
                    if let Some(debug) = &mut self.debug {
                        debug.record_frame(dt);
                    }

                    // Pointer events land at the current time, before this frame's ticks.
                    let view = self.scene.snapshot();
                    self.route_pointer(view.as_ref());
                    self.advance_clock(dt);
                }
                self.last_frame_time = Some(now);

                // --- Render ---
                let view = self.scene.snapshot();
                self.render(view.as_ref());
                self.apply_panel_actions();
            }
            _ => {}
        }
    }
}

/// Create the event loop and run until the window closes.
pub fn run(config: CardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
