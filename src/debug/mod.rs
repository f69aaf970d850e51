use std::collections::VecDeque;

use glam::Vec2;
use winit::window::Window;

use crate::cat::wardrobe::{Accessory, Customization, Hat};
use crate::ecs::components::ActionState;
use crate::render::GpuState;
use crate::scene::SceneView;

/// Number of frame times to keep in the histogram.
const FRAME_HISTORY_LEN: usize = 300;
/// Speech bubble text wraps at this width (points).
const BUBBLE_MAX_WIDTH: f32 = 180.0;

/// Something the user asked for from the control panel. Applied by the app.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    SetOutfit(Customization),
    Say(String),
    SetThinking(bool),
    ForceAction(ActionState),
}

/// Control panel and speech bubble, powered by egui.
pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,

    pub visible: bool,
    f12_was_down: bool,

    /// Rolling window of frame times (seconds).
    frame_times: VecDeque<f64>,
    pub fps: f64,
    pub frame_time_avg: f64,

    /// Draft text for the Say button.
    message_draft: String,
    /// Raw index into `ActionState`, decoded on Force.
    force_index: u8,

    frame_count: u64,
    log_timer: f64,
    log_frame_count: u32,
    log_frame_sum: f64,
    log_frame_min: f64,
    log_frame_max: f64,
}

impl DebugOverlay {
    pub fn new(window: &Window, gpu: &GpuState) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            visible: false,
            f12_was_down: false,
            frame_times: VecDeque::with_capacity(FRAME_HISTORY_LEN),
            fps: 0.0,
            frame_time_avg: 0.0,
            message_draft: String::new(),
            force_index: ActionState::Idle as u8,
            frame_count: 0,
            log_timer: 0.0,
            log_frame_count: 0,
            log_frame_sum: 0.0,
            log_frame_min: f64::MAX,
            log_frame_max: 0.0,
        }
    }

    /// Record a frame time, update rolling stats, and periodically log.
    pub fn record_frame(&mut self, dt: f64) {
        self.frame_count += 1;
        if self.frame_times.len() == FRAME_HISTORY_LEN {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);

        let sum: f64 = self.frame_times.iter().sum();
        self.frame_time_avg = sum / self.frame_times.len() as f64;
        if self.frame_time_avg > 0.0 {
            self.fps = 1.0 / self.frame_time_avg;
        }

        // Periodic log (every 5s).
        self.log_frame_count += 1;
        self.log_frame_sum += dt;
        self.log_frame_min = self.log_frame_min.min(dt);
        self.log_frame_max = self.log_frame_max.max(dt);
        self.log_timer += dt;

        if self.log_timer >= 5.0 {
            let avg_ms = (self.log_frame_sum / self.log_frame_count as f64) * 1000.0;
            let fps = self.log_frame_count as f64 / self.log_timer;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                fps,
                avg_ms,
                self.log_frame_min * 1000.0,
                self.log_frame_max * 1000.0,
                self.frame_count,
            );
            self.log_timer = 0.0;
            self.log_frame_count = 0;
            self.log_frame_sum = 0.0;
            self.log_frame_min = f64::MAX;
            self.log_frame_max = 0.0;
        }
    }

    /// Handle F12 toggle. Returns true if visibility changed.
    pub fn poll_toggle(&mut self, f12_down: bool) -> bool {
        // Edge-detect: trigger on press, not hold.
        if f12_down && !self.f12_was_down {
            self.f12_was_down = true;
            self.visible = !self.visible;
            return true;
        }
        if !f12_down {
            self.f12_was_down = false;
        }
        false
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        response.consumed
    }

    /// True while the pointer is over an egui widget.
    pub fn wants_pointer(&self) -> bool {
        self.egui_ctx.wants_pointer_input() || self.egui_ctx.is_pointer_over_area()
    }

    /// Run the egui frame and produce paint output plus any panel actions.
    /// `bubble_anchor` is the bubble's bottom-centre in physical pixels.
    pub fn run_frame(
        &mut self,
        window: &Window,
        screen_w: u32,
        screen_h: u32,
        view: Option<&SceneView>,
        bubble_anchor: Option<Vec2>,
        actions: &mut Vec<PanelAction>,
    ) -> (
        Vec<egui::epaint::ClippedPrimitive>,
        egui::TexturesDelta,
        egui_wgpu::ScreenDescriptor,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let ui_state = UiSnapshot {
            visible: self.visible,
            fps: self.fps,
            frame_time_avg: self.frame_time_avg,
            frame_times: self.frame_times.iter().copied().collect(),
        };

        // Mutable controls, written back after run().
        let mut message_draft = std::mem::take(&mut self.message_draft);
        let mut force_index = self.force_index;

        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            if let (Some(v), Some(anchor)) = (view, bubble_anchor) {
                draw_bubble(ctx, v, anchor);
            }
            draw_panel(ctx, &ui_state, view, &mut message_draft, &mut force_index, actions);
        });

        self.message_draft = message_draft;
        self.force_index = force_index;

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [screen_w, screen_h],
            pixels_per_point,
        };

        (clipped_primitives, full_output.textures_delta, screen_descriptor)
    }

    /// Upload egui textures and buffers. Call before draw_egui render pass.
    pub fn prepare_egui(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::epaint::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor)
    }

    /// Render egui into the given render pass.
    pub fn render_egui(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::epaint::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, textures_delta: &egui::TexturesDelta) {
        for &id in &textures_delta.free {
            self.egui_renderer.free_texture(&id);
        }
    }
}

struct UiSnapshot {
    visible: bool,
    fps: f64,
    frame_time_avg: f64,
    frame_times: Vec<f64>,
}

/// White rounded bubble above the cat's head.
fn draw_bubble(ctx: &egui::Context, view: &SceneView, anchor_px: Vec2) {
    let Some(text) = view.dialogue.bubble_text() else {
        return;
    };
    let ppp = ctx.pixels_per_point();

    let bubble_frame = egui::Frame::NONE
        .fill(egui::Color32::WHITE)
        .stroke(egui::Stroke::new(2.0, egui::Color32::from_rgb(0x33, 0x33, 0x33)))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(10, 6));

    egui::Area::new(egui::Id::new("speech_bubble"))
        .fixed_pos(egui::pos2(anchor_px.x / ppp, anchor_px.y / ppp))
        .pivot(egui::Align2::CENTER_BOTTOM)
        .interactable(false)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            bubble_frame.show(ui, |ui| {
                ui.set_max_width(BUBBLE_MAX_WIDTH);
                ui.label(
                    egui::RichText::new(text)
                        .color(egui::Color32::from_rgb(0x33, 0x33, 0x33))
                        .size(13.0),
                );
            });
        });
}

fn draw_panel(
    ctx: &egui::Context,
    s: &UiSnapshot,
    view: Option<&SceneView>,
    message_draft: &mut String,
    force_index: &mut u8,
    actions: &mut Vec<PanelAction>,
) {
    if !s.visible {
        return;
    }

    let panel_frame = egui::Frame::NONE
        .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 20, 220))
        .corner_radius(6.0)
        .inner_margin(10.0);

    egui::Window::new("Cat")
        .default_pos([10.0, 10.0])
        .default_width(300.0)
        .resizable(true)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(220));

            // --- Performance ---
            ui.heading("Performance");
            ui.label(format!(
                "FPS: {:.1} | {:.2}ms avg",
                s.fps,
                s.frame_time_avg * 1000.0
            ));
            draw_frame_history(ui, &s.frame_times);
            ui.add_space(4.0);

            let Some(v) = view else {
                ui.label("No cat mounted.");
                return;
            };

            // --- State ---
            ui.heading("State");
            ui.label(
                egui::RichText::new(format!(
                    "action   {}\nposition ({:.1}, {:.1})\ntarget   ({:.1}, {:.1})\nfacing   {:?}\nframe    {}",
                    v.pose.action.label(),
                    v.pose.position.x,
                    v.pose.position.y,
                    v.target.x,
                    v.target.y,
                    v.pose.facing,
                    v.pose.frame,
                ))
                .monospace(),
            );
            ui.label(format!(
                "blink: {} | hover: {} | reacting: {}",
                v.pose.blinking, v.pose.hovered, v.interacting
            ));
            ui.label(format!(
                "Hearts: {} | Ticks: {} | Timers: {}",
                v.hearts.len(),
                v.ticks,
                v.timers
            ));
            ui.add_space(4.0);

            // --- Wardrobe ---
            ui.heading("Wardrobe");
            let mut outfit = v.pose.outfit;
            ui.horizontal(|ui| {
                ui.label("Hat:");
                egui::ComboBox::from_id_salt("hat")
                    .selected_text(outfit.hat.label())
                    .show_ui(ui, |ui| {
                        for hat in Hat::ALL {
                            ui.selectable_value(&mut outfit.hat, hat, hat.label());
                        }
                    });
            });
            ui.horizontal(|ui| {
                ui.label("Accessory:");
                egui::ComboBox::from_id_salt("accessory")
                    .selected_text(outfit.accessory.label())
                    .show_ui(ui, |ui| {
                        for acc in Accessory::ALL {
                            ui.selectable_value(&mut outfit.accessory, acc, acc.label());
                        }
                    });
            });
            if outfit != v.pose.outfit {
                actions.push(PanelAction::SetOutfit(outfit));
            }
            ui.add_space(4.0);

            // --- Dialogue ---
            ui.heading("Dialogue");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(message_draft);
                if ui.button("Say").clicked() {
                    actions.push(PanelAction::Say(message_draft.clone()));
                }
            });
            let mut thinking = v.dialogue.thinking;
            if ui.checkbox(&mut thinking, "Thinking").changed() {
                actions.push(PanelAction::SetThinking(thinking));
            }
            ui.add_space(4.0);

            // --- Debug ---
            ui.heading("Force Action");
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("force_action")
                    .selected_text(ActionState::from_repr(*force_index).label())
                    .show_ui(ui, |ui| {
                        for action in ActionState::ALL {
                            ui.selectable_value(force_index, action as u8, action.label());
                        }
                    });
                if ui.button("Force").clicked() {
                    actions.push(PanelAction::ForceAction(ActionState::from_repr(*force_index)));
                }
            });
            ui.add_space(4.0);

            ui.label("H: Hat | A: Accessory | F12: Toggle | ESC: Quit");
            ui.label("Right-click: Walk here");
        });
}

fn draw_frame_history(ui: &mut egui::Ui, frame_times: &[f64]) {
    if frame_times.is_empty() {
        return;
    }
    let max_time = frame_times.iter().copied().fold(0.0f64, f64::max).max(0.020);

    let (response, painter) = ui.allocate_painter(egui::vec2(280.0, 40.0), egui::Sense::hover());
    let rect = response.rect;
    let bar_width = rect.width() / frame_times.len() as f32;

    for (i, &t) in frame_times.iter().enumerate() {
        let h = (t / max_time) as f32 * rect.height();
        let x = rect.left() + i as f32 * bar_width;
        let color = if t > 0.01667 {
            egui::Color32::from_rgb(255, 100, 80)
        } else {
            egui::Color32::from_rgb(80, 200, 120)
        };
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(x, rect.bottom() - h),
                egui::pos2(x + bar_width, rect.bottom()),
            ),
            0.0,
            color,
        );
    }
}
