//! 3D viewport panel with OpenGL rendering

mod gl_renderer;

use std::sync::{Arc, Mutex};

use editor_core::render_driver::FrameInfo;
use editor_core::viewport::mesh::LineMeshData;
use editor_core::{Editor, InputEvent};
use egui::Ui;

use gl_renderer::{GlRenderer, RenderParams};

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    helper_lines: Option<Arc<LineMeshData>>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            gl_renderer: None,
            helper_lines: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("GL renderer unavailable: {e}"),
        }
    }

    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, editor: &mut Editor) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );

        self.sync_size(rect, editor);

        // ── Gizmo and camera controls ─────────────────────────────
        self.handle_gizmo_and_camera(&response, ui, rect, editor);

        // ── Scroll zoom ─────────────────────────────
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if response.hovered() && scroll.abs() > 0.1 {
            editor.driver_mut().zoom(scroll * 0.01);
        }

        // ── Object selection via click ──────────────────────────
        self.handle_selection(&response, ui, rect, editor);

        // Tick even when hidden so the frame counter never skips
        let frame = editor.frame();

        if !ui.is_rect_visible(rect) {
            return;
        }

        self.render_gl(ui, rect, editor, &frame);
        self.draw_overlays(ui, rect, editor);
    }

    fn sync_size(&self, rect: egui::Rect, editor: &mut Editor) {
        let (w, h) = (rect.width(), rect.height());
        if w <= 0.0 || h <= 0.0 || editor.driver().size() == glam::Vec2::new(w, h) {
            return;
        }
        if let Err(e) = editor.handle(&InputEvent::Resize { width: w, height: h }) {
            tracing::warn!("{e}");
        }
    }

    fn handle_gizmo_and_camera(
        &mut self,
        response: &egui::Response,
        ui: &Ui,
        rect: egui::Rect,
        editor: &mut Editor,
    ) {
        // ── Gizmo drag handling ─────────────────────────────────
        if editor.is_dragging_gizmo() {
            if response.dragged_by(egui::PointerButton::Primary) {
                let delta = response.drag_delta();
                editor.drag_gizmo(delta.x, delta.y);
            }
            // End drag when button released
            if response.drag_stopped() || !response.dragged_by(egui::PointerButton::Primary) {
                editor.end_gizmo_drag();
            }
            return;
        }

        // ── Camera controls (only when not dragging gizmo) ──
        if response.dragged_by(egui::PointerButton::Middle)
            || (response.dragged_by(egui::PointerButton::Primary) && ui.input(|i| i.modifiers.alt))
        {
            let delta = response.drag_delta();
            editor.driver_mut().orbit(delta.x * 0.5, delta.y * 0.5);
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            editor.driver_mut().pan(delta.x * 0.01, delta.y * 0.01);
        }

        // ── Gizmo drag start on LMB drag ───────────────────
        if response.drag_started_by(egui::PointerButton::Primary) && !ui.input(|i| i.modifiers.alt) {
            let pointer_pos = response.interact_pointer_pos().or_else(|| response.hover_pos());
            if let Some(pos) = pointer_pos {
                let local = pos - rect.min;
                editor.begin_gizmo_drag(local.x, local.y);
            }
        }
    }

    fn handle_selection(
        &mut self,
        response: &egui::Response,
        ui: &Ui,
        rect: egui::Rect,
        editor: &mut Editor,
    ) {
        if !response.clicked() || ui.input(|i| i.modifiers.alt) || editor.is_dragging_gizmo() {
            return;
        }

        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let local = pos - rect.min;

        // Don't pick through a visible gizmo handle
        if editor.gizmo_axis_at(local.x, local.y).is_some() {
            return;
        }

        if let Err(e) = editor.handle(&InputEvent::PointerClick { x: local.x, y: local.y }) {
            tracing::error!("Click failed: {e}");
        }
    }

    fn render_gl(&mut self, ui: &mut Ui, rect: egui::Rect, editor: &Editor, frame: &FrameInfo) {
        let Some(gl_renderer) = &self.gl_renderer else {
            ui.painter().rect_filled(rect, 0.0, egui::Color32::from_rgb(30, 30, 35));
            return;
        };
        let renderer = gl_renderer.clone();

        let objects = editor.draw_list();
        let helpers = self
            .helper_lines
            .get_or_insert_with(|| Arc::new(editor.helper_lines()))
            .clone();
        let gizmo_lines = editor.gizmo_lines();
        let selected = editor.selected().cloned();
        let view_projection = glam::Mat4::from_cols_array(&frame.view_projection);
        let bg_color = editor.settings().viewport.background_color;

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];

                if let Ok(mut r) = renderer.lock() {
                    r.sync_helpers(gl, &helpers);
                    r.sync_gizmo(gl, gizmo_lines.as_ref());

                    let params = RenderParams {
                        viewport,
                        view_projection,
                        bg_color,
                        objects: &objects,
                        selected: selected.clone(),
                    };
                    r.paint(gl, &params);
                }
            })),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, editor: &Editor) {
        let painter = ui.painter_at(rect);

        // Navigation hint
        if editor.object_count() == 0 {
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() - 20.0),
                egui::Align2::CENTER_BOTTOM,
                "Add a shape from the toolbar. Middle-drag or Alt+drag to orbit, right-drag to pan, scroll to zoom",
                egui::FontId::proportional(11.0),
                egui::Color32::from_rgb(100, 100, 110),
            );
        }

        let camera = editor.driver().camera();
        let overlay_rect = egui::Rect::from_min_size(
            egui::pos2(rect.right() - 140.0, rect.top() + 4.0),
            egui::vec2(136.0, 44.0),
        );
        painter.rect_filled(
            overlay_rect,
            4.0,
            egui::Color32::from_rgba_premultiplied(0, 0, 0, 140),
        );
        painter.text(
            overlay_rect.min + egui::vec2(6.0, 4.0),
            egui::Align2::LEFT_TOP,
            format!(
                "Dist: {:.1}\nYaw: {:.0}  Pitch: {:.0}",
                camera.distance,
                camera.yaw.to_degrees(),
                camera.pitch.to_degrees(),
            ),
            egui::FontId::monospace(10.0),
            egui::Color32::from_rgb(160, 160, 170),
        );
    }
}
