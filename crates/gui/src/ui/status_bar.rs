use editor_core::Editor;
use egui::Ui;

pub fn show(ui: &mut Ui, editor: &Editor) {
    ui.horizontal(|ui| {
        ui.weak(format!("Objects: {}", editor.object_count()));

        ui.separator();

        match editor.selected().and_then(|id| editor.object(id)) {
            Some(object) => {
                let [x, y, z] = object.transform.position;
                ui.label(format!("Selected: {} ({x:.2}, {y:.2}, {z:.2})", object.name));
            }
            None => {
                ui.weak("Click a shape to select it");
            }
        }

        ui.separator();
        ui.weak(format!("Mode: {}", editor.mode().name()));

        // Right-aligned frame counter
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("Frame {}", editor.driver().frame_count()));
        });
    });
}
