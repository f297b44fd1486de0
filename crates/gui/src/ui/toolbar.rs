//! Toolbar: one button per shape kind, mode switches and selection actions

use editor_core::Editor;
use egui::Ui;
use shared::{ShapeKind, TransformMode};

const MODES: [(TransformMode, &str, &str); 3] = [
    (TransformMode::Translate, "Move", "Translate (T)"),
    (TransformMode::Rotate, "Rotate", "Rotate (R)"),
    (TransformMode::Scale, "Scale", "Scale (S)"),
];

pub fn show(ui: &mut Ui, editor: &mut Editor) {
    ui.horizontal(|ui| {
        for kind in ShapeKind::ALL {
            if ui
                .button(kind.label())
                .on_hover_text(format!("Add a {} at a random spot", kind.name()))
                .clicked()
            {
                editor.add_shape(kind);
            }
        }

        ui.separator();

        let current = editor.mode();
        for (mode, label, hint) in MODES {
            if ui
                .selectable_label(current == mode, label)
                .on_hover_text(hint)
                .clicked()
            {
                editor.set_mode(mode);
            }
        }

        ui.separator();

        let has_selection = editor.selected().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new("Duplicate"))
            .on_hover_text("Ctrl+D")
            .clicked()
        {
            editor.duplicate_selected();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Delete"))
            .on_hover_text("Delete")
            .clicked()
        {
            editor.delete_selected();
        }
    });
}
