//! Keyboard events from egui, forwarded to the editor's input router

use eframe::egui;
use editor_core::{Editor, InputEvent};

/// Forward key presses to the editor
pub fn handle_keyboard(ctx: &egui::Context, editor: &mut Editor) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let presses: Vec<InputEvent> = ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } => Some(key_event(*key, *modifiers)),
                _ => None,
            })
            .collect()
    });

    for event in presses {
        if let Err(e) = editor.handle(&event) {
            tracing::error!("Key {event:?} failed: {e}");
        }
    }
}

/// DOM-style key name plus the Ctrl (or Cmd) state
fn key_event(key: egui::Key, modifiers: egui::Modifiers) -> InputEvent {
    InputEvent::KeyDown {
        key: key.name().to_string(),
        ctrl: modifiers.command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_core::{EditorAction, InputRouter};
    use shared::TransformMode;

    fn route(key: egui::Key, modifiers: egui::Modifiers) -> Option<EditorAction> {
        InputRouter::with_defaults().route(&key_event(key, modifiers))
    }

    #[test]
    fn test_egui_keys_reach_default_bindings() {
        assert_eq!(route(egui::Key::Delete, egui::Modifiers::NONE), Some(EditorAction::DeleteSelected));
        assert_eq!(route(egui::Key::Escape, egui::Modifiers::NONE), Some(EditorAction::ClearSelection));
        assert_eq!(route(egui::Key::D, egui::Modifiers::COMMAND), Some(EditorAction::DuplicateSelected));
        assert_eq!(
            route(egui::Key::R, egui::Modifiers::NONE),
            Some(EditorAction::SetMode(TransformMode::Rotate))
        );
    }

    #[test]
    fn test_plain_d_is_unbound() {
        assert_eq!(route(egui::Key::D, egui::Modifiers::NONE), None);
    }
}
