mod app;
mod ui;
mod viewport;

use app::EditorApp;
use editor_core::EditorSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info,editor_core=info".into()),
        )
        .init();

    let settings = EditorSettings::load();
    let [width, height] = settings.viewport.initial_size;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Scene Editor")
            .with_inner_size([width, height])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "scene-editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(EditorApp::new(cc, settings)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}
