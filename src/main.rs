use eframe::egui;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use dataset_tagger::settings::Settings;

mod app;
mod dialogs;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dataset Tagger",
        native_options,
        Box::new(|cc| Ok(Box::new(app::TaggerApp::new(cc, settings)))),
    )
}
