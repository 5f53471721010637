use tokio::runtime::Runtime;

mod actions;
mod app;
mod config;
mod constants;
mod errors;
mod events;
mod models;
mod panels;
mod services;
mod state;
mod ui;

use app::ConvertFlowApp;
use config::AppConfig;
use constants::{APP_NAME, APP_VERSION};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting {} {}", APP_NAME, APP_VERSION);

    // Requests run on this runtime; the window stays on the main thread
    let runtime = Runtime::new()?;
    let config = AppConfig::load();
    let app = ConvertFlowApp::new(config.clone(), runtime.handle().clone())?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 450.0])
            .with_title(APP_NAME)
            .with_resizable(true),
        ..Default::default()
    };

    let app_creator =
        move |_cc: &eframe::CreationContext| -> Box<dyn eframe::App> { Box::new(app) };

    eframe::run_native(APP_NAME, options, Box::new(app_creator))
        .map_err(|e| anyhow::anyhow!("Window error: {}", e))?;

    tracing::info!("Application shutting down");
    Ok(())
}
