// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod analysis;
mod config;
mod display;
mod gui;
mod resize_dialog;
mod status;
mod types;
use eframe::egui;
// 入口函数
fn main() -> eframe::Result<()> {
    env_logger::init();
    let config = config::AppConfig::load();
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size(config.window_size)
        .with_min_inner_size([800.0, 520.0])
        .with_title("ADC FFT Viewer");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "adc-fft-viewer",
        options,
        Box::new(move |_cc| Box::new(gui::SpectrumViewerApp::new(&config))),
    )
}
