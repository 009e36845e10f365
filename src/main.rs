// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod engine;
mod gui;
mod motion;
mod recorder;
mod types;
mod visualizer;
use anyhow::{anyhow, Context};
use eframe::egui;
// 入口函数
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = config::AppConfig::load().context("failed to load configuration")?;
    log::info!(
        "capacity {} samples, refresh every {} ms, source {:?}",
        config.capacity,
        config.refresh_interval_ms,
        config.source
    );
    let app = gui::HeadMotionApp::new(config)?;
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 820.0])
        .with_min_inner_size([640.0, 560.0])
        .with_title("headmotion");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "headmotion",
        options,
        Box::new(move |cc| {
            // 图表刷新 -> 重绘
            app.attach_surface(&cc.egui_ctx);
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow!("{e}"))
}
