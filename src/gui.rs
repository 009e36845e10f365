// src/gui.rs
use eframe::egui;
use egui::{Color32, Pos2};
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::AppConfig;
use crate::engine::{self, MotionSession};
use crate::motion::readout::{SEARCHING_TEXT, UNSUPPORTED_TEXT};
use crate::motion::{
    format_reading, render_group_png, swipe_direction, ChannelBufferSet, CubePose, CubeScene,
    GroupSelector, MotionError, PlotStyle, RedrawChannel, RefreshLoop,
};
use crate::recorder::MotionRecorder;
use crate::types::*;
use crate::visualizer::{self, color32};

pub struct HeadMotionApp {
    config: AppConfig,
    selected_tab: ViewTab,
    is_supported: bool,

    // 数据
    buffers: ChannelBufferSet,
    selector: GroupSelector,
    readout: String,
    pose: CubePose,
    scene: CubeScene,

    // 生命周期
    session: MotionSession,
    refresh: RefreshLoop,
    redraw: RedrawChannel,
    recorder: MotionRecorder,

    // 手势
    drag_origin: Option<Pos2>,

    log_messages: Vec<String>,

    // 通讯管道
    rx: Receiver<MotionMessage>,
    tx: Sender<MotionMessage>,
}

impl HeadMotionApp {
    pub fn new(config: AppConfig) -> Result<Self, MotionError> {
        let (tx, rx) = channel();
        let buffers = ChannelBufferSet::with_capacity(config.capacity)?;
        let redraw = RedrawChannel::new();
        let refresh = RefreshLoop::new(config.refresh_interval(), redraw.clone());
        let session = MotionSession::new(config.source.build());
        let mut app = Self {
            selected_tab: ViewTab::Information,
            is_supported: true,
            buffers,
            selector: GroupSelector::default(),
            readout: SEARCHING_TEXT.to_owned(),
            pose: CubePose::default(),
            scene: CubeScene::default(),
            session,
            refresh,
            redraw,
            recorder: MotionRecorder::new(),
            drag_origin: None,
            log_messages: vec!["headmotion ready.".to_owned()],
            rx,
            tx,
            config,
        };
        app.enter_tab(ViewTab::Information);
        Ok(app)
    }

    /// Connects the chart surface: every published redraw repaints `ctx`.
    pub fn attach_surface(&self, ctx: &egui::Context) {
        let ctx = ctx.clone();
        self.redraw.subscribe(move || ctx.request_repaint());
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > 8 {
            self.log_messages.remove(0);
        }
    }

    fn enter_tab(&mut self, tab: ViewTab) {
        self.selected_tab = tab;
        if !self.session.is_available() {
            // 不支持的设备：只显示提示，不再做任何事
            self.is_supported = false;
            self.readout = UNSUPPORTED_TEXT.to_owned();
            self.log("❌ Device not supported");
            return;
        }
        self.is_supported = true;
        if tab == ViewTab::Information {
            self.buffers.clear();
            self.refresh.show();
        }
        if let Err(e) = self.session.start(self.tx.clone()) {
            log::warn!("could not start motion updates: {e}");
            self.log(&format!("❌ {e}"));
        }
    }

    fn leave_tab(&mut self) {
        if self.selected_tab == ViewTab::Information {
            self.refresh.hide();
        }
        self.session.stop();
        self.discard_pending();
    }

    /// Drops readings still queued from a stopped session; log lines are kept.
    fn discard_pending(&mut self) {
        let mut dropped = 0usize;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                MotionMessage::Reading(_) => dropped += 1,
                MotionMessage::Log(s) => self.log(&s),
            }
        }
        if dropped > 0 {
            log::debug!("discarded {dropped} readings from the previous view");
        }
    }

    fn switch_tab(&mut self, tab: ViewTab) {
        if tab != self.selected_tab {
            self.leave_tab();
            self.enter_tab(tab);
        }
    }

    fn pump_messages(&mut self) {
        let recorder = &mut self.recorder;
        let mut logs = Vec::new();
        let latest = engine::drain(
            &self.rx,
            &mut self.buffers,
            |r| recorder.write(r),
            |s| logs.push(s),
        );
        for s in logs {
            self.log(&s);
        }
        if let Some(reading) = latest {
            self.readout = format_reading(&reading);
            self.pose = CubePose::from_attitude(&reading.attitude);
        }
    }

    fn toggle_recording(&mut self) {
        if self.recorder.is_recording() {
            self.recorder.stop();
            self.log("💾 Recording saved.");
            return;
        }
        if !self.is_supported {
            return;
        }
        match self.recorder.start(&self.config.output_dir, "capture") {
            Ok(path) => self.log(&format!("🔴 Recording to {}", path.display())),
            Err(e) => self.log(&format!("❌ Recording failed: {e}")),
        }
    }

    fn export_chart(&mut self) {
        let snapshot = self.selector.snapshot(&self.buffers);
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let name = snapshot.group_name.to_lowercase().replace(' ', "_");
        let path = self.config.output_dir.join(format!("chart_{name}_{secs}.png"));
        let result = render_group_png(&snapshot, PlotStyle::default())
            .and_then(|png| std::fs::write(&path, png).map_err(MotionError::from));
        match result {
            Ok(()) => self.log(&format!("🖼 Saved {}", path.display())),
            Err(e) => {
                log::warn!("chart export failed: {e}");
                self.log(&format!("❌ Export failed: {e}"));
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (left, right) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
            )
        });
        if left {
            self.selector.rotate(-1);
        }
        if right {
            self.selector.rotate(1);
        }
    }

    fn handle_swipe(&mut self, ctx: &egui::Context, chart_rect: egui::Rect) {
        let (pressed, released, origin, pos) = ctx.input(|i| {
            (
                i.pointer.any_pressed(),
                i.pointer.any_released(),
                i.pointer.press_origin(),
                i.pointer.interact_pos(),
            )
        });
        if pressed {
            self.drag_origin = origin.filter(|p| chart_rect.contains(*p));
        }
        if released {
            if let (Some(start), Some(end)) = (self.drag_origin.take(), pos) {
                if let Some(dir) = swipe_direction(start.x, end.x, self.config.swipe_threshold) {
                    self.selector.rotate(dir);
                }
            }
        }
    }

    fn information_view(&mut self, ui: &mut egui::Ui) {
        let chart_height = ui.available_width() * 0.65;
        let text_height = (ui.available_height() - chart_height - 40.0).max(120.0);
        egui::ScrollArea::vertical()
            .max_height(text_height)
            .show(ui, |ui| {
                ui.monospace(&self.readout);
            });
        if !self.is_supported {
            return;
        }
        self.handle_keys(ui.ctx());
        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("◀").clicked() {
                self.selector.rotate(-1);
            }
            ui.label(egui::RichText::new(&self.selector.active().name).strong());
            if ui.button("▶").clicked() {
                self.selector.rotate(1);
            }
            ui.label(
                egui::RichText::new("Swipe the chart or use ← / →")
                    .small()
                    .color(Color32::GRAY),
            );
        });
        if self.buffers.is_empty() {
            return;
        }
        let snapshot = self.selector.snapshot(&self.buffers);
        let (x0, x1) = snapshot.bounds.x;
        let (y0, y1) = snapshot.bounds.y;
        let response = Plot::new("motion_chart")
            .height(chart_height)
            .legend(Legend::default())
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [x0 as f64, y0],
                    [x1 as f64, y1],
                ));
                for series in &snapshot.series {
                    let points: PlotPoints = series
                        .points
                        .iter()
                        .map(|p| [p.sequence() as f64, p.value()])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .name(series.name)
                            .color(color32(series.color)),
                    );
                }
            });
        let chart_rect = response.response.rect;
        self.handle_swipe(ui.ctx(), chart_rect);
    }
}

impl eframe::App for HeadMotionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. 消息处理
        // 本帧整体重绘，只需重新允许合并
        self.redraw.take();
        self.pump_messages();

        // 2. 3D 视图需要连续刷新
        if self.selected_tab == ViewTab::Cube && self.session.is_running() {
            ctx.request_repaint();
        }

        // 3. UI 绘制
        ctx.set_visuals(egui::Visuals::dark());

        egui::SidePanel::left("L").min_width(220.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("headmotion");
            ui.label(format!("Source: {}", self.session.source_name()));
            ui.separator();

            let mut target = self.selected_tab;
            for tab in [ViewTab::Information, ViewTab::Cube] {
                ui.selectable_value(&mut target, tab, tab.title());
            }
            if target != self.selected_tab {
                self.switch_tab(target);
            }

            ui.add_space(20.0);
            ui.separator();
            let rec_btn_text = if self.recorder.is_recording() {
                "⏹ STOP"
            } else {
                "🔴 RECORD"
            };
            if ui
                .add_enabled(self.is_supported, egui::Button::new(rec_btn_text))
                .clicked()
            {
                self.toggle_recording();
            }
            if self.recorder.is_recording() {
                ui.label(
                    egui::RichText::new(format!("Recording... {}", self.recorder.written()))
                        .color(Color32::RED)
                        .small(),
                );
            }
            if ui
                .add_enabled(!self.buffers.is_empty(), egui::Button::new("🖼 SAVE CHART"))
                .clicked()
            {
                self.export_chart();
            }

            ui.add_space(10.0);
            egui::ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.selected_tab.title());
            match self.selected_tab {
                ViewTab::Information => self.information_view(ui),
                ViewTab::Cube => visualizer::draw_face_cube(ui, &self.scene, &self.pose),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn unsupported_device_takes_no_further_action() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            source: SourceConfig::Replay {
                path: dir.path().join("missing.jsonl"),
                speed: 1.0,
            },
            output_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let mut app = HeadMotionApp::new(config).unwrap();
        assert_eq!(app.readout, UNSUPPORTED_TEXT);
        assert!(!app.is_supported);
        assert!(!app.refresh.is_active());
        assert!(!app.session.is_running());

        app.toggle_recording();
        assert!(!app.recorder.is_recording());

        app.switch_tab(ViewTab::Cube);
        app.pump_messages();
        assert!(!app.session.is_running());
        assert_eq!(app.readout, UNSUPPORTED_TEXT);
        assert!(app.buffers.is_empty());
    }

    #[test]
    fn information_view_starts_from_a_clean_chart() {
        let config = AppConfig {
            source: SourceConfig::Simulated {
                rate_hz: 200.0,
                seed: Some(1),
            },
            ..AppConfig::default()
        };
        let mut app = HeadMotionApp::new(config).unwrap();
        app.switch_tab(ViewTab::Cube);
        thread::sleep(Duration::from_millis(300));
        app.switch_tab(ViewTab::Information);
        assert!(app.refresh.is_active());
        thread::sleep(Duration::from_millis(20));
        app.pump_messages();

        let rows: Vec<(u64, f64)> = app
            .buffers
            .rows()
            .map(|r| (r.sequence, r.timestamp))
            .collect();
        assert!(!rows.is_empty());
        assert_eq!(rows[0].0, 0);
        for pair in rows.windows(2) {
            assert!(pair[0].1 < pair[1].1, "timestamps went backwards: {rows:?}");
        }
        // Only the restarted session contributes.
        assert!(rows.iter().all(|(_, t)| *t < 0.2), "stale readings: {rows:?}");
    }

    #[test]
    fn arrow_keys_rotate_before_data_arrives() {
        let capture = tempfile::NamedTempFile::new().unwrap();
        let config = AppConfig {
            source: SourceConfig::Replay {
                path: capture.path().to_path_buf(),
                speed: 1.0,
            },
            ..AppConfig::default()
        };
        let mut app = HeadMotionApp::new(config).unwrap();
        assert!(app.is_supported);
        assert!(app.buffers.is_empty());

        let ctx = egui::Context::default();
        let input = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::ArrowRight,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| app.information_view(ui));
        });
        assert_eq!(app.selector.active_index(), 1);
        assert!(app.buffers.is_empty());
    }
}
