// src/visualizer.rs
use crate::motion::{CubeFrame, CubePose, CubeScene, ProjectedFeature, SeriesColor};
use eframe::egui;
use egui::{Color32, Pos2, Rect, Shape, Stroke, Vec2};

pub fn color32(c: SeriesColor) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

fn shaded(base: [u8; 3], shade: f32) -> Color32 {
    let s = |v: u8| (v as f32 * shade).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(s(base[0]), s(base[1]), s(base[2]))
}

pub fn draw_face_cube(ui: &mut egui::Ui, scene: &CubeScene, pose: &CubePose) {
    let body_color = [230, 230, 235];
    let outline_color = Color32::from_rgb(80, 80, 85);
    let feature_color = Color32::from_rgb(40, 40, 45);
    let text_color = Color32::from_rgb(180, 180, 180);
    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::BLACK);
    let frame: CubeFrame = scene.project(pose, [rect.width(), rect.height()]);
    let to_pos = |p: [f32; 2]| rect.min + Vec2::new(p[0], p[1]);
    // 1. Faces (back to front)
    for face in &frame.faces {
        let points: Vec<Pos2> = face.corners.iter().map(|c| to_pos(*c)).collect();
        painter.add(Shape::convex_polygon(
            points,
            shaded(body_color, face.shade),
            Stroke::new(1.5, outline_color),
        ));
    }
    // 2. Eyes, nose, mouth
    for feature in &frame.features {
        match feature {
            ProjectedFeature::Disc { center, radius } => {
                painter.circle_filled(to_pos(*center), *radius, feature_color);
            }
            ProjectedFeature::Bar { from, to, width } => {
                painter.line_segment(
                    [to_pos(*from), to_pos(*to)],
                    Stroke::new(*width, feature_color),
                );
            }
        }
    }
    // 3. Angles overlay
    let [x, y, z] = pose.degrees();
    let stats = Rect::from_min_size(rect.min + Vec2::new(8.0, 8.0), Vec2::new(220.0, 20.0));
    painter.text(
        stats.min,
        egui::Align2::LEFT_TOP,
        format!("euler x {x:>7.1}°  y {y:>7.1}°  z {z:>7.1}°"),
        egui::FontId::monospace(12.0),
        text_color,
    );
}
