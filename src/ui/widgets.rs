/// Custom egui Widgets
///
/// Implementations of specialized widgets using egui::Painter:
/// - Sparkline: compact line chart with a caller-supplied Y maximum
/// - ScoreBar: horizontal bar for a report row's score
/// - TerminalViewport: Monospace log viewer

use crate::dashboard::render::BAR_SCALE_PX;
use eframe::egui;
use egui::{Color32, Pos2, Stroke, Vec2};

const LINE_COLOR: Color32 = Color32::from_rgb(0x1a, 0xbc, 0x9c);
const FILL_COLOR: Color32 = Color32::from_rgb(0xe5, 0xe5, 0xe5);

/// Draws a sparkline (compact line chart)
///
/// # Arguments
/// * `ui` - egui Ui context
/// * `samples` - Buffer contents, trailing zero included
/// * `range_max` - Shared Y maximum so every chart uses the same scale
/// * `label` - Display label
pub fn sparkline(ui: &mut egui::Ui, samples: &[f32], range_max: f32, label: &str) {
    ui.label(label);

    let chart_height = 40.0;
    let (response, painter) = ui.allocate_painter(
        Vec2::new(ui.available_width(), chart_height),
        egui::Sense::hover(),
    );
    let rect = response.rect;

    if samples.len() < 2 {
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(90)));
        return;
    }

    // The sentinel pins the minimum at zero; the shared max pins the top
    let data_max = samples.iter().fold(0.0_f32, |a, &b| a.max(b));
    let top = range_max.max(data_max).max(1.0);
    let width = rect.width();
    let height = rect.height();
    let step = width / (samples.len() - 1) as f32;

    let to_pos = |i: usize, v: f32| -> Pos2 {
        let x = rect.left() + i as f32 * step;
        let y = rect.bottom() - (v.max(0.0) / top) * height;
        Pos2::new(x, y)
    };

    // Filled area, one convex quad per segment
    for i in 1..samples.len() {
        let p0 = to_pos(i - 1, samples[i - 1]);
        let p1 = to_pos(i, samples[i]);
        painter.add(egui::Shape::convex_polygon(
            vec![p0, p1, Pos2::new(p1.x, rect.bottom()), Pos2::new(p0.x, rect.bottom())],
            FILL_COLOR.gamma_multiply(0.25),
            Stroke::NONE,
        ));
    }

    let points: Vec<Pos2> = samples.iter().enumerate().map(|(i, &v)| to_pos(i, v)).collect();
    painter.add(egui::Shape::line(points, Stroke::new(2.0, LINE_COLOR)));

    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(90)));
}

/// Horizontal bar, `fraction` of `BAR_SCALE_PX` wide
pub fn score_bar(ui: &mut egui::Ui, fraction: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(BAR_SCALE_PX, 12.0), egui::Sense::hover());
    let filled = egui::Rect::from_min_size(
        rect.min,
        Vec2::new(rect.width() * fraction.clamp(0.0, 1.0), rect.height()),
    );
    ui.painter().rect_filled(filled, 1.0, LINE_COLOR);
}

/// Terminal-style log viewer with monospace font
pub fn terminal_viewport(ui: &mut egui::Ui, lines: impl Iterator<Item = impl AsRef<str>>) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .max_height(160.0)
        .show(ui, |ui| {
            let mut any = false;
            for line in lines {
                any = true;
                ui.monospace(line.as_ref());
            }
            if !any {
                ui.monospace("Awaiting output...");
            }
        });
}
