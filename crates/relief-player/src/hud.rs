//! HUD overlay: readouts, live controls and the compass
//!
//! Drawn with egui on top of the room. The slider and toggle write straight
//! into the `LiveControls` the next tick reads.

use crate::compass::{Arrow, Compass};
use glam::{Vec2, Vec3};
use relief_core::config::MAX_HEIGHT_LIMIT;
use relief_runtime::LiveControls;

const TEXT_SIZE: f32 = 20.0;
const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 82, 172);
const FORWARD_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 41, 55);
const RIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 121, 241);
/// Compass anchor, measured from the top-right corner of the screen
const COMPASS_OFFSET: egui::Vec2 = egui::vec2(140.0, 120.0);

/// Per-tick values shown by the HUD
pub struct HudFrame {
    pub fps: f32,
    pub video_fps: Option<f64>,
    pub forward: Vec3,
    pub right: Vec3,
}

/// "Video: N fps", or "live" when the source has no native rate
pub fn video_label(video_fps: Option<f64>) -> String {
    match video_fps {
        Some(fps) => format!("Video: {:.2} fps", fps),
        None => "Video: live".to_string(),
    }
}

pub fn max_height_label(max_height: f32) -> String {
    format!("Max height: {}", max_height as i32)
}

/// Horizontal forward direction, one decimal per component
pub fn forward_label(forward: Vec3) -> String {
    format!("Forward: ({:.1}, {:.1})", forward.x, forward.z)
}

/// Draw the HUD and let the widgets edit `controls`
pub fn show(ctx: &egui::Context, frame: &HudFrame, controls: &mut LiveControls) {
    egui::Area::new(egui::Id::new("hud_controls"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            ui.label(text(format!("FPS: {:.0}", frame.fps)).color(egui::Color32::DARK_GREEN));
            ui.label(text(video_label(frame.video_fps)));
            ui.label(text(max_height_label(controls.max_height)));

            let mut max_height = controls.max_height;
            ui.add(
                egui::Slider::new(&mut max_height, 0.0..=MAX_HEIGHT_LIMIT)
                    .show_value(false),
            );
            controls.set_max_height(max_height);

            ui.label(text("Fly?"));
            ui.checkbox(&mut controls.can_fly, "");
        });

    let screen = ctx.screen_rect();
    let anchor = egui::pos2(
        screen.right() - COMPASS_OFFSET.x,
        screen.top() + COMPASS_OFFSET.y,
    );

    egui::Area::new(egui::Id::new("hud_compass"))
        .order(egui::Order::Foreground)
        .fixed_pos(anchor - egui::vec2(90.0, 100.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(text(forward_label(frame.forward)).color(FORWARD_COLOR));
        });

    let compass = Compass::new(Vec2::new(anchor.x, anchor.y), frame.forward, frame.right);
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("hud_compass_arrows"),
    ));
    for (arrow, color) in [
        (compass.forward, FORWARD_COLOR),
        (compass.right, RIGHT_COLOR),
    ] {
        if let Some(arrow) = arrow {
            paint_arrow(&painter, &arrow, color);
        }
    }
}

fn text(s: impl Into<String>) -> egui::RichText {
    egui::RichText::new(s).size(TEXT_SIZE).color(LABEL_COLOR)
}

fn paint_arrow(painter: &egui::Painter, arrow: &Arrow, color: egui::Color32) {
    let pos = |v: Vec2| egui::pos2(v.x, v.y);
    painter.line_segment([pos(arrow.tail), pos(arrow.tip)], egui::Stroke::new(3.0, color));
    painter.add(egui::Shape::convex_polygon(
        vec![pos(arrow.tip), pos(arrow.head[0]), pos(arrow.head[1])],
        color,
        egui::Stroke::NONE,
    ));
}
