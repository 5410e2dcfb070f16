//! Native wheel viewer using egui
//!
//! Side panel edits the choice list, central canvas renders the wheel and
//! pointer, bottom panel holds the spin trigger. The frame loop feeds the
//! controller a monotonic millisecond clock and reads state snapshots back.

use eframe::egui;
use std::time::Instant;
use tracing::info;

use crate::choices::ChoiceList;
use crate::config::Config;
use crate::wheel::segments::FULL_TURN;
use crate::wheel::{Phase, SpinController, POINTER_ANGLE};

/// Run the native wheel viewer
pub fn run_viewer(config: Config) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_title("Choice Wheel"),
        ..Default::default()
    };

    eframe::run_native(
        "Choice Wheel",
        options,
        Box::new(|cc| Ok(Box::new(WheelApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

struct WheelApp {
    choices: ChoiceList,
    controller: SpinController,
    name_input: String,
    started: Instant,
}

impl WheelApp {
    fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let choices = ChoiceList::from_names(&config.choices);
        let mut controller = SpinController::new(config.tuning());
        controller.set_choices(choices.entries());

        Self {
            choices,
            controller,
            name_input: String::new(),
            started: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn sync_choices(&mut self) {
        self.controller.set_choices(self.choices.entries());
    }

    fn add_from_input(&mut self) {
        let name = std::mem::take(&mut self.name_input);
        if self.choices.add(&name) {
            self.sync_choices();
        } else if !name.trim().is_empty() {
            // Duplicate: keep the text so the user can see what clashed
            info!(name = %name.trim(), "choice rejected (duplicate)");
            self.name_input = name;
        }
    }

    fn status_line(&self) -> String {
        let state = self.controller.state();
        match state.phase {
            Phase::Spinning => "Spinning...".to_string(),
            Phase::Settled => state
                .winner
                .as_ref()
                .map(|w| format!("Winner: {}", w.name))
                .unwrap_or_default(),
            Phase::Idle if self.choices.len() < 2 => {
                "Add at least two choices to spin".to_string()
            }
            Phase::Idle => "Ready".to_string(),
        }
    }

    fn draw_wheel(&self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = (rect.width().min(rect.height()) / 2.0 - 28.0).max(60.0);

        let layout = self.controller.layout();
        let state = self.controller.state();
        let rotation = state.rotation;

        if layout.is_empty() {
            painter.circle_stroke(center, radius, egui::Stroke::new(2.0, egui::Color32::DARK_GRAY));
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                "Add choices to build the wheel",
                egui::FontId::proportional(16.0),
                egui::Color32::GRAY,
            );
            return;
        }

        // Segment currently under the pointer; highlighted while the wheel
        // moves so the eventual winner is the slice the pointer rests on
        let highlighted = layout.angle_to_index(POINTER_ANGLE - rotation);

        let rim = egui::Stroke::new(1.5, egui::Color32::from_gray(25));
        for segment in layout.segments() {
            let fill = segment_color(&segment.choice.name, highlighted == Some(segment.index));

            if layout.len() == 1 {
                painter.circle_filled(center, radius, fill);
            } else {
                let points = slice_points(
                    center,
                    radius,
                    segment.start_angle + rotation,
                    segment.end_angle + rotation,
                );
                painter.add(egui::Shape::convex_polygon(points, fill, rim));
            }

            let mid_angle = (segment.start_angle + segment.end_angle) / 2.0 + rotation;
            painter.text(
                point_on_circle(center, radius * 0.65, mid_angle),
                egui::Align2::CENTER_CENTER,
                &segment.choice.name,
                egui::FontId::proportional(13.0),
                egui::Color32::WHITE,
            );
        }

        // Hub
        painter.circle_filled(center, radius * 0.08, egui::Color32::WHITE);
        painter.circle_filled(center, radius * 0.035, egui::Color32::from_gray(40));

        // Fixed pointer at the selection angle
        let tip = point_on_circle(center, radius - 10.0, POINTER_ANGLE);
        let outer = radius + 16.0;
        let rad = (POINTER_ANGLE as f32).to_radians();
        let out = egui::Vec2::new(rad.cos(), rad.sin());
        let side = egui::Vec2::new(-rad.sin(), rad.cos());
        let base_a = center + out * outer + side * 9.0;
        let base_b = center + out * outer - side * 9.0;
        painter.add(egui::Shape::convex_polygon(
            vec![tip, base_a, base_b],
            egui::Color32::from_rgb(250, 200, 60),
            egui::Stroke::new(1.0, egui::Color32::from_gray(25)),
        ));
    }
}

impl eframe::App for WheelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drive the animation; the settling tick hands the winner back once
        if let Some(winner) = self.controller.tick(self.now_ms()) {
            info!(winner = %winner.name, "wheel settled in viewer");
        }

        // Continuous repaint keeps the rotation smooth
        ctx.request_repaint();

        let spinning = self.controller.is_spinning();

        // Left panel - choice list editing (frozen while a spin is in flight)
        egui::SidePanel::left("choices_panel").min_width(230.0).show(ctx, |ui| {
            ui.heading("Choices");
            ui.separator();

            let mut submitted = false;
            ui.horizontal(|ui| {
                let edit = ui.add_enabled(
                    !spinning,
                    egui::TextEdit::singleline(&mut self.name_input).hint_text("New choice"),
                );
                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submitted = true;
                }
                if ui.add_enabled(!spinning, egui::Button::new("Add")).clicked() {
                    submitted = true;
                }
            });
            if submitted && !spinning {
                self.add_from_input();
            }

            ui.horizontal(|ui| {
                if ui.add_enabled(!spinning, egui::Button::new("Clear All")).clicked() {
                    self.choices.clear();
                    self.sync_choices();
                }
                ui.label(format!("{} choices", self.choices.len()));
            });

            ui.separator();

            let mut to_remove: Vec<u64> = Vec::new();
            egui::ScrollArea::vertical().show(ui, |ui| {
                for choice in self.choices.entries() {
                    ui.horizontal(|ui| {
                        ui.colored_label(segment_color(&choice.name, false), "●");
                        ui.label(&choice.name);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.add_enabled(!spinning, egui::Button::new("✕").small()).clicked() {
                                to_remove.push(choice.id);
                            }
                        });
                    });
                }
            });

            if !to_remove.is_empty() {
                for id in to_remove {
                    self.choices.remove(id);
                }
                self.sync_choices();
            }
        });

        // Bottom panel - spin trigger and status
        egui::TopBottomPanel::bottom("controls_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let can_spin = self.controller.can_spin();
                if ui
                    .add_enabled(can_spin, egui::Button::new("Spin the Wheel"))
                    .clicked()
                {
                    self.controller.spin(self.now_ms());
                }
                ui.separator();
                ui.label(self.status_line());
            });
        });

        // Central panel - the wheel itself
        egui::CentralPanel::default().show(ctx, |ui| {
            let settled_winner = match self.controller.state().phase {
                Phase::Settled => self.controller.state().winner.clone(),
                _ => None,
            };
            if let Some(winner) = settled_winner {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("Winner!").size(18.0));
                    ui.label(
                        egui::RichText::new(&winner.name)
                            .size(28.0)
                            .strong()
                            .color(egui::Color32::from_rgb(250, 200, 60)),
                    );
                });
                ui.separator();
            }

            self.draw_wheel(ui);
        });
    }
}

/// Point on a circle at `angle_deg` (screen frame, y down).
///
/// Normalized in f64 before the f32 cast so an unbounded rotation from a long
/// session cannot shed precision.
fn point_on_circle(center: egui::Pos2, radius: f32, angle_deg: f64) -> egui::Pos2 {
    let rad = angle_deg.rem_euclid(FULL_TURN).to_radians() as f32;
    egui::Pos2::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// Pie-slice outline: hub plus the arc sampled every few degrees.
///
/// With two or more segments the span is at most 180 degrees, so the shape
/// stays convex.
fn slice_points(center: egui::Pos2, radius: f32, start_deg: f64, end_deg: f64) -> Vec<egui::Pos2> {
    let span = end_deg - start_deg;
    let steps = (span / 4.0).ceil().max(2.0) as usize;

    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        let angle = start_deg + span * i as f64 / steps as f64;
        points.push(point_on_circle(center, radius, angle));
    }
    points
}

/// Stable per-choice color from a name hash; brighter when under the pointer
fn segment_color(name: &str, highlighted: bool) -> egui::Color32 {
    let hash = name
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    let hue = (hash % 360) as f32 / 360.0;
    let (s, v) = if highlighted { (0.55, 1.0) } else { (0.8, 0.85) };
    let [r, g, b] = hsv_to_rgb(hue, s, v);
    egui::Color32::from_rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}
