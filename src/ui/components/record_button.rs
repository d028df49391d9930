//! Record button for capturing spoken answers

use egui::{Color32, Rect, RichText, Sense, Vec2};

use crate::session::RecordingPhase;
use crate::ui::theme::Theme;

/// What the user asked for by pressing the button this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    Start,
    Stop,
}

pub struct RecordButton<'a> {
    phase: RecordingPhase,
    enabled: bool,
    theme: &'a Theme,
}

impl<'a> RecordButton<'a> {
    pub fn new(phase: RecordingPhase, enabled: bool, theme: &'a Theme) -> Self {
        Self {
            phase,
            enabled,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<RecordAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            let size = Vec2::new(60.0, 60.0);
            let sense = if self.enabled {
                Sense::click()
            } else {
                Sense::hover()
            };
            let (rect, response) = ui.allocate_exact_size(size, sense);

            if ui.is_rect_visible(rect) {
                self.paint(ui, rect, &response);
            }

            if response.clicked() {
                action = match self.phase {
                    RecordingPhase::Idle => Some(RecordAction::Start),
                    RecordingPhase::Recording => Some(RecordAction::Stop),
                    RecordingPhase::Transcribing => None,
                };
            }

            ui.add_space(self.theme.spacing_sm);

            let (status, color) = match self.phase {
                RecordingPhase::Idle => ("Press to record", self.theme.text_muted),
                RecordingPhase::Recording => ("Recording...", self.theme.recording),
                RecordingPhase::Transcribing => ("Transcribing...", self.theme.warning),
            };
            ui.label(RichText::new(status).size(12.0).color(color));
        });

        action
    }

    fn paint(&self, ui: &egui::Ui, rect: Rect, response: &egui::Response) {
        let painter = ui.painter();
        let center = rect.center();

        let bg_color = match self.phase {
            RecordingPhase::Recording => self.theme.recording,
            RecordingPhase::Transcribing => self.theme.warning.gamma_multiply(0.8),
            RecordingPhase::Idle if !self.enabled => self.theme.bg_tertiary,
            RecordingPhase::Idle if response.hovered() => self.theme.primary.gamma_multiply(1.2),
            RecordingPhase::Idle => self.theme.primary,
        };

        painter.circle_filled(center, 28.0, bg_color);

        match self.phase {
            RecordingPhase::Recording => {
                // Stop square plus a pulsing ring
                painter.rect_filled(
                    Rect::from_center_size(center, Vec2::splat(16.0)),
                    2.0,
                    Color32::WHITE,
                );

                let t = ui.ctx().input(|i| i.time);
                let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
                painter.circle_stroke(
                    center,
                    30.0 + pulse * 8.0,
                    egui::Stroke::new(
                        2.0 + pulse * 2.0,
                        self.theme.recording.gamma_multiply((1.0 - pulse) * 0.6),
                    ),
                );
                ui.ctx().request_repaint();
            }
            RecordingPhase::Transcribing => {
                // Rotating dots while the upload is in flight
                let t = ui.ctx().input(|i| i.time);
                for i in 0..3 {
                    let angle = t * 3.0 + (i as f64 * std::f64::consts::TAU / 3.0);
                    let pos = egui::pos2(
                        center.x + (angle.cos() as f32 * 8.0),
                        center.y + (angle.sin() as f32 * 8.0),
                    );
                    let alpha = 1.0 - (i as f32 * 0.3);
                    painter.circle_filled(pos, 3.0, Color32::from_white_alpha((255.0 * alpha) as u8));
                }
                ui.ctx().request_repaint();
            }
            RecordingPhase::Idle => {
                // Simple mic glyph: body plus stem
                let mic_rect = Rect::from_center_size(
                    egui::pos2(center.x, center.y - 3.0),
                    Vec2::new(10.0, 16.0),
                );
                painter.rect_filled(mic_rect, 5.0, Color32::WHITE);
                painter.line_segment(
                    [
                        egui::pos2(center.x, center.y + 6.0),
                        egui::pos2(center.x, center.y + 12.0),
                    ],
                    egui::Stroke::new(2.0, Color32::WHITE),
                );
            }
        }
    }
}
