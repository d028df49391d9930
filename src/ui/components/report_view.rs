//! Evaluation report cards

use egui::{RichText, ScrollArea};

use crate::service::EvaluationEntry;
use crate::ui::theme::Theme;

pub struct ReportView<'a> {
    entries: &'a [EvaluationEntry],
    theme: &'a Theme,
}

impl<'a> ReportView<'a> {
    pub fn new(entries: &'a [EvaluationEntry], theme: &'a Theme) -> Self {
        Self { entries, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.entries.is_empty() {
                    ui.add_space(self.theme.spacing_lg);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("No evaluation data available.")
                                .color(self.theme.text_muted),
                        );
                    });
                    return;
                }

                for (index, entry) in self.entries.iter().enumerate() {
                    self.show_entry(ui, index, entry);
                    ui.add_space(self.theme.spacing);
                }
            });
    }

    fn show_entry(&self, ui: &mut egui::Ui, index: usize, entry: &EvaluationEntry) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("Question {}", index + 1))
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    let accuracy = entry.accuracy.as_deref().unwrap_or("Not available");
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            ui.label(
                                RichText::new(format!("Accuracy: {}", accuracy))
                                    .strong()
                                    .color(self.theme.success),
                            );
                        },
                    );
                });

                ui.add_space(self.theme.spacing_sm);
                let question = entry
                    .question
                    .as_deref()
                    .unwrap_or("No question available");
                ui.label(RichText::new(question).color(self.theme.text_primary));

                ui.add_space(self.theme.spacing_sm);
                ui.label(
                    RichText::new("Your answer")
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
                let response = entry
                    .response
                    .as_deref()
                    .unwrap_or("No response provided");
                ui.label(RichText::new(response).color(self.theme.text_secondary));

                if let Some(improvised) = &entry.improvised_response {
                    ui.add_space(self.theme.spacing_sm);
                    ui.label(
                        RichText::new("Suggested answer")
                            .size(12.0)
                            .color(self.theme.text_muted),
                    );
                    ui.label(RichText::new(improvised).color(self.theme.text_secondary));
                }
            });
    }
}
