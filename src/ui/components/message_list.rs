//! Scrolling transcript view with chat bubbles

use egui::{Align, Layout, RichText, ScrollArea};

use crate::messages::{Message, Speaker};
use crate::ui::theme::Theme;

pub struct MessageList<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self { messages, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing_sm);
                for message in self.messages {
                    self.show_message(ui, message);
                    ui.add_space(self.theme.spacing_sm);
                }
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let (layout, fill, text_color) = match message.speaker {
            Speaker::Assistant => (
                Layout::left_to_right(Align::TOP),
                self.theme.bubble_assistant,
                self.theme.text_primary,
            ),
            Speaker::User => (
                Layout::right_to_left(Align::TOP),
                self.theme.bubble_user,
                self.theme.text_primary,
            ),
            Speaker::System => (
                Layout::left_to_right(Align::TOP),
                self.theme.bg_tertiary,
                self.theme.text_muted,
            ),
        };

        ui.with_layout(layout, |ui| {
            let max_width = ui.available_width() * 0.75;
            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing_sm)
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    let text = RichText::new(&message.text).color(text_color);
                    if message.speaker == Speaker::System {
                        ui.label(text.italics());
                    } else {
                        ui.label(text);
                    }
                });
        });
    }
}
