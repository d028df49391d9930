//! Topic selection grid for the Home stage

use std::collections::BTreeSet;

use crate::ui::theme::Theme;

pub struct TopicGrid<'a> {
    catalog: &'a [String],
    selected: &'a BTreeSet<String>,
    theme: &'a Theme,
}

impl<'a> TopicGrid<'a> {
    pub fn new(catalog: &'a [String], selected: &'a BTreeSet<String>, theme: &'a Theme) -> Self {
        Self {
            catalog,
            selected,
            theme,
        }
    }

    /// Render the grid, returning the topic that was clicked this frame
    pub fn show(self, ui: &mut egui::Ui) -> Option<String> {
        let mut toggled = None;

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::Vec2::splat(self.theme.spacing_sm);
            for topic in self.catalog {
                let is_selected = self.selected.contains(topic);
                if ui.selectable_label(is_selected, topic).clicked() {
                    toggled = Some(topic.clone());
                }
            }
        });

        toggled
    }
}
