//! Navigation Panel Widget
//! Left side panel: section selection and dataset status.

use crate::views::Section;
use egui::{Color32, RichText};

/// What the user did in the panel this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    None,
    Selected(Section),
}

/// Status line under the section list.
#[derive(Debug, Clone, PartialEq)]
pub enum DataStatus {
    Loading(String),
    Ready(String),
    Failed(String),
}

/// Left side navigation with one radio button per section.
pub struct NavigationPanel {
    pub selected: Section,
    pub status: DataStatus,
}

impl Default for NavigationPanel {
    fn default() -> Self {
        Self {
            selected: Section::default(),
            status: DataStatus::Loading("Loading dataset...".to_string()),
        }
    }
}

impl NavigationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: DataStatus) {
        self.status = status;
    }

    /// Draw the panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> NavigationAction {
        let mut action = NavigationAction::None;

        ui.add_space(5.0);
        ui.label(
            RichText::new("Navigation")
                .size(20.0)
                .color(Color32::from_rgb(100, 149, 237)),
        );
        ui.add_space(10.0);
        ui.separator();

        ui.label(RichText::new("Go to").size(14.0).strong());
        ui.add_space(5.0);

        for section in Section::ALL {
            if ui
                .radio_value(&mut self.selected, section, section.label())
                .changed()
            {
                action = NavigationAction::Selected(section);
            }
        }

        ui.add_space(10.0);
        ui.separator();

        let (text, color) = match &self.status {
            DataStatus::Loading(msg) => (msg.as_str(), Color32::GRAY),
            DataStatus::Ready(msg) => (msg.as_str(), Color32::from_rgb(46, 204, 113)),
            DataStatus::Failed(msg) => (msg.as_str(), Color32::from_rgb(220, 53, 69)),
        };
        ui.label(RichText::new(text).size(11.0).color(color));

        action
    }
}
