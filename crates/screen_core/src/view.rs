use std::sync::{Arc, Mutex, PoisonError};

pub const TOGGLE_LABEL_SOURCE: &str = "source";
pub const TOGGLE_LABEL_INSTRUCTIONS: &str = "instructions";

pub trait ScreenView: Send {
    fn set_instructions(&mut self, text: &str);
    fn set_source_listing(&mut self, text: &str);
    fn set_instructions_visible(&mut self, visible: bool);
    fn set_source_visible(&mut self, visible: bool);
    fn set_toggle_label(&mut self, label: &str);
    fn set_stop_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub instructions: String,
    pub source_listing: Option<String>,
    pub instructions_visible: bool,
    pub source_visible: bool,
    pub toggle_label: String,
    pub stop_visible: bool,
}

impl ScreenView for ViewState {
    fn set_instructions(&mut self, text: &str) {
        self.instructions = text.to_string();
    }

    fn set_source_listing(&mut self, text: &str) {
        self.source_listing = Some(text.to_string());
    }

    fn set_instructions_visible(&mut self, visible: bool) {
        self.instructions_visible = visible;
    }

    fn set_source_visible(&mut self, visible: bool) {
        self.source_visible = visible;
    }

    fn set_toggle_label(&mut self, label: &str) {
        self.toggle_label = label.to_string();
    }

    fn set_stop_visible(&mut self, visible: bool) {
        self.stop_visible = visible;
    }
}

impl<V: ScreenView> ScreenView for Arc<Mutex<V>> {
    fn set_instructions(&mut self, text: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_instructions(text);
    }

    fn set_source_listing(&mut self, text: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_source_listing(text);
    }

    fn set_instructions_visible(&mut self, visible: bool) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_instructions_visible(visible);
    }

    fn set_source_visible(&mut self, visible: bool) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_source_visible(visible);
    }

    fn set_toggle_label(&mut self, label: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_toggle_label(label);
    }

    fn set_stop_visible(&mut self, visible: bool) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_stop_visible(visible);
    }
}
