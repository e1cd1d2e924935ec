//! Terminal rendering of a screen's log and view.

use std::sync::Arc;

use chrono::Local;
use screen_core::{LogView, RecordingLogView, ViewState};
use shared::{domain::ScreenId, log::LogLevel};

/// Prints every line as it arrives and keeps a copy for the runner.
pub struct TerminalLogView {
    screen: ScreenId,
    record: Arc<RecordingLogView>,
}

impl TerminalLogView {
    pub fn new(screen: ScreenId) -> Arc<Self> {
        Arc::new(Self {
            screen,
            record: RecordingLogView::new(),
        })
    }

    pub fn record(&self) -> &RecordingLogView {
        &self.record
    }

    fn print(&self, level: LogLevel, text: &str) {
        println!("{}", format_line(self.screen, level, text));
    }
}

impl LogView for TerminalLogView {
    fn log_normal(&self, text: &str) {
        self.print(LogLevel::Normal, text);
        self.record.log_normal(text);
    }

    fn log_success(&self, text: &str) {
        self.print(LogLevel::Success, text);
        self.record.log_success(text);
    }

    fn log_error(&self, text: &str) {
        self.print(LogLevel::Error, text);
        self.record.log_error(text);
    }

    fn clear_log(&self) {
        println!("---- {} ----", self.screen);
        self.record.clear_log();
    }
}

fn level_tag(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Normal => "",
        LogLevel::Success => "ok",
        LogLevel::Error => "error",
    }
}

pub fn format_line(screen: ScreenId, level: LogLevel, text: &str) -> String {
    format!(
        "{} [{screen}] {:<5} {text}",
        Local::now().format("%H:%M:%S%.3f"),
        level_tag(level)
    )
}

pub fn render_view(title: &str, view: &ViewState) -> String {
    let body = if view.source_visible {
        view.source_listing
            .as_deref()
            .unwrap_or("(source listing not loaded)")
    } else {
        view.instructions.as_str()
    };

    let mut controls = vec!["[start]".to_string()];
    if view.stop_visible {
        controls.push("[stop]".to_string());
    }
    controls.push(format!("[{}]", view.toggle_label));

    format!("== {title} ==\n{body}\n{}", controls.join(" "))
}
