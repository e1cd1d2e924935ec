use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};

pub const CONFIG_FILE: &str = "showcase.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub asset_dir: PathBuf,
    pub continuous_run_ms: u64,
    pub bus_capacity: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            continuous_run_ms: 2_000,
            bus_capacity: event_bus::DEFAULT_CAPACITY,
            log_filter: "warn".into(),
        }
    }
}

impl Settings {
    pub fn continuous_run(&self) -> Duration {
        Duration::from_millis(self.continuous_run_ms)
    }
}

pub fn load_settings(config_path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();
    let path = config_path.unwrap_or_else(|| Path::new(CONFIG_FILE));

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        tracing::warn!("ignoring malformed {CONFIG_FILE}; expected flat string keys");
        return;
    };

    if let Some(v) = file_cfg.get("asset_dir") {
        settings.asset_dir = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("continuous_run_ms") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.continuous_run_ms = parsed;
        }
    }
    if let Some(v) = file_cfg.get("bus_capacity") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.bus_capacity = parsed;
        }
    }
    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SHOWCASE_ASSET_DIR") {
        settings.asset_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__ASSET_DIR") {
        settings.asset_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__CONTINUOUS_RUN_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.continuous_run_ms = parsed;
        }
    }

    if let Some(v) = lookup("APP__BUS_CAPACITY") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.bus_capacity = parsed;
        }
    }

    if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

pub fn resolve_asset_dir(asset_dir: &Path) -> anyhow::Result<PathBuf> {
    let resolved = fs::canonicalize(asset_dir)
        .with_context(|| format!("asset directory '{}' is not accessible", asset_dir.display()))?;
    if !resolved.is_dir() {
        bail!("asset path '{}' is not a directory", resolved.display());
    }
    Ok(resolved)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
