use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tuning for the geometry engine. Every field has a default so an old or
/// partial settings file still loads.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineSettings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional log file. Logs go to stderr only when absent.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Logical size of the splash screen, centered on the monitor.
    #[serde(default = "default_splash_size")]
    pub splash_size: (u32, u32),
    /// Logical panel size used when nothing was remembered.
    #[serde(default = "default_panel_size")]
    pub default_panel_size: (u32, u32),
    #[serde(default = "default_collapsed_height")]
    pub collapsed_height: u32,
    /// Logical margins subtracted from the monitor size when clamping the panel.
    #[serde(default = "default_monitor_margin")]
    pub monitor_margin: (u32, u32),
    /// Lower bound for a height derived from the monitor when none was saved.
    #[serde(default = "default_min_derived_height")]
    pub min_derived_height: u32,
    #[serde(default = "default_derived_height_inset")]
    pub derived_height_inset: u32,
    /// Stored physical sizes at or below this are ignored on load.
    #[serde(default = "default_stored_size_floor")]
    pub stored_size_floor: u32,
    /// User resizes at or below this logical size are not remembered.
    #[serde(default = "default_user_size_floor")]
    pub user_size_floor: u32,
    #[serde(default = "default_move_threshold")]
    pub move_threshold: u32,
    #[serde(default = "default_resize_threshold")]
    pub resize_threshold: u32,
    #[serde(default = "default_init_grace_ms")]
    pub init_grace_ms: u64,
    #[serde(default = "default_geometry_load_grace_ms")]
    pub geometry_load_grace_ms: u64,
    #[serde(default = "default_move_debounce_ms")]
    pub move_debounce_ms: u64,
    #[serde(default = "default_drag_release_ms")]
    pub drag_release_ms: u64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    #[serde(default = "default_resize_release_ms")]
    pub resize_release_ms: u64,
    #[serde(default = "default_programmatic_release_ms")]
    pub programmatic_release_ms: u64,
    #[serde(default = "default_collapse_programmatic_release_ms")]
    pub collapse_programmatic_release_ms: u64,
    #[serde(default = "default_user_resize_cooldown_ms")]
    pub user_resize_cooldown_ms: u64,
    #[serde(default = "default_reconcile_period_ms")]
    pub reconcile_period_ms: u64,
    #[serde(default = "default_click_through_period_ms")]
    pub click_through_period_ms: u64,
    #[serde(default = "default_popup_save_debounce_ms")]
    pub popup_save_debounce_ms: u64,
    #[serde(default = "default_popup_shrink_delay_ms")]
    pub popup_shrink_delay_ms: u64,
}

fn default_splash_size() -> (u32, u32) {
    (600, 850)
}

fn default_panel_size() -> (u32, u32) {
    (400, 700)
}

fn default_collapsed_height() -> u32 {
    45
}

fn default_monitor_margin() -> (u32, u32) {
    (20, 40)
}

fn default_min_derived_height() -> u32 {
    600
}

fn default_derived_height_inset() -> u32 {
    200
}

fn default_stored_size_floor() -> u32 {
    200
}

fn default_user_size_floor() -> u32 {
    150
}

fn default_move_threshold() -> u32 {
    2
}

fn default_resize_threshold() -> u32 {
    5
}

fn default_init_grace_ms() -> u64 {
    500
}

fn default_geometry_load_grace_ms() -> u64 {
    1000
}

fn default_move_debounce_ms() -> u64 {
    2000
}

fn default_drag_release_ms() -> u64 {
    300
}

fn default_resize_debounce_ms() -> u64 {
    2000
}

fn default_resize_release_ms() -> u64 {
    500
}

fn default_programmatic_release_ms() -> u64 {
    200
}

fn default_collapse_programmatic_release_ms() -> u64 {
    300
}

fn default_user_resize_cooldown_ms() -> u64 {
    1000
}

fn default_reconcile_period_ms() -> u64 {
    1000
}

fn default_click_through_period_ms() -> u64 {
    200
}

fn default_popup_save_debounce_ms() -> u64 {
    500
}

fn default_popup_shrink_delay_ms() -> u64 {
    300
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            splash_size: default_splash_size(),
            default_panel_size: default_panel_size(),
            collapsed_height: default_collapsed_height(),
            monitor_margin: default_monitor_margin(),
            min_derived_height: default_min_derived_height(),
            derived_height_inset: default_derived_height_inset(),
            stored_size_floor: default_stored_size_floor(),
            user_size_floor: default_user_size_floor(),
            move_threshold: default_move_threshold(),
            resize_threshold: default_resize_threshold(),
            init_grace_ms: default_init_grace_ms(),
            geometry_load_grace_ms: default_geometry_load_grace_ms(),
            move_debounce_ms: default_move_debounce_ms(),
            drag_release_ms: default_drag_release_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            resize_release_ms: default_resize_release_ms(),
            programmatic_release_ms: default_programmatic_release_ms(),
            collapse_programmatic_release_ms: default_collapse_programmatic_release_ms(),
            user_resize_cooldown_ms: default_user_resize_cooldown_ms(),
            reconcile_period_ms: default_reconcile_period_ms(),
            click_through_period_ms: default_click_through_period_ms(),
            popup_save_debounce_ms: default_popup_save_debounce_ms(),
            popup_shrink_delay_ms: default_popup_shrink_delay_ms(),
        }
    }
}

impl EngineSettings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Self = serde_json::from_str(&content)?;
        if settings.sanitize() {
            tracing::warn!(path, "settings contained out-of-range values; clamped");
        }
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    /// Install the global subscriber from `debug_logging` and `log_file`.
    pub fn init_logging(&self) {
        crate::logging::init(self.debug_logging, self.log_path());
    }

    /// Clamp values that would stall timers or produce empty windows.
    /// Returns true when anything changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();
        let defaults = Self::default();

        if self.splash_size.0 == 0 || self.splash_size.1 == 0 {
            self.splash_size = defaults.splash_size;
        }
        if self.default_panel_size.0 == 0 || self.default_panel_size.1 == 0 {
            self.default_panel_size = defaults.default_panel_size;
        }
        self.collapsed_height = self.collapsed_height.max(1);
        self.click_through_period_ms = self.click_through_period_ms.max(16);
        self.reconcile_period_ms = self.reconcile_period_ms.max(16);

        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::EngineSettings;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.json");
        let settings = EngineSettings::load(&path.to_string_lossy()).expect("load");
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn partial_file_fills_remaining_fields_from_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"collapsed_height": 60, "debug_logging": true}"#)
            .expect("write settings");

        let settings = EngineSettings::load(&path.to_string_lossy()).expect("load");
        assert_eq!(settings.collapsed_height, 60);
        assert!(settings.debug_logging);
        assert_eq!(settings.splash_size, (600, 850));
        assert_eq!(settings.move_debounce_ms, 2000);
    }

    #[test]
    fn save_and_load_preserve_values() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        let mut settings = EngineSettings::default();
        settings.click_through_period_ms = 250;
        settings.log_file = Some("overlay.log".into());

        settings.save(&path.to_string_lossy()).expect("save");
        let loaded = EngineSettings::load(&path.to_string_lossy()).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn blank_log_file_means_stderr_only() {
        let mut settings = EngineSettings::default();
        assert_eq!(settings.log_path(), None);
        settings.log_file = Some("  ".into());
        assert_eq!(settings.log_path(), None);
        settings.log_file = Some("logs/overlay.log".into());
        assert_eq!(
            settings.log_path(),
            Some(std::path::PathBuf::from("logs/overlay.log"))
        );
    }

    #[test]
    fn sanitize_restores_unusable_values() {
        let mut settings = EngineSettings::default();
        settings.click_through_period_ms = 0;
        settings.splash_size = (0, 850);

        assert!(settings.sanitize());
        assert_eq!(settings.click_through_period_ms, 16);
        assert_eq!(settings.splash_size, (600, 850));
        assert!(!settings.sanitize());
    }
}
