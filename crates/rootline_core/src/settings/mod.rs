//! User-facing settings consumed by the tree layer.
//!
//! # Responsibility
//! - Define the typed settings sections and their defaults.
//! - Import/export settings as JSON through explicit per-section merges.
//!
//! # Invariants
//! - Imported settings always start from defaults; unknown keys are ignored.
//! - Every merged value is validated against its section schema.
//! - Only `tree_display.generation_limit`, the birth/death label switches and
//!   `advanced.sort_by` change core behavior; the rest is carried through.

mod patch;

pub use patch::{
    AdvancedPatch, AppearancePatch, NotificationsPatch, SettingsError, SettingsPatch,
    TreeDisplayPatch,
};

use log::warn;
use serde::{Deserialize, Serialize};

/// Default generation bound for tree building.
pub const DEFAULT_GENERATION_LIMIT: usize = 10;
/// Upper bound accepted for `generation_limit`.
pub const MAX_GENERATION_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Auto,
}

/// Tree orientation. Only `Vertical` is laid out; others fall back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeOrientation {
    Vertical,
    Horizontal,
    Circular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeScale {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoShape {
    Circle,
    Square,
    Rounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    Classic,
    Modern,
    Minimalist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    Solid,
    Pattern,
}

/// Member listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Name,
    BirthYear,
    CreatedAt,
}

/// Tree display section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDisplaySettings {
    pub layout: TreeOrientation,
    pub show_birth_year: bool,
    pub show_death_year: bool,
    pub show_photos: bool,
    pub show_notes: bool,
    pub show_extended_info: bool,
    /// `#RRGGBB`.
    pub node_color: String,
    /// `#RRGGBB`.
    pub connection_line_color: String,
    pub text_size: SizeScale,
    pub photo_shape: PhotoShape,
    /// Max rendered generations, root included; the deepest node sits at
    /// depth `generation_limit - 1`.
    pub generation_limit: usize,
}

impl Default for TreeDisplaySettings {
    fn default() -> Self {
        Self {
            layout: TreeOrientation::Vertical,
            show_birth_year: true,
            show_death_year: true,
            show_photos: true,
            show_notes: false,
            show_extended_info: false,
            node_color: "#5a78c9".to_string(),
            connection_line_color: "#999999".to_string(),
            text_size: SizeScale::Medium,
            photo_shape: PhotoShape::Circle,
            generation_limit: DEFAULT_GENERATION_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub theme_preset: ThemePreset,
    pub accent_color: String,
    pub background_type: BackgroundType,
    pub node_size: SizeScale,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme_preset: ThemePreset::Modern,
            accent_color: "#5a78c9".to_string(),
            background_type: BackgroundType::Solid,
            node_size: SizeScale::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub birthday_reminders: bool,
    pub anniversary_reminders: bool,
    pub family_updates: bool,
    pub sync_alerts: bool,
    pub backup_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            birthday_reminders: true,
            anniversary_reminders: true,
            family_updates: true,
            sync_alerts: true,
            backup_alerts: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettings {
    pub case_sensitive_search: bool,
    pub sort_by: SortBy,
    pub debug_mode: bool,
}

/// Full settings object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub tree_display: TreeDisplaySettings,
    pub appearance: AppearanceSettings,
    pub notifications: NotificationSettings,
    pub advanced: AdvancedSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            tree_display: TreeDisplaySettings::default(),
            appearance: AppearanceSettings::default(),
            notifications: NotificationSettings::default(),
            advanced: AdvancedSettings::default(),
        }
    }
}

impl Settings {
    /// Applies a validated patch section by section.
    ///
    /// On error the settings are left unchanged.
    pub fn merge(&mut self, patch: &SettingsPatch) -> Result<(), SettingsError> {
        let mut next = self.clone();
        if let Some(theme) = patch.theme {
            next.theme = theme;
        }
        if let Some(section) = &patch.tree_display {
            patch::merge_tree_display(&mut next.tree_display, section)?;
        }
        if let Some(section) = &patch.appearance {
            patch::merge_appearance(&mut next.appearance, section)?;
        }
        if let Some(section) = &patch.notifications {
            patch::merge_notifications(&mut next.notifications, section);
        }
        if let Some(section) = &patch.advanced {
            patch::merge_advanced(&mut next.advanced, section);
        }
        *self = next;
        Ok(())
    }

    /// Parses a JSON settings document on top of defaults.
    pub fn import_json(json: &str) -> Result<Self, SettingsError> {
        let patch: SettingsPatch = serde_json::from_str(json).map_err(|err| {
            warn!("event=settings_import module=settings status=error error_code=invalid_json");
            SettingsError::Json(err)
        })?;
        let mut settings = Self::default();
        if let Err(err) = settings.merge(&patch) {
            warn!(
                "event=settings_import module=settings status=error error_code=invalid_field error={}",
                err
            );
            return Err(err);
        }
        Ok(settings)
    }

    /// Pretty JSON export.
    pub fn export_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(SettingsError::Json)
    }

    /// Restores defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
