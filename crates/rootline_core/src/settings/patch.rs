//! Partial settings documents and their per-section merge functions.

use super::{
    AdvancedSettings, AppearanceSettings, BackgroundType, NotificationSettings, PhotoShape,
    SizeScale, SortBy, Theme, ThemePreset, TreeDisplaySettings, TreeOrientation,
    MAX_GENERATION_LIMIT,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Settings import/merge errors.
#[derive(Debug)]
pub enum SettingsError {
    /// Document is not valid JSON or a value has the wrong type.
    Json(serde_json::Error),
    /// Value parsed but violates the section schema.
    InvalidField {
        section: &'static str,
        field: &'static str,
        message: String,
    },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid settings document: {err}"),
            Self::InvalidField {
                section,
                field,
                message,
            } => write!(f, "invalid setting `{section}.{field}`: {message}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidField { .. } => None,
        }
    }
}

/// Partial settings document. Absent sections and fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub tree_display: Option<TreeDisplayPatch>,
    pub appearance: Option<AppearancePatch>,
    pub notifications: Option<NotificationsPatch>,
    pub advanced: Option<AdvancedPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDisplayPatch {
    pub layout: Option<TreeOrientation>,
    pub show_birth_year: Option<bool>,
    pub show_death_year: Option<bool>,
    pub show_photos: Option<bool>,
    pub show_notes: Option<bool>,
    pub show_extended_info: Option<bool>,
    pub node_color: Option<String>,
    pub connection_line_color: Option<String>,
    pub text_size: Option<SizeScale>,
    pub photo_shape: Option<PhotoShape>,
    pub generation_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearancePatch {
    pub theme_preset: Option<ThemePreset>,
    pub accent_color: Option<String>,
    pub background_type: Option<BackgroundType>,
    pub node_size: Option<SizeScale>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsPatch {
    pub birthday_reminders: Option<bool>,
    pub anniversary_reminders: Option<bool>,
    pub family_updates: Option<bool>,
    pub sync_alerts: Option<bool>,
    pub backup_alerts: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedPatch {
    pub case_sensitive_search: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub debug_mode: Option<bool>,
}

pub(super) fn merge_tree_display(
    target: &mut TreeDisplaySettings,
    patch: &TreeDisplayPatch,
) -> Result<(), SettingsError> {
    if let Some(color) = &patch.node_color {
        target.node_color = validate_color("treeDisplay", "nodeColor", color)?;
    }
    if let Some(color) = &patch.connection_line_color {
        target.connection_line_color =
            validate_color("treeDisplay", "connectionLineColor", color)?;
    }
    if let Some(limit) = patch.generation_limit {
        if limit == 0 || limit > MAX_GENERATION_LIMIT {
            return Err(SettingsError::InvalidField {
                section: "treeDisplay",
                field: "generationLimit",
                message: format!("expected 1..={MAX_GENERATION_LIMIT}, got {limit}"),
            });
        }
        target.generation_limit = limit;
    }
    set_if_some(&mut target.layout, patch.layout);
    set_if_some(&mut target.show_birth_year, patch.show_birth_year);
    set_if_some(&mut target.show_death_year, patch.show_death_year);
    set_if_some(&mut target.show_photos, patch.show_photos);
    set_if_some(&mut target.show_notes, patch.show_notes);
    set_if_some(&mut target.show_extended_info, patch.show_extended_info);
    set_if_some(&mut target.text_size, patch.text_size);
    set_if_some(&mut target.photo_shape, patch.photo_shape);
    Ok(())
}

pub(super) fn merge_appearance(
    target: &mut AppearanceSettings,
    patch: &AppearancePatch,
) -> Result<(), SettingsError> {
    if let Some(color) = &patch.accent_color {
        target.accent_color = validate_color("appearance", "accentColor", color)?;
    }
    set_if_some(&mut target.theme_preset, patch.theme_preset);
    set_if_some(&mut target.background_type, patch.background_type);
    set_if_some(&mut target.node_size, patch.node_size);
    Ok(())
}

pub(super) fn merge_notifications(target: &mut NotificationSettings, patch: &NotificationsPatch) {
    set_if_some(&mut target.birthday_reminders, patch.birthday_reminders);
    set_if_some(&mut target.anniversary_reminders, patch.anniversary_reminders);
    set_if_some(&mut target.family_updates, patch.family_updates);
    set_if_some(&mut target.sync_alerts, patch.sync_alerts);
    set_if_some(&mut target.backup_alerts, patch.backup_alerts);
}

pub(super) fn merge_advanced(target: &mut AdvancedSettings, patch: &AdvancedPatch) {
    set_if_some(&mut target.case_sensitive_search, patch.case_sensitive_search);
    set_if_some(&mut target.sort_by, patch.sort_by);
    set_if_some(&mut target.debug_mode, patch.debug_mode);
}

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn validate_color(
    section: &'static str,
    field: &'static str,
    value: &str,
) -> Result<String, SettingsError> {
    let trimmed = value.trim();
    if HEX_COLOR_RE.is_match(trimmed) {
        return Ok(trimmed.to_ascii_lowercase());
    }
    Err(SettingsError::InvalidField {
        section,
        field,
        message: format!("expected #RRGGBB, got `{value}`"),
    })
}

#[cfg(test)]
mod tests {
    use super::{merge_notifications, validate_color, NotificationsPatch};
    use crate::settings::NotificationSettings;

    #[test]
    fn validate_color_normalizes_case() {
        assert_eq!(
            validate_color("s", "f", " #AABBCC ").unwrap(),
            "#aabbcc".to_string()
        );
        assert!(validate_color("s", "f", "#abc").is_err());
    }

    #[test]
    fn notifications_merge_only_touches_present_fields() {
        let mut target = NotificationSettings::default();
        merge_notifications(
            &mut target,
            &NotificationsPatch {
                sync_alerts: Some(false),
                ..NotificationsPatch::default()
            },
        );
        assert!(!target.sync_alerts);
        assert!(target.birthday_reminders);
    }
}
