use super::storage::{ LocalStorage, StoreError };
use super::{ NotificationLevel, Surface };
use log::{ error, info };
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use std::sync::{ Arc, Mutex };
use thiserror::Error;

pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon offered for switching away from this theme.
    pub fn icon_class(self) -> &'static str {
        match self {
            Theme::Light => "fas fa-moon",
            Theme::Dark => "fas fa-sun",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid theme: '{0}'")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

pub struct ThemeController {
    storage: Arc<LocalStorage>,
    surface: Arc<dyn Surface>,
    current: Mutex<Theme>,
}

impl ThemeController {
    /// Restores the saved theme (dark when none is saved) and applies it.
    pub fn load(storage: Arc<LocalStorage>, surface: Arc<dyn Surface>) -> Self {
        let theme: Theme = storage
            .get(THEME_KEY)
            .and_then(|saved| saved.parse().ok())
            .unwrap_or_default();
        info!("Applying saved theme: {}", theme);
        surface.apply_theme(theme, theme.icon_class());
        Self {
            storage,
            surface,
            current: Mutex::new(theme),
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn toggle(&self) -> Result<Theme, StoreError> {
        let new_theme = {
            let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = current.toggled();
            *current
        };
        self.surface.apply_theme(new_theme, new_theme.icon_class());
        if let Err(e) = self.storage.set(THEME_KEY, new_theme.as_str()) {
            error!("Failed to persist theme: {}", e);
            return Err(e);
        }
        self.surface.show_notification(
            &format!("Switched to {} theme", new_theme),
            NotificationLevel::Success
        );
        Ok(new_theme)
    }
}
