//! Light/dark toggle persisted under a single storage key.

use eframe::egui;
use tracing::debug;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        }
    }

    /// Icon shown on the toggle: the sun switches back to light.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀",
        }
    }
}

impl From<eframe::Theme> for Theme {
    fn from(theme: eframe::Theme) -> Self {
        match theme {
            eframe::Theme::Light => Theme::Light,
            eframe::Theme::Dark => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreference {
    theme: Theme,
    explicit: bool,
}

impl ThemePreference {
    /// A stored choice wins; otherwise follow the system, defaulting to light.
    pub fn resolve(stored: Option<&str>, system: Option<Theme>) -> Self {
        match stored.and_then(Theme::parse) {
            Some(theme) => Self {
                theme,
                explicit: true,
            },
            None => Self {
                theme: system.unwrap_or(Theme::Light),
                explicit: false,
            },
        }
    }

    pub fn load(storage: Option<&dyn eframe::Storage>, system: Option<Theme>) -> Self {
        let stored = storage.and_then(|s| s.get_string(THEME_KEY));
        let preference = Self::resolve(stored.as_deref(), system);
        debug!(theme = preference.theme.as_str(), explicit = preference.explicit, "loaded theme");
        preference
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.explicit = true;
        self.theme
    }

    /// Tracks system theme changes until the user picks a theme. Returns
    /// whether the theme changed.
    pub fn follow_system(&mut self, system: Option<Theme>) -> bool {
        match system {
            Some(theme) if !self.explicit && theme != self.theme => {
                self.theme = theme;
                true
            }
            _ => false,
        }
    }

    pub fn persist(&self, storage: &mut dyn eframe::Storage) {
        if self.explicit {
            storage.set_string(THEME_KEY, self.theme.as_str().to_string());
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_visuals(self.theme.visuals());
    }
}
