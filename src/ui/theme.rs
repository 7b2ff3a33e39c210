use eframe::egui::{self, Color32, CornerRadius, Stroke, Visuals};
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Slate,
    Indigo,
    Catppuccin,
}

impl ThemePreset {
    /// Get all available presets
    pub fn all() -> &'static [ThemePreset] {
        &[
            ThemePreset::Slate,
            ThemePreset::Indigo,
            ThemePreset::Catppuccin,
        ]
    }

    /// Get display name for the preset
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Slate => "Slate",
            ThemePreset::Indigo => "Indigo",
            ThemePreset::Catppuccin => "Catppuccin Mocha",
        }
    }

    /// Get the theme colors for this preset
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Slate => Theme::slate(),
            ThemePreset::Indigo => Theme::indigo(),
            ThemePreset::Catppuccin => Theme::catppuccin(),
        }
    }
}

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    // UI element colors
    pub border: Color32,
    pub selection: Color32,
}

impl Theme {
    /// Slate theme - neutral default
    pub fn slate() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(9, 9, 11),
            bg_dark: Color32::from_rgb(24, 24, 27),
            bg_medium: Color32::from_rgb(39, 39, 42),
            bg_light: Color32::from_rgb(63, 63, 70),

            text_primary: Color32::from_rgb(250, 250, 250),
            text_secondary: Color32::from_rgb(212, 212, 216),
            text_muted: Color32::from_rgb(161, 161, 170),

            accent: Color32::from_rgb(59, 130, 246),        // Blue-500
            accent_hover: Color32::from_rgb(96, 165, 250),  // Blue-400
            accent_muted: Color32::from_rgb(37, 99, 191),   // Darker blue

            success: Color32::from_rgb(34, 197, 94),   // Green-500
            warning: Color32::from_rgb(245, 158, 11),  // Amber-500
            error: Color32::from_rgb(239, 68, 68),     // Red-500

            border: Color32::from_rgb(63, 63, 70),
            selection: Color32::from_rgb(59, 130, 246).gamma_multiply(0.3),
        }
    }

    /// Indigo theme - close to the web styling this app grew out of
    pub fn indigo() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(15, 15, 24),
            bg_dark: Color32::from_rgb(22, 22, 34),
            bg_medium: Color32::from_rgb(30, 30, 46),
            bg_light: Color32::from_rgb(46, 46, 66),

            text_primary: Color32::from_rgb(250, 250, 255),
            text_secondary: Color32::from_rgb(205, 205, 222),
            text_muted: Color32::from_rgb(145, 145, 168),

            accent: Color32::from_rgb(99, 102, 241),         // Indigo-500
            accent_hover: Color32::from_rgb(129, 140, 248),  // Indigo-400
            accent_muted: Color32::from_rgb(76, 78, 190),    // Darker indigo

            success: Color32::from_rgb(52, 211, 153),  // Emerald-400
            warning: Color32::from_rgb(251, 191, 36),  // Amber-400
            error: Color32::from_rgb(248, 113, 113),   // Red-400

            border: Color32::from_rgb(58, 58, 80),
            selection: Color32::from_rgb(99, 102, 241).gamma_multiply(0.3),
        }
    }

    /// Catppuccin Mocha theme - popular community palette
    pub fn catppuccin() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(17, 17, 27),    // Crust
            bg_dark: Color32::from_rgb(24, 24, 37),       // Mantle
            bg_medium: Color32::from_rgb(30, 30, 46),     // Base
            bg_light: Color32::from_rgb(49, 50, 68),      // Surface0

            text_primary: Color32::from_rgb(205, 214, 244),   // Text
            text_secondary: Color32::from_rgb(186, 194, 222), // Subtext1
            text_muted: Color32::from_rgb(147, 153, 178),     // Overlay1

            accent: Color32::from_rgb(137, 180, 250),        // Blue
            accent_hover: Color32::from_rgb(180, 190, 254),  // Lavender
            accent_muted: Color32::from_rgb(116, 148, 204),  // Darker blue

            success: Color32::from_rgb(166, 227, 161),  // Green
            warning: Color32::from_rgb(249, 226, 175),  // Yellow
            error: Color32::from_rgb(243, 139, 168),    // Red

            border: Color32::from_rgb(69, 71, 90),  // Surface1
            selection: Color32::from_rgb(137, 180, 250).gamma_multiply(0.3),
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        // Window and panel backgrounds
        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;

        // Widget backgrounds
        visuals.widgets.noninteractive.bg_fill = self.bg_medium;
        visuals.widgets.noninteractive.weak_bg_fill = self.bg_light;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        // Inactive widgets
        visuals.widgets.inactive.bg_fill = self.bg_medium;
        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Hovered widgets
        visuals.widgets.hovered.bg_fill = self.bg_light;
        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Active/pressed widgets
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent_hover);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Open widgets (dropdowns, etc)
        visuals.widgets.open.bg_fill = self.bg_light;
        visuals.widgets.open.weak_bg_fill = self.bg_light;
        visuals.widgets.open.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.open.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Selection
        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        // Hyperlinks
        visuals.hyperlink_color = self.accent;

        // Window styling
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_corner_radius = CornerRadius::same(10);
        visuals.window_shadow = egui::epaint::Shadow::NONE;

        // Popup styling
        visuals.menu_corner_radius = CornerRadius::same(8);
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}
