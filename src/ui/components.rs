//! Shared UI components for Visage

use eframe::egui::{self, RichText, Vec2};

use crate::app::VisageApp;
use crate::ui::theme::{Theme, ThemePreset};

/// Render a titled card frame and run `content` inside it
pub fn section_frame(
    theme: &Theme,
    ui: &mut egui::Ui,
    title: &str,
    content: impl FnOnce(&mut egui::Ui),
) {
    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(16))
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.label(
                RichText::new(title)
                    .color(theme.accent)
                    .size(13.0)
                    .strong(),
            );
            ui.add_space(12.0);
            content(ui);
        });
}

/// Render the About dialog
pub fn render_about_dialog(app: &mut VisageApp, ctx: &egui::Context) {
    if !app.ui.show_about_dialog {
        return;
    }

    let theme = &app.ui.current_theme;

    egui::Window::new("About Visage")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 240.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);

                // App name
                ui.label(
                    RichText::new("Visage")
                        .size(24.0)
                        .strong()
                        .color(theme.accent),
                );

                ui.add_space(4.0);
                ui.label(
                    RichText::new("Profile Card Editor")
                        .size(14.0)
                        .color(theme.text_secondary),
                );

                ui.add_space(12.0);

                // Version
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);

                // Description
                ui.label(
                    RichText::new("Edit your profile card and keep it")
                        .color(theme.text_secondary),
                );
                ui.label(
                    RichText::new("on your own machine")
                        .color(theme.text_secondary),
                );

                ui.add_space(12.0);

                // Built with
                ui.label(
                    RichText::new("Built with Rust + egui")
                        .size(11.0)
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);

                // Close button
                if ui.button("Close").clicked() {
                    app.ui.show_about_dialog = false;
                }

                ui.add_space(8.0);
            });
        });
}

/// Render the Settings dialog
pub fn render_settings_dialog(app: &mut VisageApp, ctx: &egui::Context) {
    if !app.ui.show_settings_dialog {
        return;
    }

    let theme = app.ui.current_theme.clone();

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label(RichText::new("Theme:").color(theme.text_muted));

                let current_name = app.config.appearance.theme.name();
                egui::ComboBox::from_id_salt("theme_select")
                    .selected_text(current_name)
                    .show_ui(ui, |ui| {
                        for preset in ThemePreset::all() {
                            if ui
                                .selectable_label(
                                    app.config.appearance.theme == *preset,
                                    preset.name(),
                                )
                                .clicked()
                            {
                                app.config.appearance.theme = *preset;
                                app.ui.current_theme = preset.theme();
                                app.ui.theme_dirty = true;
                                app.save_config();
                            }
                        }
                    });
            });

            // Theme preview swatches
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Preview:").color(theme.text_muted));
                ui.add_space(8.0);

                let swatch_size = Vec2::new(20.0, 20.0);
                let colors = [
                    ("Background", theme.bg_dark),
                    ("Accent", theme.accent),
                    ("Success", theme.success),
                    ("Warning", theme.warning),
                    ("Error", theme.error),
                ];

                for (label, color) in colors {
                    let (rect, response) =
                        ui.allocate_exact_size(swatch_size, egui::Sense::hover());
                    ui.painter().rect_filled(rect, 4.0, color);
                    response.on_hover_text(label);
                    ui.add_space(4.0);
                }
            });

            ui.add_space(12.0);

            ui.horizontal(|ui| {
                ui.label(RichText::new("Avatar quality:").color(theme.text_muted));
                let response = ui.add(
                    egui::Slider::new(&mut app.config.avatar.jpeg_quality, 0.1..=1.0)
                        .step_by(0.05),
                );
                if response.changed() {
                    app.save_config();
                }
            });
            ui.label(
                RichText::new("Applied when the next avatar is stored")
                    .size(11.0)
                    .color(theme.text_muted),
            );

            ui.add_space(12.0);

            ui.vertical_centered(|ui| {
                if ui.button("Close").clicked() {
                    app.ui.show_settings_dialog = false;
                }
            });
            ui.add_space(4.0);
        });
}
