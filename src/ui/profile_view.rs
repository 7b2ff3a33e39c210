//! Profile view: portrait, submitted card, and the edit form.

use eframe::egui::{self, RichText};

use crate::app::VisageApp;
use crate::ui::components;
use crate::ui::theme::Theme;

const PORTRAIT_SIZE: f32 = 150.0;

/// Render the central profile view
pub fn render_profile_view(app: &mut VisageApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();
    let available_width = ui.available_width();

    egui::ScrollArea::vertical()
        .id_salt("profile_scroll")
        .show(ui, |ui| {
            ui.add_space(20.0);

            ui.vertical_centered(|ui| {
                render_portrait(app, &theme, ui);
                ui.add_space(10.0);

                if app.avatar.uploading() {
                    ui.colored_label(theme.success, "Uploading avatar...");
                } else if let Some(err) = &app.avatar.error {
                    ui.colored_label(
                        theme.error,
                        RichText::new(format!("Avatar upload failed: {}", err)).size(12.0),
                    );
                }

                ui.add_space(6.0);
                if ui.button("Change avatar...").clicked() {
                    app.avatar.show_cropper = true;
                }

                ui.add_space(18.0);

                // Submitted card
                if app.form.submitted {
                    ui.label(
                        RichText::new(&app.form.submitted_full_name)
                            .size(20.0)
                            .strong()
                            .color(theme.text_primary),
                    );
                    ui.label(
                        RichText::new(&app.form.submitted_profession)
                            .size(13.0)
                            .color(theme.text_muted),
                    );
                    ui.add_space(18.0);
                }
            });

            components::section_frame(&theme, ui, "Edit profile", |ui| {
                ui.set_width(available_width - 64.0);

                let name_changed = render_text_field(
                    &theme,
                    ui,
                    "Full Name",
                    &mut app.form.full_name,
                    &app.form.full_name_error,
                );
                if name_changed {
                    app.form.full_name_changed();
                }

                ui.add_space(10.0);

                let profession_changed = render_text_field(
                    &theme,
                    ui,
                    "Profession",
                    &mut app.form.profession,
                    &app.form.profession_error,
                );
                if profession_changed {
                    app.form.profession_changed();
                }

                ui.add_space(14.0);

                if ui.button("Submit").clicked() {
                    let events = app.form.submit(app.kv.as_mut());
                    app.apply_events(events);
                }
            });

            ui.add_space(20.0);
        });
}

/// Render the circular portrait, or a placeholder before any avatar exists.
/// Clicking the placeholder opens the cropper.
fn render_portrait(app: &mut VisageApp, theme: &Theme, ui: &mut egui::Ui) {
    let radius = PORTRAIT_SIZE / 2.0;
    let texture = app.avatar.texture(ui.ctx()).cloned();

    match texture {
        Some(tex) => {
            let response = ui.add(
                egui::Image::new(&tex).fit_to_exact_size(egui::vec2(PORTRAIT_SIZE, PORTRAIT_SIZE)),
            );
            ui.painter().circle_stroke(
                response.rect.center(),
                radius,
                egui::Stroke::new(2.0, theme.border),
            );
        }
        None => {
            let (rect, response) = ui.allocate_exact_size(
                egui::vec2(PORTRAIT_SIZE, PORTRAIT_SIZE),
                egui::Sense::click(),
            );
            let center = rect.center();
            let painter = ui.painter();
            painter.circle_filled(center, radius, theme.bg_medium);
            painter.circle_stroke(center, radius, egui::Stroke::new(2.0, theme.border));
            // Head-and-shoulders placeholder
            painter.circle_filled(center - egui::vec2(0.0, 20.0), 20.0, theme.bg_light);
            painter.circle_filled(center + egui::vec2(0.0, 42.0), 32.0, theme.bg_light);
            if response.clicked() {
                app.avatar.show_cropper = true;
            }
            response.on_hover_text("Add an avatar");
        }
    }
}

/// Render one labeled text input with its validation message.
/// Returns whether the value changed this frame.
fn render_text_field(
    theme: &Theme,
    ui: &mut egui::Ui,
    label: &str,
    value: &mut String,
    error: &Option<String>,
) -> bool {
    ui.label(RichText::new(label).color(theme.text_muted).size(12.0));
    ui.add_space(4.0);

    let width = ui.available_width();
    let edit = egui::TextEdit::singleline(value).hint_text(label);
    let response = if error.is_some() {
        egui::Frame::new()
            .stroke(egui::Stroke::new(1.0, theme.error))
            .corner_radius(4.0)
            .show(ui, |ui| ui.add_sized([width - 4.0, 22.0], edit))
            .inner
    } else {
        ui.add_sized([width, 22.0], edit)
    };

    if let Some(msg) = error {
        ui.colored_label(theme.error, RichText::new(msg).size(11.0).italics());
    }

    response.changed()
}
