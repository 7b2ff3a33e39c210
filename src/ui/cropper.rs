//! Avatar cropper modal.
//!
//! Pick an image from disk, frame a square crop with position and size
//! sliders, and hand the cropped PNG to the avatar upload cycle. Closing the
//! modal does not cancel an in-flight upload; its completion is applied by
//! the owning state when polled.

use eframe::egui::{self, RichText};
use image::{imageops::FilterType, DynamicImage, GenericImageView};
use std::io::Cursor;
use std::path::Path;

use crate::app::VisageApp;
use crate::avatar;

const PREVIEW_MAX: f32 = 280.0;
const MIN_CROP_FRACTION: f32 = 0.2;

/// UI state for the cropper modal
pub struct CropperState {
    /// Source image picked from disk
    source: Option<DynamicImage>,
    /// Downscaled preview texture of the source
    preview: Option<egui::TextureHandle>,
    /// Name of the picked file, for display
    file_name: String,
    /// Crop square center as fractions of the source dimensions
    center_x: f32,
    center_y: f32,
    /// Crop square side as a fraction of the shorter source side
    size: f32,
    /// Error from the last pick, decode, or encode
    pub error: Option<String>,
}

impl Default for CropperState {
    fn default() -> Self {
        Self {
            source: None,
            preview: None,
            file_name: String::new(),
            center_x: 0.5,
            center_y: 0.5,
            size: 1.0,
            error: None,
        }
    }
}

impl CropperState {
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn source_dimensions(&self) -> Option<(u32, u32)> {
        self.source.as_ref().map(|img| img.dimensions())
    }

    /// Load a picked file as the crop source
    fn load_source(&mut self, path: &Path) {
        self.error = None;
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.error = Some(format!("Could not read {}: {}", path.display(), e));
                return;
            }
        };
        match image::load_from_memory(&bytes) {
            Ok(img) => {
                tracing::info!(
                    "Loaded crop source {} ({}x{})",
                    path.display(),
                    img.width(),
                    img.height()
                );
                self.file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.source = Some(img);
                self.preview = None;
                self.center_x = 0.5;
                self.center_y = 0.5;
                self.size = 1.0;
            }
            Err(e) => {
                self.error = Some(format!("Could not decode image: {}", e));
            }
        }
    }

    /// Pixel rectangle of the crop square in source coordinates: (x, y, side)
    fn crop_rect(&self) -> Option<(u32, u32, u32)> {
        let (w, h) = self.source_dimensions()?;
        let side = ((w.min(h) as f32) * self.size).round().max(1.0) as u32;
        let side = side.min(w).min(h);
        let x = (self.center_x * w as f32 - side as f32 / 2.0)
            .clamp(0.0, (w - side) as f32)
            .round() as u32;
        let y = (self.center_y * h as f32 - side as f32 / 2.0)
            .clamp(0.0, (h - side) as f32)
            .round() as u32;
        Some((x, y, side))
    }

    /// Crop the source and encode the result as a PNG data URI
    fn cropped_png_uri(&mut self) -> Option<String> {
        let (x, y, side) = self.crop_rect()?;
        let cropped = self.source.as_ref()?.crop_imm(x, y, side, side);
        let mut buf = Cursor::new(Vec::new());
        match cropped.write_to(&mut buf, image::ImageFormat::Png) {
            Ok(()) => Some(avatar::to_data_uri("image/png", buf.get_ref())),
            Err(e) => {
                self.error = Some(format!("Could not encode crop: {}", e));
                None
            }
        }
    }

    /// Preview texture and its on-screen size, built lazily per source
    fn preview_texture(&mut self, ctx: &egui::Context) -> Option<(egui::TextureHandle, egui::Vec2)> {
        let img = self.source.as_ref()?;
        let (w, h) = img.dimensions();
        let scale = (PREVIEW_MAX / w.max(h) as f32).min(1.0);
        let size = egui::vec2(w as f32 * scale, h as f32 * scale);
        if self.preview.is_none() {
            let small = img.resize(
                (w as f32 * scale).round().max(1.0) as u32,
                (h as f32 * scale).round().max(1.0) as u32,
                FilterType::Triangle,
            );
            let rgba = small.to_rgba8();
            let (pw, ph) = rgba.dimensions();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [pw as usize, ph as usize],
                rgba.as_raw(),
            );
            self.preview = Some(ctx.load_texture(
                "cropper-preview",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
        self.preview.as_ref().map(|tex| (tex.clone(), size))
    }
}

/// Render the cropper modal
pub fn render_cropper(app: &mut VisageApp, ctx: &egui::Context) {
    if !app.avatar.show_cropper {
        return;
    }

    let theme = app.ui.current_theme.clone();
    let uploading = app.avatar.uploading();

    egui::Window::new("Change Avatar")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(4.0);

                if ui
                    .add_enabled(!uploading, egui::Button::new("Choose image..."))
                    .clicked()
                {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_title("Choose an avatar image")
                        .add_filter("Images", &["png", "jpg", "jpeg"])
                        .pick_file()
                    {
                        app.cropper.load_source(&path);
                    }
                }
                if !app.cropper.file_name.is_empty() {
                    ui.label(
                        RichText::new(&app.cropper.file_name)
                            .color(theme.text_muted)
                            .size(11.0),
                    );
                }
            });

            if let Some((tex, size)) = app.cropper.preview_texture(ctx) {
                ui.add_space(8.0);
                let response = ui
                    .vertical_centered(|ui| ui.add(egui::Image::new(&tex).fit_to_exact_size(size)))
                    .inner;
                let rect = response.rect;

                if let (Some((x, y, side)), Some((w, h))) =
                    (app.cropper.crop_rect(), app.cropper.source_dimensions())
                {
                    let sx = rect.width() / w as f32;
                    let sy = rect.height() / h as f32;
                    let crop = egui::Rect::from_min_size(
                        rect.min + egui::vec2(x as f32 * sx, y as f32 * sy),
                        egui::vec2(side as f32 * sx, side as f32 * sy),
                    );

                    // Dim everything outside the crop square
                    let dim = egui::Color32::from_black_alpha(110);
                    let painter = ui.painter().with_clip_rect(rect);
                    painter.rect_filled(
                        egui::Rect::from_min_max(rect.min, egui::pos2(rect.max.x, crop.min.y)),
                        0.0,
                        dim,
                    );
                    painter.rect_filled(
                        egui::Rect::from_min_max(egui::pos2(rect.min.x, crop.max.y), rect.max),
                        0.0,
                        dim,
                    );
                    painter.rect_filled(
                        egui::Rect::from_min_max(
                            egui::pos2(rect.min.x, crop.min.y),
                            egui::pos2(crop.min.x, crop.max.y),
                        ),
                        0.0,
                        dim,
                    );
                    painter.rect_filled(
                        egui::Rect::from_min_max(
                            egui::pos2(crop.max.x, crop.min.y),
                            egui::pos2(rect.max.x, crop.max.y),
                        ),
                        0.0,
                        dim,
                    );
                    painter.rect_stroke(
                        crop,
                        0.0,
                        egui::Stroke::new(1.5, theme.accent),
                        egui::StrokeKind::Middle,
                    );
                }

                ui.add_space(8.0);

                ui.add(
                    egui::Slider::new(&mut app.cropper.center_x, 0.0..=1.0)
                        .text("Horizontal")
                        .step_by(0.01),
                );
                ui.add(
                    egui::Slider::new(&mut app.cropper.center_y, 0.0..=1.0)
                        .text("Vertical")
                        .step_by(0.01),
                );
                ui.add(
                    egui::Slider::new(&mut app.cropper.size, MIN_CROP_FRACTION..=1.0)
                        .text("Size")
                        .step_by(0.01),
                );
            } else {
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("Pick a PNG or JPEG to get started")
                            .color(theme.text_muted),
                    );
                });
            }

            if uploading {
                ui.add_space(8.0);
                ui.colored_label(theme.success, "Uploading avatar...");
            } else if let Some(err) = app.cropper.error.clone() {
                ui.add_space(8.0);
                ui.colored_label(theme.error, RichText::new(err).size(12.0));
            } else if let Some(err) = app.avatar.error.clone() {
                ui.add_space(8.0);
                ui.colored_label(
                    theme.error,
                    RichText::new(format!("Upload failed: {}", err)).size(12.0),
                );
            }

            if app.store.is_none() {
                ui.add_space(8.0);
                ui.colored_label(
                    theme.warning,
                    "Avatar storage is unavailable, uploads are disabled",
                );
            }

            ui.add_space(12.0);

            ui.horizontal(|ui| {
                let can_apply =
                    app.cropper.has_source() && !uploading && app.store.is_some();
                if ui
                    .add_enabled(can_apply, egui::Button::new("Apply"))
                    .clicked()
                {
                    if let Some(raw) = app.cropper.cropped_png_uri() {
                        if let Some(store) = &app.store {
                            let quality = app.config.avatar.jpeg_quality;
                            let event = app.avatar.start_upload(raw, quality, store);
                            if let Some(event) = event {
                                app.apply_events(vec![event]);
                            }
                        }
                    }
                }
                // Closing does not cancel an in-flight upload
                if ui.button("Cancel").clicked() {
                    app.avatar.show_cropper = false;
                }
            });
            ui.add_space(4.0);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cropper_with_source(width: u32, height: u32) -> CropperState {
        CropperState {
            source: Some(DynamicImage::ImageRgb8(image::RgbImage::new(width, height))),
            ..CropperState::default()
        }
    }

    #[test]
    fn no_source_means_no_crop_rect() {
        let cropper = CropperState::default();
        assert_eq!(cropper.crop_rect(), None);
    }

    #[test]
    fn full_size_crop_covers_the_shorter_side() {
        let cropper = cropper_with_source(100, 60);
        assert_eq!(cropper.crop_rect(), Some((20, 0, 60)));
    }

    #[test]
    fn crop_rect_clamps_to_image_bounds() {
        let mut cropper = cropper_with_source(100, 100);
        cropper.size = 0.5;
        cropper.center_x = 0.0;
        cropper.center_y = 1.0;
        assert_eq!(cropper.crop_rect(), Some((0, 50, 50)));
    }

    #[test]
    fn crop_output_is_square_at_requested_side() {
        let mut cropper = cropper_with_source(80, 120);
        cropper.size = 0.5;
        let uri = cropper.cropped_png_uri().unwrap();
        let img = avatar::decode_data_uri(&uri).unwrap();
        assert_eq!(img.dimensions(), (40, 40));
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn tiny_sources_still_produce_a_crop() {
        let cropper = cropper_with_source(1, 1);
        assert_eq!(cropper.crop_rect(), Some((0, 0, 1)));
    }
}
