//! Avatar display and upload state.
//!
//! The upload cycle (JPEG re-encode, then store write) runs as one spawned
//! task. The UI polls it every frame; completion is applied here, never from
//! inside the task.

use eframe::egui;
use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::avatar::{self, AvatarError};
use crate::state::StateEvent;
use crate::store::AvatarStore;

/// Avatar display and upload state
pub struct AvatarState {
    /// Currently displayed avatar as a data URI, mirrors the stored record
    pub data_uri: Option<String>,
    /// Portrait texture, rebuilt lazily when `data_uri` changes
    texture: Option<egui::TextureHandle>,
    /// Whether the cropper modal is open
    pub show_cropper: bool,
    /// In-flight compress-and-store task
    task: Option<JoinHandle<Result<String, AvatarError>>>,
    /// Error from the last failed upload; the user can retry from the cropper
    pub error: Option<String>,
}

impl Default for AvatarState {
    fn default() -> Self {
        Self {
            data_uri: None,
            texture: None,
            show_cropper: false,
            task: None,
            error: None,
        }
    }
}

impl AvatarState {
    /// Load the stored record at startup. Absence is a normal first-run state.
    pub fn load_saved(&mut self, store: &AvatarStore) {
        match store.get() {
            Ok(Some(data_uri)) => {
                tracing::info!("Loaded stored avatar ({} bytes)", data_uri.len());
                self.data_uri = Some(data_uri);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Failed to load stored avatar: {}", e);
            }
        }
    }

    /// Whether a compress-and-store cycle is in flight
    pub fn uploading(&self) -> bool {
        self.task.is_some()
    }

    /// Accept a cropped image and start the compress-and-store cycle.
    /// A second upload while one is in flight is refused.
    pub fn start_upload(
        &mut self,
        raw: String,
        quality: f32,
        store: &AvatarStore,
    ) -> Option<StateEvent> {
        if self.task.is_some() {
            tracing::warn!("Avatar upload already in flight, ignoring new request");
            return None;
        }

        self.error = None;
        let store = store.clone();

        tracing::info!("Starting avatar upload ({} bytes raw)", raw.len());

        self.task = Some(tokio::spawn(async move {
            let compressed = avatar::compress_image(raw, quality).await?;
            store.put(&compressed)?;
            Ok(compressed)
        }));

        Some(StateEvent::StatusMessage("Uploading avatar...".to_string()))
    }

    /// Poll the upload task for completion.
    ///
    /// On success the displayed avatar switches to the stored record and the
    /// cropper closes. On failure the previous display state stays and the
    /// error is kept for retry.
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        let Some(handle) = &self.task else {
            return events;
        };
        if !handle.is_finished() {
            ctx.request_repaint();
            return events;
        }

        let Some(handle) = self.task.take() else {
            return events;
        };
        match handle.now_or_never() {
            Some(Ok(Ok(data_uri))) => {
                self.data_uri = Some(data_uri);
                self.texture = None;
                self.show_cropper = false;
                events.push(StateEvent::LogInfo("Avatar stored".to_string()));
                events.push(StateEvent::StatusMessage("Avatar updated".to_string()));
            }
            Some(Ok(Err(e))) => {
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!(
                    "Error storing the avatar: {}",
                    msg
                )));
                self.error = Some(msg);
                events.push(StateEvent::StatusMessage(
                    "Avatar upload failed".to_string(),
                ));
            }
            Some(Err(e)) => {
                let msg = format!("Avatar task panicked: {}", e);
                events.push(StateEvent::LogError(msg.clone()));
                self.error = Some(msg);
                events.push(StateEvent::StatusMessage(
                    "Avatar upload failed".to_string(),
                ));
            }
            None => {
                // Shouldn't happen since we checked is_finished()
                tracing::warn!("Avatar task not ready despite is_finished()");
            }
        }

        events
    }

    /// Portrait texture for the current avatar, masked to a circle.
    /// Created on first use after each change; `None` without an avatar.
    pub fn texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        if self.texture.is_none() {
            if let Some(uri) = &self.data_uri {
                match avatar::decode_data_uri(uri) {
                    Ok(img) => {
                        let portrait = circular_portrait(img.to_rgba8());
                        self.texture = Some(ctx.load_texture(
                            "avatar-portrait",
                            portrait,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                    Err(e) => {
                        // A record that cannot be decoded is treated as absent
                        tracing::error!("Stored avatar failed to decode: {}", e);
                        self.data_uri = None;
                    }
                }
            }
        }
        self.texture.as_ref()
    }
}

fn circular_portrait(rgba: image::RgbaImage) -> egui::ColorImage {
    let masked = mask_to_circle(rgba);
    let (w, h) = masked.dimensions();
    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], masked.as_raw())
}

/// Clear the alpha of pixels outside the inscribed circle so the portrait
/// renders round.
fn mask_to_circle(mut rgba: image::RgbaImage) -> image::RgbaImage {
    let (w, h) = rgba.dimensions();
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let radius = cx.min(cy);
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy > radius * radius {
            pixel.0[3] = 0;
        }
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::DEFAULT_QUALITY;
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_png_uri() -> String {
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb([10, 120, 200]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        avatar::to_data_uri("image/png", buf.get_ref())
    }

    fn temp_store(dir: &TempDir) -> AvatarStore {
        AvatarStore::open(dir.path().join("avatar-store.db")).unwrap()
    }

    async fn poll_until_idle(state: &mut AvatarState, ctx: &egui::Context) -> Vec<StateEvent> {
        for _ in 0..200 {
            let events = state.poll(ctx);
            if !state.uploading() {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("avatar task did not finish");
    }

    #[tokio::test]
    async fn concurrent_upload_is_refused() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);
        let mut state = AvatarState::default();

        assert!(state
            .start_upload(sample_png_uri(), DEFAULT_QUALITY, &store)
            .is_some());
        assert!(state.uploading());
        assert!(state
            .start_upload(sample_png_uri(), DEFAULT_QUALITY, &store)
            .is_none());
    }

    #[tokio::test]
    async fn upload_cycle_persists_and_updates_display() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);
        let ctx = egui::Context::default();
        let mut state = AvatarState::default();
        state.show_cropper = true;

        state.start_upload(sample_png_uri(), DEFAULT_QUALITY, &store);
        poll_until_idle(&mut state, &ctx).await;

        let displayed = state.data_uri.clone().expect("avatar displayed");
        assert!(displayed.starts_with("data:image/jpeg;base64,"));
        assert_eq!(store.get().unwrap().as_deref(), Some(displayed.as_str()));
        assert!(!state.show_cropper);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn failed_upload_keeps_previous_display_state() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);
        let ctx = egui::Context::default();
        let mut state = AvatarState::default();
        state.data_uri = Some("data:image/png;base64,b2xk".to_string());
        state.show_cropper = true;

        // Valid base64, not a decodable image
        let bad = avatar::to_data_uri("image/png", b"not an image");
        state.start_upload(bad, DEFAULT_QUALITY, &store);
        poll_until_idle(&mut state, &ctx).await;

        assert!(state.error.is_some());
        assert!(state.show_cropper);
        assert_eq!(
            state.data_uri.as_deref(),
            Some("data:image/png;base64,b2xk")
        );
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn stored_record_loads_at_startup() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);
        store.put("data:image/jpeg;base64,c2F2ZWQ=").unwrap();

        let mut state = AvatarState::default();
        state.load_saved(&store);

        assert_eq!(
            state.data_uri.as_deref(),
            Some("data:image/jpeg;base64,c2F2ZWQ=")
        );
    }

    #[test]
    fn circular_mask_clears_corners_and_keeps_center() {
        let rgba = image::RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]));
        let masked = mask_to_circle(rgba);
        assert_eq!(masked.dimensions(), (10, 10));
        // Corner pixels are outside the inscribed circle
        assert_eq!(masked.get_pixel(0, 0).0[3], 0);
        assert_eq!(masked.get_pixel(9, 9).0[3], 0);
        // Center pixel keeps its alpha
        assert_eq!(masked.get_pixel(5, 5).0[3], 255);
    }
}
