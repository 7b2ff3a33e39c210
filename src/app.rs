use eframe::egui;

use crate::config::Config;
use crate::kv::KvStore;
use crate::state::{AvatarState, FormState, StateEvent, UiState};
use crate::store::AvatarStore;
use crate::ui::{self, CropperState};

/// Main application state
pub struct VisageApp {
    /// Application configuration
    pub config: Config,
    /// Key-value layer holding the submitted profile fields
    pub kv: Option<KvStore>,
    /// Durable avatar record store
    pub store: Option<AvatarStore>,
    /// Live form state
    pub form: FormState,
    /// Avatar display and upload state
    pub avatar: AvatarState,
    /// Cropper modal state
    pub cropper: CropperState,
    /// UI state
    pub ui: UiState,
    /// Status message for the status bar
    pub status_message: String,
}

impl VisageApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Load configuration
        let config = Config::load().unwrap_or_default();

        // Open the key-value layer for submitted fields
        let kv = match KvStore::default_path().and_then(|path| KvStore::open(path)) {
            Ok(kv) => Some(kv),
            Err(e) => {
                tracing::error!("Failed to open profile store: {e:#}");
                None
            }
        };

        // Open the avatar store
        let store = match AvatarStore::default_path().and_then(|path| AvatarStore::open(path)) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::error!("Failed to open avatar store: {}", e);
                None
            }
        };

        // Restore any previously submitted profile
        let mut form = FormState::default();
        if let Some(kv) = &kv {
            form.load_saved(kv);
        }

        // Restore the stored avatar
        let mut avatar = AvatarState::default();
        if let Some(store) = &store {
            avatar.load_saved(store);
        }

        let status_message = if form.submitted {
            format!("Welcome back, {}", form.submitted_full_name)
        } else {
            "Ready".to_string()
        };

        let theme = config.appearance.theme.theme();

        Self {
            config,
            kv,
            store,
            form,
            avatar,
            cropper: CropperState::default(),
            ui: UiState::new(theme),
            status_message,
        }
    }

    /// Save configuration to disk
    pub fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Apply events returned by state methods
    pub fn apply_events(&mut self, events: Vec<StateEvent>) {
        for event in events {
            match event {
                StateEvent::StatusMessage(msg) => self.status_message = msg,
                StateEvent::LogInfo(msg) => tracing::info!("{}", msg),
                StateEvent::LogError(msg) => tracing::error!("{}", msg),
            }
        }
    }
}

impl eframe::App for VisageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme when it changes
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        // Poll the in-flight avatar upload
        let events = self.avatar.poll(ctx);
        self.apply_events(events);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings...").clicked() {
                        self.ui.show_settings_dialog = true;
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.ui.show_about_dialog = true;
                        ui.close();
                    }
                });
            });
        });

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
            });
        });

        // Main content area
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::render_profile_view(self, ui);
        });

        // Dialogs
        ui::render_cropper(self, ctx);
        ui::render_settings_dialog(self, ctx);
        ui::render_about_dialog(self, ctx);
    }
}
