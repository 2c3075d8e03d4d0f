// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the open directory and the current image
//! document, feeds canvas input into the editing core and applies the
//! actions returned by the toolbar and properties panel.

use crate::ui::{canvas, properties, toolbar};
use anyhow::Context as _;
use simple_annotator::config::AnnotatorConfig;
use simple_annotator::editor::{
    draw_list, handle_pointer, ClassPrompt, EditContext, Mode, PointerEvent, SessionState,
};
use simple_annotator::io::{media, serialization};
use simple_annotator::models::annotation::Annotation;
use simple_annotator::models::project::{DirectorySession, ImageDocument};
use simple_annotator::util::geometry::Frame;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Answers class prompts with the class selected in the side panel.
///
/// egui redraws every frame and cannot block inside a pointer handler for a
/// modal answer, so the choice is made up front. There is no cancel: with no
/// class selected the new annotation is simply not created.
struct ActiveClassPrompt(Option<usize>);

impl ClassPrompt for ActiveClassPrompt {
    fn prompt_for_class(&mut self, class_names: &[String]) -> Option<usize> {
        self.0.filter(|&class| class < class_names.len())
    }
}

/// Result of background image loading operation.
struct LoadedImageData {
    path: PathBuf,
    frame: Frame,
    pixels: Vec<u8>,
    annotations: Vec<Annotation>,
}

/// Main application state.
pub struct AnnotatorApp {
    config: AnnotatorConfig,

    /// Open directory (class list, colors, image list)
    directory: Option<DirectorySession>,

    /// Current image with its annotations and interaction state
    document: Option<ImageDocument>,

    /// Editing mode, carried across images
    mode: Mode,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImageData, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Class assigned to newly created annotations
    active_class: Option<usize>,

    point_size: u32,
    zoom: f32,

    /// Annotation line being edited in the properties panel
    line_edit: Option<properties::LineEdit>,

    /// Last status message shown under the canvas
    status: String,
}

impl AnnotatorApp {
    /// Create the application, optionally opening `directory` right away.
    pub fn new(config: AnnotatorConfig, directory: Option<PathBuf>) -> Self {
        let mut app = Self {
            point_size: config.point_size,
            config,
            directory: None,
            document: None,
            mode: Mode::default(),
            image_texture: None,
            image_loader: None,
            loading_message: None,
            active_class: None,
            zoom: 1.0,
            line_edit: None,
            status: String::new(),
        };
        if let Some(directory) = directory {
            app.open_directory(directory);
        }
        app
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// Log a failure and show it in the status line.
    fn report(&mut self, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.set_status(format!("Error: {:#}", error));
    }

    /// Open a directory and load its first image.
    fn open_directory(&mut self, directory: PathBuf) {
        self.maybe_save_before_leaving();

        match DirectorySession::open(&directory, &self.config)
            .with_context(|| format!("Failed to open directory {}", directory.display()))
        {
            Ok(session) => {
                self.set_status(format!(
                    "Opened {} ({} images)",
                    directory.display(),
                    session.images.len()
                ));
                self.active_class = Some(0);
                self.directory = Some(session);
                self.load_current_image();
            }
            Err(e) => self.report(e),
        }
    }

    /// Offer to save when the current image has unsaved changes.
    fn maybe_save_before_leaving(&mut self) {
        let dirty = self
            .document
            .as_ref()
            .is_some_and(|doc| doc.store.is_dirty());
        if !dirty {
            return;
        }

        let answer = rfd::MessageDialog::new()
            .set_title("Unsaved annotations")
            .set_description("The current image has unsaved annotations. Save them first?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        if matches!(answer, rfd::MessageDialogResult::Yes) {
            self.save();
        } else {
            log::info!("Discarding unsaved annotations");
        }
    }

    /// Switch to image `index` of the open directory.
    fn go_to_image(&mut self, index: usize) {
        let Some(session) = self.directory.as_ref() else {
            return;
        };
        if session.current_index() == Some(index) || index >= session.images.len() {
            return;
        }

        self.maybe_save_before_leaving();
        if let Some(session) = self.directory.as_mut() {
            session.go_to(index);
        }
        self.load_current_image();
    }

    /// Load the current image and its annotation file (asynchronously).
    fn load_current_image(&mut self) {
        self.document = None;
        self.image_texture = None;
        self.line_edit = None;

        let Some(session) = self.directory.as_ref() else {
            return;
        };
        let Some(path) = session.current_image().map(Path::to_path_buf) else {
            self.set_status("No images in directory");
            return;
        };
        let class_count = session.classes.len();
        let resizer = self.config.resizer();

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some(format!("Loading {}...", path.display()));

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = (|| -> Result<LoadedImageData, String> {
                let loaded = media::load_image(&path, &resizer)
                    .map_err(|e| format!("Failed to load image: {}", e))?;
                let frame = loaded
                    .frame()
                    .ok_or_else(|| format!("Image {} is empty", path.display()))?;

                let annotation_path = serialization::annotation_path_for(&path);
                let annotations = serialization::read_annotation_file(&annotation_path, class_count)
                    .map_err(|e| {
                        format!("Failed to load {}: {}", annotation_path.display(), e)
                    })?;

                Ok(LoadedImageData {
                    path,
                    frame,
                    pixels: loaded.pixels,
                    annotations,
                })
            })();

            let _ = sender.send(result);
        });
    }

    /// Ask where to save and write the current annotations there.
    fn save(&mut self) {
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        let default_path = doc.annotation_path();

        let mut dialog = rfd::FileDialog::new().add_filter("Text Files", &["txt"]);
        if let Some(dir) = default_path.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = default_path.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }

        if let Some(path) = dialog.save_file() {
            if let Err(e) = self.write_annotations(&path) {
                self.report(e);
            }
        }
    }

    fn write_annotations(&mut self, path: &Path) -> anyhow::Result<()> {
        let doc = self.document.as_mut().context("No image loaded")?;
        doc.save_to(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        let count = doc.store.len();

        log::info!("Saved {} annotations to {}", count, path.display());
        self.set_status(format!("Saved {} annotations to {}", count, path.display()));
        Ok(())
    }

    fn switch_mode(&mut self) {
        self.mode = self.mode.toggled();
        if let Some(doc) = self.document.as_mut() {
            doc.session = SessionState::new(self.mode);
        }
        log::info!("Switched to {} mode", self.mode.label());
    }

    /// Run canvas input through the editing state machine.
    fn apply_pointer_events(&mut self, events: &[PointerEvent]) {
        let (Some(session), Some(doc)) = (self.directory.as_ref(), self.document.as_mut()) else {
            return;
        };
        let mut prompt = ActiveClassPrompt(self.active_class);

        for event in events {
            let mut ctx = EditContext {
                store: &mut doc.store,
                frame: doc.frame,
                class_names: session.classes.names(),
                prompt: &mut prompt,
                hit_tolerance: self.config.hit_tolerance_px,
            };
            doc.session = match handle_pointer(doc.session, event, &mut ctx) {
                Ok(next) => next,
                Err(e) => {
                    log::error!("Resetting interaction after error: {}", e);
                    SessionState::new(doc.session.mode)
                }
            };
        }
    }

    /// Replace annotation `index` with a line typed in the properties panel.
    fn commit_line(&mut self, index: usize, text: &str) -> anyhow::Result<()> {
        let (Some(session), Some(doc)) = (self.directory.as_ref(), self.document.as_mut()) else {
            return Ok(());
        };
        let annotation = serialization::parse_line(text, index + 1, session.classes.len())
            .with_context(|| format!("Rejected edit of annotation {}", index))?;
        doc.store.set(index, annotation)?;
        log::info!("Edited annotation {}", index);
        Ok(())
    }

    fn handle_properties_action(&mut self, action: properties::PropertiesAction) {
        match action {
            properties::PropertiesAction::SelectClass(class) => {
                self.active_class = Some(class);
                log::info!("Active class {}", class);
            }
            properties::PropertiesAction::SetColor(class, color) => {
                if let Some(session) = self.directory.as_mut() {
                    if let Err(e) = session.classes.set_color(class, color) {
                        self.report(e.into());
                    }
                }
            }
            properties::PropertiesAction::GoToImage(index) => self.go_to_image(index),
            properties::PropertiesAction::CommitLine(index, text) => {
                if let Err(e) = self.commit_line(index, &text) {
                    self.report(e);
                }
            }
            properties::PropertiesAction::DeleteAnnotation(index) => {
                if let Some(doc) = self.document.as_mut() {
                    match doc.store.remove(index) {
                        Ok(_) => {
                            // Indices held by the interaction are now stale.
                            doc.session = SessionState::new(doc.session.mode);
                            log::info!(
                                "Deleted annotation {}, total: {}",
                                index,
                                doc.store.len()
                            );
                        }
                        Err(e) => self.report(e.into()),
                    }
                }
            }
            properties::PropertiesAction::None => {}
        }
    }

    fn handle_toolbar_action(&mut self, action: toolbar::ToolbarAction) {
        let session = self.directory.as_ref();
        match action {
            toolbar::ToolbarAction::SwitchMode => self.switch_mode(),
            toolbar::ToolbarAction::PrevImage => {
                if let Some(index) = session.and_then(DirectorySession::prev_index) {
                    self.go_to_image(index);
                }
            }
            toolbar::ToolbarAction::NextImage => {
                if let Some(index) = session.and_then(DirectorySession::next_index) {
                    self.go_to_image(index);
                }
            }
            toolbar::ToolbarAction::Save => self.save(),
            toolbar::ToolbarAction::None => {}
        }
    }

    fn status_line(&self) -> String {
        let Some(doc) = self.document.as_ref() else {
            return self.status.clone();
        };
        let name = doc
            .image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dirty = if doc.store.is_dirty() { " *" } else { "" };
        format!(
            "{}{} | {} | {} annotations | zoom {:.0}% | {}",
            name,
            dirty,
            self.mode.label(),
            doc.store.len(),
            self.zoom * 100.0,
            self.status
        )
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed image loading
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;

                match result {
                    Ok(loaded) => {
                        // Create egui texture from the loaded image data
                        let size = [loaded.frame.width as usize, loaded.frame.height as usize];
                        let color_image =
                            egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                        self.image_texture = Some(ctx.load_texture(
                            "loaded_image",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ));

                        log::info!(
                            "Image {} ready with {} annotations",
                            loaded.path.display(),
                            loaded.annotations.len()
                        );
                        self.document = Some(ImageDocument::new(
                            loaded.path,
                            loaded.frame,
                            loaded.annotations,
                            self.mode,
                        ));
                        self.zoom = 1.0;
                        self.set_status("");
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        self.set_status(e);
                    }
                }
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Directory...").clicked() {
                        ui.close_menu();
                        if let Some(directory) = rfd::FileDialog::new().pick_folder() {
                            self.open_directory(directory);
                        }
                    }
                    if ui
                        .add_enabled(self.document.is_some(), egui::Button::new("Save..."))
                        .clicked()
                    {
                        ui.close_menu();
                        self.save();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        self.maybe_save_before_leaving();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_state = toolbar::ToolbarState {
            mode: self.mode,
            has_prev: self
                .directory
                .as_ref()
                .and_then(DirectorySession::prev_index)
                .is_some(),
            has_next: self
                .directory
                .as_ref()
                .and_then(DirectorySession::next_index)
                .is_some(),
            can_save: self.document.is_some(),
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &toolbar_state, &mut self.point_size))
            .inner;
        self.handle_toolbar_action(toolbar_action);

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                let view = properties::PropertiesView {
                    classes: self.directory.as_ref().map(|s| &s.classes),
                    active_class: self.active_class,
                    images: self
                        .directory
                        .as_ref()
                        .map(|s| s.images.as_slice())
                        .unwrap_or_default(),
                    current_image: self.directory.as_ref().and_then(|s| s.current_index()),
                    annotations: self
                        .document
                        .as_ref()
                        .map(|d| d.store.all())
                        .unwrap_or_default(),
                };
                properties::show(ui, &view, &mut self.line_edit)
            })
            .inner;
        self.handle_properties_action(properties_action);

        // Escape abandons a drag in progress
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if let Some(doc) = self.document.as_mut() {
                if !doc.session.is_idle() {
                    doc.session = SessionState::new(doc.session.mode);
                    log::debug!("Interaction cancelled");
                }
            }
        }

        let items = match (self.directory.as_ref(), self.document.as_ref()) {
            (Some(session), Some(doc)) => {
                draw_list(&doc.store, &session.classes, doc.frame, &doc.session)
                    .unwrap_or_else(|e| {
                        log::error!("Cannot draw annotations: {}", e);
                        Vec::new()
                    })
            }
            _ => Vec::new(),
        };
        let status = self.status_line();

        // Main canvas (center)
        let canvas_output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                // Show loading overlay if loading
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    None
                } else {
                    Some(canvas::show(
                        ui,
                        canvas::CanvasView {
                            texture: self.image_texture.as_ref(),
                            frame: self.document.as_ref().map(|d| d.frame),
                            items: &items,
                            point_size: self.point_size,
                            zoom: self.zoom,
                            status: &status,
                        },
                    ))
                }
            })
            .inner;

        if let Some(output) = canvas_output {
            self.zoom = output.zoom;
            self.apply_pointer_events(&output.events);
        }
    }
}
