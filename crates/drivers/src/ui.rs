use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;
use polaroid_studio_adapters::data_url_bytes;
use polaroid_studio_application::effects::{
    hover_lift, sparkle_frame, Effect, ScheduledEffect, ScreenPoint, Section, Sparkle,
};
use polaroid_studio_application::view::{
    ConfirmationView, ThemeButtonView, ThumbnailView, WizardView,
};
use polaroid_studio_application::{
    ApplicationError, ClearImagesCommand, ExpandSectionCommand, Notifier, PollDecodesCommand,
    RenderViewQuery, SelectColorThemeCommand, SelectPresentationTypeCommand, SubmissionPlan,
    SubmitCommand, TakeEffectsQuery, UploadFilesCommand, WizardService,
};
use polaroid_studio_domain::{
    media_type_for_path, ColorTheme, FileSource, ImageId, IncomingFile, PresentationType,
};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::{debug, warn};

const WINDOW_WIDTH: f32 = 980.0;
const WINDOW_HEIGHT: f32 = 780.0;
const THUMBNAIL_EDGE: f32 = 120.0;
const PREVIEW_EDGE: f32 = 64.0;
const THUMBNAIL_DECODE_EDGE: u32 = 240;
const PANEL_GAP: f32 = 10.0;
const OPTION_BASELINE: f32 = 8.0;
const FADE_IN: Duration = Duration::from_millis(300);
const IDLE_REPAINT: Duration = Duration::from_millis(50);
const SPARKLE_COLOR: [u8; 3] = [255, 215, 90];
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Native message boxes standing in for browser alert/confirm prompts.
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn alert(&self, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Polaroid Studio")
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn confirm(&self, message: &str) -> bool {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Remove images")
            .set_description(message)
            .set_buttons(MessageButtons::YesNo)
            .show();
        matches!(answer, MessageDialogResult::Yes)
    }
}

/// Effects waiting for their delay to elapse.
#[derive(Default)]
struct EffectQueue {
    pending: Vec<(Instant, Effect)>,
}

impl EffectQueue {
    fn schedule(&mut self, now: Instant, scheduled: ScheduledEffect) {
        self.pending.push((now + scheduled.delay, scheduled.effect));
    }

    /// Removes and returns every effect due at `now`, earliest first.
    fn take_due(&mut self, now: Instant) -> Vec<Effect> {
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = waiting;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, effect)| effect).collect()
    }

    fn waiting_fade(&self, id: ImageId) -> bool {
        self.pending
            .iter()
            .any(|(_, effect)| matches!(effect, Effect::FadeInThumbnail(pending) if *pending == id))
    }

    fn forget_fades(&mut self) {
        self.pending
            .retain(|(_, effect)| !matches!(effect, Effect::FadeInThumbnail(_)));
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

struct SparkleBurst {
    started: Instant,
    sparkles: Vec<Sparkle>,
}

impl SparkleBurst {
    fn finished(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started);
        self.sparkles
            .iter()
            .all(|sparkle| elapsed >= sparkle.delay + sparkle.lifetime)
    }
}

struct ThumbnailRequest {
    id: ImageId,
    src: Arc<str>,
}

struct LoadedThumbnail {
    id: ImageId,
    pixels: Result<egui::ColorImage, String>,
}

/// Decodes gallery thumbnails on a background thread. The UI thread only
/// turns finished pixels into textures.
struct ThumbnailLoader {
    request_tx: mpsc::Sender<ThumbnailRequest>,
    result_rx: mpsc::Receiver<LoadedThumbnail>,
}

impl ThumbnailLoader {
    fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<ThumbnailRequest>();
        let (result_tx, result_rx) = mpsc::channel::<LoadedThumbnail>();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let loaded = LoadedThumbnail {
                    id: request.id,
                    pixels: decode_thumbnail(&request.src),
                };
                if result_tx.send(loaded).is_err() {
                    return;
                }
            }
            debug!("thumbnail loader shutting down");
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    fn request(&self, id: ImageId, src: Arc<str>) -> Result<(), String> {
        self.request_tx
            .send(ThumbnailRequest { id, src })
            .map_err(|_| "thumbnail loader stopped".to_string())
    }

    fn try_take(&self) -> Option<LoadedThumbnail> {
        self.result_rx.try_recv().ok()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PanelState {
    open: bool,
    scroll_requested: bool,
}

enum UiAction {
    PickFiles,
    Clear,
    SelectType(PresentationType),
    SelectColor(ColorTheme, ScreenPoint),
    Expanded(Section),
    Submit,
}

struct WizardApp {
    service: WizardService,
    view: Option<WizardView>,
    error: Option<String>,
    effects: EffectQueue,
    bursts: Vec<SparkleBurst>,
    panels: HashMap<Section, PanelState>,
    panel_rects: HashMap<Section, egui::Rect>,
    thumbnails: ThumbnailLoader,
    textures: HashMap<ImageId, Option<egui::TextureHandle>>,
    loading: HashSet<ImageId>,
    fades: HashMap<ImageId, Instant>,
    confirmation_revealed: Option<Instant>,
    plan: Option<SubmissionPlan>,
}

impl WizardApp {
    fn new(service: WizardService) -> Self {
        let mut panels = HashMap::new();
        panels.insert(
            Section::Upload,
            PanelState {
                open: true,
                scroll_requested: false,
            },
        );

        Self {
            service,
            view: None,
            error: None,
            effects: EffectQueue::default(),
            bursts: Vec::new(),
            panels,
            panel_rects: HashMap::new(),
            thumbnails: ThumbnailLoader::spawn(),
            textures: HashMap::new(),
            loading: HashSet::new(),
            fades: HashMap::new(),
            confirmation_revealed: None,
            plan: None,
        }
    }

    fn upload(&mut self, files: Vec<IncomingFile>) {
        if files.is_empty() {
            return;
        }
        match self.service.upload_files(UploadFilesCommand { files }) {
            Ok(report) => {
                debug!(batch = report.batch.get(), "upload accepted");
                self.textures.clear();
                self.loading.clear();
                self.fades.clear();
                self.effects.forget_fades();
                self.plan = None;
            }
            // the notifier already told the user
            Err(ApplicationError::NoValidFiles { .. }) => {}
            Err(error) => self.error = Some(error.to_string()),
        }
    }

    fn apply(&mut self, action: UiAction) {
        let result = match action {
            UiAction::PickFiles => {
                let files = pick_files();
                self.upload(files);
                Ok(())
            }
            UiAction::Clear => self.service.clear_images(ClearImagesCommand).map(|cleared| {
                if cleared {
                    self.textures.clear();
                    self.loading.clear();
                    self.fades.clear();
                    self.effects.forget_fades();
                    self.confirmation_revealed = None;
                    self.plan = None;
                }
            }),
            UiAction::SelectType(kind) => self
                .service
                .select_presentation_type(SelectPresentationTypeCommand { kind }),
            UiAction::SelectColor(theme, origin) => self
                .service
                .select_color_theme(SelectColorThemeCommand {
                    theme,
                    origin: Some(origin),
                })
                .map(|_| ()),
            UiAction::Expanded(section) => {
                self.service.expand_section(ExpandSectionCommand { section });
                Ok(())
            }
            UiAction::Submit => self.service.submit(SubmitCommand).map(|plan| {
                self.plan = Some(plan);
            }),
        };

        if let Err(error) = result {
            warn!(%error, "wizard action failed");
            self.error = Some(error.to_string());
        }
    }

    fn tick(&mut self, ctx: &egui::Context) {
        let dropped: Vec<IncomingFile> = ctx.input(|input| {
            input
                .raw
                .dropped_files
                .iter()
                .filter_map(dropped_to_incoming)
                .collect()
        });
        self.upload(dropped);

        if let Err(error) = self.service.poll_decodes(PollDecodesCommand) {
            self.error = Some(error.to_string());
        }

        let now = Instant::now();
        for scheduled in self.service.take_effects(TakeEffectsQuery) {
            self.effects.schedule(now, scheduled);
        }
        for effect in self.effects.take_due(now) {
            self.play(effect, now);
        }
        self.bursts.retain(|burst| !burst.finished(now));

        match self.service.render(RenderViewQuery) {
            Ok(view) => {
                if view.confirmation.is_none() {
                    self.confirmation_revealed = None;
                }
                self.view = Some(view);
            }
            Err(error) => self.error = Some(error.to_string()),
        }
    }

    fn play(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::FadeInThumbnail(id) => {
                self.fades.insert(id, now);
            }
            Effect::ExpandSection(section) => {
                let panel = self.panel(section);
                panel.open = true;
                panel.scroll_requested = true;
            }
            Effect::RevealConfirmation => {
                self.confirmation_revealed.get_or_insert(now);
                self.panel(Section::Confirmation).scroll_requested = true;
            }
            Effect::ScrollIntoView(section) => {
                self.panel(section).scroll_requested = true;
            }
            Effect::SparkleBurst(sparkles) => self.bursts.push(SparkleBurst {
                started: now,
                sparkles,
            }),
        }
    }

    fn panel(&mut self, section: Section) -> &mut PanelState {
        self.panels.entry(section).or_default()
    }

    /// Uploads finished thumbnails as textures and asks the loader for new ones.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        let Some(view) = &self.view else {
            return;
        };
        let shown: HashSet<ImageId> = view
            .upload
            .thumbnails
            .iter()
            .map(|thumb| thumb.id)
            .collect();

        while let Some(loaded) = self.thumbnails.try_take() {
            self.loading.remove(&loaded.id);
            if !shown.contains(&loaded.id) {
                continue;
            }
            let texture = match loaded.pixels {
                Ok(pixels) => Some(ctx.load_texture(
                    format!("thumbnail-{}", loaded.id.get()),
                    pixels,
                    egui::TextureOptions::LINEAR,
                )),
                Err(error) => {
                    warn!(image = loaded.id.get(), %error, "thumbnail decode failed");
                    None
                }
            };
            self.textures.insert(loaded.id, texture);
        }

        for thumbnail in &view.upload.thumbnails {
            if self.textures.contains_key(&thumbnail.id) || self.loading.contains(&thumbnail.id) {
                continue;
            }
            match self.thumbnails.request(thumbnail.id, Arc::clone(&thumbnail.src)) {
                Ok(()) => {
                    self.loading.insert(thumbnail.id);
                }
                Err(error) => {
                    warn!(image = %thumbnail.alt, %error, "thumbnail request failed");
                    self.textures.insert(thumbnail.id, None);
                }
            }
        }

        self.textures.retain(|id, _| shown.contains(id));
        self.loading.retain(|id| shown.contains(id));
    }

    fn thumbnail_alpha(&self, id: ImageId, now: Instant) -> f32 {
        match self.fades.get(&id) {
            Some(started) => fade_alpha(now.saturating_duration_since(*started)),
            None if self.effects.waiting_fade(id) => 0.0,
            None => 1.0,
        }
    }

    fn draw_thumbnail(&self, ui: &mut egui::Ui, thumbnail: &ThumbnailView, edge: f32, alpha: f32) {
        match self.textures.get(&thumbnail.id).and_then(Option::as_ref) {
            Some(texture) => {
                ui.add(
                    egui::Image::from_texture(texture)
                        .fit_to_exact_size(egui::vec2(edge, edge))
                        .maintain_aspect_ratio(true)
                        .tint(egui::Color32::from_white_alpha((alpha * 255.0) as u8)),
                )
                .on_hover_text(thumbnail.alt.as_str());
            }
            None => {
                ui.add_sized([edge, edge], egui::Label::new(thumbnail.alt.as_str()).truncate());
            }
        }
    }

    fn draw(&mut self, ctx: &egui::Context) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let Some(view) = self.view.take() else {
            return actions;
        };
        let now = Instant::now();
        let pointer = ctx.pointer_hover_pos();

        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.heading("Polaroid Studio");
            if let Some(error) = &self.error {
                ui.colored_label(ui.visuals().error_fg_color, error.as_str());
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.step_panel(
                    ui,
                    Section::Upload,
                    "1. Upload photos",
                    true,
                    pointer,
                    &mut actions,
                    |app, ui, actions| app.upload_body(ui, &view, now, actions),
                );

                self.step_panel(
                    ui,
                    Section::PresentationType,
                    "2. Presentation type",
                    view.presentation.unlocked,
                    pointer,
                    &mut actions,
                    |_app, ui, actions| {
                        ui.horizontal_wrapped(|ui| {
                            for option in &view.presentation.options {
                                ui.vertical(|ui| {
                                    ui.add_space(OPTION_BASELINE + option.lift);
                                    let text = format!("{} ({})", option.label, option.code);
                                    if ui.radio(option.selected, text).clicked() {
                                        actions.push(UiAction::SelectType(option.kind));
                                    }
                                });
                            }
                        });
                    },
                );

                self.step_panel(
                    ui,
                    Section::ColorTheme,
                    "3. Color theme",
                    view.color.unlocked,
                    pointer,
                    &mut actions,
                    |_app, ui, actions| {
                        ui.horizontal(|ui| {
                            for button in &view.color.buttons {
                                if let Some(origin) = theme_button(ui, button) {
                                    actions.push(UiAction::SelectColor(button.theme, origin));
                                }
                            }
                        });
                    },
                );

                if let Some(confirmation) = &view.confirmation {
                    self.confirmation_panel(ui, confirmation, now, &mut actions);
                }
            });
        });

        self.view = Some(view);
        self.draw_sparkles(ctx, now);
        actions
    }

    /// Draws one collapsible wizard step and records its rect for hover tracking.
    #[allow(clippy::too_many_arguments)]
    fn step_panel(
        &mut self,
        ui: &mut egui::Ui,
        section: Section,
        title: &str,
        unlocked: bool,
        pointer: Option<egui::Pos2>,
        actions: &mut Vec<UiAction>,
        add_body: impl FnOnce(&Self, &mut egui::Ui, &mut Vec<UiAction>),
    ) {
        let lift = self.lift_for(section, pointer);
        let mut state = self.panels.get(&section).copied().unwrap_or_default();

        ui.add_space(PANEL_GAP + lift);
        let response = egui::Frame::group(ui.style())
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                let header = egui::CollapsingHeader::new(title)
                    .id_salt(("wizard_panel", section))
                    .enabled(unlocked)
                    .open(Some(state.open && unlocked))
                    .show(ui, |ui| add_body(self, ui, actions));
                if header.header_response.clicked() {
                    state.open = !state.open;
                    if state.open {
                        actions.push(UiAction::Expanded(section));
                    }
                }
            })
            .response;
        ui.add_space(-lift);

        if state.scroll_requested && unlocked {
            response.scroll_to_me(Some(egui::Align::Center));
            state.scroll_requested = false;
        }
        self.panels.insert(section, state);
        self.panel_rects.insert(section, response.rect);
    }

    fn lift_for(&self, section: Section, pointer: Option<egui::Pos2>) -> f32 {
        let hovered = match (self.panel_rects.get(&section), pointer) {
            (Some(rect), Some(pointer)) => rect.contains(pointer),
            _ => false,
        };
        let expanded = self.panels.get(&section).is_some_and(|panel| panel.open);
        hover_lift(hovered, expanded)
    }

    fn upload_body(
        &self,
        ui: &mut egui::Ui,
        view: &WizardView,
        now: Instant,
        actions: &mut Vec<UiAction>,
    ) {
        ui.horizontal(|ui| {
            if ui.button("Choose photos...").clicked() {
                actions.push(UiAction::PickFiles);
            }
            let hovering = ui.ctx().input(|input| !input.raw.hovered_files.is_empty());
            if hovering {
                ui.strong("Release to upload");
            } else {
                ui.weak("or drop images anywhere on this window");
            }
        });

        if !view.upload.gallery_visible {
            return;
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label(view.upload.count_label.as_str());
            if !self.service.is_settled() {
                ui.spinner();
            }
            if !view.upload.thumbnails.is_empty() && ui.button("Clear all").clicked() {
                actions.push(UiAction::Clear);
            }
        });
        ui.horizontal_wrapped(|ui| {
            for thumbnail in &view.upload.thumbnails {
                let alpha = self.thumbnail_alpha(thumbnail.id, now);
                self.draw_thumbnail(ui, thumbnail, THUMBNAIL_EDGE, alpha);
            }
        });
        for failed in &view.upload.failed_files {
            ui.colored_label(
                ui.visuals().warn_fg_color,
                format!("Could not read {failed}"),
            );
        }
    }

    fn confirmation_panel(
        &mut self,
        ui: &mut egui::Ui,
        confirmation: &ConfirmationView,
        now: Instant,
        actions: &mut Vec<UiAction>,
    ) {
        let opacity = match self.confirmation_revealed {
            Some(started) => fade_alpha(now.saturating_duration_since(started)),
            None if self.effects.is_empty() => 1.0,
            None => 0.0,
        };

        ui.add_space(PANEL_GAP);
        let response = egui::Frame::group(ui.style())
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_opacity(opacity);
                ui.strong("4. Confirm");
                ui.label(format!(
                    "Showing {} of {} images",
                    confirmation.preview_count, confirmation.total_images
                ));
                ui.horizontal_wrapped(|ui| {
                    for preview in &confirmation.previews {
                        self.draw_thumbnail(ui, preview, PREVIEW_EDGE, 1.0);
                    }
                });
                egui::Grid::new("confirmation_summary").show(ui, |ui| {
                    ui.label("Type:");
                    ui.strong(confirmation.type_label.as_deref().unwrap_or(""));
                    ui.end_row();
                    ui.label("Color:");
                    ui.strong(confirmation.color_label.as_deref().unwrap_or(""));
                    ui.end_row();
                });
                if ui
                    .add_enabled(confirmation.submit_enabled, egui::Button::new("Submit"))
                    .clicked()
                {
                    actions.push(UiAction::Submit);
                }
                if let Some(plan) = &self.plan {
                    ui.separator();
                    for output in &plan.outputs {
                        ui.monospace(format!("{} -> {}", output.source_name, output.output_name));
                    }
                }
            })
            .response;

        let panel = self.panel(Section::Confirmation);
        if panel.scroll_requested {
            response.scroll_to_me(Some(egui::Align::Center));
            panel.scroll_requested = false;
        }
    }

    fn draw_sparkles(&self, ctx: &egui::Context, now: Instant) {
        if self.bursts.is_empty() {
            return;
        }
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("sparkles"),
        ));
        let [r, g, b] = SPARKLE_COLOR;
        for burst in &self.bursts {
            let elapsed = now.saturating_duration_since(burst.started);
            for sparkle in &burst.sparkles {
                let Some(frame) = sparkle_frame(sparkle, elapsed) else {
                    continue;
                };
                let center = egui::pos2(sparkle.position.x, sparkle.position.y - frame.rise);
                let alpha = (frame.opacity * 255.0) as u8;
                painter.circle_filled(
                    center,
                    sparkle.size / 2.0 * frame.scale,
                    egui::Color32::from_rgba_unmultiplied(r, g, b, alpha),
                );
            }
        }
    }

    fn animating(&self) -> bool {
        let now = Instant::now();
        !self.effects.is_empty()
            || !self.bursts.is_empty()
            || !self.service.is_settled()
            || !self.loading.is_empty()
            || self
                .fades
                .values()
                .any(|started| now.saturating_duration_since(*started) < FADE_IN)
            || self
                .confirmation_revealed
                .is_some_and(|started| now.saturating_duration_since(started) < FADE_IN)
    }
}

impl eframe::App for WizardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick(ctx);
        self.sync_textures(ctx);

        for action in self.draw(ctx) {
            self.apply(action);
        }

        if self.animating() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(IDLE_REPAINT);
        }
    }
}

fn theme_button(ui: &mut egui::Ui, button: &ThemeButtonView) -> Option<ScreenPoint> {
    let scheme = button.theme.scheme();
    let [r, g, b] = scheme.main_text;
    let [br, bg, bb] = scheme.background;
    let stroke = if button.active {
        egui::Stroke::new(3.0, ui.visuals().selection.bg_fill)
    } else {
        egui::Stroke::new(1.0, ui.visuals().widgets.inactive.bg_stroke.color)
    };

    let response = ui.add(
        egui::Button::new(
            egui::RichText::new(button.label.as_str()).color(egui::Color32::from_rgb(r, g, b)),
        )
        .fill(egui::Color32::from_rgb(br, bg, bb))
        .stroke(stroke)
        .min_size(egui::vec2(120.0, 40.0)),
    );
    response.clicked().then(|| {
        let center = response.rect.center();
        ScreenPoint {
            x: center.x,
            y: center.y,
        }
    })
}

fn fade_alpha(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() / FADE_IN.as_secs_f32()).min(1.0)
}

fn pick_files() -> Vec<IncomingFile> {
    let Some(paths) = FileDialog::new()
        .set_title("Choose photos")
        .add_filter("image files", &IMAGE_EXTENSIONS)
        .add_filter("all files", &["*"])
        .pick_files()
    else {
        return Vec::new();
    };

    paths
        .iter()
        .filter_map(|path| match IncomingFile::from_path(path) {
            Ok(file) => Some(file),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping picked file");
                None
            }
        })
        .collect()
}

fn dropped_to_incoming(file: &egui::DroppedFile) -> Option<IncomingFile> {
    if let Some(path) = &file.path {
        return IncomingFile::from_path(path).ok();
    }

    let bytes = file.bytes.clone()?;
    let media_type = if file.mime.is_empty() {
        media_type_for_path(Path::new(&file.name)).to_string()
    } else {
        file.mime.clone()
    };
    IncomingFile::new(file.name.clone(), media_type, FileSource::Bytes(bytes)).ok()
}

fn decode_thumbnail(src: &str) -> Result<egui::ColorImage, String> {
    let bytes = data_url_bytes(src).map_err(|error| error.to_string())?;
    let decoded = image::load_from_memory(&bytes).map_err(|error| error.to_string())?;
    let rgba = decoded
        .thumbnail(THUMBNAIL_DECODE_EDGE, THUMBNAIL_DECODE_EDGE)
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

pub fn launch_window(service: WizardService) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Polaroid Studio",
        options,
        Box::new(|_cc| Ok(Box::new(WizardApp::new(service)))),
    )
    .map_err(|error| format!("failed to start UI: {error}"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageBuffer, ImageFormat, Rgb};
    use polaroid_studio_adapters::{
        DataUrlDecoder, InlineDecodePipeline, LogNotifier, StaticLabelCatalog, WalkdirFileScanner,
    };
    use polaroid_studio_application::effects::SPARKLE_LIFETIME;
    use polaroid_studio_application::{ImageDecoder, WizardConfig};
    use polaroid_studio_domain::{AppendOutcome, SelectionState};

    use super::*;

    fn image_ids(count: usize) -> Vec<ImageId> {
        let mut state = SelectionState::default();
        let batch = state.issue_batch();
        state.activate_batch(batch);
        (0..count)
            .filter_map(|index| {
                match state.append_decoded(batch, format!("{index}.png"), "data:,") {
                    AppendOutcome::Appended(id) => Some(id),
                    AppendOutcome::Stale => None,
                }
            })
            .collect()
    }

    fn png_file(name: &str, width: u32, height: u32) -> IncomingFile {
        let pixels = ImageBuffer::from_pixel(width, height, Rgb([40_u8, 120_u8, 200_u8]));
        let mut buffer = Cursor::new(Vec::new());
        pixels
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("encode png");
        IncomingFile::new(name, "image/png", FileSource::Bytes(Arc::from(buffer.into_inner())))
            .expect("file")
    }

    fn wizard_app() -> WizardApp {
        let service = WizardService::new(
            WizardConfig::default(),
            Box::new(InlineDecodePipeline::new(Arc::new(DataUrlDecoder))),
            Box::new(LogNotifier::new(true)),
            Box::new(StaticLabelCatalog::default()),
            Box::new(WalkdirFileScanner),
        );
        WizardApp::new(service)
    }

    fn take_loaded(loader: &ThumbnailLoader, expected: usize) -> Vec<LoadedThumbnail> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut loaded = Vec::new();
        while loaded.len() < expected {
            if let Some(thumbnail) = loader.try_take() {
                loaded.push(thumbnail);
                continue;
            }
            assert!(Instant::now() < deadline, "timed out waiting for thumbnails");
            thread::sleep(Duration::from_millis(5));
        }
        loaded
    }

    #[test]
    fn effect_queue_releases_effects_once_due() {
        let id = image_ids(1)[0];
        let start = Instant::now();
        let mut queue = EffectQueue::default();
        queue.schedule(
            start,
            ScheduledEffect {
                delay: Duration::from_millis(500),
                effect: Effect::ExpandSection(Section::ColorTheme),
            },
        );
        queue.schedule(
            start,
            ScheduledEffect {
                delay: Duration::from_millis(10),
                effect: Effect::FadeInThumbnail(id),
            },
        );

        assert!(queue.take_due(start).is_empty());
        assert!(queue.waiting_fade(id));

        let due = queue.take_due(start + Duration::from_millis(20));
        assert_eq!(due, vec![Effect::FadeInThumbnail(id)]);
        assert!(!queue.waiting_fade(id));

        let due = queue.take_due(start + Duration::from_millis(600));
        assert_eq!(due, vec![Effect::ExpandSection(Section::ColorTheme)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn forgetting_fades_keeps_other_effects() {
        let id = image_ids(1)[0];
        let start = Instant::now();
        let mut queue = EffectQueue::default();
        for effect in [
            Effect::FadeInThumbnail(id),
            Effect::RevealConfirmation,
        ] {
            queue.schedule(
                start,
                ScheduledEffect {
                    delay: Duration::from_millis(100),
                    effect,
                },
            );
        }

        queue.forget_fades();
        let due = queue.take_due(start + Duration::from_secs(1));
        assert_eq!(due, vec![Effect::RevealConfirmation]);
    }

    #[test]
    fn fade_alpha_ramps_then_holds() {
        assert_eq!(fade_alpha(Duration::ZERO), 0.0);
        assert!((fade_alpha(FADE_IN / 2) - 0.5).abs() < 1e-3);
        assert_eq!(fade_alpha(FADE_IN * 3), 1.0);
    }

    #[test]
    fn burst_finishes_after_last_sparkle() {
        let started = Instant::now();
        let burst = SparkleBurst {
            started,
            sparkles: vec![Sparkle {
                position: ScreenPoint { x: 0.0, y: 0.0 },
                delay: Duration::from_millis(350),
                lifetime: SPARKLE_LIFETIME,
                size: 10.0,
            }],
        };

        assert!(!burst.finished(started + Duration::from_millis(1000)));
        assert!(burst.finished(started + Duration::from_millis(1350)));
    }

    #[test]
    fn thumbnail_loader_shrinks_images_off_the_ui_thread() {
        let loader = ThumbnailLoader::spawn();
        let ids = image_ids(2);
        let url = DataUrlDecoder
            .encode_data_url(&png_file("wide.png", 480, 240))
            .expect("encode");

        loader.request(ids[0], Arc::from(url)).expect("request");
        loader
            .request(ids[1], Arc::from("data:image/png;base64,AAAA"))
            .expect("request");

        let loaded = take_loaded(&loader, 2);
        assert_eq!(loaded[0].id, ids[0]);
        assert_eq!(loaded[0].pixels.as_ref().expect("pixels").size, [240, 120]);
        assert_eq!(loaded[1].id, ids[1]);
        assert!(loaded[1].pixels.is_err());
    }

    #[test]
    fn uploaded_images_become_textures_through_the_loader() {
        let ctx = egui::Context::default();
        let mut app = wizard_app();
        app.upload(vec![png_file("beach.png", 8, 6)]);
        app.tick(&ctx);

        let id = app.view.as_ref().expect("view").upload.thumbnails[0].id;
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            app.sync_textures(&ctx);
            if app.textures.get(&id).is_some_and(Option::is_some) {
                break;
            }
            assert!(app.loading.contains(&id));
            assert!(Instant::now() < deadline, "timed out waiting for texture");
            thread::sleep(Duration::from_millis(5));
        }
        assert!(app.loading.is_empty());
    }

    #[test]
    fn type_step_unlocks_but_stays_collapsed() {
        let ctx = egui::Context::default();
        let mut app = wizard_app();
        app.upload(vec![png_file("beach.png", 8, 6), png_file("dunes.png", 8, 6)]);
        app.tick(&ctx);

        let view = app.view.as_ref().expect("view");
        assert_eq!(view.upload.thumbnails.len(), 2);
        assert!(view.presentation.unlocked);
        assert!(app.panels.get(&Section::Upload).is_some_and(|panel| panel.open));
        assert!(!app
            .panels
            .get(&Section::PresentationType)
            .is_some_and(|panel| panel.open));

        app.tick(&ctx);
        assert!(!app
            .panels
            .get(&Section::PresentationType)
            .is_some_and(|panel| panel.open));
    }

    #[test]
    fn dropped_bytes_use_name_when_mime_is_missing() {
        let dropped = egui::DroppedFile {
            name: "beach.webp".to_string(),
            bytes: Some(Arc::from(vec![1_u8, 2, 3])),
            ..Default::default()
        };

        let file = dropped_to_incoming(&dropped).expect("incoming");
        assert_eq!(file.media_type, "image/webp");
        assert!(file.is_image());
    }

    #[test]
    fn dropped_file_without_content_is_ignored() {
        let dropped = egui::DroppedFile {
            name: "ghost.png".to_string(),
            ..Default::default()
        };
        assert!(dropped_to_incoming(&dropped).is_none());
    }
}
