use polaroid_studio_domain::{AppendOutcome, SelectionState};
use tracing::{debug, info, warn};

use crate::effects::{sparkle_burst, Effect, ScheduledEffect, Section};
use crate::submission::{plan_submission, SubmissionPlan};
use crate::view::{render, render_confirmation, ConfirmationView, WizardView};
use crate::{
    ApplicationError, ClearImagesCommand, DecodeJob, DecodeMetrics, DecodeMetricsQuery,
    DecodeOutcome, DecodePipeline, ExpandSectionCommand, FileScanner, LabelCatalog, Notifier,
    PollDecodesCommand, PollReport, RenderViewQuery, SelectColorThemeCommand,
    SelectPresentationTypeCommand, SubmitCommand, TakeEffectsQuery, UploadFilesCommand,
    UploadFolderCommand, UploadReport, WizardConfig,
};

pub const NO_VALID_FILES_MESSAGE: &str = "Please select valid image files";

/// Owns the selection and routes every user action through it.
pub struct WizardService {
    state: SelectionState,
    config: WizardConfig,
    decoder: Box<dyn DecodePipeline>,
    notifier: Box<dyn Notifier>,
    labels: Box<dyn LabelCatalog>,
    scanner: Box<dyn FileScanner>,
    effects: Vec<ScheduledEffect>,
    in_flight: usize,
}

impl WizardService {
    pub fn new(
        config: WizardConfig,
        decoder: Box<dyn DecodePipeline>,
        notifier: Box<dyn Notifier>,
        labels: Box<dyn LabelCatalog>,
        scanner: Box<dyn FileScanner>,
    ) -> Self {
        Self {
            state: SelectionState::default(),
            config,
            decoder,
            notifier,
            labels,
            scanner,
            effects: Vec::new(),
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// True once every submitted decode has reported back.
    pub fn is_settled(&self) -> bool {
        self.in_flight == 0
    }

    pub fn upload_files(
        &mut self,
        command: UploadFilesCommand,
    ) -> Result<UploadReport, ApplicationError> {
        let total = command.files.len();
        let accepted: Vec<_> = command
            .files
            .into_iter()
            .filter(|file| file.is_image())
            .collect();
        let rejected = total - accepted.len();

        if accepted.is_empty() {
            warn!(rejected, "upload contained no image files");
            self.notifier.alert(NO_VALID_FILES_MESSAGE);
            return Err(ApplicationError::NoValidFiles { rejected });
        }

        // The gallery only switches once every job is queued; a failed submit
        // leaves the previous batch on screen and its partial jobs go stale.
        let batch = self.state.issue_batch();
        let accepted_files = accepted.len();
        for file in accepted {
            if let Err(error) = self.decoder.submit(DecodeJob { batch, file }) {
                warn!(batch = batch.get(), %error, "upload batch abandoned");
                return Err(error);
            }
            self.in_flight += 1;
        }
        self.state.activate_batch(batch);
        self.decoder.supersede(batch);

        info!(
            batch = batch.get(),
            accepted = accepted_files,
            rejected,
            "upload batch started"
        );
        Ok(UploadReport {
            batch,
            accepted_files,
            rejected_files: rejected,
        })
    }

    pub fn upload_folder(
        &mut self,
        command: UploadFolderCommand,
    ) -> Result<UploadReport, ApplicationError> {
        if command.folder.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "folder path must not be empty".to_string(),
            ));
        }

        let scan = self.scanner.scan_folder(&command.folder)?;
        debug!(
            folder = %command.folder,
            scanned = scan.scanned_files,
            "folder scanned"
        );
        self.upload_files(UploadFilesCommand { files: scan.files })
    }

    /// Applies every decode completion that is ready right now.
    pub fn poll_decodes(
        &mut self,
        _command: PollDecodesCommand,
    ) -> Result<PollReport, ApplicationError> {
        let mut report = PollReport::default();

        while let Some(completion) = self.decoder.try_receive()? {
            self.in_flight = self.in_flight.saturating_sub(1);
            match completion.outcome {
                DecodeOutcome::Encoded(data_url) => {
                    match self
                        .state
                        .append_decoded(completion.batch, completion.name, data_url)
                    {
                        AppendOutcome::Appended(id) => {
                            report.appended += 1;
                            let delay = self.config.fade_in_delay();
                            self.schedule(delay, Effect::FadeInThumbnail(id));
                        }
                        AppendOutcome::Stale => {
                            debug!(batch = completion.batch.get(), "dropped stale decode");
                            report.stale += 1;
                        }
                    }
                }
                DecodeOutcome::Failed(message) => {
                    if self.state.record_failure(completion.batch, completion.name.clone()) {
                        warn!(file = %completion.name, %message, "image decode failed, skipping");
                        report.failed += 1;
                    } else {
                        report.stale += 1;
                    }
                }
                DecodeOutcome::Skipped => report.stale += 1,
            }
        }

        if report.received() > 0 && self.is_settled() {
            info!(
                images = self.state.images().len(),
                failed = self.state.failed_files().len(),
                "upload batch settled"
            );
        }
        Ok(report)
    }

    /// Asks for confirmation, then empties the gallery. Returns whether it was cleared.
    pub fn clear_images(&mut self, _command: ClearImagesCommand) -> Result<bool, ApplicationError> {
        let message = format!(
            "Are you sure you want to remove all {} images?",
            self.state.images().len()
        );
        if !self.notifier.confirm(&message) {
            debug!("clear declined");
            return Ok(false);
        }

        self.state.clear_images(self.config.clear_resets_choices);
        self.decoder.supersede(self.state.active_batch());
        info!(
            reset_choices = self.config.clear_resets_choices,
            "gallery cleared"
        );
        Ok(true)
    }

    pub fn select_presentation_type(
        &mut self,
        command: SelectPresentationTypeCommand,
    ) -> Result<(), ApplicationError> {
        self.state.select_presentation_type(command.kind);
        info!(kind = command.kind.code(), "presentation type selected");

        let delay = self.config.expand_delay();
        self.schedule(delay, Effect::ExpandSection(Section::ColorTheme));
        Ok(())
    }

    pub fn select_color_theme(
        &mut self,
        command: SelectColorThemeCommand,
    ) -> Result<ConfirmationView, ApplicationError> {
        self.state.select_color_theme(command.theme);
        info!(theme = command.theme.name(), "color theme selected");

        let confirmation = render_confirmation(&self.state, self.labels.as_ref())?;

        let delay = self.config.reveal_delay();
        self.schedule(delay, Effect::RevealConfirmation);
        if let Some(origin) = command.origin {
            let burst = sparkle_burst(origin, &mut rand::thread_rng());
            self.schedule(std::time::Duration::ZERO, Effect::SparkleBurst(burst));
        }
        Ok(confirmation)
    }

    /// The user opened a wizard panel by hand; scroll it into view shortly after.
    pub fn expand_section(&mut self, command: ExpandSectionCommand) {
        let delay = self.config.scroll_delay();
        self.schedule(delay, Effect::ScrollIntoView(command.section));
    }

    pub fn render(&self, _query: RenderViewQuery) -> Result<WizardView, ApplicationError> {
        render(&self.state, self.labels.as_ref())
    }

    pub fn take_effects(&mut self, _query: TakeEffectsQuery) -> Vec<ScheduledEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn submit(&self, _command: SubmitCommand) -> Result<SubmissionPlan, ApplicationError> {
        let plan = plan_submission(&self.state)?;
        info!(
            outputs = plan.outputs.len(),
            kind = plan.presentation_type.code(),
            theme = plan.color_theme.name(),
            "selection submitted"
        );
        Ok(plan)
    }

    pub fn decode_metrics(
        &self,
        _query: DecodeMetricsQuery,
    ) -> Result<DecodeMetrics, ApplicationError> {
        self.decoder.metrics()
    }

    fn schedule(&mut self, delay: std::time::Duration, effect: Effect) {
        if !self.config.staged_reveals {
            return;
        }
        debug!(?delay, ?effect, "effect scheduled");
        self.effects.push(ScheduledEffect { delay, effect });
    }
}
