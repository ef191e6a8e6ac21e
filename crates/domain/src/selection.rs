use std::sync::Arc;

use serde::Serialize;

use crate::{ColorTheme, ImageEntry, ImageId, PresentationType};

/// Identifies one upload batch. Bumped on every new batch and on every clear,
/// so completions carrying an older token can be recognized as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct BatchToken(u64);

impl BatchToken {
    pub fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WizardStep {
    Empty,
    ImagesUploaded,
    TypeChosen,
    Confirmed,
}

/// Visibility and lock flags that are not derivable from the selection itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WizardProgress {
    pub gallery_visible: bool,
    pub color_step_unlocked: bool,
    pub confirmation_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended(ImageId),
    Stale,
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    images: Vec<ImageEntry>,
    failed_files: Vec<String>,
    presentation_type: Option<PresentationType>,
    color_theme: Option<ColorTheme>,
    progress: WizardProgress,
    active_batch: BatchToken,
    issued_batch: BatchToken,
    next_image_id: ImageId,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            failed_files: Vec::new(),
            presentation_type: None,
            color_theme: None,
            progress: WizardProgress::default(),
            active_batch: BatchToken::default(),
            issued_batch: BatchToken::default(),
            next_image_id: ImageId::first(),
        }
    }
}

impl SelectionState {
    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    /// Names of files from the active batch that could not be decoded.
    pub fn failed_files(&self) -> &[String] {
        &self.failed_files
    }

    pub fn presentation_type(&self) -> Option<PresentationType> {
        self.presentation_type
    }

    pub fn color_theme(&self) -> Option<ColorTheme> {
        self.color_theme
    }

    pub fn progress(&self) -> WizardProgress {
        self.progress
    }

    pub fn active_batch(&self) -> BatchToken {
        self.active_batch
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// The type step is open exactly while at least one image is present.
    pub fn type_step_unlocked(&self) -> bool {
        self.has_images()
    }

    pub fn is_complete(&self) -> bool {
        self.has_images() && self.presentation_type.is_some() && self.color_theme.is_some()
    }

    pub fn step(&self) -> WizardStep {
        if !self.has_images() {
            WizardStep::Empty
        } else if self.progress.confirmation_visible && self.is_complete() {
            WizardStep::Confirmed
        } else if self.presentation_type.is_some() {
            WizardStep::TypeChosen
        } else {
            WizardStep::ImagesUploaded
        }
    }

    /// Reserves a token for an upload that is not started yet. The gallery
    /// is untouched until the batch is activated.
    pub fn issue_batch(&mut self) -> BatchToken {
        self.issued_batch = self.issued_batch.next();
        self.issued_batch
    }

    /// Makes `batch` the active upload: the previous images are dropped, not merged.
    pub fn activate_batch(&mut self, batch: BatchToken) {
        self.active_batch = batch;
        self.images.clear();
        self.failed_files.clear();
        self.progress.gallery_visible = true;
    }

    pub fn append_decoded(
        &mut self,
        batch: BatchToken,
        name: impl Into<String>,
        data_url: impl Into<Arc<str>>,
    ) -> AppendOutcome {
        if batch != self.active_batch {
            return AppendOutcome::Stale;
        }

        let id = self.next_image_id;
        self.next_image_id = id.next();
        self.images.push(ImageEntry {
            id,
            data_url: data_url.into(),
            name: name.into(),
        });
        AppendOutcome::Appended(id)
    }

    /// Records a decode failure; returns `false` when the batch is stale.
    pub fn record_failure(&mut self, batch: BatchToken, name: impl Into<String>) -> bool {
        if batch != self.active_batch {
            return false;
        }
        self.failed_files.push(name.into());
        true
    }

    /// Removes every image and hides the gallery and confirmation.
    ///
    /// The batch token moves on, so decodes still in flight are dropped when
    /// they complete. The type and color choices survive unless
    /// `reset_choices` is set.
    pub fn clear_images(&mut self, reset_choices: bool) {
        self.active_batch = self.issue_batch();
        self.images.clear();
        self.failed_files.clear();
        self.progress.gallery_visible = false;
        self.progress.confirmation_visible = false;

        if reset_choices {
            self.presentation_type = None;
            self.color_theme = None;
            self.progress.color_step_unlocked = false;
        }
    }

    pub fn select_presentation_type(&mut self, kind: PresentationType) {
        self.presentation_type = Some(kind);
        self.progress.color_step_unlocked = true;
    }

    pub fn select_color_theme(&mut self, theme: ColorTheme) {
        self.color_theme = Some(theme);
        self.progress.confirmation_visible = true;
    }
}
