use polaroid_studio_domain::{BatchToken, ColorTheme, IncomingFile, PresentationType};

use crate::effects::{ScreenPoint, Section};

#[derive(Debug, Clone)]
pub struct UploadFilesCommand {
    pub files: Vec<IncomingFile>,
}

#[derive(Debug, Clone)]
pub struct UploadFolderCommand {
    pub folder: String,
}

#[derive(Debug, Clone, Default)]
pub struct PollDecodesCommand;

#[derive(Debug, Clone, Default)]
pub struct ClearImagesCommand;

#[derive(Debug, Clone, Copy)]
pub struct SelectPresentationTypeCommand {
    pub kind: PresentationType,
}

#[derive(Debug, Clone, Copy)]
pub struct SelectColorThemeCommand {
    pub theme: ColorTheme,
    /// Center of the clicked control, when the input came from a pointer.
    pub origin: Option<ScreenPoint>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExpandSectionCommand {
    pub section: Section,
}

#[derive(Debug, Clone, Default)]
pub struct SubmitCommand;

#[derive(Debug, Clone, Default)]
pub struct RenderViewQuery;

#[derive(Debug, Clone, Default)]
pub struct TakeEffectsQuery;

#[derive(Debug, Clone, Default)]
pub struct DecodeMetricsQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub batch: BatchToken,
    pub accepted_files: usize,
    pub rejected_files: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    pub appended: usize,
    pub failed: usize,
    pub stale: usize,
}

impl PollReport {
    pub fn received(&self) -> usize {
        self.appended + self.failed + self.stale
    }
}
