mod config;
pub mod effects;
mod error;
mod ports;
mod service;
mod submission;
mod use_cases;
pub mod view;

pub use config::WizardConfig;
pub use error::ApplicationError;
pub use ports::{
    DecodeCompletion, DecodeJob, DecodeMetrics, DecodeOutcome, DecodePipeline, FileScanSummary,
    FileScanner, ImageDecoder, LabelCatalog, Notifier,
};
pub use service::{WizardService, NO_VALID_FILES_MESSAGE};
pub use submission::{output_file_name, PlannedOutput, SubmissionPlan};
pub use use_cases::{
    ClearImagesCommand, DecodeMetricsQuery, ExpandSectionCommand, PollDecodesCommand,
    PollReport, RenderViewQuery, SelectColorThemeCommand, SelectPresentationTypeCommand,
    SubmitCommand, TakeEffectsQuery, UploadFilesCommand, UploadFolderCommand, UploadReport,
};
