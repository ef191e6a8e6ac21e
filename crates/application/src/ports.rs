use polaroid_studio_domain::{BatchToken, IncomingFile, PresentationType};

use crate::ApplicationError;

#[derive(Debug, Clone)]
pub struct DecodeJob {
    pub batch: BatchToken,
    pub file: IncomingFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Self-contained displayable form of the file (a `data:` URL).
    Encoded(String),
    Failed(String),
    /// The job's batch was superseded before a worker picked it up.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct DecodeCompletion {
    pub batch: BatchToken,
    pub name: String,
    pub outcome: DecodeOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeMetrics {
    pub submitted_jobs: u64,
    pub encoded_jobs: u64,
    pub failed_jobs: u64,
    pub skipped_jobs: u64,
}

/// Asynchronous per-file decoding. Every submitted job yields exactly one
/// completion, in no particular order.
pub trait DecodePipeline {
    fn submit(&self, job: DecodeJob) -> Result<(), ApplicationError>;

    /// Marks every batch older than `batch` as obsolete so queued jobs can be
    /// skipped. Submitting a job never does this on its own.
    fn supersede(&self, batch: BatchToken);

    fn try_receive(&self) -> Result<Option<DecodeCompletion>, ApplicationError>;

    fn metrics(&self) -> Result<DecodeMetrics, ApplicationError>;
}

pub trait ImageDecoder: Send + Sync {
    fn encode_data_url(&self, file: &IncomingFile) -> Result<String, ApplicationError>;
}

/// Blocking user prompts.
pub trait Notifier {
    fn alert(&self, message: &str);

    fn confirm(&self, message: &str) -> bool;
}

/// Display text associated with each presentation type option.
pub trait LabelCatalog {
    fn display_text(&self, kind: PresentationType) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct FileScanSummary {
    pub scanned_files: usize,
    pub files: Vec<IncomingFile>,
}

pub trait FileScanner {
    fn scan_folder(&self, folder: &str) -> Result<FileScanSummary, ApplicationError>;
}
