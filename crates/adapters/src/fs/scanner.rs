use std::path::Path;

use polaroid_studio_application::{ApplicationError, FileScanSummary, FileScanner};
use polaroid_studio_domain::IncomingFile;
use tracing::warn;
use walkdir::WalkDir;

/// Lists every regular file under a folder. Media types are guessed from
/// the extension and filtering is left to the upload step.
#[derive(Debug, Default)]
pub struct WalkdirFileScanner;

impl FileScanner for WalkdirFileScanner {
    fn scan_folder(&self, folder: &str) -> Result<FileScanSummary, ApplicationError> {
        let folder_path = Path::new(folder);
        if !folder_path.is_dir() {
            return Err(ApplicationError::InvalidInput(format!(
                "folder does not exist or is not a directory: {folder}"
            )));
        }

        let mut summary = FileScanSummary::default();

        for entry in WalkDir::new(folder_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }

            summary.scanned_files += 1;
            match IncomingFile::from_path(entry.path()) {
                Ok(file) => summary.files.push(file),
                Err(error) => {
                    warn!(path = %entry.path().display(), %error, "skipping file");
                }
            }
        }

        Ok(summary)
    }
}
