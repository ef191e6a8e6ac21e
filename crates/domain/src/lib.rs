mod error;
mod image;
mod options;
mod selection;

pub use error::DomainError;
pub use image::{
    is_image_media_type, media_type_for_path, FileSource, ImageEntry, ImageId, IncomingFile,
};
pub use options::{ColorScheme, ColorTheme, PresentationType};
pub use selection::{AppendOutcome, BatchToken, SelectionState, WizardProgress, WizardStep};
