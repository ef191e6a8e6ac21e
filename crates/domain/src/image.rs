use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(u64);

impl ImageId {
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// One accepted, decoded image. Never mutated after creation.
///
/// The data URL is shared, so every view of the image points at one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    pub id: ImageId,
    pub data_url: Arc<str>,
    pub name: String,
}

/// Where the bytes of an incoming file live.
///
/// A file picker hands out paths; a drop may deliver the bytes directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub name: String,
    pub media_type: String,
    pub source: FileSource,
}

impl IncomingFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        source: FileSource,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyFileName);
        }
        Ok(Self {
            name,
            media_type: media_type.into(),
            source,
        })
    }

    /// Builds an incoming file from a path, guessing the media type from its extension.
    ///
    /// Names that are not valid UTF-8 are kept with replacement characters.
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(
            name,
            media_type_for_path(path),
            FileSource::Path(path.to_path_buf()),
        )
    }

    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

pub fn media_type_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return "application/octet-stream";
    };

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_ids_start_at_one_and_increase() {
        let first = ImageId::first();
        assert_eq!(first.get(), 1);
        assert_eq!(first.next().get(), 2);
    }

    #[test]
    fn media_type_detection_works() {
        assert_eq!(media_type_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(media_type_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(
            media_type_for_path(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn only_image_media_types_count_as_images() {
        let photo = IncomingFile::from_path(Path::new("/tmp/beach.png")).expect("file");
        assert_eq!(photo.name, "beach.png");
        assert!(photo.is_image());

        let doc = IncomingFile::from_path(Path::new("/tmp/report.pdf")).expect("file");
        assert!(!doc.is_image());
        assert!(!is_image_media_type("imagex/png"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_kept_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/tmp").join(OsStr::from_bytes(b"bad\xff.png"));
        let file = IncomingFile::from_path(&path).expect("file");
        assert_eq!(file.name, "bad\u{fffd}.png");
        assert!(file.is_image());
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        assert_eq!(
            IncomingFile::from_path(Path::new("/")),
            Err(DomainError::EmptyFileName)
        );
    }

    #[test]
    fn empty_names_are_rejected() {
        let result = IncomingFile::new("  ", "image/png", FileSource::Bytes(Arc::from(vec![])));
        assert_eq!(result, Err(DomainError::EmptyFileName));
    }
}
