mod pipeline;

pub use pipeline::{InlineDecodePipeline, ThreadedDecodePipeline};

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::ImageReader;
use polaroid_studio_application::{ApplicationError, ImageDecoder};
use polaroid_studio_domain::{FileSource, IncomingFile};

/// Reads a file and wraps it in a `data:` URL after checking that the bytes
/// carry a readable image header. Pixels are never touched.
#[derive(Debug, Default)]
pub struct DataUrlDecoder;

impl ImageDecoder for DataUrlDecoder {
    fn encode_data_url(&self, file: &IncomingFile) -> Result<String, ApplicationError> {
        let bytes = read_source(file)?;
        let (width, height) = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|error| decode_error(file, error))?
            .into_dimensions()
            .map_err(|error| decode_error(file, error))?;
        if width == 0 || height == 0 {
            return Err(ApplicationError::Decode {
                name: file.name.clone(),
                message: format!("empty image dimensions {width}x{height}"),
            });
        }

        Ok(format!(
            "data:{};base64,{}",
            file.media_type,
            BASE64.encode(&bytes)
        ))
    }
}

/// Extracts the raw bytes from a base64 `data:` URL.
pub fn data_url_bytes(data_url: &str) -> Result<Vec<u8>, ApplicationError> {
    let payload = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| ApplicationError::InvalidInput("not a base64 data url".to_string()))?;
    BASE64
        .decode(payload)
        .map_err(|error| ApplicationError::InvalidInput(format!("invalid base64 payload: {error}")))
}

fn read_source(file: &IncomingFile) -> Result<Vec<u8>, ApplicationError> {
    match &file.source {
        FileSource::Path(path) => std::fs::read(path)
            .map_err(|error| ApplicationError::Io(format!("{}: {error}", path.display()))),
        FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
    }
}

fn decode_error(file: &IncomingFile, error: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Decode {
        name: file.name.clone(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::{ImageBuffer, ImageFormat, Rgb};
    use tempfile::TempDir;

    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = ImageBuffer::from_fn(4, 3, |_x, _y| Rgb([200_u8, 10_u8, 10_u8]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).expect("encode png");
        buffer.into_inner()
    }

    #[test]
    fn encodes_file_on_disk_as_data_url() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("red.png");
        std::fs::write(&path, png_bytes()).expect("write");

        let file = IncomingFile::from_path(&path).expect("file");
        let url = DataUrlDecoder.encode_data_url(&file).expect("encode");

        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(data_url_bytes(&url).expect("bytes"), png_bytes());
    }

    #[test]
    fn encodes_dropped_bytes() {
        let file = IncomingFile::new(
            "drop.png",
            "image/png",
            FileSource::Bytes(Arc::from(png_bytes())),
        )
        .expect("file");
        let url = DataUrlDecoder.encode_data_url(&file).expect("encode");
        assert!(url.starts_with("data:image/png;base64,iVBOR"));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let file = IncomingFile::new(
            "fake.jpg",
            "image/jpeg",
            FileSource::Bytes(Arc::from(b"definitely not a jpeg".to_vec())),
        )
        .expect("file");
        let result = DataUrlDecoder.encode_data_url(&file);
        assert!(matches!(result, Err(ApplicationError::Decode { name, .. }) if name == "fake.jpg"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let file = IncomingFile::from_path(std::path::Path::new("/nonexistent/dir/x.png"))
            .expect("file");
        assert!(matches!(
            DataUrlDecoder.encode_data_url(&file),
            Err(ApplicationError::Io(_))
        ));
    }

    #[test]
    fn data_url_bytes_rejects_plain_strings() {
        assert!(data_url_bytes("https://example.com/a.png").is_err());
    }
}
