//! Turning a local image file into something that can travel inside a JSON body.
//!
//! The default [`DataUriCodec`] reads the whole file and produces a base64
//! `data:` URI. Anything that can produce a transferable reference (an
//! uploader returning a hosted URL, for instance) can implement [`ImageCodec`]
//! instead.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;

use crate::common::{ClientError, ClientResult};

/// A file picked from the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
    pub mime_type: String,
}

impl LocalFile {
    /// Describe `path`, guessing its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            path: path.to_path_buf(),
            name,
            mime_type,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// The transferable form of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(pub String);

impl EncodedImage {
    pub fn into_inner(self) -> String {
        self.0
    }
}

#[async_trait]
pub trait ImageCodec: Send + Sync + std::fmt::Debug {
    async fn encode(&self, file: &LocalFile) -> ClientResult<EncodedImage>;
}

/// Reads the file into memory and emits `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone)]
pub struct DataUriCodec {
    max_bytes: u64,
}

pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

impl DataUriCodec {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

impl Default for DataUriCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_BYTES)
    }
}

#[async_trait]
impl ImageCodec for DataUriCodec {
    async fn encode(&self, file: &LocalFile) -> ClientResult<EncodedImage> {
        if !file.is_image() {
            return Err(ClientError::UnsupportedFile(file.mime_type.clone()));
        }

        let size = tokio::fs::metadata(&file.path).await?.len();
        if size > self.max_bytes {
            return Err(ClientError::FileTooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let bytes = tokio::fs::read(&file.path).await?;
        let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
        log::debug!("Encoded {} ({} bytes) as data URI", file.name, bytes.len());

        Ok(EncodedImage(format!(
            "data:{};base64,{}",
            file.mime_type, payload
        )))
    }
}

/// Splits a base64 `data:` URI back into its raw bytes.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mime_is_guessed_from_extension() {
        assert!(LocalFile::from_path("/tmp/cat.png").is_image());
        assert!(LocalFile::from_path("/tmp/cat.JPEG").is_image());

        let notes = LocalFile::from_path("/tmp/notes.txt");
        assert_eq!(notes.mime_type, "text/plain");
        assert!(!notes.is_image());

        let unknown = LocalFile::from_path("/tmp/blob");
        assert_eq!(unknown.mime_type, "application/octet-stream");
        assert_eq!(unknown.name, "blob");
    }

    #[tokio::test]
    async fn encodes_png_as_data_uri() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let local = LocalFile::from_path(file.path());
        let encoded = DataUriCodec::default().encode(&local).await.unwrap();

        assert_eq!(encoded.0, "data:image/png;base64,iVBORw==");
        assert_eq!(
            decode_data_uri(&encoded.0).unwrap(),
            vec![0x89, b'P', b'N', b'G']
        );
    }

    #[tokio::test]
    async fn rejects_files_over_the_limit() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0u8; 32]).unwrap();

        let local = LocalFile::from_path(file.path());
        let err = DataUriCodec::new(16).encode(&local).await.unwrap_err();
        assert!(matches!(err, ClientError::FileTooLarge { size: 32, limit: 16 }));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let local = LocalFile::from_path("/definitely/not/here.png");
        let err = DataUriCodec::default().encode(&local).await.unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[test]
    fn non_base64_data_uri_is_not_decoded() {
        assert!(decode_data_uri("data:text/plain,hello").is_none());
        assert!(decode_data_uri("https://example.com/a.png").is_none());
    }
}
