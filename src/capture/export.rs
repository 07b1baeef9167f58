//! Image export — hands an encoded surface to the download collaborator.

use super::platform::Downloader;
use base64::{engine::general_purpose::STANDARD, Engine};

/// What an empty (zero-area) surface encodes to.
pub const EMPTY_DATA_URL: &str = "data:,";

pub const PNG_MIME: &str = "image/png";

/// Offers encoded image data for download under a file name.
pub struct ImageExporter<D> {
    downloader: D,
}

impl<D: Downloader> ImageExporter<D> {
    pub fn new(downloader: D) -> Self {
        Self { downloader }
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    /// Triggers the save. Download failures are not observable here.
    pub fn export(&self, data_url: &str, file_name: &str) {
        log::info!(
            "[EXPORT] Offering {} ({} chars of encoded data)",
            file_name,
            data_url.len()
        );
        self.downloader.download(data_url, file_name);
    }
}

/// Wraps PNG bytes as `data:image/png;base64,...`.
pub fn png_data_url(png_bytes: &[u8]) -> String {
    format!("data:{};base64,{}", PNG_MIME, STANDARD.encode(png_bytes))
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Not a data URL: {0}")]
    NotDataUrl(String),

    #[error("Data URL has no ',' separator")]
    MissingSeparator,

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Parses `data:[<mime>][;base64],<payload>`.
///
/// Non-base64 payloads are taken as literal bytes.
pub fn decode_data_url(url: &str) -> Result<DataUrl, ExportError> {
    let rest = url.strip_prefix("data:").ok_or_else(|| {
        let preview: String = url.chars().take(16).collect();
        ExportError::NotDataUrl(preview)
    })?;
    let (header, payload) = rest.split_once(',').ok_or(ExportError::MissingSeparator)?;

    let (mime, is_base64) = match header.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (header, false),
    };
    let mime = if mime.is_empty() { "text/plain" } else { mime };

    let bytes = if is_base64 {
        STANDARD.decode(payload)?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(DataUrl {
        mime: mime.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<(String, String)>>);

    impl Downloader for Recording {
        fn download(&self, data_url: &str, file_name: &str) {
            self.0
                .lock()
                .unwrap()
                .push((data_url.to_string(), file_name.to_string()));
        }
    }

    #[test]
    fn export_forwards_to_downloader() {
        let exporter = ImageExporter::new(Recording::default());
        exporter.export("data:,", "screenshot.png");
        let calls = exporter.downloader().0.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("data:,".to_string(), "screenshot.png".to_string())]);
    }

    #[test]
    fn png_data_url_decodes_back() {
        let url = png_data_url(&[0x89, 0x50, 0x4E, 0x47]);
        assert!(url.starts_with("data:image/png;base64,"));
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.mime, PNG_MIME);
        assert_eq!(decoded.bytes, vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn empty_data_url_is_empty_text() {
        let decoded = decode_data_url(EMPTY_DATA_URL).unwrap();
        assert_eq!(decoded.mime, "text/plain");
        assert!(decoded.bytes.is_empty());
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            decode_data_url("https://example.com/a.png"),
            Err(ExportError::NotDataUrl(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64"),
            Err(ExportError::MissingSeparator)
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,***"),
            Err(ExportError::InvalidBase64(_))
        ));
    }
}
