//! File download — saves exported data URLs into a directory.
//!
//! Files are stored in the user's downloads directory by default:
//!   macOS:   ~/Downloads/
//!   Linux:   $XDG_DOWNLOAD_DIR (usually ~/Downloads/)
//!   Windows: %USERPROFILE%\Downloads\

use crate::capture::{decode_data_url, Downloader, ExportError};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Invalid download data: {0}")]
    Decode(#[from] ExportError),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Failed to save {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Default download directory, falling back to the working directory.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Writes downloads into `dir`, never overwriting an existing file.
pub struct FileDownloader {
    dir: PathBuf,
}

impl FileDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Decodes `data_url` and writes it under a free variant of `file_name`.
    pub fn save(&self, data_url: &str, file_name: &str) -> Result<PathBuf, DownloadError> {
        let data = decode_data_url(data_url)?;

        // Only the final component is honoured, as a browser download would.
        let base = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DownloadError::InvalidFileName(file_name.to_string()))?;

        std::fs::create_dir_all(&self.dir).map_err(|source| DownloadError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = write_new_file(&self.dir, base, &data.bytes)?;

        log::info!(
            "[EXPORT] Saved {} ({}, {} bytes)",
            path.display(),
            data.mime,
            data.bytes.len()
        );
        Ok(path)
    }
}

impl Downloader for FileDownloader {
    fn download(&self, data_url: &str, file_name: &str) {
        if let Err(e) = self.save(data_url, file_name) {
            log::error!("[EXPORT] Download of {} failed: {}", file_name, e);
        }
    }
}

/// `n == 0` is `dir/name`; after that `dir/stem (n).ext`.
pub fn numbered_path(dir: &Path, file_name: &str, n: u32) -> PathBuf {
    if n == 0 {
        return dir.join(file_name);
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    match name.extension().and_then(|e| e.to_str()) {
        Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
        None => dir.join(format!("{} ({})", stem, n)),
    }
}

/// Claims the first free numbered path with `create_new` and writes `bytes`.
///
/// Creation is atomic, so concurrent saves never land on the same file.
fn write_new_file(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    for n in 0u32.. {
        let path = numbered_path(dir, file_name, n);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(DownloadError::Io { path, source }),
        };
        file.write_all(bytes)
            .map_err(|source| DownloadError::Io {
                path: path.clone(),
                source,
            })?;
        return Ok(path);
    }

    Err(DownloadError::Io {
        path: dir.join(file_name),
        source: std::io::Error::new(ErrorKind::AlreadyExists, "no free file name left"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::png_data_url;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "web-screenshot-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn saves_decoded_bytes() {
        let dir = scratch_dir("save");
        let downloader = FileDownloader::new(&dir);
        let path = downloader
            .save(&png_data_url(&[1, 2, 3]), "screenshot.png")
            .unwrap();
        assert_eq!(path, dir.join("screenshot.png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn never_overwrites() {
        let dir = scratch_dir("unique");
        let downloader = FileDownloader::new(&dir);
        let first = downloader.save("data:,", "screenshot.png").unwrap();
        let second = downloader.save("data:,", "screenshot.png").unwrap();
        let third = downloader.save("data:,", "screenshot.png").unwrap();
        assert_eq!(first, dir.join("screenshot.png"));
        assert_eq!(second, dir.join("screenshot (1).png"));
        assert_eq!(third, dir.join("screenshot (2).png"));
        assert_eq!(std::fs::metadata(&first).unwrap().len(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn concurrent_saves_get_distinct_files() {
        let dir = scratch_dir("race");
        let downloader = std::sync::Arc::new(FileDownloader::new(&dir));

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let downloader = std::sync::Arc::clone(&downloader);
                std::thread::spawn(move || {
                    downloader
                        .save(&png_data_url(&[i]), "screenshot.png")
                        .unwrap()
                })
            })
            .collect();
        let mut paths: Vec<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);
        let mut contents: Vec<u8> = paths
            .iter()
            .map(|p| std::fs::read(p).unwrap()[0])
            .collect();
        contents.sort();
        assert_eq!(contents, (0..8u8).collect::<Vec<_>>());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn numbered_names_keep_extension() {
        let dir = Path::new("/tmp/shots");
        assert_eq!(numbered_path(dir, "screenshot.png", 0), dir.join("screenshot.png"));
        assert_eq!(numbered_path(dir, "screenshot.png", 3), dir.join("screenshot (3).png"));
        assert_eq!(numbered_path(dir, "README", 1), dir.join("README (1)"));
    }

    #[test]
    fn strips_directories_from_file_name() {
        let dir = scratch_dir("strip");
        let downloader = FileDownloader::new(&dir);
        let path = downloader.save("data:,", "../../etc/shot.png").unwrap();
        assert_eq!(path, dir.join("shot.png"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_bad_data() {
        let dir = scratch_dir("bad");
        let downloader = FileDownloader::new(&dir);
        assert!(matches!(
            downloader.save("not a url", "screenshot.png"),
            Err(DownloadError::Decode(_))
        ));
        assert!(matches!(
            downloader.save("data:,", ".."),
            Err(DownloadError::InvalidFileName(_))
        ));
    }
}
