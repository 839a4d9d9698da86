// Image viewer: downloads a photo, checks that it decodes, and hands a PNG
// copy to the desktop's default image viewer. `show` returns as soon as the
// viewer has been launched; it does not wait for the window to close. The
// PNG copies are deleted again by `finish` when the session ends.

use crate::config::CatalogConfig;
use crate::error::DisplayError;
use anyhow::{Context, Result};
use image::ImageFormat;
use log::debug;
use reqwest::blocking::Client;
use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Something that can put an image in front of the user.
pub trait ImageViewer {
    /// Display the image at `url`.
    ///
    /// # Errors
    ///
    /// Returns a `DisplayError` if the image cannot be fetched, decoded or
    /// opened. Callers report it and carry on.
    fn show(&self, url: &str) -> Result<(), DisplayError>;

    /// Release whatever `show` left behind. Called once when the session
    /// exits.
    ///
    /// # Errors
    ///
    /// Returns a `DisplayError` if a leftover cannot be removed.
    fn finish(&self) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// Viewer backed by an HTTP download and the platform's "open" command.
pub struct SystemViewer {
    client: Client,
    dir: PathBuf,
    written: RefCell<Vec<PathBuf>>,
}

impl SystemViewer {
    /// Viewer that stores converted images under the OS temp directory.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Self::with_dir(config, std::env::temp_dir().join("mars-photos"))
    }

    /// Viewer that stores converted images under `dir`.
    pub fn with_dir(config: &CatalogConfig, dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(SystemViewer {
            client,
            dir,
            written: RefCell::new(Vec::new()),
        })
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, DisplayError> {
        let fetch_err = |source| DisplayError::Fetch {
            url: url.to_string(),
            source,
        };
        let res = self.client.get(url).send().map_err(fetch_err)?;
        if !res.status().is_success() {
            return Err(DisplayError::Status {
                url: url.to_string(),
                status: res.status(),
            });
        }
        let bytes = res.bytes().map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }
}

impl ImageViewer for SystemViewer {
    fn show(&self, url: &str) -> Result<(), DisplayError> {
        let bytes = self.fetch(url)?;
        let path = store_image(&bytes, url, &self.dir)?;
        self.remember(&path);
        debug!("opening {}", path.display());
        open::that_detached(&path).map_err(|source| DisplayError::Open { path, source })
    }

    fn finish(&self) -> Result<(), DisplayError> {
        for path in self.written.borrow_mut().drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("removed {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(DisplayError::Store { path, source }),
            }
        }
        Ok(())
    }
}

impl SystemViewer {
    fn remember(&self, path: &Path) {
        let mut written = self.written.borrow_mut();
        if !written.iter().any(|p| p == path) {
            written.push(path.to_path_buf());
        }
    }
}

/// Decode `bytes` and write them as a PNG under `dir`, named after the
/// last path segment of `url`. Returns the written path.
///
/// # Errors
///
/// `DisplayError::Decode` when the bytes are not an image, `Store` or
/// `Encode` when the file cannot be written.
pub fn store_image(bytes: &[u8], url: &str, dir: &Path) -> Result<PathBuf, DisplayError> {
    let img = image::load_from_memory(bytes).map_err(|source| DisplayError::Decode {
        url: url.to_string(),
        source,
    })?;
    std::fs::create_dir_all(dir).map_err(|source| DisplayError::Store {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{}.png", file_stem_for(url)));
    img.save_with_format(&path, ImageFormat::Png)
        .map_err(|source| DisplayError::Encode {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// File-name-safe stem taken from the last path segment of `url`.
fn file_stem_for(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query.rsplit('/').next().unwrap_or_default();
    let stem = Path::new(segment)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let clean: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if clean.is_empty() {
        "photo".to_string()
    } else {
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_file_stem_for() {
        assert_eq!(
            file_stem_for("http://mars.jpl.nasa.gov/msl-raw-images/FLB_486265257EDR_F0481570FHAZ00323M_.JPG"),
            "FLB_486265257EDR_F0481570FHAZ00323M_"
        );
        assert_eq!(file_stem_for("https://x.test/a/b.jpg?size=large"), "b");
        assert_eq!(file_stem_for("https://x.test/"), "photo");
        assert_eq!(file_stem_for("https://x.test/we!rd name.png"), "werdname");
    }

    #[test]
    fn test_store_image_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_image(&png_bytes(), "https://x.test/shot.jpg", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("shot.png"));
        assert!(path.exists());
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_store_image_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_image(b"<html>not found</html>", "https://x.test/a.jpg", dir.path())
            .unwrap_err();
        assert!(matches!(err, DisplayError::Decode { .. }));
        assert!(!dir.path().join("a.png").exists());
    }

    #[test]
    fn test_finish_removes_written_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::CatalogConfig::new("https://x.test/api", "key").unwrap();
        let viewer = SystemViewer::with_dir(&config, dir.path().to_path_buf()).unwrap();

        let first = store_image(&png_bytes(), "https://x.test/one.jpg", dir.path()).unwrap();
        let second = store_image(&png_bytes(), "https://x.test/two.jpg", dir.path()).unwrap();
        viewer.remember(&first);
        viewer.remember(&second);
        viewer.remember(&first);
        std::fs::remove_file(&second).unwrap();

        viewer.finish().unwrap();
        assert!(!first.exists());
        assert!(viewer.written.borrow().is_empty());
        // a second call has nothing left to do
        viewer.finish().unwrap();
    }

    #[test]
    fn test_store_image_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("deeper");
        let path = store_image(&png_bytes(), "https://x.test/p.png", &nested).unwrap();
        assert!(path.starts_with(&nested));
    }
}
