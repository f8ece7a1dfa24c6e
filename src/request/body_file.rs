use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::TempPath;

use crate::error::Error;

/// The request body written to a temporary file for a backend to read.
///
/// Removed when released, or when dropped, unless released with `keep`.
#[derive(Debug)]
pub struct BodyFile {
    path: TempPath,
}

impl BodyFile {
    pub fn create(text: &str) -> Result<Self, Error> {
        let mut file = tempfile::Builder::new()
            .prefix("reqplate-body-")
            .tempfile()
            .map_err(Error::BodyFile)?;
        file.write_all(text.as_bytes()).map_err(Error::BodyFile)?;
        file.flush().map_err(Error::BodyFile)?;
        let path = file.into_temp_path();
        debug!("body written to {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finish with the file: persist it when `keep`, otherwise remove it.
    ///
    /// Removal failure is logged, not returned. Returns the kept path.
    pub fn release(self, keep: bool) -> Option<PathBuf> {
        if keep {
            match self.path.keep() {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("cannot keep body file: {e}");
                    None
                }
            }
        } else {
            let shown = self.path.display().to_string();
            if let Err(e) = self.path.close() {
                warn!("cannot remove body file {shown}: {e}");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_written_and_removed() {
        let file = BodyFile::create("{\"a\": 1}").unwrap();
        let path = file.path().to_path_buf();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\": 1}");
        assert_eq!(file.release(false), None);
        assert!(!path.exists());
    }

    #[test]
    fn kept_body_survives_release() {
        let file = BodyFile::create("kept").unwrap();
        let path = file.release(true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn dropped_body_is_removed() {
        let file = BodyFile::create("x").unwrap();
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
    }
}
