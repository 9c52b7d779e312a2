//! Source byte loading (local files and remote http(s) images).

use std::fs;
use std::time::SystemTime;

use super::{ImageSource, RenderError};
use crate::config::FetchOptions;
use crate::core::path_from_url;
use crate::debug;
use crate::freshness::get_mtime;

/// Raw bytes of a source image.
#[derive(Debug)]
pub struct SourceBytes {
    pub bytes: Vec<u8>,
    /// Name handed to the filename function: the local path, or the URL path.
    pub name: String,
    /// Modification time of a local source; `None` for remote sources.
    pub mtime: Option<SystemTime>,
}

pub fn load(source: &ImageSource, fetch: FetchOptions) -> Result<SourceBytes, RenderError> {
    match source {
        ImageSource::Local(path) => {
            let bytes = fs::read(path).map_err(|err| RenderError::Io(path.clone(), err))?;
            Ok(SourceBytes {
                bytes,
                name: path.to_string_lossy().into_owned(),
                mtime: get_mtime(path),
            })
        }
        ImageSource::Remote(url) => {
            debug!("fetch"; "downloading {}", url);
            let bytes = download(url, fetch)?;
            Ok(SourceBytes {
                bytes,
                name: path_from_url(url).unwrap_or_else(|| url.clone()),
                mtime: None,
            })
        }
    }
}

fn download(url: &str, fetch: FetchOptions) -> Result<Vec<u8>, RenderError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(fetch.timeout())
        .build()?;

    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_local() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, b"bytes").unwrap();

        let loaded = load(&ImageSource::Local(path.clone()), FetchOptions::default()).unwrap();
        assert_eq!(loaded.bytes, b"bytes");
        assert_eq!(loaded.name, path.to_string_lossy());
        assert!(loaded.mtime.is_some());
    }

    #[test]
    fn test_load_missing_local() {
        let dir = TempDir::new().unwrap();
        let source = ImageSource::Local(dir.path().join("missing.png"));
        assert!(matches!(
            load(&source, FetchOptions::default()),
            Err(RenderError::Io(..))
        ));
    }
}
