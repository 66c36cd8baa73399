use std::io::Read as _;
use std::path::Path;

use crate::foundation::error::{CardError, CardResult};

/// Source of document and image bytes.
///
/// The resolver never touches the filesystem directly; every include, segment
/// map and base image goes through a loader. Implementations handling remote
/// URIs (object stores, HTTP with credentials) live outside this crate.
pub trait ByteLoader: Send + Sync {
    /// Fetch the full contents of `uri`.
    fn load_bytes(&self, uri: &str) -> CardResult<Vec<u8>>;
}

/// Loader for local files.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLoader;

impl ByteLoader for FsLoader {
    fn load_bytes(&self, uri: &str) -> CardResult<Vec<u8>> {
        if is_remote(uri) {
            return Err(CardError::io(
                "open",
                uri,
                std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "remote uri needs a network loader",
                ),
            ));
        }

        let mut file = std::fs::File::open(uri).map_err(|e| CardError::io("open", uri, e))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| CardError::io("read", uri, e))?;
        Ok(bytes)
    }
}

/// True for `http://` and `https://` URIs.
pub fn is_remote(uri: &str) -> bool {
    let lower = uri.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve `uri` against `base_dir`. Remote and absolute URIs are returned unchanged.
pub fn join_uri(base_dir: &Path, uri: &str) -> String {
    if is_remote(uri) || Path::new(uri).is_absolute() {
        return uri.to_string();
    }
    base_dir.join(uri).to_string_lossy().into_owned()
}

/// Directory that relative URIs of `path` resolve against.
pub fn parent_dir(path: &str) -> &Path {
    Path::new(path).parent().unwrap_or_else(|| Path::new(""))
}

#[cfg(test)]
#[path = "../../tests/unit/factory/loader.rs"]
mod tests;
