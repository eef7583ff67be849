//! Utility functions for output file naming and path handling

use crate::config::FileCollisionAction;
use crate::error::{DownloadError, Error, Result};
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Characters replaced by [`sanitize_filename`]
const RESERVED_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replace characters that are not allowed in file names with `_`
///
/// # Examples
///
/// ```
/// use radio_dl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("News 12/03: Part 1?"), "News 12_03_ Part 1_");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.replace(RESERVED_CHARS, "_")
}

/// Extension (with the leading dot) of the last path segment of `url`
///
/// Query strings and fragments are ignored. Returns an empty string when the
/// URL has no extension.
///
/// # Examples
///
/// ```
/// use radio_dl::utils::url_extension;
///
/// assert_eq!(url_extension("https://cdn.example.com/audio/show.mp3?token=1"), ".mp3");
/// assert_eq!(url_extension("https://cdn.example.com/stream"), "");
/// ```
#[must_use]
pub fn url_extension(url: &str) -> String {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string(),
    };

    Path::new(&segment)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// File name for a downloaded broadcast: `"{index:03} - {name}{ext}"`
///
/// # Examples
///
/// ```
/// use radio_dl::utils::output_file_name;
///
/// assert_eq!(
///     output_file_name(7, "Morning Show", "https://cdn.example.com/a.mp3"),
///     "007 - Morning Show.mp3"
/// );
/// ```
#[must_use]
pub fn output_file_name(index: usize, name: &str, url: &str) -> String {
    format!(
        "{:03} - {}{}",
        index,
        sanitize_filename(name),
        url_extension(url)
    )
}

/// Check that `path` is an existing directory
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::Download(DownloadError::InvalidDirectory {
            path: path.to_path_buf(),
        }))
    }
}

/// Get a unique path for a file, handling collisions according to the specified action
///
/// # Arguments
///
/// * `path` - The desired file path
/// * `action` - How to handle file collisions
///
/// # Returns
///
/// Returns the final path to use. For Rename action, this may have a suffix added.
/// For Skip action, returns an error if the file already exists.
/// For Overwrite action, returns the original path unchanged.
pub fn get_unique_path(path: &Path, action: FileCollisionAction) -> Result<PathBuf> {
    match action {
        FileCollisionAction::Overwrite => Ok(path.to_path_buf()),
        FileCollisionAction::Skip => {
            if path.exists() {
                return Err(Error::Download(DownloadError::FileExists {
                    path: path.to_path_buf(),
                }));
            }
            Ok(path.to_path_buf())
        }
        FileCollisionAction::Rename => {
            if !path.exists() {
                return Ok(path.to_path_buf());
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| Error::Other(format!("Cannot extract file stem from {}", path.display())))?;
            let extension = path.extension().and_then(|e| e.to_str());
            let parent = path
                .parent()
                .ok_or_else(|| Error::Other(format!("Cannot extract parent of {}", path.display())))?;

            // Try adding (1), (2), (3), ... until we find a unique name
            for i in 1..=MAX_RENAME_ATTEMPTS {
                let new_name = match extension {
                    Some(ext) => format!("{} ({}).{}", stem, i, ext),
                    None => format!("{} ({})", stem, i),
                };
                let new_path = parent.join(new_name);
                if !new_path.exists() {
                    return Ok(new_path);
                }
            }

            Err(Error::Download(DownloadError::FileExists {
                path: path.to_path_buf(),
            }))
        }
    }
}
