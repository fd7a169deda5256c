use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Result, TaggerError};
use crate::record::ImageRecord;

pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// `name.ext` -> `name.txt` in the same directory.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Splits sidecar text into tags. Commas cannot appear inside a tag.
pub fn parse_tags(content: &str) -> Vec<String> {
    content
        .trim()
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Reads the tags stored at `tags_path`. Missing or unreadable files
/// give no tags.
pub fn load_tags(tags_path: &Path) -> Vec<String> {
    if !tags_path.exists() {
        return Vec::new();
    }
    match fs::read_to_string(tags_path) {
        Ok(content) => parse_tags(&content),
        Err(err) => {
            warn!("Failed to read tags {}: {}", tags_path.display(), err);
            Vec::new()
        }
    }
}

/// Writes the record's tags if it has unsaved changes. A failed write
/// keeps the record dirty so the next save retries it.
pub fn save_if_dirty(record: &mut ImageRecord) -> bool {
    if !record.is_dirty() {
        return false;
    }
    match fs::write(record.tags_path(), format_tags(record.tags())) {
        Ok(()) => {
            record.mark_saved();
            debug!("Saved tags for {}", record.path().display());
            true
        }
        Err(err) => {
            warn!("Failed to save tags for {}: {}", record.path().display(), err);
            false
        }
    }
}

pub fn save_all(records: &mut [ImageRecord]) -> usize {
    let saved = records
        .iter_mut()
        .map(save_if_dirty)
        .filter(|&saved| saved)
        .count();
    debug!("Saved {} of {} tag files", saved, records.len());
    saved
}

/// Lists the supported images directly inside `folder` in file name order,
/// loading each one's sidecar tags.
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageRecord>> {
    let mut records = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "unreadable folder"));
                return Err(TaggerError::FolderScan {
                    path: folder.to_path_buf(),
                    source,
                });
            }
            Err(err) => {
                warn!("Skipping entry in {}: {}", folder.display(), err);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() && is_supported_image(path) {
            let tags = load_tags(&sidecar_path(path));
            records.push(ImageRecord::new(path, tags));
        }
    }

    info!("Found {} images in {}", records.len(), folder.display());
    Ok(records)
}

#[cfg(test)]
mod tests;
