use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::filter::{Partition, TagIndex};
use crate::record::ImageRecord;
use crate::selection::Selection;
use crate::sidecar;

/// Everything known about the folder currently open. Replaced as a whole
/// when another folder is opened.
#[derive(Debug, Clone)]
pub struct FolderSession {
    folder: PathBuf,
    pub(crate) records: Vec<ImageRecord>,
    pub(crate) tags: TagIndex,
    pub(crate) selection: Selection,
}

impl FolderSession {
    /// Scans `folder` and builds a fresh session. On error nothing is
    /// created and the caller keeps whatever session it had.
    pub fn open(folder: &Path) -> Result<Self> {
        let records = sidecar::scan_folder(folder)?;
        Ok(Self::from_records(folder, records))
    }

    pub fn from_records(folder: &Path, records: Vec<ImageRecord>) -> Self {
        let mut tags = TagIndex::new();
        tags.rebuild(&records);
        Self {
            folder: folder.to_path_buf(),
            records,
            tags,
            selection: Selection::new(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn record(&self, idx: usize) -> Option<&ImageRecord> {
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn partition(&self) -> Partition {
        self.tags.partition(&self.records)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.records.iter().any(ImageRecord::is_dirty)
    }

    pub fn dirty_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_dirty()).count()
    }

    pub fn save_all(&mut self) -> usize {
        let saved = sidecar::save_all(&mut self.records);
        info!("Saved {} file tags in {}", saved, self.folder.display());
        saved
    }

    pub(crate) fn rebuild_tags(&mut self) {
        self.tags.rebuild(&self.records);
    }
}
