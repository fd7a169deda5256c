use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sidecar;

/// Where repositioned tags end up inside a record's tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Beginning,
    Ending,
}

/// One image in the open folder together with its sidecar tags.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ImageRecord {
    path: PathBuf,
    tags_path: PathBuf,
    tags: Vec<String>,
    #[serde(skip)]
    dirty: bool,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, tags: Vec<String>) -> Self {
        let path = path.into();
        let tags_path = sidecar::sidecar_path(&path);
        Self {
            path,
            tags_path,
            tags,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tags_path(&self) -> &Path {
        &self.tags_path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Appends `tag` (trimmed) unless it is empty or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        self.dirty = true;
        true
    }

    /// Removes the first occurrence of `tag`.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(pos) => {
                self.tags.remove(pos);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Keeps the first occurrence of every tag. The record is marked dirty
    /// even when nothing was dropped; the return value tells whether
    /// anything was.
    pub fn dedupe(&mut self) -> bool {
        let before = self.tags.len();
        let mut seen = HashSet::new();
        self.tags.retain(|tag| seen.insert(tag.clone()));
        self.dirty = true;
        self.tags.len() != before
    }

    /// Moves every tag in `chosen` to the front or back, keeping relative
    /// order on both sides of the split.
    pub fn reposition(&mut self, chosen: &HashSet<String>, position: Position) -> bool {
        let (present, remaining): (Vec<String>, Vec<String>) = self
            .tags
            .iter()
            .cloned()
            .partition(|tag| chosen.contains(tag));
        if present.is_empty() {
            return false;
        }

        self.tags = match position {
            Position::Beginning => present.into_iter().chain(remaining).collect(),
            Position::Ending => remaining.into_iter().chain(present).collect(),
        };
        self.dirty = true;
        true
    }

    /// Drops every occurrence of every tag in `tags`.
    pub fn remove_tags(&mut self, tags: &[String]) -> bool {
        let before = self.tags.len();
        self.tags.retain(|tag| !tags.contains(tag));
        let removed = self.tags.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// For each `(old, new)` pair whose `old` is present: drops `old` and
    /// appends `new` at the end unless it is already there.
    pub fn replace_tags(&mut self, mapping: &[(String, String)]) -> bool {
        let mut replaced = false;
        for (old, new) in mapping {
            let Some(pos) = self.tags.iter().position(|t| t == old) else {
                continue;
            };
            self.tags.remove(pos);
            if !self.has_tag(new) {
                self.tags.push(new.clone());
            }
            replaced = true;
        }
        if replaced {
            self.dirty = true;
        }
        replaced
    }
}

#[cfg(test)]
mod tests;
