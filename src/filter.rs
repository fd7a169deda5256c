use hashbrown::HashMap;

use crate::record::ImageRecord;

/// Tag vocabulary of the open folder plus the tags the user has
/// switched on as filters.
#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    frequency: HashMap<String, usize>,
    vocabulary: Vec<String>,
    active: HashMap<String, bool>,
}

/// Record indices split by whether they carry any active filter tag.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition {
    pub with: Vec<usize>,
    pub without: Vec<usize>,
    /// False when no filter is active; everything is then in `with`.
    pub filtered: bool,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recounts every tag occurrence across `records` and drops all
    /// active filters.
    pub fn rebuild(&mut self, records: &[ImageRecord]) {
        let mut frequency: HashMap<String, usize> = HashMap::new();
        for record in records {
            for tag in record.tags() {
                *frequency.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        let mut vocabulary: Vec<String> = frequency.keys().cloned().collect();
        vocabulary.sort();

        self.frequency = frequency;
        self.vocabulary = vocabulary;
        self.active.clear();
    }

    pub fn toggle(&mut self, tag: &str) -> bool {
        let flag = self.active.entry(tag.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_active(&self, tag: &str) -> bool {
        self.active.get(tag).copied().unwrap_or(false)
    }

    pub fn has_active(&self) -> bool {
        self.active.values().any(|&on| on)
    }

    /// Active filter tags in vocabulary order, followed by any active tag
    /// that has dropped out of the vocabulary.
    pub fn active_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .vocabulary
            .iter()
            .filter(|tag| self.is_active(tag))
            .cloned()
            .collect();
        let mut stale: Vec<String> = self
            .active
            .iter()
            .filter(|(tag, on)| **on && !self.frequency.contains_key(*tag))
            .map(|(tag, _)| tag.clone())
            .collect();
        stale.sort();
        tags.extend(stale);
        tags
    }

    /// Switches every filter off, keeping the counts.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn count(&self, tag: &str) -> usize {
        self.frequency.get(tag).copied().unwrap_or(0)
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Vocabulary entries containing `term`, case-insensitively.
    pub fn search(&self, term: &str) -> Vec<&str> {
        let term = term.trim().to_lowercase();
        self.vocabulary
            .iter()
            .filter(|tag| term.is_empty() || tag.to_lowercase().contains(&term))
            .map(String::as_str)
            .collect()
    }

    pub fn label(&self, tag: &str) -> String {
        format!("{} ({})", tag, self.count(tag))
    }

    pub fn partition(&self, records: &[ImageRecord]) -> Partition {
        let active = self.active_tags();
        if active.is_empty() {
            return Partition {
                with: (0..records.len()).collect(),
                without: Vec::new(),
                filtered: false,
            };
        }

        let (with, without): (Vec<usize>, Vec<usize>) = (0..records.len())
            .partition(|&idx| active.iter().any(|tag| records[idx].has_tag(tag)));
        Partition {
            with,
            without,
            filtered: true,
        }
    }
}

#[cfg(test)]
mod tests;
