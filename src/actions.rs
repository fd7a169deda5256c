use hashbrown::HashSet;
use tracing::debug;

use crate::error::ActionWarning;
use crate::record::{ImageRecord, Position};
use crate::session::FolderSession;

/// Every user action that changes a folder session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectAll,
    DeselectAll,
    InvertSelection,
    ToggleSelected(usize),
    ToggleFilter(String),
    ClearFilters,
    AddTagToRecord { index: usize, tag: String },
    RemoveTagFromRecord { index: usize, tag: String },
    AddTagToSelection(String),
    RemoveTagFromSelection(String),
    RemoveDuplicates,
    Reposition { tags: Vec<String>, position: Position },
    DeleteTags(Vec<String>),
    ReplaceTags(Vec<(String, String)>),
}

/// What the renderer has to redraw after an action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Refresh {
    #[default]
    Nothing,
    Records(Vec<usize>),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub affected: usize,
    pub refresh: Refresh,
}

impl Outcome {
    fn regrid(affected: usize) -> Self {
        Self {
            affected,
            refresh: Refresh::All,
        }
    }
}

impl Action {
    /// Whether the action can change tag lists.
    pub fn mutates_tags(&self) -> bool {
        !matches!(
            self,
            Action::SelectAll
                | Action::DeselectAll
                | Action::InvertSelection
                | Action::ToggleSelected(_)
                | Action::ToggleFilter(_)
                | Action::ClearFilters
        )
    }
}

/// Drops pairs whose new tag is blank or equal to the old one.
pub fn clean_replacements(pairs: &[(String, String)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter_map(|(old, new)| {
            let new = new.trim();
            (!new.is_empty() && new != old.as_str()).then(|| (old.clone(), new.to_string()))
        })
        .collect()
}

impl FolderSession {
    /// Runs `action` against this session. Refused actions change nothing.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, ActionWarning> {
        debug!("Applying {:?}", action);
        let n = self.records.len();

        let outcome = match action {
            Action::SelectAll => {
                self.selection.select_all(n);
                Outcome::regrid(0)
            }
            Action::DeselectAll => {
                self.selection.deselect_all();
                Outcome::regrid(0)
            }
            Action::InvertSelection => {
                self.selection.invert(n);
                Outcome::regrid(0)
            }
            Action::ToggleSelected(index) => {
                self.check_index(index)?;
                self.selection.toggle(index);
                Outcome {
                    affected: 0,
                    refresh: Refresh::Records(vec![index]),
                }
            }
            Action::ToggleFilter(tag) => {
                self.tags.toggle(&tag);
                Outcome::regrid(0)
            }
            Action::ClearFilters => {
                self.tags.clear();
                Outcome::regrid(0)
            }
            Action::AddTagToRecord { index, tag } => {
                self.check_index(index)?;
                let tag = non_empty(&tag)?;
                let changed = self.records[index].add_tag(tag);
                record_outcome(index, changed)
            }
            Action::RemoveTagFromRecord { index, tag } => {
                self.check_index(index)?;
                let changed = self.records[index].remove_tag(&tag);
                record_outcome(index, changed)
            }
            Action::AddTagToSelection(tag) => {
                let tag = non_empty(&tag)?.to_string();
                let affected = self.on_selection(|record| record.add_tag(&tag))?;
                Outcome::regrid(affected)
            }
            Action::RemoveTagFromSelection(tag) => {
                let tag = non_empty(&tag)?.to_string();
                let affected = self.on_selection(|record| record.remove_tag(&tag))?;
                Outcome::regrid(affected)
            }
            Action::RemoveDuplicates => {
                let affected = self.on_all(|record| {
                    record.dedupe();
                    true
                });
                Outcome::regrid(affected)
            }
            Action::Reposition { tags, position } => {
                if tags.is_empty() {
                    return Err(ActionWarning::NoTagsChosen);
                }
                let chosen: HashSet<String> = tags.into_iter().collect();
                let affected = self.on_all(|record| record.reposition(&chosen, position));
                Outcome::regrid(affected)
            }
            Action::DeleteTags(tags) => {
                if tags.is_empty() {
                    return Err(ActionWarning::NoFilterChosen);
                }
                let affected = self.on_all(|record| record.remove_tags(&tags));
                Outcome::regrid(affected)
            }
            Action::ReplaceTags(pairs) => {
                let mapping = clean_replacements(&pairs);
                if mapping.is_empty() {
                    return Err(ActionWarning::NoReplacement);
                }
                let affected = self.on_all(|record| record.replace_tags(&mapping));
                Outcome::regrid(affected)
            }
        };

        Ok(outcome)
    }

    fn check_index(&self, index: usize) -> Result<(), ActionWarning> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(ActionWarning::InvalidIndex(index))
        }
    }

    /// Applies `op` to every record and refreshes the tag index.
    fn on_all(&mut self, mut op: impl FnMut(&mut ImageRecord) -> bool) -> usize {
        let affected = self
            .records
            .iter_mut()
            .map(|record| op(record))
            .filter(|&changed| changed)
            .count();
        self.rebuild_tags();
        affected
    }

    /// Applies `op` to the selected records, then clears the selection and
    /// refreshes the tag index.
    fn on_selection(
        &mut self,
        mut op: impl FnMut(&mut ImageRecord) -> bool,
    ) -> Result<usize, ActionWarning> {
        if self.selection.is_empty() {
            return Err(ActionWarning::NoSelection);
        }
        let mut affected = 0;
        for idx in self.selection.indices() {
            if let Some(record) = self.records.get_mut(idx) {
                if op(record) {
                    affected += 1;
                }
            }
        }
        self.selection.deselect_all();
        self.rebuild_tags();
        Ok(affected)
    }
}

fn non_empty(tag: &str) -> Result<&str, ActionWarning> {
    let tag = tag.trim();
    if tag.is_empty() {
        Err(ActionWarning::EmptyTag)
    } else {
        Ok(tag)
    }
}

fn record_outcome(index: usize, changed: bool) -> Outcome {
    Outcome {
        affected: usize::from(changed),
        refresh: if changed {
            Refresh::Records(vec![index])
        } else {
            Refresh::Nothing
        },
    }
}
