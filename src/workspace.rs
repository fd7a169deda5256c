use std::path::Path;

use tracing::{error, info, warn};

use crate::actions::{Action, Outcome, Refresh};
use crate::error::ActionWarning;
use crate::session::FolderSession;

/// Answer to "save before switching folders?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// Blocking message boxes shown to the user.
pub trait Dialogs {
    fn ask_unsaved_changes(&mut self) -> UnsavedChoice;
    fn confirm(&mut self, title: &str, message: &str) -> bool;
    fn info(&mut self, title: &str, message: &str);
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Whatever draws the image grid.
pub trait Renderer {
    fn render_record(&mut self, session: &FolderSession, index: usize);
    fn render_all(&mut self, session: &FolderSession);
}

/// Holds the open folder, if any, and routes user actions through the
/// dialogs and the renderer.
#[derive(Debug, Default)]
pub struct Workspace {
    session: Option<FolderSession>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&FolderSession> {
        self.session.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(FolderSession::has_unsaved_changes)
    }

    /// Switches to `folder`. Returns false when the user cancelled or the
    /// folder could not be read; the previous session is kept in both cases.
    pub fn open_folder(
        &mut self,
        folder: &Path,
        dialogs: &mut dyn Dialogs,
        renderer: &mut dyn Renderer,
    ) -> bool {
        if self.has_unsaved_changes() {
            match dialogs.ask_unsaved_changes() {
                UnsavedChoice::Save => {
                    self.save(dialogs);
                }
                UnsavedChoice::Discard => {
                    info!("Discarding unsaved changes");
                }
                UnsavedChoice::Cancel => return false,
            }
        }

        match FolderSession::open(folder) {
            Ok(session) => {
                info!("Opened {} ({} images)", folder.display(), session.len());
                renderer.render_all(&session);
                self.session = Some(session);
                true
            }
            Err(err) => {
                error!("Failed to open {}: {}", folder.display(), err);
                dialogs.error(&err.to_string());
                false
            }
        }
    }

    pub fn save(&mut self, dialogs: &mut dyn Dialogs) -> usize {
        let saved = self.session.as_mut().map_or(0, FolderSession::save_all);
        if saved > 0 {
            dialogs.info("Success", &format!("Saved {} file tags!", saved));
        } else {
            dialogs.info("Notifications", "No changes to save!");
        }
        if self.has_unsaved_changes() {
            warn!("Some tag files could not be written and remain modified");
        }
        saved
    }

    /// Active filter tags, or a warning when there are none.
    pub fn require_active_filters(&self, dialogs: &mut dyn Dialogs) -> Option<Vec<String>> {
        let tags = self
            .session
            .as_ref()
            .map(|session| session.tags().active_tags())
            .unwrap_or_default();
        if tags.is_empty() {
            dialogs.warning(&ActionWarning::NoFilterChosen.to_string());
            return None;
        }
        Some(tags)
    }

    /// Checks there is at least one image to work on.
    pub fn require_images(&self, dialogs: &mut dyn Dialogs) -> bool {
        match &self.session {
            None => {
                dialogs.info("Info", &ActionWarning::NoFolder.to_string());
                false
            }
            Some(session) if session.is_empty() => {
                dialogs.info("Info", &ActionWarning::NoImages.to_string());
                false
            }
            Some(_) => true,
        }
    }

    /// Confirms, applies and reports `action`. Returns `None` when nothing
    /// was applied.
    pub fn run(
        &mut self,
        action: Action,
        dialogs: &mut dyn Dialogs,
        renderer: &mut dyn Renderer,
    ) -> Option<Outcome> {
        let Some(session) = self.session.as_mut() else {
            dialogs.info("Info", &ActionWarning::NoFolder.to_string());
            return None;
        };

        if !confirm(&action, dialogs) {
            return None;
        }

        let report = Report::for_action(&action);
        let mutates = action.mutates_tags();
        let outcome = match session.apply(action) {
            Ok(outcome) => outcome,
            Err(warning) => {
                dialogs.warning(&warning.to_string());
                return None;
            }
        };

        if mutates {
            info!("{} image(s) changed, {} unsaved", outcome.affected, session.dirty_count());
        }

        match &outcome.refresh {
            Refresh::Nothing => {}
            Refresh::Records(indices) => {
                for &index in indices {
                    renderer.render_record(session, index);
                }
            }
            Refresh::All => renderer.render_all(session),
        }

        if let Some(report) = report {
            let (title, message) = report.message(outcome.affected);
            dialogs.info(title, &message);
        }
        Some(outcome)
    }
}

fn confirm(action: &Action, dialogs: &mut dyn Dialogs) -> bool {
    match action {
        Action::RemoveDuplicates => {
            dialogs.confirm("Confirm", "Are you sure you want to remove duplicate tags?")
        }
        Action::DeleteTags(tags) if !tags.is_empty() => {
            let list = format!("\n- {}", tags.join("\n- "));
            dialogs.confirm(
                "Delete Tags",
                &format!(
                    "Are you sure you want to remove the following tags from all images?\n{}",
                    list
                ),
            )
        }
        _ => true,
    }
}

/// Completion message shown after a bulk action.
enum Report {
    Added(String),
    Removed(String),
    Deduped,
    Resorted,
    Deleted(usize),
    Replaced,
}

impl Report {
    fn for_action(action: &Action) -> Option<Self> {
        match action {
            Action::AddTagToSelection(tag) => Some(Report::Added(tag.trim().to_string())),
            Action::RemoveTagFromSelection(tag) => Some(Report::Removed(tag.trim().to_string())),
            Action::RemoveDuplicates => Some(Report::Deduped),
            Action::Reposition { .. } => Some(Report::Resorted),
            Action::DeleteTags(tags) => Some(Report::Deleted(tags.len())),
            Action::ReplaceTags(_) => Some(Report::Replaced),
            _ => None,
        }
    }

    fn message(&self, affected: usize) -> (&'static str, String) {
        match self {
            Report::Added(tag) => (
                "Success",
                format!("Added '{}' tag to {} images!", tag, affected),
            ),
            Report::Removed(tag) => (
                "Success",
                format!("Removed the tag '{}' from {} images!", tag, affected),
            ),
            Report::Deduped => ("Done", "Duplicate tags removed.".to_string()),
            Report::Resorted => ("Done", format!("Re-sorted tags in {} images", affected)),
            Report::Deleted(count) => (
                "Done",
                format!("Removed {} tag from {} images.", count, affected),
            ),
            Report::Replaced => ("Successful", format!("Tag replaced on {} images.", affected)),
        }
    }
}
