use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use dataset_tagger::{Dialogs, UnsavedChoice};

/// Native message boxes.
#[derive(Default)]
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn ask_unsaved_changes(&mut self) -> UnsavedChoice {
        let result = MessageDialog::new()
            .set_title("Save the change?")
            .set_description("Do you want to save the changes before transferring the folder?")
            .set_buttons(MessageButtons::YesNoCancel)
            .set_level(MessageLevel::Warning)
            .show();

        match result {
            MessageDialogResult::Yes => UnsavedChoice::Save,
            MessageDialogResult::No => UnsavedChoice::Discard,
            _ => UnsavedChoice::Cancel,
        }
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let result = MessageDialog::new()
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::YesNo)
            .show();
        result == MessageDialogResult::Yes
    }

    fn info(&mut self, title: &str, message: &str) {
        MessageDialog::new()
            .set_title(title)
            .set_description(message)
            .set_level(MessageLevel::Info)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn warning(&mut self, message: &str) {
        MessageDialog::new()
            .set_title("Warning")
            .set_description(message)
            .set_level(MessageLevel::Warning)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn error(&mut self, message: &str) {
        MessageDialog::new()
            .set_title("Error")
            .set_description(message)
            .set_level(MessageLevel::Error)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
