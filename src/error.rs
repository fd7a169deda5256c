use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaggerError>;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("No permission access: {}", path.display())]
    FolderScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {}: {source}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file is not valid JSON: {0}")]
    SettingsFormat(#[from] serde_json::Error),

    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// A user action that was refused before touching any record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionWarning {
    #[error("Please enter the tag!")]
    EmptyTag,

    #[error("Please select at least one image!")]
    NoSelection,

    #[error("Please select at least one tag!")]
    NoFilterChosen,

    #[error("No tags selected")]
    NoTagsChosen,

    #[error("No tags replaced.")]
    NoReplacement,

    #[error("No images in current folder")]
    NoImages,

    #[error("No folder selected")]
    NoFolder,

    #[error("image index {0} is out of range")]
    InvalidIndex(usize),
}
