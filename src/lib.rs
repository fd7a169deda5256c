pub mod actions;
pub mod error;
pub mod filter;
pub mod record;
pub mod selection;
pub mod session;
pub mod settings;
pub mod sidecar;
pub mod thumbnails;
pub mod tree;
pub mod workspace;

pub use actions::{Action, Outcome, Refresh};
pub use error::{ActionWarning, Result, TaggerError};
pub use record::{ImageRecord, Position};
pub use session::FolderSession;
pub use workspace::{Dialogs, Renderer, UnsavedChoice, Workspace};
