//! Files and folders as seen through the visibility rules.

pub mod service;
pub mod view;

pub use service::{DriveService, NewFile};
pub use view::{DownloadDescriptor, FolderContents, ResourceView};
