//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::{
    CreateFileRequest, CreateFolderRequest, CreateLinkRequest, DownloadQuery, MoveItemsRequest,
    RenameRequest, ShareBody, UpdateGrantRequest, validate_body,
};
pub use response::{ApiResponse, HealthResponse, MessageResponse, ShareOutcome};
