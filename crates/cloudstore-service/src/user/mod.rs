//! User directory use cases.

pub mod service;

pub use service::{UserService, UserSummary};
