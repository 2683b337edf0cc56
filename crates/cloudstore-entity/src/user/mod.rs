//! User domain entities.

pub mod email;
pub mod model;

pub use email::{is_valid_email, normalize_email};
pub use model::{CreateUser, User};
