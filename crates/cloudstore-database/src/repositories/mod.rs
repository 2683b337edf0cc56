//! PostgreSQL implementations of the store traits.

pub mod grant;
pub mod link;
pub mod resource;
pub mod user;

pub use grant::GrantRepository;
pub use link::LinkRepository;
pub use resource::ResourceRepository;
pub use user::UserRepository;
