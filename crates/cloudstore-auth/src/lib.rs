//! # cloudstore-auth
//!
//! Authentication and authorization for CloudStore.
//!
//! ## Modules
//!
//! - `jwt`: access token signing and validation
//! - `visibility`: who may reach a resource, at which level, and which
//!   children of a shared folder each viewer sees

pub mod jwt;
pub mod visibility;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use visibility::{AccessDecision, AccessScope, AccessSource, VisibilityResolver};
