//! Visibility resolution: `(actor, resource) -> allowed + level`.
//!
//! Resolution order:
//! 1. Trash: a resource that is trashed, or sits under a trashed folder,
//!    is unreachable except to its owner in trash scope.
//! 2. Owner: the creator always gets `owner`.
//! 3. Direct grant on the resource.
//! 4. Nearest ancestor folder grant, provided the folder and the resource
//!    have the same owner.
//! 5. Denied.

pub mod decision;
pub mod resolver;

pub use decision::{AccessDecision, AccessScope, AccessSource};
pub use resolver::{VisibilityResolver, is_visible_in};
