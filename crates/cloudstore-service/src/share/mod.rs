//! Per-user grants, public links, and the anonymous link view.

pub mod grant;
pub mod link;
pub mod public;
pub mod view;

pub use grant::{GrantService, ShareRequest};
pub use link::{LinkService, ResolvedLink};
pub use public::PublicShareService;
pub use view::{
    LinkView, PublicShareView, RemoveAllOutcome, SharedByMeEntry, SharedWithMeEntry,
    SubfolderEntry,
};
