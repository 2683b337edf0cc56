//! HTTP-level integration tests over the in-memory stores.

mod helpers;

mod auth_test;
mod drive_test;
mod link_test;
mod share_test;
mod star_test;
mod trash_test;
