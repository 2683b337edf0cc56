//! Core type definitions used across the CloudStore workspace.

pub mod id;

pub use id::*;
