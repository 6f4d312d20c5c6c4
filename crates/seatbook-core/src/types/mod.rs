//! Core type definitions used across the SeatBook workspace.

pub mod id;
pub mod resource;

pub use id::*;
pub use resource::{ClientId, HolderId, ResourceId, ResourceStatus};
