//! Tower layers applied to the whole router.

pub mod compression;
pub mod cors;
