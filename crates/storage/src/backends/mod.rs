//! Spreadsheet backend implementations.

pub(crate) mod document;
pub mod filesystem;
pub mod google;
mod google_auth;
pub mod memory;
