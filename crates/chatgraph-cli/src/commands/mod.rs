//! CLI command implementations.

pub mod info;
mod load;
pub mod timeline;
pub mod topics;
pub mod words;
