//! On-disk persistence of fetched pages.

pub mod sanitize;
pub mod writer;

#[cfg(test)]
mod writer_test;

pub use sanitize::file_name_for_url;
pub use writer::{DiskWriter, PersistError};
