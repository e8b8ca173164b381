//! Document and prediction stores

pub mod documents;
pub mod init;
pub mod predictions;

pub use init::{open_database, open_in_memory};
