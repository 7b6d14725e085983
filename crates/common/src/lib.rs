//! Pieces shared by the binary and the HTTP crate: logging setup and the
//! small wire types that are not tied to the article model.

pub mod types;
pub mod utils;
