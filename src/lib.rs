// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod range;
pub mod session;
pub mod source;
pub mod storage;
pub mod store;

pub use error::EventError;
