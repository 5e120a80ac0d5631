// File: ./src/model/mod.rs
pub mod event;
pub mod normalizer;
pub mod time;

pub use event::{CellValue, Event, RawRow};
pub use normalizer::{DateSystem, Unparseable, normalize, normalize_with};
